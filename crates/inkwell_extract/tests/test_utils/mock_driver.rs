//! Mock model driver for testing.

use async_trait::async_trait;
use inkwell_core::{GenerateRequest, GenerateResponse};
use inkwell_error::{InkwellResult, ProviderError, ProviderErrorKind};
use inkwell_interface::InkwellDriver;
use std::sync::{Arc, Mutex};

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return success with the given text
    Success(String),
    /// Always return the specified error
    Error(ProviderErrorKind),
}

/// Mock driver for testing.
///
/// Records every request so tests can inspect the prompt and count calls
/// without making network requests.
#[derive(Clone)]
pub struct MockDriver {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

#[allow(dead_code)]
impl MockDriver {
    /// Create a mock driver that always succeeds with the given text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Success(text.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock driver that always fails with the given error.
    pub fn new_error(error: ProviderErrorKind) -> Self {
        Self {
            behavior: MockBehavior::Error(error),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The user text of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(GenerateRequest::user_text)
    }
}

#[async_trait]
impl InkwellDriver for MockDriver {
    async fn generate(&self, request: &GenerateRequest) -> InkwellResult<GenerateResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            MockBehavior::Success(text) => Ok(GenerateResponse::from_text(text.clone())),
            MockBehavior::Error(kind) => Err(ProviderError::new("mock", kind.clone()).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

//! Trait definitions for external model backends.

use async_trait::async_trait;
use inkwell_core::{GenerateRequest, GenerateResponse};
use inkwell_error::InkwellResult;

/// Core trait that every model backend implements.
///
/// One call to [`generate`](InkwellDriver::generate) is one attempt: drivers do
/// not retry. The only timeout is the one configured on the driver's client.
#[async_trait]
pub trait InkwellDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> InkwellResult<GenerateResponse>;

    /// Provider name (e.g., "anthropic", "openai", "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "claude-sonnet-4-20250514").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T> InkwellDriver for Box<T>
where
    T: InkwellDriver + ?Sized,
{
    async fn generate(&self, req: &GenerateRequest) -> InkwellResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

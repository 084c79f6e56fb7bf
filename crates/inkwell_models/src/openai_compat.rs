//! Client for OpenAI-compatible chat completion APIs (OpenAI, Groq).

use crate::http::{client_with_timeout, decode, ensure_success, send_error};
use inkwell_core::{GenerateRequest, GenerateResponse, Role};
use inkwell_error::{InkwellResult, ProviderError, ProviderErrorKind};
use inkwell_interface::InkwellDriver;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI chat completions endpoint.
pub(crate) const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Groq's OpenAI-compatible endpoint.
pub(crate) const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any endpoint speaking the OpenAI chat completions protocol.
#[derive(Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    provider: &'static str,
    endpoint: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for OpenAICompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompatibleClient")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAICompatibleClient {
    /// Creates a client for an arbitrary OpenAI-compatible endpoint.
    pub fn new(
        provider: &'static str,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let model = model.into();
        let endpoint = endpoint.into();
        debug!(provider, endpoint = %endpoint, model = %model, "Creating OpenAI-compatible client");
        Ok(Self {
            client: client_with_timeout(provider, timeout)?,
            provider,
            endpoint,
            api_key: api_key.into(),
            model,
        })
    }

    /// Creates a client for OpenAI.
    pub fn openai(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::new("openai", OPENAI_API_URL, api_key, model, timeout)
    }

    /// Creates a client for Groq.
    pub fn groq(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::new("groq", GROQ_API_URL, api_key, model, timeout)
    }

    fn convert_request(&self, request: &GenerateRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|msg| ChatMessage {
            role: match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: msg.content.clone(),
        }));

        ChatRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    fn convert_response(
        provider: &'static str,
        response: ChatResponse,
    ) -> Result<GenerateResponse, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new(provider, ProviderErrorKind::EmptyResponse))?;

        let text = choice.message.content.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ProviderError::new(provider, ProviderErrorKind::EmptyResponse));
        }

        Ok(GenerateResponse {
            text,
            model: response.model,
            stop_reason: choice.finish_reason,
        })
    }
}

#[async_trait::async_trait]
impl InkwellDriver for OpenAICompatibleClient {
    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(provider = self.provider, model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> InkwellResult<GenerateResponse> {
        let body = self.convert_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.provider, e))?;

        let response = ensure_success(self.provider, response).await?;
        let chat: ChatResponse = decode(self.provider, response).await?;
        Ok(Self::convert_response(self.provider, chat)?)
    }
}

use crate::http::{client_with_timeout, decode, ensure_success, send_error};
use crate::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse};
use inkwell_core::{GenerateRequest, GenerateResponse, Role};
use inkwell_error::{InkwellResult, ProviderError, ProviderErrorKind};
use inkwell_interface::InkwellDriver;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "anthropic";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-sonnet-4-20250514")
    /// * `timeout` - Bound on the single request attempt
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let model = model.into();
        debug!(model = %model, "Creating new Anthropic client");
        Ok(Self {
            client: client_with_timeout(PROVIDER, timeout)?,
            api_key: api_key.into(),
            model,
        })
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn generate_anthropic(
        &self,
        request: &AnthropicRequest,
    ) -> Result<AnthropicResponse, ProviderError> {
        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;
        let anthropic_response: AnthropicResponse = decode(PROVIDER, response).await?;

        debug!(response_id = %anthropic_response.id(), "Received response from Anthropic");
        Ok(anthropic_response)
    }

    /// Converts a generic request to an Anthropic API request.
    pub(crate) fn convert_request(
        &self,
        request: &GenerateRequest,
    ) -> Result<AnthropicRequest, ProviderError> {
        let messages = request
            .messages
            .iter()
            .map(|msg| AnthropicMessage {
                role: match msg.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect::<Vec<_>>();

        if messages.is_empty() {
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Builder("request has no messages".to_string()),
            ));
        }

        let mut builder = AnthropicRequest::builder();
        builder
            .model(request.model.clone().unwrap_or_else(|| self.model.clone()))
            .max_tokens(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS))
            .messages(messages);

        if let Some(system) = &request.system {
            builder.system(system.clone());
        }
        if let Some(temp) = request.temperature {
            builder.temperature(temp);
        }

        builder
            .build()
            .map_err(|e| ProviderError::new(PROVIDER, ProviderErrorKind::Builder(e.to_string())))
    }

    /// Converts an Anthropic API response to a generic response.
    pub(crate) fn convert_response(
        response: &AnthropicResponse,
    ) -> Result<GenerateResponse, ProviderError> {
        let text = response
            .content()
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<String>();

        if text.trim().is_empty() {
            return Err(ProviderError::new(PROVIDER, ProviderErrorKind::EmptyResponse));
        }

        Ok(GenerateResponse {
            text,
            model: Some(response.model().clone()),
            stop_reason: response.stop_reason().clone(),
        })
    }
}

#[async_trait::async_trait]
impl InkwellDriver for AnthropicClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(provider = PROVIDER, model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> InkwellResult<GenerateResponse> {
        let anthropic_request = self.convert_request(request)?;
        let anthropic_response = self.generate_anthropic(&anthropic_request).await?;
        Ok(Self::convert_response(&anthropic_response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::Message;

    fn client() -> AnthropicClient {
        AnthropicClient::new("test-key", "claude-test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_convert_request_carries_system_and_defaults() {
        let request = GenerateRequest::builder()
            .system("Return JSON only.")
            .messages(vec![Message::user("INT. DOCKS - DAY")])
            .temperature(0.1f32)
            .build()
            .unwrap();

        let converted = client().convert_request(&request).unwrap();
        assert_eq!(converted.model(), "claude-test");
        assert_eq!(*converted.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(converted.system().as_deref(), Some("Return JSON only."));
        assert_eq!(converted.messages()[0].role, "user");

        let body = serde_json::to_value(&converted).unwrap();
        assert_eq!(body["system"], "Return JSON only.");
    }

    #[test]
    fn test_convert_request_rejects_empty_conversation() {
        let request = GenerateRequest::default();
        assert!(client().convert_request(&request).is_err());
    }

    #[test]
    fn test_convert_response_joins_text_blocks() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "model": "claude-test",
                "content": [
                    {"type": "text", "text": "{\"entities\": "},
                    {"type": "thinking", "thinking": "..."},
                    {"type": "text", "text": "[]}"}
                ],
                "stop_reason": "end_turn"
            }"#,
        )
        .unwrap();

        let converted = AnthropicClient::convert_response(&response).unwrap();
        assert_eq!(converted.text, "{\"entities\": []}");
        assert_eq!(converted.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_convert_response_rejects_empty_text() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"id": "msg_2", "model": "claude-test", "content": []}"#,
        )
        .unwrap();

        let err = AnthropicClient::convert_response(&response).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
    }
}

use crate::http::{client_with_timeout, decode, ensure_success, send_error};
use inkwell_core::{GenerateRequest, GenerateResponse, Role};
use inkwell_error::{InkwellResult, ProviderError, ProviderErrorKind};
use inkwell_interface::InkwellDriver;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "gemini";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new Gemini client.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let model = model.into();
        debug!(model = %model, "Creating new Gemini client");
        Ok(Self {
            client: client_with_timeout(PROVIDER, timeout)?,
            api_key: api_key.into(),
            model,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, model)
    }

    fn convert_request(request: &GenerateRequest) -> GeminiRequest {
        let text_content = |role: Option<&str>, text: &str| GeminiContent {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        };

        GeminiRequest {
            system_instruction: request
                .system
                .as_deref()
                .map(|system| text_content(None, system)),
            contents: request
                .messages
                .iter()
                .map(|msg| {
                    let role = match msg.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    };
                    text_content(Some(role), &msg.content)
                })
                .collect(),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }

    fn convert_response(response: GeminiResponse) -> Result<GenerateResponse, ProviderError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new(PROVIDER, ProviderErrorKind::EmptyResponse))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::new(PROVIDER, ProviderErrorKind::EmptyResponse));
        }

        Ok(GenerateResponse {
            text,
            model: response.model_version,
            stop_reason: candidate.finish_reason,
        })
    }
}

#[async_trait::async_trait]
impl InkwellDriver for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(provider = PROVIDER, model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> InkwellResult<GenerateResponse> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = Self::convert_request(request);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;
        let gemini: GeminiResponse = decode(PROVIDER, response).await?;
        Ok(Self::convert_response(gemini)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::Message;

    #[test]
    fn test_request_uses_system_instruction_and_camel_case() {
        let request = GenerateRequest::builder()
            .system("Return JSON only.")
            .messages(vec![Message::user("PAGE ONE")])
            .max_tokens(256u32)
            .build()
            .unwrap();

        let body = serde_json::to_value(GeminiClient::convert_request(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Return JSON only.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn test_response_text_parts_are_joined() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "[1"}, {"text": "]"}]},
                    "finishReason": "STOP"
                }],
                "modelVersion": "gemini-test"
            }"#,
        )
        .unwrap();

        let converted = GeminiClient::convert_response(response).unwrap();
        assert_eq!(converted.text, "[1]");
        assert_eq!(converted.stop_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_missing_candidates_is_an_empty_response() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        let err = GeminiClient::convert_response(response).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
    }
}

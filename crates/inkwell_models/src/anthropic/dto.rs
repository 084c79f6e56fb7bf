//! Wire types for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

/// A message in an Anthropic conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Request body for `POST /v1/messages`.
#[derive(
    Debug, Clone, PartialEq, Serialize, derive_builder::Builder, derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct AnthropicRequest {
    /// Model identifier
    model: String,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// System prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    system: Option<String>,
    /// Conversation messages
    messages: Vec<AnthropicMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,
}

impl AnthropicRequest {
    /// Create a new request builder.
    pub fn builder() -> AnthropicRequestBuilder {
        AnthropicRequestBuilder::default()
    }
}

/// A content block in an Anthropic response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Generated text
    Text {
        /// The text
        text: String,
    },
    /// Any block type this client does not consume
    #[serde(other)]
    Other,
}

/// Response body for `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct AnthropicResponse {
    /// Response identifier
    id: String,
    /// Model that produced the response
    model: String,
    /// Content blocks
    content: Vec<AnthropicContentBlock>,
    /// Why generation stopped
    #[serde(default)]
    stop_reason: Option<String>,
}

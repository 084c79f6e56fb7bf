//! Request and response types for external model calls.

use serde::{Deserialize, Serialize};

/// Conversation participant.
///
/// # Examples
///
/// ```
/// use inkwell_core::Role;
///
/// assert_eq!(format!("{}", Role::User), "User");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Messages from the caller
    User,
    /// Messages from the model
    Assistant,
}

/// A single text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Provider-neutral generation request.
///
/// # Examples
///
/// ```
/// use inkwell_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .system("Return JSON only.")
///     .messages(vec![Message::user("INT. APARTMENT - NIGHT")])
///     .max_tokens(1024u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(1024));
/// assert!(request.model.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct GenerateRequest {
    /// System instruction
    pub system: Option<String>,
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Model identifier overriding the driver's default
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Create a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Concatenated text of all user messages.
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Provider-neutral generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub text: String,
    /// Model that produced the response, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why generation stopped, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl GenerateResponse {
    /// A response with text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            stop_reason: None,
        }
    }
}

//! Model provider errors.

/// Provider-level error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Request could not be sent or the connection failed
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// The single attempt timed out
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Provider answered with a non-2xx status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Response envelope could not be decoded
    #[display("Failed to decode provider response: {}", _0)]
    Decode(String),
    /// Provider returned no text content
    #[display("Provider returned no text content")]
    EmptyResponse,
    /// Request could not be built
    #[display("Failed to build request: {}", _0)]
    Builder(String),
}

/// Model provider error with location tracking.
///
/// # Examples
///
/// ```
/// use inkwell_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new("anthropic", ProviderErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("anthropic"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error ({}): {} at {}:{}", provider, kind, file, line)]
pub struct ProviderError {
    /// Provider name (e.g., "anthropic", "openai")
    pub provider: String,
    /// The specific error kind
    pub kind: ProviderErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new provider error.
    #[track_caller]
    pub fn new(provider: impl Into<String>, kind: ProviderErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            provider: provider.into(),
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

//! Top-level error wrapper types.

use crate::{
    ConfigError, CoverageError, GroundingError, JsonError, ProviderError, ResponseFormatError,
    StorageError,
};

/// Every error condition an Inkwell operation can raise.
///
/// # Examples
///
/// ```
/// use inkwell_error::{InkwellError, ConfigError};
///
/// let config_err = ConfigError::new("no provider API key set");
/// let err: InkwellError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum InkwellErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// External model provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Model output violates the output contract
    #[from(ResponseFormatError)]
    ResponseFormat(ResponseFormatError),
    /// Evidence failed grounding
    #[from(GroundingError)]
    Grounding(GroundingError),
    /// Manifest coverage failed
    #[from(CoverageError)]
    Coverage(CoverageError),
    /// Local JSON document error
    #[from(JsonError)]
    Json(JsonError),
    /// Filesystem error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Inkwell error with kind discrimination.
///
/// # Examples
///
/// ```
/// use inkwell_error::{InkwellError, InkwellErrorKind, InkwellResult, ConfigError};
///
/// fn might_fail() -> InkwellResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), InkwellErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Inkwell Error: {}", _0)]
pub struct InkwellError(Box<InkwellErrorKind>);

impl InkwellError {
    /// Create a new error from a kind.
    pub fn new(kind: InkwellErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InkwellErrorKind {
        &self.0
    }

    /// Whether this error must abort a batch unit regardless of caller mode.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self.kind(),
            InkwellErrorKind::Grounding(_) | InkwellErrorKind::Coverage(_)
        )
    }
}

// Generic From implementation for any type that converts to InkwellErrorKind
impl<T> From<T> for InkwellError
where
    T: Into<InkwellErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Inkwell operations.
///
/// # Examples
///
/// ```
/// use inkwell_error::{InkwellResult, JsonError};
///
/// fn parse() -> InkwellResult<String> {
///     Err(JsonError::new("unexpected end of input"))?
/// }
/// ```
pub type InkwellResult<T> = std::result::Result<T, InkwellError>;

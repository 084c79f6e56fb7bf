//! Model response format errors.

/// Ways a model response can violate the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResponseFormatErrorKind {
    /// No JSON object or array could be located in the response
    #[display("No JSON found in response (length: {})", _0)]
    NoJson(usize),
    /// Located text is not valid JSON
    #[display("Invalid JSON: {}", _0)]
    InvalidJson(String),
    /// JSON parsed but does not conform to the declared schema
    #[display("Schema violation: {}", _0)]
    Schema(String),
}

/// Model output that is not valid JSON or fails the declared schema.
///
/// # Examples
///
/// ```
/// use inkwell_error::{ResponseFormatError, ResponseFormatErrorKind};
///
/// let err = ResponseFormatError::new(ResponseFormatErrorKind::NoJson(42));
/// assert!(format!("{}", err).contains("No JSON"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Response Format Error: {} at line {} in {}", kind, line, file)]
pub struct ResponseFormatError {
    /// The specific error condition
    pub kind: ResponseFormatErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ResponseFormatError {
    /// Create a new ResponseFormatError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ResponseFormatErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Grounding error types.

/// Specific reasons an evidence item fails grounding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GroundingErrorKind {
    /// Item carries no evidence at all
    #[display("missing evidence")]
    MissingEvidence,
    /// Snippet is empty or whitespace
    #[display("empty snippet")]
    EmptySnippet,
    /// Referenced source unit (page/panel) does not exist
    #[display("source unit not found: {}", _0)]
    UnitNotFound(String),
    /// Referenced block index is outside the source unit
    #[display("block {} not found (unit has {} blocks)", index, block_count)]
    BlockNotFound {
        /// Declared block index
        index: usize,
        /// Number of blocks in the unit
        block_count: usize,
    },
    /// Declared block type differs from the block's actual type
    #[display("block type mismatch: declared '{}', actual '{}'", declared, actual)]
    BlockTypeMismatch {
        /// Type declared by the evidence
        declared: String,
        /// Type of the referenced block
        actual: String,
    },
    /// Snippet is longer than the word cap
    #[display("snippet exceeds word limit ({} words, limit {})", words, limit)]
    SnippetTooLong {
        /// Word count of the snippet
        words: usize,
        /// Maximum allowed words
        limit: usize,
    },
    /// Snippet is not a verbatim substring of the block text
    #[display("snippet not found verbatim in block {}: \"{}\"", index, snippet)]
    SnippetNotFound {
        /// Referenced block index
        index: usize,
        /// The offending snippet
        snippet: String,
    },
}

/// Evidence that fails the verbatim, length, index or type checks.
///
/// # Examples
///
/// ```
/// use inkwell_error::{GroundingError, GroundingErrorKind};
///
/// let err = GroundingError::new(
///     "character 'Eli'",
///     GroundingErrorKind::SnippetTooLong { words: 13, limit: 12 },
/// );
/// assert!(format!("{}", err).contains("snippet exceeds word limit"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Grounding Error: {}: {} at line {} in {}", subject, kind, line, file)]
pub struct GroundingError {
    /// Human-readable description of the item that failed
    pub subject: String,
    /// The specific error condition
    pub kind: GroundingErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GroundingError {
    /// Create a new GroundingError with automatic location tracking.
    #[track_caller]
    pub fn new(subject: impl Into<String>, kind: GroundingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            subject: subject.into(),
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

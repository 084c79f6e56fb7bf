//! Evidence pointers linking a proposal back to verbatim source text.

use serde::{Deserialize, Serialize};

/// Maximum number of words in an evidence snippet.
pub const MAX_EVIDENCE_WORDS: usize = 12;

/// Block type of a raw-text line in interactive mode.
pub const LINE_BLOCK_TYPE: &str = "line";

/// A verbatim excerpt of one source block.
///
/// In interactive mode each line of the raw text is a block of type `line`,
/// indexed from 0. In storyboard mode the blocks are those of the panel the
/// entry refers to, indexed from 0 within the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Declared type of the referenced block
    #[serde(alias = "block_type")]
    pub block_type: String,
    /// Index of the referenced block within its source unit
    #[serde(alias = "block_index")]
    pub block_index: usize,
    /// Verbatim excerpt
    pub snippet: String,
}

impl Evidence {
    /// Create an evidence item.
    pub fn new(block_type: impl Into<String>, block_index: usize, snippet: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            block_index,
            snippet: snippet.into(),
        }
    }

    /// Evidence pointing at a raw-text line.
    pub fn line(line_index: usize, snippet: impl Into<String>) -> Self {
        Self::new(LINE_BLOCK_TYPE, line_index, snippet)
    }
}

/// Number of whitespace-separated words in `text`.
///
/// # Examples
///
/// ```
/// use inkwell_core::word_count;
///
/// assert_eq!(word_count("  picks up  the key "), 4);
/// assert_eq!(word_count(""), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

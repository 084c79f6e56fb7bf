//! Normalized entity names, the sole deduplication key.

use serde::{Deserialize, Serialize};

/// Lowercase, trimmed, whitespace-collapsed form of an entity name.
///
/// Two entities with the same `NormalizedName` are the same entity.
///
/// # Examples
///
/// ```
/// use inkwell_core::NormalizedName;
///
/// let a = NormalizedName::new("  Old   Lighthouse ");
/// let b = NormalizedName::new("old lighthouse");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "old lighthouse");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    /// Normalize a raw name.
    pub fn new(raw: &str) -> Self {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        Self(collapsed.to_lowercase())
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NormalizedName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for NormalizedName {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_internal_whitespace_and_tabs() {
        assert_eq!(NormalizedName::new("Maya\t\n  Reyes").as_str(), "maya reyes");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(NormalizedName::new("   ").is_empty());
    }
}

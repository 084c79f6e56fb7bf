//! Per-call extraction configuration supplied by the caller.

use crate::{EntityType, NormalizedName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user-supplied regex rule.
///
/// Capture group 1 is used as the entity name when present; otherwise the
/// whole match is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct CustomPattern {
    /// Regular expression source
    pattern: String,
    /// Type of the entities this rule proposes
    entity_type: EntityType,
    /// Caller label recorded on each match
    #[serde(default)]
    label: String,
}

impl CustomPattern {
    /// Create a custom pattern rule.
    pub fn new(pattern: impl Into<String>, entity_type: EntityType, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            entity_type,
            label: label.into(),
        }
    }
}

/// Read-only extraction input.
///
/// # Examples
///
/// ```
/// use inkwell_core::{ExtractionConfig, NormalizedName};
///
/// let config: ExtractionConfig = serde_json::from_str(
///     r#"{"knownEntityNames": ["Maya"], "canonLocks": ["The Orb"]}"#,
/// ).unwrap();
/// assert!(config.is_canon_locked(&NormalizedName::new("the  orb")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfig {
    /// Names the caller already knows about
    known_entity_names: Vec<String>,
    /// Names that must never be proposed as new or updated
    canon_locks: Vec<String>,
    /// User-supplied pattern rules, applied in order
    custom_patterns: Vec<CustomPattern>,
}

impl ExtractionConfig {
    /// Create a configuration.
    pub fn new(
        known_entity_names: Vec<String>,
        canon_locks: Vec<String>,
        custom_patterns: Vec<CustomPattern>,
    ) -> Self {
        Self {
            known_entity_names,
            canon_locks,
            custom_patterns,
        }
    }

    /// Normalized canon-locked names.
    pub fn canon_lock_set(&self) -> BTreeSet<NormalizedName> {
        self.canon_locks
            .iter()
            .map(NormalizedName::from)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Whether `name` is canon-locked.
    pub fn is_canon_locked(&self, name: &NormalizedName) -> bool {
        self.canon_locks
            .iter()
            .any(|locked| NormalizedName::new(locked) == *name)
    }
}

//! Timeline events proposed by the extractors.

use crate::{EntityType, Evidence, ExtractionSource, NormalizedName};
use serde::{Deserialize, Serialize};

/// What happened to an entity.
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimelineAction {
    /// Entity came into existence
    Created,
    /// Entity moved to a location
    MovedTo,
    /// Entity acquired an item
    Acquired,
    /// Entity dropped an item
    Dropped,
    /// Entity status changed
    StatusChanged,
    /// Entity was updated
    Updated,
    /// Entity was removed
    Deleted,
    /// A relationship changed
    RelationshipChanged,
}

/// A proposed timeline entry.
///
/// Timeline markers (e.g. `Setting: 1999`) are not tied to an entity and leave
/// the entity fields empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Run-local identifier
    pub temp_id: String,
    /// Kind of the affected entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// Identifier of the affected entity, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Name of the affected entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// What happened
    pub action: TimelineAction,
    /// Action-specific data
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Human-readable summary
    pub description: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Producing pass
    pub source: ExtractionSource,
    /// Verbatim support for the claim
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl TimelineEvent {
    /// Normalized name of the affected entity, if any.
    pub fn normalized_entity(&self) -> Option<NormalizedName> {
        self.entity_name.as_deref().map(NormalizedName::new)
    }

    /// Deduplication key: entity, action and payload.
    pub fn dedup_key(&self) -> (Option<NormalizedName>, TimelineAction, String) {
        (self.normalized_entity(), self.action, self.payload.to_string())
    }

    /// Short label used in warnings and logs.
    pub fn label(&self) -> String {
        match &self.entity_name {
            Some(name) => format!("{} event for '{}'", self.action, name),
            None => format!("{} timeline marker", self.action),
        }
    }
}

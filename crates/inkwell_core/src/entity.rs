//! Candidate entities and proposed updates to known entities.

use crate::{Evidence, NormalizedName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of story entity the extractors can propose.
///
/// # Examples
///
/// ```
/// use inkwell_core::EntityType;
/// use std::str::FromStr;
///
/// assert_eq!(EntityType::from_str("artifact").unwrap(), EntityType::Artifact);
/// assert_eq!(EntityType::Location.to_string(), "location");
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    /// A speaking or acting person
    Character,
    /// A place
    Location,
    /// A portable object
    Item,
    /// A group or organization
    Faction,
    /// A named happening
    Event,
    /// An abstract idea
    Concept,
    /// A unique object of narrative significance
    Artifact,
    /// A world rule or law
    Rule,
}

/// Which pass produced a proposal.
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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionSource {
    /// Pattern-based pass
    Deterministic,
    /// External-model pass
    Llm,
}

/// Where in the source a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    /// 1-based line number in raw text
    Line {
        /// Line number
        #[serde(rename = "lineNumber")]
        line_number: usize,
    },
    /// Panel reference in a normalized script
    Panel {
        /// Page number
        page: u32,
        /// Panel number
        panel: u32,
    },
}

/// An entity proposed by one of the extractors.
///
/// Candidates are never mutated after construction; the merge engine and the
/// validators only keep or drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntity {
    /// Run-local identifier
    pub temp_id: String,
    /// Entity kind
    pub entity_type: EntityType,
    /// Display name
    pub name: String,
    /// Producing pass
    pub source: ExtractionSource,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Text surrounding the match
    pub context_snippet: String,
    /// Source position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type-specific fields (region, timeOfDay, label, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Verbatim support for the claim
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl CandidateEntity {
    /// Create a candidate with no description, attributes or evidence.
    pub fn new(
        temp_id: impl Into<String>,
        entity_type: EntityType,
        name: impl Into<String>,
        source: ExtractionSource,
        confidence: f32,
    ) -> Self {
        Self {
            temp_id: temp_id.into(),
            entity_type,
            name: name.into(),
            source,
            confidence,
            context_snippet: String::new(),
            locator: None,
            description: None,
            attributes: BTreeMap::new(),
            evidence: Vec::new(),
        }
    }

    /// Deduplication key.
    pub fn normalized_name(&self) -> NormalizedName {
        NormalizedName::new(&self.name)
    }

    /// Set the context snippet.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_snippet = context.into();
        self
    }

    /// Set the source position.
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a type-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add an evidence item.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// Short label used in warnings and logs.
    pub fn label(&self) -> String {
        format!("{} '{}'", self.entity_type, self.name)
    }
}

/// A proposed change to an already-known entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUpdate {
    /// Run-local identifier
    pub temp_id: String,
    /// Entity kind, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// Identifier of the known entity, when the snapshot supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Display name of the known entity
    pub name: String,
    /// Field changes
    pub changes: BTreeMap<String, serde_json::Value>,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Producing pass
    pub source: ExtractionSource,
    /// Verbatim support for the claim
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl EntityUpdate {
    /// Deduplication key.
    pub fn normalized_name(&self) -> NormalizedName {
        NormalizedName::new(&self.name)
    }

    /// Short label used in warnings and logs.
    pub fn label(&self) -> String {
        format!("update to '{}'", self.name)
    }
}

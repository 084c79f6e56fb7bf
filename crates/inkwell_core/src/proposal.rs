//! The interactive pipeline's terminal output.

use crate::{CandidateEntity, EntityType, EntityUpdate, TimelineEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run metadata attached to a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalMeta {
    /// When the run finished
    pub parsed_at: DateTime<Utc>,
    /// Length of the raw input in characters
    pub raw_length: usize,
    /// Number of lines in the raw input
    pub line_count: usize,
    /// Wall time of the run in milliseconds
    pub duration_ms: u64,
    /// Whether the external-model call was attempted, even if it failed
    pub llm_used: bool,
    /// Non-fatal problems encountered during the run
    pub warnings: Vec<String>,
    /// Unrecognized all-caps phrases from the deterministic pass
    #[serde(default)]
    pub ambiguous_phrases: Vec<String>,
    /// Names proposed with more than one entity type
    #[serde(default)]
    pub type_conflicts: Vec<TypeConflict>,
}

/// One normalized name proposed with different entity types by the two passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConflict {
    /// The conflicting name as written by the primary pass
    pub name: String,
    /// Type assigned by the primary pass
    pub primary_type: EntityType,
    /// Type assigned by the secondary pass
    pub secondary_type: EntityType,
}

/// Draft extraction output awaiting human or downstream acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Run metadata
    pub meta: ProposalMeta,
    /// Entities not present in the known-entity snapshot
    pub new_entities: Vec<CandidateEntity>,
    /// Changes to known entities
    pub updated_entities: Vec<EntityUpdate>,
    /// Proposed timeline entries
    pub timeline_events: Vec<TimelineEvent>,
}

impl Proposal {
    /// Whether the proposal contains nothing to review.
    pub fn is_empty(&self) -> bool {
        self.new_entities.is_empty()
            && self.updated_entities.is_empty()
            && self.timeline_events.is_empty()
    }
}

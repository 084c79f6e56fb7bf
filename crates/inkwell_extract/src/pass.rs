//! Output of one extraction pass.

use inkwell_core::{CandidateEntity, EntityUpdate, TimelineEvent};
use tracing::warn;

/// Proposals and warnings produced by one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassResult {
    /// New entity candidates
    pub entities: Vec<CandidateEntity>,
    /// Changes to known entities
    pub updates: Vec<EntityUpdate>,
    /// Timeline events
    pub events: Vec<TimelineEvent>,
    /// Non-fatal problems met along the way
    pub warnings: Vec<String>,
}

impl PassResult {
    /// Whether the pass proposed nothing.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.updates.is_empty() && self.events.is_empty()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(warning = %message, "Extraction warning");
        self.warnings.push(message);
    }

    /// An empty result carrying a single warning.
    pub fn degraded(message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.warn(message);
        result
    }
}

//! The storyboard output document.

use chrono::{DateTime, Utc};
use inkwell_core::{Evidence, ManifestEntry};
use inkwell_extract::Grounded;
use serde::{Deserialize, Serialize};

/// An entry keyed by one (page, panel) unit.
pub trait PanelEntry {
    /// The unit this entry describes.
    fn unit(&self) -> ManifestEntry;
}

impl PanelEntry for ManifestEntry {
    fn unit(&self) -> ManifestEntry {
        *self
    }
}

/// Narrative beat for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InkEntry {
    /// Page number
    pub page: u32,
    /// Panel number
    pub panel: u32,
    /// What happens in the panel
    pub beat: String,
    /// Suggested framing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    /// Characters present
    #[serde(default)]
    pub characters: Vec<String>,
    /// Where the panel takes place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Emotional tone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Verbatim support from the panel's blocks
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Proof that a panel was actually read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofEntry {
    /// Page number
    pub page: u32,
    /// Panel number
    pub panel: u32,
    /// Speakers found in the panel, in order
    #[serde(default)]
    pub speakers: Vec<String>,
    /// Verbatim quotes from the panel's blocks
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl PanelEntry for InkEntry {
    fn unit(&self) -> ManifestEntry {
        ManifestEntry::new(self.page, self.panel)
    }
}

impl PanelEntry for ProofEntry {
    fn unit(&self) -> ManifestEntry {
        ManifestEntry::new(self.page, self.panel)
    }
}

impl Grounded for InkEntry {
    fn subject(&self) -> String {
        format!("ink {}", self.unit())
    }

    fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

impl Grounded for ProofEntry {
    fn subject(&self) -> String {
        format!("proof {}", self.unit())
    }

    fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

/// How a storyboard was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardMeta {
    /// When validation finished
    pub generated_at: DateTime<Utc>,
    /// Provider that answered
    pub provider: String,
    /// Model that answered
    pub model: String,
    /// Number of manifest units
    pub panel_count: usize,
    /// Wall time of the run in milliseconds
    pub duration_ms: u64,
}

/// A validated storyboard.
///
/// `coverage`, `ink` and `proof` each hold exactly one entry per `manifest`
/// unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardDocument {
    /// Run metadata
    pub meta: StoryboardMeta,
    /// Every (page, panel) unit of the input
    pub manifest: Vec<ManifestEntry>,
    /// Units the model reports having covered
    pub coverage: Vec<ManifestEntry>,
    /// Narrative beats
    pub ink: Vec<InkEntry>,
    /// Proofs of reading
    pub proof: Vec<ProofEntry>,
}

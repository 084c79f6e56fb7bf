//! Normalized comic script input and manifest units.

use serde::{Deserialize, Serialize};

/// One content unit of a panel (dialogue, caption, sfx, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBlock {
    /// Block kind
    #[serde(rename = "type")]
    pub block_type: String,
    /// Speaker, for dialogue-like blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Block text
    pub text: String,
}

/// A panel and its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPanel {
    /// Panel number within the page
    pub panel_number: u32,
    /// Ordered content blocks
    #[serde(default)]
    pub blocks: Vec<ScriptBlock>,
}

/// A page and its panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPage {
    /// Page number
    pub page_number: u32,
    /// Ordered panels
    #[serde(default)]
    pub panels: Vec<ScriptPanel>,
}

/// A comic script normalized into pages, panels and blocks.
///
/// # Examples
///
/// ```
/// use inkwell_core::NormalizedScript;
///
/// let script: NormalizedScript = serde_json::from_str(r#"{
///     "pages": [{"page_number": 1, "panels": [
///         {"panel_number": 1, "blocks": [{"type": "caption", "text": "Night."}]}
///     ]}]
/// }"#).unwrap();
/// assert_eq!(script.manifest().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedScript {
    /// Ordered pages
    #[serde(default)]
    pub pages: Vec<ScriptPage>,
}

impl NormalizedScript {
    /// Every (page, panel) pair, in script order.
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.panels
                    .iter()
                    .map(move |panel| ManifestEntry::new(page.page_number, panel.panel_number))
            })
            .collect()
    }

    /// Look up a panel by page and panel number.
    pub fn panel(&self, page: u32, panel: u32) -> Option<&ScriptPanel> {
        self.pages
            .iter()
            .find(|p| p.page_number == page)?
            .panels
            .iter()
            .find(|p| p.panel_number == panel)
    }
}

/// A required (page, panel) unit of batch coverage.
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
    derive_more::Display,
)]
#[display("p{}/panel{}", page, panel)]
pub struct ManifestEntry {
    /// Page number
    pub page: u32,
    /// Panel number
    pub panel: u32,
}

impl ManifestEntry {
    /// Create a manifest entry.
    pub fn new(page: u32, panel: u32) -> Self {
        Self { page, panel }
    }
}

impl From<ManifestEntry> for inkwell_error::UnitRef {
    fn from(entry: ManifestEntry) -> Self {
        Self {
            page: entry.page,
            panel: entry.panel,
        }
    }
}

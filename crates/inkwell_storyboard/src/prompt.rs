//! Prompt text for the storyboard call.

use inkwell_core::{MAX_EVIDENCE_WORDS, ManifestEntry, NormalizedScript};

/// Render every panel's blocks with their in-panel indices.
///
/// # Examples
///
/// ```
/// use inkwell_core::{NormalizedScript, ScriptBlock, ScriptPage, ScriptPanel};
/// use inkwell_storyboard::render_script;
///
/// let script = NormalizedScript {
///     pages: vec![ScriptPage {
///         page_number: 1,
///         panels: vec![ScriptPanel {
///             panel_number: 1,
///             blocks: vec![ScriptBlock {
///                 block_type: "dialogue".to_string(),
///                 speaker: Some("MAYA".to_string()),
///                 text: "Keep the lamp lit.".to_string(),
///             }],
///         }],
///     }],
/// };
///
/// assert_eq!(
///     render_script(&script),
///     "Page 1\n  Panel 1\n    [0] dialogue (MAYA): Keep the lamp lit.\n"
/// );
/// ```
pub fn render_script(script: &NormalizedScript) -> String {
    let mut out = String::new();
    for page in &script.pages {
        out.push_str(&format!("Page {}\n", page.page_number));
        for panel in &page.panels {
            out.push_str(&format!("  Panel {}\n", panel.panel_number));
            for (index, block) in panel.blocks.iter().enumerate() {
                let line = match &block.speaker {
                    Some(speaker) => format!(
                        "    [{}] {} ({}): {}\n",
                        index, block.block_type, speaker, block.text
                    ),
                    None => format!("    [{}] {}: {}\n", index, block.block_type, block.text),
                };
                out.push_str(&line);
            }
        }
    }
    out
}

/// The required units as a prompt line.
pub(crate) fn render_manifest(manifest: &[ManifestEntry]) -> String {
    manifest
        .iter()
        .map(|entry| format!("(page {}, panel {})", entry.page, entry.panel))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instructions describing the storyboard output contract.
pub fn system_prompt() -> String {
    format!(
        r#"You are a storyboard artist reading a comic script panel by panel.

Respond with ONE JSON object and nothing else, shaped exactly like this:
{{
  "coverage": [{{"page": 1, "panel": 1}}],
  "ink": [
    {{"page": 1, "panel": 1, "beat": "...", "camera": "...", "characters": ["..."],
      "location": "...", "mood": "...",
      "evidence": [{{"blockType": "...", "blockIndex": 0, "snippet": "..."}}]}}
  ],
  "proof": [
    {{"page": 1, "panel": 1, "speakers": ["..."],
      "evidence": [{{"blockType": "...", "blockIndex": 0, "snippet": "..."}}]}}
  ]
}}

List every required (page, panel) exactly once in each of coverage, ink and
proof. Never merge panels, never skip one, never invent one.

Every ink and proof entry needs at least one evidence entry pointing into its
own panel. blockIndex is the number in square brackets before the block.
blockType is the block's type exactly as shown (for example "dialogue").
snippet is copied verbatim from that block's text, same case, at most
{MAX_EVIDENCE_WORDS} words. Do not include the speaker name in a snippet."#
    )
}

//! Test utilities for storyboard tests.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockBehavior, MockDriver};

use inkwell_core::{NormalizedScript, ScriptBlock, ScriptPage, ScriptPanel};
use serde_json::{Value, json};

fn block(kind: &str, speaker: Option<&str>, text: &str) -> ScriptBlock {
    ScriptBlock {
        block_type: kind.to_string(),
        speaker: speaker.map(str::to_string),
        text: text.to_string(),
    }
}

fn panel(panel_number: u32, blocks: Vec<ScriptBlock>) -> ScriptPanel {
    ScriptPanel {
        panel_number,
        blocks,
    }
}

/// Two pages, five panels.
#[allow(dead_code)]
pub fn harbor_script() -> NormalizedScript {
    NormalizedScript {
        pages: vec![
            ScriptPage {
                page_number: 1,
                panels: vec![
                    panel(
                        1,
                        vec![
                            block("caption", None, "Night falls over the harbor."),
                            block("dialogue", Some("MAYA"), "Keep the lamp lit."),
                        ],
                    ),
                    panel(2, vec![block("sfx", None, "KRAK")]),
                    panel(
                        3,
                        vec![block("dialogue", Some("ELI"), "I've been searching for years.")],
                    ),
                ],
            },
            ScriptPage {
                page_number: 2,
                panels: vec![
                    panel(1, vec![block("caption", None, "The lighthouse, moments later.")]),
                    panel(2, vec![block("dialogue", Some("MAYA"), "Then search no more.")]),
                ],
            },
        ],
    }
}

/// (page, panel, block type, block index, snippet, speakers) for every harbor panel.
#[allow(dead_code)]
pub const HARBOR_UNITS: [(u32, u32, &str, usize, &str, &[&str]); 5] = [
    (1, 1, "dialogue", 1, "Keep the lamp lit.", &["MAYA"]),
    (1, 2, "sfx", 0, "KRAK", &[]),
    (1, 3, "dialogue", 0, "searching for years", &["ELI"]),
    (2, 1, "caption", 0, "The lighthouse", &[]),
    (2, 2, "dialogue", 0, "Then search no more.", &["MAYA"]),
];

/// A model answer covering every harbor unit except `skip`.
#[allow(dead_code)]
pub fn harbor_response(skip: Option<(u32, u32)>) -> Value {
    let units = HARBOR_UNITS
        .iter()
        .filter(|(page, panel, ..)| skip != Some((*page, *panel)))
        .collect::<Vec<_>>();

    let evidence = |kind: &str, index: usize, snippet: &str| {
        json!([{"blockType": kind, "blockIndex": index, "snippet": snippet}])
    };

    json!({
        "coverage": units
            .iter()
            .map(|(page, panel, ..)| json!({"page": page, "panel": panel}))
            .collect::<Vec<_>>(),
        "ink": units
            .iter()
            .map(|(page, panel, kind, index, snippet, speakers)| json!({
                "page": page,
                "panel": panel,
                "beat": format!("Beat for page {} panel {}", page, panel),
                "camera": "wide",
                "characters": speakers,
                "location": "Harbor",
                "mood": "tense",
                "evidence": evidence(kind, *index, snippet),
            }))
            .collect::<Vec<_>>(),
        "proof": units
            .iter()
            .map(|(page, panel, kind, index, snippet, speakers)| json!({
                "page": page,
                "panel": panel,
                "speakers": speakers,
                "evidence": evidence(kind, *index, snippet),
            }))
            .collect::<Vec<_>>(),
    })
}

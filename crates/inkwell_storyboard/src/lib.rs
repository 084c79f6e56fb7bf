//! Batch storyboard mode for Inkwell.
//!
//! Reads a [`NormalizedScript`](inkwell_core::NormalizedScript), derives the
//! (page, panel) manifest, asks one model for an `ink` beat and a `proof` of
//! reading for every panel, then refuses to accept the answer unless it covers
//! the manifest exactly and every evidence snippet is grounded in its panel.
//! The validated document is written atomically.
//!
//! # Example
//!
//! ```no_run
//! use inkwell_core::ProviderSettings;
//! use inkwell_models::{ProviderSelection, build_driver};
//! use inkwell_storyboard::{StoryboardGenerator, read_script, write_json};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let script = read_script("out/normalized.json").await?;
//! let settings = ProviderSettings::default();
//! let driver = build_driver(&ProviderSelection::from_env()?, &settings)?;
//!
//! let document = StoryboardGenerator::new(driver)
//!     .with_provider_settings(&settings)
//!     .generate(&script)
//!     .await?;
//! write_json("out/parsed/storyboard.json", &document).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coverage;
mod document;
mod generator;
mod io;
mod prompt;

pub use coverage::{check_collection, check_coverage, check_manifest};
pub use document::{InkEntry, PanelEntry, ProofEntry, StoryboardDocument, StoryboardMeta};
pub use generator::StoryboardGenerator;
pub use io::{read_json, read_script, write_atomic, write_json};
pub use prompt::{render_script, system_prompt};

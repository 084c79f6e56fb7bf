//! Entity extraction for screenplay and comic script text.
//!
//! Extraction runs in two passes over raw text:
//!
//! 1. [`DeterministicExtractor`] applies an ordered list of line rules (slug
//!    lines, prose scene headings, dialogue speakers, custom patterns, temporal
//!    markers, item actions) and collects ALL-CAPS phrases it could not place.
//! 2. [`ModelExtractor`] sends one prompt to an external model when the
//!    caller's [`LlmPolicy`](inkwell_core::LlmPolicy) asks for it, and parses
//!    the JSON it returns. Failures degrade to warnings.
//!
//! Each pass is grounded against the source lines, canon-locked names are
//! suppressed, and the [`MergeEngine`] combines both passes into a
//! [`Proposal`](inkwell_core::Proposal).
//!
//! # Example
//!
//! ```
//! use inkwell_core::{ExtractionConfig, ExtractionSettings, KnownWorld, LlmPolicy};
//! use inkwell_extract::ExtractionPipeline;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ExtractionSettings::default().with_llm_policy(LlmPolicy::Never);
//! let pipeline: ExtractionPipeline = ExtractionPipeline::new(settings)?;
//!
//! let proposal = pipeline
//!     .propose(
//!         "INT. APARTMENT - NIGHT",
//!         &KnownWorld::default(),
//!         &ExtractionConfig::default(),
//!     )
//!     .await;
//!
//! assert_eq!(proposal.new_entities[0].name, "Apartment");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canon;
mod deterministic;
mod grounding;
mod index;
mod llm;
mod merge;
mod pass;
mod pipeline;
mod response;
mod text;
mod vocabulary;

pub use canon::suppress_canon_locked;
pub use deterministic::{DeterministicExtractor, DeterministicOutput};
pub use grounding::{Grounded, ScriptLines, SourceUnit, retain_grounded, validate_evidence, validate_item};
pub use index::{EntityIndex, IndexedEntity};
pub use llm::ModelExtractor;
pub use merge::{MergeEngine, MergeOutcome};
pub use pass::PassResult;
pub use pipeline::ExtractionPipeline;
pub use response::{extract_json, parse_json};
pub use text::{clip_words, title_case};
pub use vocabulary::Vocabulary;

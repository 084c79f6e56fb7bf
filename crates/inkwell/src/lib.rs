//! Inkwell - grounded extraction from screenplay and comic scripts
//!
//! Inkwell turns script text into structured, traceable data. Every
//! extracted claim cites a verbatim snippet of its source, and in batch mode
//! every (page, panel) of the input must be accounted for in the output.
//!
//! # Features
//!
//! - **Deterministic pass**: slug lines, speaker cues, items and timeline markers found by rules
//! - **Model pass**: one call to Anthropic, OpenAI, Gemini or Groq under a strict JSON contract
//! - **Merge**: named priority policies with explicit type-conflict handling
//! - **Grounding**: verbatim, length-bounded evidence for every item
//! - **Coverage**: exact manifest coverage for batch storyboards
//!
//! # Quick Start
//!
//! ```no_run
//! use inkwell::{ExtractionConfig, ExtractionPipeline, ExtractionSettings, KnownWorld};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline: ExtractionPipeline = ExtractionPipeline::new(ExtractionSettings::default())?;
//! let proposal = pipeline
//!     .propose("INT. APARTMENT - NIGHT", &KnownWorld::default(), &ExtractionConfig::default())
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&proposal)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Inkwell is organized as a workspace with focused crates:
//!
//! - `inkwell_error` - Error types
//! - `inkwell_core` - Data model, input documents and settings
//! - `inkwell_interface` - InkwellDriver trait definition
//! - `inkwell_models` - Provider clients and provider selection
//! - `inkwell_extract` - Interactive extraction pipeline
//! - `inkwell_storyboard` - Batch storyboard generation and validation
//!
//! This crate (`inkwell`) re-exports everything for convenience.

pub mod observability;

pub use inkwell_core::*;
pub use inkwell_error::*;
pub use inkwell_interface::*;
pub use inkwell_models::{
    AnthropicClient, GeminiClient, OpenAICompatibleClient, ProviderKind, ProviderSelection,
    build_driver,
};
pub use inkwell_extract::{
    DeterministicExtractor, DeterministicOutput, EntityIndex, ExtractionPipeline, Grounded,
    MergeEngine, MergeOutcome, ModelExtractor, PassResult, ScriptLines, SourceUnit, Vocabulary,
    retain_grounded, suppress_canon_locked, validate_evidence, validate_item,
};
pub use inkwell_storyboard::{
    InkEntry, PanelEntry, ProofEntry, StoryboardDocument, StoryboardGenerator, StoryboardMeta,
    check_collection, check_coverage, read_json, read_script, write_atomic, write_json,
};
pub use observability::{LoggingConfig, init_logging};

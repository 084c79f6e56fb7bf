//! Core data types for the Inkwell script extraction core.
//!
//! This crate provides the data model shared by every Inkwell crate: entity
//! candidates, timeline events, evidence, proposals, the normalized script input
//! document, caller policies and the settings loader.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod evidence;
mod name;
mod policy;
mod proposal;
mod request;
mod script;
mod settings;
mod timeline;
mod world;

pub use config::{CustomPattern, ExtractionConfig};
pub use entity::{CandidateEntity, EntityType, EntityUpdate, ExtractionSource, Locator};
pub use evidence::{Evidence, LINE_BLOCK_TYPE, MAX_EVIDENCE_WORDS, word_count};
pub use name::NormalizedName;
pub use policy::{LlmPolicy, MergePolicy, TypeConflictPolicy};
pub use proposal::{Proposal, ProposalMeta, TypeConflict};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Message, Role,
};
pub use script::{ManifestEntry, NormalizedScript, ScriptBlock, ScriptPage, ScriptPanel};
pub use settings::{ExtractionSettings, InkwellSettings, ProviderSettings, StoryboardSettings};
pub use timeline::{TimelineAction, TimelineEvent};
pub use world::{KnownEntity, KnownWorld};

//! Caller-selected strategies for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// When the interactive pipeline invokes the external-model pass.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LlmPolicy {
    /// Never call the model
    Never,
    /// Call the model only when the deterministic pass left ambiguous phrases
    #[default]
    WhenAmbiguous,
    /// Always call the model
    Always,
}

/// Which pass wins when both propose the same normalized name.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergePolicy {
    /// Pattern pass first; model adds only unseen names
    #[default]
    DeterministicPrimary,
    /// Model pass first (richer descriptions); pattern pass supplements
    ModelPrimary,
}

/// How to treat one normalized name proposed with two different entity types.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeConflictPolicy {
    /// Keep both candidates and report the conflict
    #[default]
    SurfaceBoth,
    /// Keep only the primary pass's candidate and report the conflict
    PreferPrimary,
}

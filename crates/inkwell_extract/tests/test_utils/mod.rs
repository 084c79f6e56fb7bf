//! Test utilities for Inkwell extraction tests.
//!
//! This module provides a scripted model driver and fixture helpers.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockBehavior, MockDriver};

use inkwell_core::{ExtractionSettings, LlmPolicy, MergePolicy};

/// Settings with the given model policy and merge policy.
#[allow(dead_code)]
pub fn settings(llm: LlmPolicy, merge: MergePolicy) -> ExtractionSettings {
    ExtractionSettings::default()
        .with_llm_policy(llm)
        .with_merge_policy(merge)
}

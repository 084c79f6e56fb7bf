//! Layered settings for the extraction pipeline and providers.
//!
//! Sources, in increasing precedence:
//! - Bundled defaults (`inkwell.toml` shipped with the workspace)
//! - `~/.config/inkwell/inkwell.toml`
//! - `./inkwell.toml`
//!
//! User files are optional and skipped when absent.

use crate::{LlmPolicy, MergePolicy, TypeConflictPolicy};
use config::{Config, File, FileFormat};
use inkwell_error::{ConfigError, InkwellError, InkwellResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};

const DEFAULT_SETTINGS: &str = include_str!("../../../inkwell.toml");

/// Interactive extraction settings (`[extraction]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Maximum characters of raw text sent to the model
    max_prompt_chars: usize,
    /// When to run the model pass
    llm_policy: LlmPolicy,
    /// Which pass wins on duplicate names
    merge_policy: MergePolicy,
    /// How to treat conflicting entity types
    type_conflicts: TypeConflictPolicy,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_prompt_chars: 24_000,
            llm_policy: LlmPolicy::WhenAmbiguous,
            merge_policy: MergePolicy::DeterministicPrimary,
            type_conflicts: TypeConflictPolicy::SurfaceBoth,
        }
    }
}

impl ExtractionSettings {
    /// Override the model-pass policy.
    pub fn with_llm_policy(mut self, policy: LlmPolicy) -> Self {
        self.llm_policy = policy;
        self
    }

    /// Override the merge policy.
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Override the type-conflict policy.
    pub fn with_type_conflicts(mut self, policy: TypeConflictPolicy) -> Self {
        self.type_conflicts = policy;
        self
    }

    /// Override the prompt size cap.
    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }
}

/// Model provider settings (`[provider]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ProviderSettings {
    /// Model override; the selected provider's default when absent
    model: Option<String>,
    /// Timeout for the single model call
    timeout_secs: u64,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: None,
            timeout_secs: 120,
            max_tokens: 8192,
            temperature: 0.2,
        }
    }
}

impl ProviderSettings {
    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Batch storyboard settings (`[storyboard]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct StoryboardSettings {
    /// Input path when none is given
    default_input: PathBuf,
    /// Output path when none is given
    default_output: PathBuf,
    /// Maximum characters of rendered script sent to the model
    max_prompt_chars: usize,
}

impl Default for StoryboardSettings {
    fn default() -> Self {
        Self {
            default_input: PathBuf::from("out/normalized.json"),
            default_output: PathBuf::from("out/parsed/storyboard.json"),
            max_prompt_chars: 60_000,
        }
    }
}

/// Top-level Inkwell settings.
///
/// # Example
///
/// ```no_run
/// use inkwell_core::InkwellSettings;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = InkwellSettings::load()?;
/// println!("prompt cap: {}", settings.extraction().max_prompt_chars());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct InkwellSettings {
    /// Interactive extraction settings
    extraction: ExtractionSettings,
    /// Model provider settings
    provider: ProviderSettings,
    /// Batch storyboard settings
    storyboard: StoryboardSettings,
}

impl InkwellSettings {
    /// Assemble settings from parts.
    pub fn new(
        extraction: ExtractionSettings,
        provider: ProviderSettings,
        storyboard: StoryboardSettings,
    ) -> Self {
        Self {
            extraction,
            provider,
            storyboard,
        }
    }

    /// Load settings from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> InkwellResult<Self> {
        debug!("Loading settings from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                InkwellError::from(ConfigError::new(format!(
                    "Failed to read settings from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                InkwellError::from(ConfigError::new(format!("Failed to parse settings: {}", e)))
            })
    }

    /// Load settings with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present settings file is malformed.
    #[instrument]
    pub fn load() -> InkwellResult<Self> {
        debug!("Loading settings with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/inkwell/inkwell.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("inkwell").required(false));

        builder
            .build()
            .map_err(|e| {
                InkwellError::from(ConfigError::new(format!("Failed to build settings: {}", e)))
            })?
            .try_deserialize()
            .map_err(|e| {
                InkwellError::from(ConfigError::new(format!("Failed to parse settings: {}", e)))
            })
    }

    /// Replace the extraction section.
    pub fn with_extraction(mut self, extraction: ExtractionSettings) -> Self {
        self.extraction = extraction;
        self
    }

    /// Replace the provider section.
    pub fn with_provider(mut self, provider: ProviderSettings) -> Self {
        self.provider = provider;
        self
    }
}

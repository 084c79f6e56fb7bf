//! One-call storyboard generation with hard validation.

use crate::prompt::render_manifest;
use crate::{
    InkEntry, PanelEntry, ProofEntry, StoryboardDocument, StoryboardMeta, check_coverage,
    check_manifest,
};
use crate::{render_script, system_prompt};
use chrono::Utc;
use inkwell_core::{GenerateRequest, ManifestEntry, Message, NormalizedScript, ProviderSettings};
use inkwell_error::{ConfigError, GroundingError, GroundingErrorKind, InkwellResult};
use inkwell_extract::{Grounded, parse_json, validate_item};
use inkwell_interface::InkwellDriver;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

const DEFAULT_MAX_PROMPT_CHARS: usize = 60_000;

#[derive(Debug, Deserialize)]
struct ModelStoryboard {
    #[serde(default)]
    coverage: Vec<ManifestEntry>,
    ink: Vec<InkEntry>,
    proof: Vec<ProofEntry>,
}

/// Turns a normalized script into a validated [`StoryboardDocument`].
///
/// Makes exactly one provider call per script with no retry. Any provider,
/// format, coverage or grounding failure fails the whole run.
#[derive(Debug, Clone)]
pub struct StoryboardGenerator<D> {
    driver: D,
    max_prompt_chars: usize,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl<D: InkwellDriver> StoryboardGenerator<D> {
    /// Wrap a driver with default limits.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Refuse scripts whose rendered text exceeds `max` characters.
    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    /// Take token and temperature limits from provider settings.
    pub fn with_provider_settings(mut self, settings: &ProviderSettings) -> Self {
        self.max_tokens = Some(*settings.max_tokens());
        self.temperature = Some(*settings.temperature());
        self
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Build the single request for `script`.
    ///
    /// A truncated script could never cover its manifest, so a script over
    /// the prompt cap is rejected before any call is made.
    pub fn build_request(&self, script: &NormalizedScript) -> InkwellResult<GenerateRequest> {
        let manifest = script.manifest();
        check_manifest(&manifest)?;

        let rendered = render_script(script);
        let chars = rendered.chars().count();
        if chars > self.max_prompt_chars {
            return Err(ConfigError::new(format!(
                "rendered script is {} characters, over the {} character prompt cap; \
                 raise storyboard.max_prompt_chars or split the script",
                chars, self.max_prompt_chars
            ))
            .into());
        }

        let prompt = format!(
            "Required units ({}): {}\n\nScript:\n{}",
            manifest.len(),
            render_manifest(&manifest),
            rendered
        );

        Ok(GenerateRequest {
            system: Some(system_prompt()),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            model: None,
        })
    }

    /// Generate and validate the storyboard for `script`.
    #[instrument(skip_all, fields(provider = self.driver.provider_name(), model = %self.driver.model_name()))]
    pub async fn generate(&self, script: &NormalizedScript) -> InkwellResult<StoryboardDocument> {
        let started = Instant::now();
        let request = self.build_request(script)?;
        let manifest = script.manifest();
        info!(units = manifest.len(), "Requesting storyboard");

        let response = self.driver.generate(&request).await.inspect_err(|e| {
            error!(error = %e, "Storyboard request failed");
        })?;
        debug!(chars = response.text.len(), "Model responded");

        let output: ModelStoryboard = parse_json(&response.text).inspect_err(|e| {
            error!(error = %e, "Storyboard response rejected");
        })?;

        let document = StoryboardDocument {
            meta: StoryboardMeta {
                generated_at: Utc::now(),
                provider: self.driver.provider_name().to_string(),
                model: response
                    .model
                    .clone()
                    .unwrap_or_else(|| self.driver.model_name().to_string()),
                panel_count: manifest.len(),
                duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
            manifest,
            coverage: output.coverage,
            ink: output.ink,
            proof: output.proof,
        };

        check_coverage(&document).inspect_err(|e| error!(error = %e, "Coverage failed"))?;
        ground_document(script, &document).inspect_err(|e| error!(error = %e, "Grounding failed"))?;

        info!(units = document.manifest.len(), "Storyboard validated");
        Ok(document)
    }
}

fn ground_entries<E: Grounded + PanelEntry>(
    script: &NormalizedScript,
    entries: &[E],
) -> Result<(), GroundingError> {
    for entry in entries {
        let ManifestEntry { page, panel } = entry.unit();
        let Some(source) = script.panel(page, panel) else {
            return Err(GroundingError::new(
                entry.subject(),
                GroundingErrorKind::UnitNotFound(format!("page {} panel {}", page, panel)),
            ));
        };
        validate_item(entry, source)?;
    }
    Ok(())
}

/// Ground every ink and proof entry against its own panel.
fn ground_document(
    script: &NormalizedScript,
    document: &StoryboardDocument,
) -> Result<(), GroundingError> {
    ground_entries(script, &document.ink)?;
    ground_entries(script, &document.proof)
}

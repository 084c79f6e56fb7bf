//! Interactive extraction pipeline.

use crate::{
    DeterministicExtractor, EntityIndex, MergeEngine, ModelExtractor, PassResult, ScriptLines,
    Vocabulary, retain_grounded, suppress_canon_locked,
};
use chrono::Utc;
use inkwell_core::{
    ExtractionConfig, ExtractionSettings, KnownWorld, LlmPolicy, Proposal, ProposalMeta,
};
use inkwell_error::ConfigError;
use inkwell_interface::InkwellDriver;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Raw text in, [`Proposal`] out.
///
/// Stages: index the known world, run the deterministic pass, run the model
/// pass when the policy asks for it, ground each pass against the source
/// lines, suppress canon-locked names, then merge. The pipeline never fails
/// once built; model and grounding problems surface as warnings.
#[derive(Debug)]
pub struct ExtractionPipeline<D = Box<dyn InkwellDriver>> {
    deterministic: DeterministicExtractor,
    model: Option<ModelExtractor<D>>,
    settings: ExtractionSettings,
}

impl<D: InkwellDriver> ExtractionPipeline<D> {
    /// A pipeline with the default vocabulary and no model pass.
    pub fn new(settings: ExtractionSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            deterministic: DeterministicExtractor::new(Vocabulary::default())?,
            model: None,
            settings,
        })
    }

    /// Enable the model pass.
    pub fn with_model(mut self, model: ModelExtractor<D>) -> Self {
        self.model = Some(model.with_max_prompt_chars(*self.settings.max_prompt_chars()));
        self
    }

    /// Replace the deterministic word lists.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Result<Self, ConfigError> {
        self.deterministic = DeterministicExtractor::new(vocabulary)?;
        Ok(self)
    }

    /// The settings in use.
    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    fn wants_model(&self, ambiguous: &[String]) -> bool {
        match self.settings.llm_policy() {
            LlmPolicy::Never => false,
            LlmPolicy::WhenAmbiguous => !ambiguous.is_empty(),
            LlmPolicy::Always => true,
        }
    }

    /// Extract a proposal from `text`.
    #[instrument(skip_all, fields(chars = text.len(), policy = %self.settings.llm_policy()))]
    pub async fn propose(
        &self,
        text: &str,
        world: &KnownWorld,
        config: &ExtractionConfig,
    ) -> Proposal {
        let started = Instant::now();
        let parsed_at = Utc::now();

        let index = EntityIndex::build(world, config);
        let lines = ScriptLines::new(text);

        let first = self.deterministic.extract(text, &index, config);
        let mut deterministic = first.pass;
        let ambiguous_phrases = first.ambiguous_phrases;
        retain_grounded(&mut deterministic, &lines);

        let mut llm_used = false;
        let mut model_pass = PassResult::default();
        if self.wants_model(&ambiguous_phrases) {
            match &self.model {
                Some(model) => {
                    llm_used = true;
                    model_pass = model.extract(text, &index, &deterministic).await;
                    retain_grounded(&mut model_pass, &lines);
                }
                None => model_pass.warn("model pass requested but no provider is configured"),
            }
        } else {
            debug!(ambiguous = ambiguous_phrases.len(), "Skipping model pass");
        }

        let locks = config.canon_lock_set();
        suppress_canon_locked(&mut deterministic, &locks);
        suppress_canon_locked(&mut model_pass, &locks);

        let merged = MergeEngine::new(*self.settings.merge_policy(), *self.settings.type_conflicts())
            .merge(&deterministic, &model_pass);

        let mut warnings = deterministic.warnings;
        warnings.extend(model_pass.warnings);
        for conflict in &merged.type_conflicts {
            let message = format!(
                "'{}' proposed as both {} and {}",
                conflict.name, conflict.primary_type, conflict.secondary_type
            );
            warn!(warning = %message, "Extraction warning");
            warnings.push(message);
        }

        let proposal = Proposal {
            meta: ProposalMeta {
                parsed_at,
                raw_length: text.chars().count(),
                line_count: lines.lines().len(),
                duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                llm_used,
                warnings,
                ambiguous_phrases,
                type_conflicts: merged.type_conflicts,
            },
            new_entities: merged.entities,
            updated_entities: merged.updates,
            timeline_events: merged.events,
        };

        info!(
            new = proposal.new_entities.len(),
            updated = proposal.updated_entities.len(),
            events = proposal.timeline_events.len(),
            warnings = proposal.meta.warnings.len(),
            llm_used,
            "Proposal ready"
        );
        proposal
    }
}

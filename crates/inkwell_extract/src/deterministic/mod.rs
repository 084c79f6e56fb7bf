//! Pattern-based first pass.

mod patterns;
mod rules;
mod scan;

use crate::{EntityIndex, PassResult, Vocabulary};
use inkwell_core::ExtractionConfig;
use inkwell_error::ConfigError;
use patterns::CustomPatternRule;
use rules::{
    AmbiguousPhraseRule, Effect, InlineDialogueRule, ItemActionRule, LineContext, LineRule,
    LocationSlot, ProseHeadingRule, SlugLineRule, SpeakerCueRule, TemporalMarkerRule,
};
use scan::Accumulator;
use tracing::{debug, instrument};

/// Result of the deterministic pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeterministicOutput {
    /// Proposals and warnings
    pub pass: PassResult,
    /// ALL-CAPS phrases no rule could place, in order of first appearance
    pub ambiguous_phrases: Vec<String>,
}

/// Line-by-line rule engine.
///
/// Lines are classified by the first matching rule, in this order: slug line,
/// prose scene heading, speaker cue, inline dialogue, custom patterns,
/// temporal marker, item action, leftover ALL-CAPS phrase. The only state
/// carried between lines is the current location.
///
/// # Examples
///
/// ```
/// use inkwell_core::{EntityType, ExtractionConfig, KnownWorld};
/// use inkwell_extract::{DeterministicExtractor, EntityIndex, Vocabulary};
///
/// let extractor = DeterministicExtractor::new(Vocabulary::default()).unwrap();
/// let config = ExtractionConfig::default();
/// let index = EntityIndex::build(&KnownWorld::default(), &config);
///
/// let output = extractor.extract("EXT. HARBOR - DAWN\nMaya picks up the brass key.", &index, &config);
/// let names = output.pass.entities.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
/// assert_eq!(names, ["Harbor", "Brass Key"]);
/// assert_eq!(output.pass.entities[1].entity_type, EntityType::Item);
/// ```
pub struct DeterministicExtractor {
    vocabulary: Vocabulary,
    leading: Vec<Box<dyn LineRule>>,
    trailing: Vec<Box<dyn LineRule>>,
}

impl std::fmt::Debug for DeterministicExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterministicExtractor")
            .field("vocabulary", &self.vocabulary)
            .field(
                "rules",
                &self
                    .leading
                    .iter()
                    .chain(&self.trailing)
                    .map(|rule| rule.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DeterministicExtractor {
    /// Build the extractor with the built-in rules.
    pub fn new(vocabulary: Vocabulary) -> Result<Self, ConfigError> {
        Ok(Self {
            vocabulary,
            leading: vec![
                Box::new(SlugLineRule::new()?),
                Box::new(ProseHeadingRule::new()?),
                Box::new(SpeakerCueRule),
                Box::new(InlineDialogueRule::new()?),
            ],
            trailing: vec![
                Box::new(TemporalMarkerRule::new()?),
                Box::new(ItemActionRule),
                Box::new(AmbiguousPhraseRule),
            ],
        })
    }

    /// The word lists in use.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Scan `text` line by line.
    #[instrument(skip_all, fields(chars = text.len(), known = index.len()))]
    pub fn extract(
        &self,
        text: &str,
        index: &EntityIndex,
        config: &ExtractionConfig,
    ) -> DeterministicOutput {
        let (custom, errors) = CustomPatternRule::compile(config.custom_patterns());
        let mut sink = Accumulator::new(index);
        for error in errors {
            sink.warn(error.message);
        }

        let mut rules: Vec<&dyn LineRule> =
            Vec::with_capacity(self.leading.len() + self.trailing.len() + 1);
        rules.extend(self.leading.iter().map(|rule| &**rule));
        rules.push(&custom);
        rules.extend(self.trailing.iter().map(|rule| &**rule));

        let lines = text.lines().collect::<Vec<_>>();
        let mut current_location: Option<LocationSlot> = None;

        for (line_index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let ctx = LineContext {
                line,
                next_line: lines.get(line_index + 1).copied(),
                current_location: current_location.as_ref(),
                entities: index,
                vocabulary: &self.vocabulary,
            };
            let Some((rule, effects)) = rules
                .iter()
                .find_map(|rule| rule.apply(&ctx).map(|effects| (rule.name(), effects)))
            else {
                continue;
            };
            debug!(line = line_index + 1, rule, effects = effects.len(), "Rule matched");

            for effect in effects {
                match effect {
                    Effect::EnterLocation(slot) => current_location = Some(slot),
                    Effect::Entity(draft) => sink.entity(draft, line_index, line),
                    Effect::Event(draft) => sink.event(draft, line_index),
                    Effect::Ambiguous(phrase) => sink.ambiguous(phrase),
                }
            }
        }

        let (pass, ambiguous_phrases) = sink.finish();
        debug!(
            entities = pass.entities.len(),
            events = pass.events.len(),
            ambiguous = ambiguous_phrases.len(),
            "Deterministic pass complete"
        );
        DeterministicOutput {
            pass,
            ambiguous_phrases,
        }
    }
}

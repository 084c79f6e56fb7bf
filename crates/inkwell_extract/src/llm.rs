//! External-model second pass.

use crate::text::truncate_chars;
use crate::{EntityIndex, PassResult};
use inkwell_core::{
    CandidateEntity, EntityType, EntityUpdate, Evidence, ExtractionSource, GenerateRequest,
    Locator, Message, NormalizedName, ProviderSettings, TimelineAction, TimelineEvent,
};
use inkwell_error::{InkwellResult, ResponseFormatError, ResponseFormatErrorKind};
use inkwell_interface::InkwellDriver;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, error, info, instrument};

const DEFAULT_MAX_PROMPT_CHARS: usize = 24_000;

#[derive(Debug, Deserialize)]
struct ModelOutput {
    #[serde(default, alias = "newEntities", alias = "new_entities")]
    entities: Vec<ModelEntity>,
    #[serde(default, alias = "updatedEntities")]
    updated_entities: Vec<ModelUpdate>,
    #[serde(default, alias = "timelineEvents")]
    timeline_events: Vec<ModelEvent>,
}

#[derive(Debug, Deserialize)]
struct ModelEntity {
    #[serde(alias = "entityType", alias = "type")]
    entity_type: String,
    name: String,
    confidence: f32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    evidence: Vec<Evidence>,
}

#[derive(Debug, Deserialize)]
struct ModelUpdate {
    #[serde(default, alias = "entityType", alias = "type")]
    entity_type: Option<String>,
    name: String,
    #[serde(default)]
    changes: BTreeMap<String, serde_json::Value>,
    confidence: f32,
    #[serde(default)]
    evidence: Vec<Evidence>,
}

#[derive(Debug, Deserialize)]
struct ModelEvent {
    #[serde(default, alias = "entityType")]
    entity_type: Option<String>,
    #[serde(default, alias = "entityName", alias = "name")]
    entity_name: Option<String>,
    action: String,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    description: String,
    confidence: f32,
    #[serde(default)]
    evidence: Vec<Evidence>,
}

#[track_caller]
fn schema_error(message: String) -> ResponseFormatError {
    ResponseFormatError::new(ResponseFormatErrorKind::Schema(message))
}

fn check_confidence(subject: &str, confidence: f32) -> Result<(), ResponseFormatError> {
    if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(schema_error(format!(
            "confidence {} for '{}' is outside [0, 1]",
            confidence, subject
        )))
    }
}

fn check_name(name: &str, what: &str) -> Result<(), ResponseFormatError> {
    if name.trim().is_empty() {
        Err(schema_error(format!("{} with an empty name", what)))
    } else {
        Ok(())
    }
}

fn parse_entity_type(raw: &str) -> Result<EntityType, ResponseFormatError> {
    EntityType::from_str(&raw.trim().to_lowercase())
        .map_err(|_| schema_error(format!("unknown entity type '{}'", raw)))
}

fn parse_action(raw: &str) -> Result<TimelineAction, ResponseFormatError> {
    TimelineAction::from_str(&raw.trim().to_lowercase())
        .map_err(|_| schema_error(format!("unknown timeline action '{}'", raw)))
}

fn attribute_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

fn locator_for(evidence: &[Evidence]) -> Option<Locator> {
    evidence.first().map(|e| Locator::Line {
        line_number: e.block_index + 1,
    })
}

/// Parse and validate model output against the output contract.
///
/// The whole response is rejected if any item has an out-of-range confidence,
/// an empty name, or an unknown type or action. Entities that are already
/// known are dropped, as are updates to entities that are not.
pub(crate) fn parse_model_output(
    response: &str,
    index: &EntityIndex,
) -> Result<PassResult, ResponseFormatError> {
    let output: ModelOutput = crate::parse_json(response)?;
    let mut result = PassResult::default();
    let mut counters: BTreeMap<String, usize> = BTreeMap::new();
    let mut next_id = |kind: &str| {
        let counter = counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        format!("llm-{}-{}", kind, counter)
    };

    let mut seen = BTreeSet::new();
    for entity in output.entities {
        check_name(&entity.name, "entity")?;
        check_confidence(&entity.name, entity.confidence)?;
        let entity_type = parse_entity_type(&entity.entity_type)?;

        let key = NormalizedName::new(&entity.name);
        if index.contains(&key) {
            debug!(name = %entity.name, "Discarding model proposal for a known entity");
            continue;
        }
        if !seen.insert((key, entity_type)) {
            continue;
        }

        let mut candidate = CandidateEntity::new(
            next_id(entity_type.as_ref()),
            entity_type,
            entity.name.trim(),
            ExtractionSource::Llm,
            entity.confidence,
        );
        if let Some(first) = entity.evidence.first() {
            candidate = candidate.with_context(first.snippet.clone());
        }
        if let Some(locator) = locator_for(&entity.evidence) {
            candidate = candidate.with_locator(locator);
        }
        if let Some(description) = entity.description.filter(|d| !d.trim().is_empty()) {
            candidate = candidate.with_description(description);
        }
        for (key, value) in entity.attributes {
            candidate = candidate.with_attribute(key, attribute_text(value));
        }
        candidate.evidence = entity.evidence;
        result.entities.push(candidate);
    }

    for update in output.updated_entities {
        check_name(&update.name, "update")?;
        check_confidence(&update.name, update.confidence)?;
        let declared = update
            .entity_type
            .as_deref()
            .map(parse_entity_type)
            .transpose()?;

        let Some(known) = index.get(&NormalizedName::new(&update.name)) else {
            result.warn(format!(
                "dropped model update to unknown entity '{}'",
                update.name.trim()
            ));
            continue;
        };

        result.updates.push(EntityUpdate {
            temp_id: next_id("update"),
            entity_type: declared.or(*known.entity_type()),
            entity_id: known.id().clone(),
            name: known.name().clone(),
            changes: update.changes,
            confidence: update.confidence,
            source: ExtractionSource::Llm,
            evidence: update.evidence,
        });
    }

    for event in output.timeline_events {
        let subject = event.entity_name.clone().unwrap_or_else(|| event.action.clone());
        check_confidence(&subject, event.confidence)?;
        let action = parse_action(&event.action)?;
        let declared = event
            .entity_type
            .as_deref()
            .map(parse_entity_type)
            .transpose()?;
        let entity_name = event
            .entity_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let known = entity_name
            .as_deref()
            .and_then(|name| index.get(&NormalizedName::new(name)));

        result.events.push(TimelineEvent {
            temp_id: next_id("timeline"),
            entity_type: declared.or_else(|| known.and_then(|k| *k.entity_type())),
            entity_id: known.and_then(|k| k.id().clone()),
            entity_name,
            action,
            payload: event.payload,
            description: event.description,
            confidence: event.confidence,
            source: ExtractionSource::Llm,
            evidence: event.evidence,
        });
    }

    Ok(result)
}

fn system_prompt() -> String {
    let entity_types = EntityType::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let actions = TimelineAction::iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You extract story-world entities from screenplay and comic script text.

Respond with ONE JSON object and nothing else, shaped exactly like this:
{{
  "entities": [
    {{"entity_type": "...", "name": "...", "confidence": 0.0, "description": "...",
      "attributes": {{}}, "evidence": [{{"block_type": "line", "block_index": 0, "snippet": "..."}}]}}
  ],
  "updated_entities": [
    {{"name": "...", "entity_type": "...", "changes": {{}}, "confidence": 0.0, "evidence": [...]}}
  ],
  "timeline_events": [
    {{"entity_name": "...", "entity_type": "...", "action": "...", "payload": {{}},
      "description": "...", "confidence": 0.0, "evidence": [...]}}
  ]
}}

Allowed entity_type values: {entity_types}.
Allowed action values: {actions}.
confidence is a number between 0 and 1.

Every item needs at least one evidence entry. block_type is always "line".
block_index is the number in square brackets before the line you cite.
snippet is copied verbatim from that line, same case, at most 12 words.

Never list a known entity under "entities"; use "updated_entities" for changes
to known entities. Never repeat an entity that was already found."#
    )
}

/// Second pass that asks an external model for entities the rules missed.
///
/// Makes exactly one provider call per extraction, with no retry.
///
/// # Examples
///
/// ```no_run
/// use inkwell_core::{ExtractionConfig, KnownWorld, ProviderSettings};
/// use inkwell_extract::{EntityIndex, ModelExtractor, PassResult};
/// use inkwell_models::{ProviderSelection, build_driver};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ProviderSettings::default();
/// let driver = build_driver(&ProviderSelection::from_env()?, &settings)?;
/// let extractor = ModelExtractor::new(driver).with_provider_settings(&settings);
///
/// let index = EntityIndex::build(&KnownWorld::default(), &ExtractionConfig::default());
/// let result = extractor
///     .extract("THE SYNDICATE closes in.", &index, &PassResult::default())
///     .await;
/// println!("{} entities", result.entities.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ModelExtractor<D> {
    driver: D,
    max_prompt_chars: usize,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl<D: InkwellDriver> ModelExtractor<D> {
    /// Wrap a driver with default limits.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Cap the script text sent to the model.
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

    /// Build the single request for `text`.
    ///
    /// Returns a truncation warning when the text exceeds the prompt cap.
    pub fn build_request(
        &self,
        text: &str,
        index: &EntityIndex,
        pass_one: &PassResult,
    ) -> (GenerateRequest, Option<String>) {
        let total_chars = text.chars().count();
        let included = truncate_chars(text, self.max_prompt_chars);
        let truncation = (included.len() < text.len()).then(|| {
            format!(
                "script truncated to {} of {} characters for the model prompt",
                self.max_prompt_chars, total_chars
            )
        });

        let mut prompt = String::new();
        if !index.is_empty() {
            prompt.push_str("Known entities (never propose these as new):\n");
            for name in index.names() {
                prompt.push_str(&format!("- {}\n", name));
            }
            prompt.push('\n');
        }
        if !pass_one.entities.is_empty() {
            prompt.push_str("Already found (do not repeat):\n");
            for entity in &pass_one.entities {
                prompt.push_str(&format!("- {} ({})\n", entity.name, entity.entity_type));
            }
            prompt.push('\n');
        }
        prompt.push_str("Script:\n");
        for (line_index, line) in included.lines().enumerate() {
            prompt.push_str(&format!("[{}] {}\n", line_index, line));
        }

        let request = GenerateRequest {
            system: Some(system_prompt()),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            model: None,
        };
        (request, truncation)
    }

    async fn generate_and_parse(
        &self,
        request: &GenerateRequest,
        index: &EntityIndex,
    ) -> InkwellResult<PassResult> {
        let response = self.driver.generate(request).await?;
        debug!(chars = response.text.len(), "Model responded");
        Ok(parse_model_output(&response.text, index)?)
    }

    /// Run the pass, propagating provider and format errors.
    #[instrument(skip_all, fields(provider = self.driver.provider_name(), model = %self.driver.model_name()))]
    pub async fn try_extract(
        &self,
        text: &str,
        index: &EntityIndex,
        pass_one: &PassResult,
    ) -> InkwellResult<PassResult> {
        let (request, truncation) = self.build_request(text, index, pass_one);
        let mut result = self.generate_and_parse(&request, index).await?;
        if let Some(warning) = truncation {
            result.warn(warning);
        }
        Ok(result)
    }

    /// Run the pass; any failure becomes a warning and an empty result.
    #[instrument(skip_all, fields(provider = self.driver.provider_name(), model = %self.driver.model_name()))]
    pub async fn extract(&self, text: &str, index: &EntityIndex, pass_one: &PassResult) -> PassResult {
        let (request, truncation) = self.build_request(text, index, pass_one);
        let mut result = match self.generate_and_parse(&request, index).await {
            Ok(result) => {
                info!(
                    entities = result.entities.len(),
                    updates = result.updates.len(),
                    events = result.events.len(),
                    "Model pass complete"
                );
                result
            }
            Err(e) => {
                error!(error = %e, "Model pass failed");
                PassResult::degraded(format!("model pass skipped: {}", e.kind()))
            }
        };
        if let Some(warning) = truncation {
            result.warn(warning);
        }
        result
    }
}

//! Built-in line rules, tried in order until one matches.

use crate::text::{is_shouted, trim_punctuation, word_spans};
use crate::{EntityIndex, IndexedEntity, Vocabulary, title_case};
use inkwell_core::{EntityType, NormalizedName, TimelineAction};
use inkwell_error::ConfigError;
use regex::Regex;
use serde_json::json;

/// Items in an item phrase must follow the verb within this many words.
const ITEM_WINDOW: usize = 6;
/// Longest line treated as a dialogue speaker cue.
const MAX_SPEAKER_CHARS: usize = 30;

/// The location entered by the most recent scene heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationSlot {
    pub name: String,
    pub key: NormalizedName,
    pub id: Option<String>,
}

/// Everything a rule may look at for one line.
pub(crate) struct LineContext<'a> {
    pub line: &'a str,
    pub next_line: Option<&'a str>,
    pub current_location: Option<&'a LocationSlot>,
    pub entities: &'a EntityIndex,
    pub vocabulary: &'a Vocabulary,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EntityDraft {
    pub entity_type: EntityType,
    pub name: String,
    pub confidence: f32,
    pub attributes: Vec<(&'static str, String)>,
    /// Verbatim text of the line that supports the entity
    pub matched: String,
}

impl EntityDraft {
    pub fn new(
        entity_type: EntityType,
        name: impl Into<String>,
        confidence: f32,
        matched: &str,
    ) -> Self {
        Self {
            entity_type,
            name: name.into(),
            confidence,
            attributes: Vec::new(),
            matched: matched.to_string(),
        }
    }

    pub fn with_attribute(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EventDraft {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub action: TimelineAction,
    pub payload: serde_json::Value,
    pub description: String,
    pub confidence: f32,
    pub matched: String,
}

/// What a matching rule asks the scanner to do.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Entity(EntityDraft),
    Event(EventDraft),
    EnterLocation(LocationSlot),
    Ambiguous(String),
}

/// A pure classification step over one line.
///
/// `None` means the rule does not apply and the next rule is tried. `Some`
/// ends classification of the line, even with no effects.
pub(crate) trait LineRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>>;
}

#[track_caller]
pub(crate) fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::new(format!("invalid pattern '{}': {}", pattern, e)))
}

fn enter_location(name: &str, ctx: &LineContext<'_>) -> LocationSlot {
    let key = NormalizedName::new(name);
    let id = ctx
        .entities
        .get(&key)
        .filter(|known| matches!(known.entity_type(), Some(EntityType::Location) | None))
        .and_then(|known| known.id().clone());
    LocationSlot {
        name: name.to_string(),
        key,
        id,
    }
}

fn split_time(text: &str) -> (&str, Option<&str>) {
    match text.rsplit_once(" - ") {
        Some((place, time)) if !time.trim().is_empty() => (place.trim(), Some(time.trim())),
        _ => (text.trim(), None),
    }
}

/// Scene location effects shared by both heading rules.
fn scene_effects(draft: EntityDraft, ctx: &LineContext<'_>) -> Vec<Effect> {
    let slot = enter_location(&draft.name, ctx);
    vec![Effect::Entity(draft), Effect::EnterLocation(slot)]
}

/// `INT. PLACE - TIME` / `EXT. PLACE`
pub(crate) struct SlugLineRule {
    pattern: Regex,
}

impl SlugLineRule {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile(r"^(INT|EXT)\.\s+(.+)$")?,
        })
    }
}

impl LineRule for SlugLineRule {
    fn name(&self) -> &'static str {
        "slug_line"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let trimmed = ctx.line.trim();
        let caps = self.pattern.captures(trimmed)?;
        let region = if &caps[1] == "INT" {
            "Interior"
        } else {
            "Exterior"
        };
        let (place, time) = split_time(caps.get(2)?.as_str());
        let name = title_case(place);
        if name.is_empty() {
            return None;
        }

        let mut draft =
            EntityDraft::new(EntityType::Location, name, 0.95, trimmed).with_attribute("region", region);
        if let Some(time) = time {
            draft = draft.with_attribute("timeOfDay", title_case(time));
        }
        Some(scene_effects(draft, ctx))
    }
}

/// `Panel 3 Interior. The old lighthouse - night.`
pub(crate) struct ProseHeadingRule {
    pattern: Regex,
}

impl ProseHeadingRule {
    const MAX_NAME_WORDS: usize = 6;

    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile(r"(?i)^(?:panel\s+(\d+)\s*[:.\-]?\s*)?(interior|exterior)[.\s]+(.+)$")?,
        })
    }
}

impl LineRule for ProseHeadingRule {
    fn name(&self) -> &'static str {
        "prose_heading"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let trimmed = ctx.line.trim();
        let caps = self.pattern.captures(trimmed)?;
        let panel = caps.get(1).map(|m| m.as_str().to_string());
        let region = title_case(&caps[2]);

        let heading = caps
            .get(3)?
            .as_str()
            .split(['.', ',', ';', ':'])
            .next()
            .unwrap_or_default();
        let (place, time) = split_time(heading);

        let words = place
            .split_whitespace()
            .skip_while(|word| ctx.vocabulary.is_article(word))
            .collect::<Vec<_>>();
        if words.is_empty() || words.len() > Self::MAX_NAME_WORDS {
            return None;
        }
        let name = title_case(&words.join(" "));

        let confidence = if panel.is_some() { 0.9 } else { 0.85 };
        let mut draft = EntityDraft::new(EntityType::Location, name, confidence, trimmed)
            .with_attribute("region", region);
        if let Some(time) = time {
            draft = draft.with_attribute("timeOfDay", title_case(time));
        }
        if let Some(panel) = panel {
            draft = draft.with_attribute("panel", panel);
        }
        Some(scene_effects(draft, ctx))
    }
}

/// Effects of a speaker cue: a new character, or a move for a known one.
fn speaker_effects(name: &str, matched: &str, ctx: &LineContext<'_>) -> Vec<Effect> {
    let key = NormalizedName::new(name);
    match ctx.entities.get(&key) {
        None => vec![Effect::Entity(EntityDraft::new(
            EntityType::Character,
            title_case(name),
            0.9,
            matched,
        ))],
        Some(known) if matches!(known.entity_type(), Some(EntityType::Character) | None) => {
            match ctx.current_location {
                Some(slot) if has_moved(known, slot, ctx.entities) => {
                    vec![Effect::Event(moved_to(known, slot, matched))]
                }
                _ => Vec::new(),
            }
        }
        Some(_) => Vec::new(),
    }
}

fn has_moved(character: &IndexedEntity, slot: &LocationSlot, entities: &EntityIndex) -> bool {
    match (&slot.id, character.location_id()) {
        (Some(current), Some(last)) => current != last,
        (None, Some(last)) => entities
            .location_by_id(last)
            .is_none_or(|location| NormalizedName::new(location.name()) != slot.key),
        (_, None) => true,
    }
}

fn moved_to(character: &IndexedEntity, slot: &LocationSlot, matched: &str) -> EventDraft {
    EventDraft {
        entity_type: Some(EntityType::Character),
        entity_id: character.id().clone(),
        entity_name: Some(character.name().clone()),
        action: TimelineAction::MovedTo,
        payload: json!({
            "to_location": slot.name,
            "to_location_id": slot.id,
            "from_location_id": character.location_id(),
        }),
        description: format!("{} moves to {}", character.name(), slot.name),
        confidence: 0.8,
        matched: matched.to_string(),
    }
}

/// Remove a trailing parenthetical such as `(V.O.)` or `(CONT'D)`.
fn strip_parenthetical(cue: &str) -> &str {
    match cue.find('(') {
        Some(idx) => cue[..idx].trim(),
        None => cue.trim(),
    }
}

fn is_name_like(cue: &str) -> bool {
    cue.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '\'' | '-'))
}

fn starts_with_quote(text: &str) -> bool {
    text.starts_with(['"', '\u{201C}', '\''])
}

/// An ALL-CAPS cue line followed by an indented or quoted line.
pub(crate) struct SpeakerCueRule;

impl LineRule for SpeakerCueRule {
    fn name(&self) -> &'static str {
        "speaker_cue"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let trimmed = ctx.line.trim();
        if trimmed.chars().count() > MAX_SPEAKER_CHARS {
            return None;
        }
        let name = strip_parenthetical(trimmed);
        if !is_shouted(name) || !is_name_like(name) {
            return None;
        }
        if ctx.vocabulary.is_stop_word(name) || ctx.vocabulary.is_stop_word(trimmed) {
            return None;
        }

        let next = ctx.next_line.filter(|next| !next.trim().is_empty())?;
        if !(next.starts_with(char::is_whitespace) || starts_with_quote(next.trim())) {
            return None;
        }

        Some(speaker_effects(name, trimmed, ctx))
    }
}

/// `NAME: "text"` or `NAME (mod): text`
pub(crate) struct InlineDialogueRule {
    pattern: Regex,
}

impl InlineDialogueRule {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile(r"^([A-Z][A-Z0-9 .'\-]*?)\s*(\([^)]*\))?\s*:\s*(.+)$")?,
        })
    }
}

impl LineRule for InlineDialogueRule {
    fn name(&self) -> &'static str {
        "inline_dialogue"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let trimmed = ctx.line.trim();
        let caps = self.pattern.captures(trimmed)?;
        let name = caps.get(1)?.as_str().trim();
        let has_modifier = caps.get(2).is_some();
        let speech = caps.get(3)?.as_str();

        if name.chars().count() > MAX_SPEAKER_CHARS || !is_shouted(name) {
            return None;
        }
        if ctx.vocabulary.is_stop_word(name) {
            return None;
        }
        if !has_modifier && !starts_with_quote(speech) {
            return None;
        }

        Some(speaker_effects(name, trimmed, ctx))
    }
}

/// `Setting: <date>` and `CAPTION: <year> ...` timeline markers.
pub(crate) struct TemporalMarkerRule {
    setting: Regex,
    caption: Regex,
}

impl TemporalMarkerRule {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            setting: compile(r"(?i)^setting:\s*(.+)$")?,
            caption: compile(r"^CAPTION:\s*((\d{3,4})\b.*)$")?,
        })
    }
}

impl LineRule for TemporalMarkerRule {
    fn name(&self) -> &'static str {
        "temporal_marker"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let trimmed = ctx.line.trim();

        if let Some(caps) = self.setting.captures(trimmed) {
            let value = caps.get(1)?.as_str().trim();
            return Some(vec![Effect::Event(EventDraft {
                entity_type: None,
                entity_id: None,
                entity_name: None,
                action: TimelineAction::Updated,
                payload: json!({ "marker": "setting", "value": value }),
                description: format!("Setting: {}", value),
                confidence: 0.85,
                matched: trimmed.to_string(),
            })]);
        }

        let caps = self.caption.captures(trimmed)?;
        let text = caps.get(1)?.as_str().trim();
        let year = caps.get(2)?.as_str().parse::<u32>().ok()?;
        Some(vec![Effect::Event(EventDraft {
            entity_type: None,
            entity_id: None,
            entity_name: None,
            action: TimelineAction::Created,
            payload: json!({ "marker": "caption", "year": year, "text": text }),
            description: format!("Caption: {}", text),
            confidence: 0.8,
            matched: trimmed.to_string(),
        })])
    }
}

fn ends_clause(word: &str) -> bool {
    word.ends_with(['.', ',', ';', ':', '!', '?'])
}

/// An object introduced by an item verb, e.g. "picks up the rusty key".
pub(crate) struct ItemActionRule;

impl ItemActionRule {
    /// Find the item phrase in the word window after a verb.
    ///
    /// Returns the span index range of the phrase and its confidence.
    fn item_phrase(
        line: &str,
        window: &[(usize, usize)],
        vocabulary: &Vocabulary,
    ) -> Option<(usize, usize, f32)> {
        let word = |i: usize| {
            let (start, end) = window[i];
            &line[start..end]
        };

        let mut phrase_start = 0;
        for i in 0..window.len() {
            let raw = word(i);
            let bare = trim_punctuation(raw);
            if vocabulary.is_article(bare) {
                phrase_start = i + 1;
            } else if vocabulary.is_item_keyword(bare) {
                return (phrase_start <= i).then_some((phrase_start, i, 0.8));
            }
            if ends_clause(raw) {
                break;
            }
        }

        // No keyword: fall back to a capitalized phrase right after the verb.
        let first = (0..window.len()).find(|&i| !vocabulary.is_article(trim_punctuation(word(i))))?;
        let mut last = None;
        for i in first..window.len() {
            let raw = word(i);
            let bare = trim_punctuation(raw);
            let capitalized = bare.chars().next().is_some_and(char::is_uppercase);
            if !capitalized || vocabulary.is_stop_word(bare) {
                break;
            }
            last = Some(i);
            if ends_clause(raw) {
                break;
            }
        }
        last.map(|last| (first, last, 0.7))
    }
}

impl LineRule for ItemActionRule {
    fn name(&self) -> &'static str {
        "item_action"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let line = ctx.line;
        let spans = word_spans(line);
        let words = spans
            .iter()
            .map(|&(start, end)| trim_punctuation(&line[start..end]).to_lowercase())
            .collect::<Vec<_>>();

        for position in 0..words.len() {
            for verb in ctx.vocabulary.item_verbs() {
                let verb_words = verb.split_whitespace().collect::<Vec<_>>();
                let verb_end = position + verb_words.len();
                if verb_end > words.len()
                    || !words[position..verb_end]
                        .iter()
                        .zip(&verb_words)
                        .all(|(word, verb_word)| word == verb_word)
                {
                    continue;
                }
                // A verb that closes its clause has no object on this line.
                let (verb_start, verb_stop) = spans[verb_end - 1];
                if ends_clause(&line[verb_start..verb_stop]) {
                    continue;
                }

                let window_end = (verb_end + ITEM_WINDOW).min(spans.len());
                let window = &spans[verb_end..window_end];
                let Some((first, last, confidence)) =
                    Self::item_phrase(line, window, ctx.vocabulary)
                else {
                    continue;
                };

                let name = window[first..=last]
                    .iter()
                    .map(|&(start, end)| trim_punctuation(&line[start..end]))
                    .collect::<Vec<_>>()
                    .join(" ");
                let name = title_case(&name);
                if name.is_empty() {
                    continue;
                }

                let matched_start = spans[position].0;
                let (last_start, last_end) = window[last];
                let last_word = &line[last_start..last_end];
                let trailing = last_word.len() - last_word.trim_end_matches(|c: char| !c.is_alphanumeric()).len();
                let matched = &line[matched_start..last_end - trailing];

                return Some(vec![Effect::Entity(
                    EntityDraft::new(EntityType::Item, name, confidence, matched)
                        .with_attribute("action", verb.clone()),
                )]);
            }
        }
        None
    }
}

/// Leftover ALL-CAPS phrases that might name something.
pub(crate) struct AmbiguousPhraseRule;

impl LineRule for AmbiguousPhraseRule {
    fn name(&self) -> &'static str {
        "ambiguous_phrase"
    }

    fn apply(&self, ctx: &LineContext<'_>) -> Option<Vec<Effect>> {
        let line = ctx.line;
        let mut phrases = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        let mut flush = |current: &mut Vec<&str>| {
            if current.is_empty() {
                return;
            }
            let phrase = current.join(" ");
            current.clear();
            let key = NormalizedName::new(&phrase);
            if !ctx.vocabulary.is_stop_word(&phrase)
                && !ctx.vocabulary.is_time_word(&phrase)
                && !ctx.entities.contains(&key)
            {
                phrases.push(phrase);
            }
        };

        for (start, end) in word_spans(line) {
            let raw = &line[start..end];
            let bare = trim_punctuation(raw);
            let candidate = is_shouted(bare)
                && !ctx.vocabulary.is_stop_word(bare)
                && !ctx.vocabulary.is_time_word(bare);
            if candidate {
                current.push(bare);
                if ends_clause(raw) {
                    flush(&mut current);
                }
            } else {
                flush(&mut current);
            }
        }
        flush(&mut current);

        if phrases.is_empty() {
            None
        } else {
            Some(phrases.into_iter().map(Effect::Ambiguous).collect())
        }
    }
}

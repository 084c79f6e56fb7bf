//! Run-local accumulator for rule effects.

use super::rules::{EntityDraft, EventDraft};
use crate::{EntityIndex, PassResult, clip_words};
use inkwell_core::{
    CandidateEntity, Evidence, ExtractionSource, Locator, MAX_EVIDENCE_WORDS, NormalizedName,
    TimelineAction, TimelineEvent,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

type EventKey = (Option<NormalizedName>, TimelineAction, String);

/// Collects deduplicated proposals while the scanner walks the lines.
pub(crate) struct Accumulator<'a> {
    entities: &'a EntityIndex,
    pass: PassResult,
    seen_entities: BTreeSet<NormalizedName>,
    seen_events: BTreeSet<EventKey>,
    ambiguous: Vec<String>,
    seen_ambiguous: BTreeSet<NormalizedName>,
    counters: BTreeMap<String, usize>,
}

impl<'a> Accumulator<'a> {
    pub fn new(entities: &'a EntityIndex) -> Self {
        Self {
            entities,
            pass: PassResult::default(),
            seen_entities: BTreeSet::new(),
            seen_events: BTreeSet::new(),
            ambiguous: Vec::new(),
            seen_ambiguous: BTreeSet::new(),
            counters: BTreeMap::new(),
        }
    }

    fn next_id(&mut self, kind: &str) -> String {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        format!("det-{}-{}", kind, counter)
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.pass.warn(message);
    }

    pub fn entity(&mut self, draft: EntityDraft, line_index: usize, line: &str) {
        let key = NormalizedName::new(&draft.name);
        if key.is_empty() || self.entities.contains(&key) || self.seen_entities.contains(&key) {
            debug!(name = %draft.name, "Skipping known or repeated entity");
            return;
        }

        let temp_id = self.next_id(draft.entity_type.as_ref());
        let mut candidate = CandidateEntity::new(
            temp_id,
            draft.entity_type,
            draft.name,
            ExtractionSource::Deterministic,
            draft.confidence,
        )
        .with_context(line.trim())
        .with_locator(Locator::Line {
            line_number: line_index + 1,
        })
        .with_evidence(Evidence::line(
            line_index,
            clip_words(&draft.matched, MAX_EVIDENCE_WORDS),
        ));
        for (attribute, value) in draft.attributes {
            candidate = candidate.with_attribute(attribute, value);
        }

        self.seen_entities.insert(key);
        self.pass.entities.push(candidate);
    }

    pub fn event(&mut self, draft: EventDraft, line_index: usize) {
        let event = TimelineEvent {
            temp_id: String::new(),
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            entity_name: draft.entity_name,
            action: draft.action,
            payload: draft.payload,
            description: draft.description,
            confidence: draft.confidence,
            source: ExtractionSource::Deterministic,
            evidence: vec![Evidence::line(
                line_index,
                clip_words(&draft.matched, MAX_EVIDENCE_WORDS),
            )],
        };

        if !self.seen_events.insert(event.dedup_key()) {
            return;
        }
        let temp_id = self.next_id("timeline");
        self.pass.events.push(TimelineEvent { temp_id, ..event });
    }

    pub fn ambiguous(&mut self, phrase: String) {
        if self.seen_ambiguous.insert(NormalizedName::new(&phrase)) {
            self.ambiguous.push(phrase);
        }
    }

    /// The pass result and the ambiguous phrases no rule placed.
    pub fn finish(self) -> (PassResult, Vec<String>) {
        let seen_entities = self.seen_entities;
        let ambiguous = self
            .ambiguous
            .into_iter()
            .filter(|phrase| !seen_entities.contains(&NormalizedName::new(phrase)))
            .collect();
        (self.pass, ambiguous)
    }
}

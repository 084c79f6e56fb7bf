//! Verbatim evidence checks.
//!
//! An evidence item is grounded when its block exists in the source unit, its
//! declared block type matches the block's type, its snippet has at most
//! [`MAX_EVIDENCE_WORDS`] words, and the snippet occurs verbatim
//! (case-sensitive) in the block text.

use crate::PassResult;
use inkwell_core::{
    CandidateEntity, EntityUpdate, Evidence, LINE_BLOCK_TYPE, MAX_EVIDENCE_WORDS, ScriptPanel,
    TimelineEvent, word_count,
};
use inkwell_error::{GroundingError, GroundingErrorKind};
use tracing::{debug, instrument};

/// A sequence of typed text blocks that evidence can point into.
pub trait SourceUnit {
    /// Human-readable name of the unit, used in errors.
    fn unit_label(&self) -> String;

    /// Number of blocks.
    fn block_count(&self) -> usize;

    /// Type and text of block `index`.
    fn block(&self, index: usize) -> Option<(&str, &str)>;
}

/// Raw text split into lines, each a block of type `line`.
///
/// # Examples
///
/// ```
/// use inkwell_extract::{ScriptLines, SourceUnit};
///
/// let lines = ScriptLines::new("ELI\n  I've been searching for years.");
/// assert_eq!(lines.block_count(), 2);
/// assert_eq!(lines.block(1), Some(("line", "  I've been searching for years.")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> ScriptLines<'a> {
    /// Split `text` into lines.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    /// The lines, in order.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }
}

impl SourceUnit for ScriptLines<'_> {
    fn unit_label(&self) -> String {
        "script text".to_string()
    }

    fn block_count(&self) -> usize {
        self.lines.len()
    }

    fn block(&self, index: usize) -> Option<(&str, &str)> {
        self.lines.get(index).map(|line| (LINE_BLOCK_TYPE, *line))
    }
}

impl SourceUnit for ScriptPanel {
    fn unit_label(&self) -> String {
        format!("panel {}", self.panel_number)
    }

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block(&self, index: usize) -> Option<(&str, &str)> {
        self.blocks
            .get(index)
            .map(|block| (block.block_type.as_str(), block.text.as_str()))
    }
}

/// Anything that carries evidence.
pub trait Grounded {
    /// Label used in warnings and errors.
    fn subject(&self) -> String;

    /// The evidence items.
    fn evidence(&self) -> &[Evidence];
}

impl Grounded for CandidateEntity {
    fn subject(&self) -> String {
        self.label()
    }

    fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

impl Grounded for EntityUpdate {
    fn subject(&self) -> String {
        self.label()
    }

    fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

impl Grounded for TimelineEvent {
    fn subject(&self) -> String {
        self.label()
    }

    fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

/// Check one evidence item against `unit`.
///
/// # Examples
///
/// ```
/// use inkwell_core::Evidence;
/// use inkwell_error::GroundingErrorKind;
/// use inkwell_extract::{ScriptLines, validate_evidence};
///
/// let lines = ScriptLines::new("INT. APARTMENT - NIGHT");
/// assert!(validate_evidence("location 'Apartment'", &Evidence::line(0, "APARTMENT"), &lines).is_ok());
///
/// let err = validate_evidence("location 'Apartment'", &Evidence::line(0, "apartment"), &lines)
///     .unwrap_err();
/// assert!(matches!(err.kind, GroundingErrorKind::SnippetNotFound { .. }));
/// ```
#[track_caller]
pub fn validate_evidence(
    subject: &str,
    evidence: &Evidence,
    unit: &impl SourceUnit,
) -> Result<(), GroundingError> {
    let fail = |kind| Err(GroundingError::new(subject, kind));

    if evidence.snippet.trim().is_empty() {
        return fail(GroundingErrorKind::EmptySnippet);
    }

    let Some((block_type, text)) = unit.block(evidence.block_index) else {
        return fail(GroundingErrorKind::BlockNotFound {
            index: evidence.block_index,
            block_count: unit.block_count(),
        });
    };

    if evidence.block_type != block_type {
        return fail(GroundingErrorKind::BlockTypeMismatch {
            declared: evidence.block_type.clone(),
            actual: block_type.to_string(),
        });
    }

    let words = word_count(&evidence.snippet);
    if words > MAX_EVIDENCE_WORDS {
        return fail(GroundingErrorKind::SnippetTooLong {
            words,
            limit: MAX_EVIDENCE_WORDS,
        });
    }

    if !text.contains(evidence.snippet.as_str()) {
        return fail(GroundingErrorKind::SnippetNotFound {
            index: evidence.block_index,
            snippet: evidence.snippet.clone(),
        });
    }

    Ok(())
}

/// Check every evidence item of `item`; an item without evidence fails.
#[track_caller]
pub fn validate_item(item: &impl Grounded, unit: &impl SourceUnit) -> Result<(), GroundingError> {
    let subject = item.subject();
    if item.evidence().is_empty() {
        return Err(GroundingError::new(subject, GroundingErrorKind::MissingEvidence));
    }
    item.evidence()
        .iter()
        .try_for_each(|evidence| validate_evidence(&subject, evidence, unit))
}

/// Drop ungrounded items from `pass`, recording a warning for each.
///
/// Returns the number of items dropped.
#[instrument(skip_all, fields(unit = %unit.unit_label()))]
pub fn retain_grounded(pass: &mut PassResult, unit: &impl SourceUnit) -> usize {
    let mut failures = Vec::new();

    retain_items(&mut pass.entities, unit, &mut failures);
    retain_items(&mut pass.updates, unit, &mut failures);
    retain_items(&mut pass.events, unit, &mut failures);

    let dropped = failures.len();
    for failure in failures {
        pass.warn(format!("dropped {}: {}", failure.subject, failure.kind));
    }
    debug!(dropped, "Grounding complete");
    dropped
}

fn retain_items<T: Grounded>(
    items: &mut Vec<T>,
    unit: &impl SourceUnit,
    failures: &mut Vec<GroundingError>,
) {
    items.retain(|item| match validate_item(item, unit) {
        Ok(()) => true,
        Err(e) => {
            failures.push(e);
            false
        }
    });
}

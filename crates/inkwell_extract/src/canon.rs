//! Canon-lock suppression.

use crate::PassResult;
use inkwell_core::NormalizedName;
use std::collections::BTreeSet;
use tracing::debug;

/// Remove proposals naming a canon-locked entity.
///
/// New entities, updates and entity-bound timeline events are all removed.
/// Runs before merge so a locked name can never displace anything.
///
/// # Examples
///
/// ```
/// use inkwell_core::{CandidateEntity, EntityType, ExtractionConfig, ExtractionSource};
/// use inkwell_extract::{PassResult, suppress_canon_locked};
///
/// let config = ExtractionConfig::new(vec![], vec!["The Order".into()], vec![]);
/// let mut pass = PassResult {
///     entities: vec![CandidateEntity::new(
///         "llm-faction-1",
///         EntityType::Faction,
///         "the order",
///         ExtractionSource::Llm,
///         0.7,
///     )],
///     ..Default::default()
/// };
///
/// assert_eq!(suppress_canon_locked(&mut pass, &config.canon_lock_set()), 1);
/// assert!(pass.entities.is_empty());
/// ```
pub fn suppress_canon_locked(pass: &mut PassResult, locks: &BTreeSet<NormalizedName>) -> usize {
    if locks.is_empty() {
        return 0;
    }

    let mut suppressed = Vec::new();

    pass.entities.retain(|entity| {
        let locked = locks.contains(&entity.normalized_name());
        if locked {
            suppressed.push(entity.label());
        }
        !locked
    });
    pass.updates.retain(|update| {
        let locked = locks.contains(&update.normalized_name());
        if locked {
            suppressed.push(update.label());
        }
        !locked
    });
    pass.events.retain(|event| {
        let locked = event
            .normalized_entity()
            .is_some_and(|name| locks.contains(&name));
        if locked {
            suppressed.push(event.label());
        }
        !locked
    });

    let count = suppressed.len();
    for label in suppressed {
        debug!(item = %label, "Suppressed canon-locked proposal");
        pass.warn(format!("suppressed canon-locked {}", label));
    }
    count
}

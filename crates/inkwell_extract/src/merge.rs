//! Combining the two passes.

use crate::PassResult;
use inkwell_core::{
    CandidateEntity, EntityType, EntityUpdate, MergePolicy, NormalizedName, TimelineEvent,
    TypeConflict, TypeConflictPolicy,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Merged proposals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Deduplicated new entities
    pub entities: Vec<CandidateEntity>,
    /// Deduplicated updates
    pub updates: Vec<EntityUpdate>,
    /// Deduplicated timeline events
    pub events: Vec<TimelineEvent>,
    /// Names proposed with more than one entity type
    pub type_conflicts: Vec<TypeConflict>,
}

/// Merge and deduplication under a named priority policy.
///
/// The primary pass is taken whole; a secondary item survives only if its
/// [`NormalizedName`] is not already present. When both passes name the same
/// entity with different types, the [`TypeConflictPolicy`] decides: keep both
/// and report the conflict, or keep the primary only.
///
/// Merging a result with itself returns the same names.
///
/// # Examples
///
/// ```
/// use inkwell_core::{CandidateEntity, EntityType, ExtractionSource, MergePolicy, TypeConflictPolicy};
/// use inkwell_extract::{MergeEngine, PassResult};
///
/// let rules = PassResult {
///     entities: vec![CandidateEntity::new("det-character-1", EntityType::Character, "Maya", ExtractionSource::Deterministic, 0.9)],
///     ..Default::default()
/// };
/// let model = PassResult {
///     entities: vec![
///         CandidateEntity::new("llm-character-1", EntityType::Character, "MAYA", ExtractionSource::Llm, 0.8)
///             .with_description("A lighthouse keeper"),
///     ],
///     ..Default::default()
/// };
///
/// let engine = MergeEngine::new(MergePolicy::ModelPrimary, TypeConflictPolicy::SurfaceBoth);
/// let merged = engine.merge(&rules, &model);
/// assert_eq!(merged.entities.len(), 1);
/// assert_eq!(merged.entities[0].description.as_deref(), Some("A lighthouse keeper"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct MergeEngine {
    /// Which pass wins on duplicate names
    policy: MergePolicy,
    /// How conflicting entity types are resolved
    conflicts: TypeConflictPolicy,
}

impl MergeEngine {
    /// Create an engine.
    pub fn new(policy: MergePolicy, conflicts: TypeConflictPolicy) -> Self {
        Self { policy, conflicts }
    }

    /// Merge the deterministic and model passes.
    #[instrument(skip_all, fields(policy = %self.policy, conflicts = %self.conflicts))]
    pub fn merge(&self, deterministic: &PassResult, model: &PassResult) -> MergeOutcome {
        let (primary, secondary) = match self.policy {
            MergePolicy::DeterministicPrimary => (deterministic, model),
            MergePolicy::ModelPrimary => (model, deterministic),
        };

        let (entities, type_conflicts) = self.merge_entities(&primary.entities, &secondary.entities);
        let updates = merge_by_key(&primary.updates, &secondary.updates, EntityUpdate::normalized_name);
        let events = merge_by_key(&primary.events, &secondary.events, TimelineEvent::dedup_key);

        debug!(
            entities = entities.len(),
            updates = updates.len(),
            events = events.len(),
            conflicts = type_conflicts.len(),
            "Merged passes"
        );
        MergeOutcome {
            entities,
            updates,
            events,
            type_conflicts,
        }
    }

    fn merge_entities(
        &self,
        primary: &[CandidateEntity],
        secondary: &[CandidateEntity],
    ) -> (Vec<CandidateEntity>, Vec<TypeConflict>) {
        let mut merged = Vec::new();
        let mut present: BTreeMap<NormalizedName, (String, BTreeSet<EntityType>)> = BTreeMap::new();
        let mut conflicts = Vec::new();
        let mut reported = BTreeSet::new();

        for entity in primary {
            let (_, types) = present
                .entry(entity.normalized_name())
                .or_insert_with(|| (entity.name.clone(), BTreeSet::new()));
            if types.insert(entity.entity_type) {
                merged.push(entity.clone());
            }
        }

        for entity in secondary {
            let key = entity.normalized_name();
            let Some((primary_name, primary_types)) = present.get(&key) else {
                present.insert(
                    key,
                    (entity.name.clone(), BTreeSet::from([entity.entity_type])),
                );
                merged.push(entity.clone());
                continue;
            };
            if primary_types.contains(&entity.entity_type) {
                continue;
            }

            let Some(primary_type) = primary_types.iter().next().copied() else {
                continue;
            };
            let conflict = TypeConflict {
                name: primary_name.clone(),
                primary_type,
                secondary_type: entity.entity_type,
            };
            if reported.insert((key.clone(), primary_type, entity.entity_type)) {
                debug!(name = %conflict.name, primary = %primary_type, secondary = %entity.entity_type, "Type conflict");
                conflicts.push(conflict);
            }

            if self.conflicts == TypeConflictPolicy::SurfaceBoth {
                merged.push(entity.clone());
                if let Some((_, types)) = present.get_mut(&key) {
                    types.insert(entity.entity_type);
                }
            }
        }

        (merged, conflicts)
    }
}

/// Primary items, then secondary items whose key is not yet present.
fn merge_by_key<T, K, F>(primary: &[T], secondary: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut seen = BTreeSet::new();
    primary
        .iter()
        .chain(secondary)
        .filter(|item| seen.insert(key(item)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::ExtractionSource;

    fn candidate(name: &str, entity_type: EntityType, source: ExtractionSource) -> CandidateEntity {
        CandidateEntity::new(format!("{}-{}", source, name), entity_type, name, source, 0.8)
    }

    fn pass(entities: Vec<CandidateEntity>) -> PassResult {
        PassResult {
            entities,
            ..Default::default()
        }
    }

    fn names(outcome: &MergeOutcome) -> Vec<NormalizedName> {
        let mut names = outcome
            .entities
            .iter()
            .map(CandidateEntity::normalized_name)
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn test_deterministic_primary_keeps_rule_candidate() {
        let rules = pass(vec![candidate("Maya", EntityType::Character, ExtractionSource::Deterministic)]);
        let model = pass(vec![
            candidate("maya", EntityType::Character, ExtractionSource::Llm),
            candidate("Lantern", EntityType::Item, ExtractionSource::Llm),
        ]);

        let merged = MergeEngine::default().merge(&rules, &model);
        assert_eq!(merged.entities.len(), 2);
        assert_eq!(merged.entities[0].source, ExtractionSource::Deterministic);
        assert_eq!(merged.entities[1].name, "Lantern");
    }

    #[test]
    fn test_merging_a_result_with_itself_is_idempotent() {
        let result = pass(vec![
            candidate("Maya", EntityType::Character, ExtractionSource::Deterministic),
            candidate("Harbor", EntityType::Location, ExtractionSource::Deterministic),
            candidate("Harbor", EntityType::Faction, ExtractionSource::Deterministic),
        ]);

        for policy in [MergePolicy::DeterministicPrimary, MergePolicy::ModelPrimary] {
            for conflicts in [TypeConflictPolicy::SurfaceBoth, TypeConflictPolicy::PreferPrimary] {
                let engine = MergeEngine::new(policy, conflicts);
                let once = engine.merge(&result, &result);
                assert_eq!(names(&once), names(&engine.merge(&result, &PassResult::default())));
                let twice = engine.merge(&pass(once.entities.clone()), &pass(once.entities.clone()));
                assert_eq!(names(&twice), names(&once));
            }
        }
    }

    #[test]
    fn test_type_conflicts_are_surfaced_or_resolved() {
        let rules = pass(vec![candidate("Raven", EntityType::Character, ExtractionSource::Deterministic)]);
        let model = pass(vec![candidate("Raven", EntityType::Faction, ExtractionSource::Llm)]);

        let both = MergeEngine::new(MergePolicy::DeterministicPrimary, TypeConflictPolicy::SurfaceBoth)
            .merge(&rules, &model);
        assert_eq!(both.entities.len(), 2);
        assert_eq!(
            both.type_conflicts,
            vec![TypeConflict {
                name: "Raven".into(),
                primary_type: EntityType::Character,
                secondary_type: EntityType::Faction,
            }]
        );

        let primary = MergeEngine::new(MergePolicy::DeterministicPrimary, TypeConflictPolicy::PreferPrimary)
            .merge(&rules, &model);
        assert_eq!(primary.entities.len(), 1);
        assert_eq!(primary.entities[0].entity_type, EntityType::Character);
        assert_eq!(primary.type_conflicts.len(), 1);
    }
}

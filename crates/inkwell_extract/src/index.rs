//! Lookup of entities the caller already knows.

use inkwell_core::{EntityType, ExtractionConfig, KnownWorld, NormalizedName};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One known entity.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct IndexedEntity {
    /// Entity kind; unknown for bare `knownEntityNames`
    entity_type: Option<EntityType>,
    /// Snapshot identifier
    id: Option<String>,
    /// Display name
    name: String,
    /// Last known location id (characters)
    location_id: Option<String>,
}

/// Map from [`NormalizedName`] to known entity.
///
/// Snapshot entries win over bare names from the extraction config, and the
/// first snapshot entry wins among duplicates. Lookups hash; only
/// [`EntityIndex::names`] pays for ordering.
///
/// # Examples
///
/// ```
/// use inkwell_core::{ExtractionConfig, KnownEntity, KnownWorld, NormalizedName};
/// use inkwell_extract::EntityIndex;
///
/// let world = KnownWorld {
///     characters: vec![KnownEntity::new("c1", "Maya").at_location("l1")],
///     locations: vec![KnownEntity::new("l1", "Lighthouse")],
///     ..Default::default()
/// };
/// let config = ExtractionConfig::new(vec!["maya".into(), "Eli".into()], vec![], vec![]);
///
/// let index = EntityIndex::build(&world, &config);
/// let maya = index.get(&NormalizedName::new("MAYA")).unwrap();
/// assert_eq!(maya.id().as_deref(), Some("c1"));
/// assert!(index.contains(&NormalizedName::new("eli")));
/// assert_eq!(index.location_by_id("l1").unwrap().name(), "Lighthouse");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIndex {
    entries: HashMap<NormalizedName, IndexedEntity>,
    locations_by_id: HashMap<String, NormalizedName>,
}

impl EntityIndex {
    /// Index the snapshot and the config's known names.
    #[instrument(skip_all, fields(snapshot = world.len(), names = config.known_entity_names().len()))]
    pub fn build(world: &KnownWorld, config: &ExtractionConfig) -> Self {
        let mut index = Self::default();

        for (entity_type, entity) in world.entries() {
            let key = NormalizedName::new(&entity.name);
            if key.is_empty() || index.entries.contains_key(&key) {
                continue;
            }
            if entity_type == Some(EntityType::Location) {
                index
                    .locations_by_id
                    .entry(entity.id.clone())
                    .or_insert_with(|| key.clone());
            }
            index.entries.insert(
                key,
                IndexedEntity {
                    entity_type,
                    id: Some(entity.id.clone()),
                    name: entity.name.clone(),
                    location_id: entity.current_location_id.clone(),
                },
            );
        }

        for name in config.known_entity_names() {
            let key = NormalizedName::new(name);
            if key.is_empty() {
                continue;
            }
            index.entries.entry(key).or_insert_with(|| IndexedEntity {
                entity_type: None,
                id: None,
                name: name.trim().to_string(),
                location_id: None,
            });
        }

        debug!(entries = index.entries.len(), "Built entity index");
        index
    }

    /// Look up a normalized name.
    pub fn get(&self, name: &NormalizedName) -> Option<&IndexedEntity> {
        self.entries.get(name)
    }

    /// Whether a normalized name is known.
    pub fn contains(&self, name: &NormalizedName) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve a location id back to its entry.
    pub fn location_by_id(&self, id: &str) -> Option<&IndexedEntity> {
        self.locations_by_id
            .get(id)
            .and_then(|key| self.entries.get(key))
    }

    /// Display names of every known entity, ordered by normalized name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().map(|(_, entity)| entity.name.as_str())
    }

    /// Number of known entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::KnownEntity;

    #[test]
    fn test_snapshot_wins_over_known_names() {
        let world = KnownWorld {
            items: vec![KnownEntity::new("i1", "Brass Key")],
            ..Default::default()
        };
        let config = ExtractionConfig::new(vec!["brass  key".into()], vec![], vec![]);

        let index = EntityIndex::build(&world, &config);
        let key = index.get(&NormalizedName::new("Brass Key")).unwrap();
        assert_eq!(*key.entity_type(), Some(EntityType::Item));
        assert_eq!(key.name(), "Brass Key");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let config = ExtractionConfig::new(vec!["  ".into()], vec![], vec![]);
        let index = EntityIndex::build(&KnownWorld::default(), &config);
        assert!(index.is_empty());
    }

    #[test]
    fn test_names_are_ordered_by_normalized_name() {
        let world = KnownWorld {
            characters: vec![KnownEntity::new("c1", "Otto"), KnownEntity::new("c2", "eli")],
            locations: vec![KnownEntity::new("l1", "Harbor")],
            ..Default::default()
        };
        let config = ExtractionConfig::new(vec!["Anchor".into()], vec![], vec![]);

        let index = EntityIndex::build(&world, &config);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["Anchor", "eli", "Harbor", "Otto"]);
    }
}

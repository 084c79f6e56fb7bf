//! Snapshot of entities the caller already knows about.

use crate::EntityType;
use serde::{Deserialize, Serialize};

/// A previously accepted entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownEntity {
    /// Store identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Explicit kind; defaults to the kind of the list the entity appears in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// For characters, the id of their last known location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location_id: Option<String>,
}

impl KnownEntity {
    /// Create a known entity with no explicit type or location.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type: None,
            current_location_id: None,
        }
    }

    /// Set the last known location id.
    pub fn at_location(mut self, location_id: impl Into<String>) -> Self {
        self.current_location_id = Some(location_id.into());
        self
    }
}

/// Prior state supplied by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnownWorld {
    /// Known characters
    pub characters: Vec<KnownEntity>,
    /// Known locations
    pub locations: Vec<KnownEntity>,
    /// Known items
    pub items: Vec<KnownEntity>,
    /// Known entities of any other kind (type given per entry)
    pub others: Vec<KnownEntity>,
}

impl KnownWorld {
    /// Total number of known entities.
    pub fn len(&self) -> usize {
        self.characters.len() + self.locations.len() + self.items.len() + self.others.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities paired with their effective kind, in snapshot order.
    pub fn entries(&self) -> impl Iterator<Item = (Option<EntityType>, &KnownEntity)> {
        self.characters
            .iter()
            .map(|entity| with_default_type(EntityType::Character, entity))
            .chain(
                self.locations
                    .iter()
                    .map(|entity| with_default_type(EntityType::Location, entity)),
            )
            .chain(
                self.items
                    .iter()
                    .map(|entity| with_default_type(EntityType::Item, entity)),
            )
            .chain(self.others.iter().map(|entity| (entity.entity_type, entity)))
    }
}

fn with_default_type(default: EntityType, entity: &KnownEntity) -> (Option<EntityType>, &KnownEntity) {
    (Some(entity.entity_type.unwrap_or(default)), entity)
}

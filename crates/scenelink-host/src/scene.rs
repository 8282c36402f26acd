//! The live entity registry.

use tracing::debug;

use crate::classes::find_class;
use crate::entity::{Entity, EntityId, TAGS};
use crate::errors::{HostError, Result};
use crate::math::Transform;
use crate::property::{Property, PropertyFlags, PropertySet};
use crate::value::{PropertyKind, PropertyValue};

/// Read access to live entities.
///
/// Every call walks current state; implementations never hand out cached
/// snapshots.
pub trait EntityRegistry {
    /// All live entities in spawn order.
    fn entities(&self) -> Box<dyn Iterator<Item = &Entity> + '_>;

    /// Entity by id.
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities().find(|e| e.id == id)
    }

    /// First entity whose label equals `label`.
    fn find_by_label(&self, label: &str) -> Option<&Entity> {
        self.entities().find(|e| e.label == label)
    }

    /// Entity at `path`.
    fn find_by_path(&self, path: &str) -> Option<&Entity> {
        self.entities().find(|e| e.path == path)
    }
}

/// Spawn parameters.
#[derive(Clone, Debug, Default)]
pub struct SpawnOptions {
    /// Requested label; made unique when taken.
    pub label: Option<String>,
    /// Initial transform.
    pub transform: Transform,
}

/// A level full of entities.
#[derive(Debug)]
pub struct Scene {
    level: String,
    entities: Vec<Entity>,
    next_id: u64,
    name_counter: u64,
}

impl Scene {
    /// Empty scene for the persistent level of `project`.
    pub fn new(project: &str) -> Self {
        Self {
            level: project.to_owned(),
            entities: Vec::new(),
            next_id: 1,
            name_counter: 0,
        }
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Mutable entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Spawn an instance of `class`.
    pub fn spawn(&mut self, class: &str, options: SpawnOptions) -> Result<EntityId> {
        let class = find_class(class).ok_or_else(|| HostError::UnknownClass {
            name: class.to_owned(),
        })?;
        let parts = class.build();

        self.name_counter += 1;
        let name = format!("{}_{}", class.name, self.name_counter);
        let label = match options.label.filter(|l| !l.is_empty()) {
            Some(requested) => self.unique_label(&requested, None),
            None => name.clone(),
        };
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let mut properties = PropertySet::new(common_props());
        for prop in parts.properties {
            properties.push(prop);
        }
        let mut entity = Entity {
            id,
            path: format!("/Game/Maps/{0}.{0}:PersistentLevel.{name}", self.level),
            name,
            label,
            class: class.name,
            properties,
            root: parts.root,
            components: parts.components,
        };
        entity.set_transform(options.transform);
        debug!(id = %id, label = %entity.label, class = class.name, "entity spawned");
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove an entity, returning it.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let entity = self.entities.remove(index);
        debug!(id = %id, label = %entity.label, "entity destroyed");
        Some(entity)
    }

    /// Relabel an entity, suffixing on conflict. Returns the final label.
    pub fn set_label(&mut self, id: EntityId, requested: &str) -> Option<String> {
        let label = self.unique_label(requested, Some(id));
        let entity = self.get_mut(id)?;
        entity.label.clone_from(&label);
        Some(label)
    }

    /// `requested` if free, otherwise the first free `requested_N`.
    pub fn unique_label(&self, requested: &str, exclude: Option<EntityId>) -> String {
        let taken = |label: &str| {
            self.entities
                .iter()
                .any(|e| Some(e.id) != exclude && e.label == label)
        };
        if !taken(requested) {
            return requested.to_owned();
        }
        (1..)
            .map(|n| format!("{requested}_{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| requested.to_owned())
    }
}

impl EntityRegistry for Scene {
    fn entities(&self) -> Box<dyn Iterator<Item = &Entity> + '_> {
        Box::new(self.entities.iter())
    }
}

fn common_props() -> Vec<Property> {
    vec![
        Property::editable("bHidden", PropertyKind::Bool, PropertyValue::Bool(false)),
        Property::editable(TAGS, PropertyKind::NameArray, PropertyValue::Names(Vec::new())),
        Property::editable("bCanBeDamaged", PropertyKind::Bool, PropertyValue::Bool(true)),
        Property::editable("CustomTimeDilation", PropertyKind::Float, PropertyValue::Float(1.0)),
        Property::with_flags(
            "CreationTime",
            PropertyKind::Float,
            PropertyFlags::VISIBLE,
            PropertyValue::Float(0.0),
        ),
        Property::with_flags(
            "bActorIsBeingDestroyed",
            PropertyKind::Bool,
            PropertyFlags::TRANSIENT,
            PropertyValue::Bool(false),
        ),
        Property::with_flags(
            "ActorGuid",
            PropertyKind::Str,
            PropertyFlags {
                editor_only: true,
                ..PropertyFlags::EDITABLE
            },
            PropertyValue::Str(String::new()),
        ),
        Property::with_flags(
            "InitialLifeSpan",
            PropertyKind::Float,
            PropertyFlags {
                edit_const: true,
                ..PropertyFlags::EDITABLE
            },
            PropertyValue::Float(0.0),
        ),
        Property::with_flags(
            "bHiddenEdLayer",
            PropertyKind::Bool,
            PropertyFlags {
                deprecated: true,
                ..PropertyFlags::EDITABLE
            },
            PropertyValue::Bool(false),
        ),
    ]
}

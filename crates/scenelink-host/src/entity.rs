//! Live entities and their components.

use std::fmt;

use crate::math::Transform;
use crate::property::PropertySet;
use crate::value::PropertyValue;

/// Root component property holding the location.
pub const RELATIVE_LOCATION: &str = "RelativeLocation";
/// Root component property holding the rotation.
pub const RELATIVE_ROTATION: &str = "RelativeRotation";
/// Root component property holding the scale.
pub const RELATIVE_SCALE: &str = "RelativeScale3D";
/// Entity property holding the tag list.
pub const TAGS: &str = "Tags";

/// Process-unique entity id. Never reused within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sub-object attached to an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Component name, unique within its entity.
    pub name: String,
    /// Component class.
    pub class: &'static str,
    /// Reflected properties.
    pub properties: PropertySet,
}

impl Component {
    /// Build a component.
    pub fn new(name: impl Into<String>, class: &'static str, properties: PropertySet) -> Self {
        Self {
            name: name.into(),
            class,
            properties,
        }
    }
}

/// Which property layer of an entity a lookup landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// The entity's own properties.
    Entity,
    /// The root component.
    Root,
    /// The n-th non-root component.
    Component(usize),
}

/// A live scene entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Stable id.
    pub id: EntityId,
    /// Internal object name, unique within the scene.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Class name.
    pub class: &'static str,
    /// Structural address, unique within the scene.
    pub path: String,
    /// Own properties.
    pub properties: PropertySet,
    /// Root (spatial) component.
    pub root: Option<Component>,
    /// Other attached components.
    pub components: Vec<Component>,
}

impl Entity {
    /// Property layers in lookup order: entity, root, then other components.
    pub fn layers(&self) -> impl Iterator<Item = (Layer, &PropertySet)> {
        std::iter::once((Layer::Entity, &self.properties))
            .chain(self.root.iter().map(|c| (Layer::Root, &c.properties)))
            .chain(
                self.components
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (Layer::Component(i), &c.properties)),
            )
    }

    /// Mutable access to one layer.
    pub fn layer_mut(&mut self, layer: Layer) -> Option<&mut PropertySet> {
        match layer {
            Layer::Entity => Some(&mut self.properties),
            Layer::Root => self.root.as_mut().map(|c| &mut c.properties),
            Layer::Component(i) => self.components.get_mut(i).map(|c| &mut c.properties),
        }
    }

    /// Current transform; identity when the entity has no root.
    pub fn transform(&self) -> Transform {
        let Some(root) = &self.root else {
            return Transform::default();
        };
        let mut transform = Transform::default();
        if let Some(PropertyValue::Vector(v)) = root.properties.value(RELATIVE_LOCATION) {
            transform.location = *v;
        }
        if let Some(PropertyValue::Rotator(r)) = root.properties.value(RELATIVE_ROTATION) {
            transform.rotation = *r;
        }
        if let Some(PropertyValue::Vector(v)) = root.properties.value(RELATIVE_SCALE) {
            transform.scale = *v;
        }
        transform
    }

    /// Overwrite the transform. No-op without a root component.
    pub fn set_transform(&mut self, transform: Transform) {
        let Some(root) = &mut self.root else {
            return;
        };
        let props = &mut root.properties;
        let writes = [
            (RELATIVE_LOCATION, PropertyValue::Vector(transform.location)),
            (RELATIVE_ROTATION, PropertyValue::Rotator(transform.rotation)),
            (RELATIVE_SCALE, PropertyValue::Vector(transform.scale)),
        ];
        for (name, value) in writes {
            if let Err(error) = props.set(name, value) {
                tracing::warn!(entity = %self.label, %error, "transform write skipped");
            }
        }
    }

    /// Current tags.
    pub fn tags(&self) -> Vec<String> {
        match self.properties.value(TAGS) {
            Some(PropertyValue::Names(tags)) => tags.clone(),
            _ => Vec::new(),
        }
    }

    /// Replace the tag list.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        if let Err(error) = self.properties.set(TAGS, PropertyValue::Names(tags)) {
            tracing::warn!(entity = %self.label, %error, "tag write skipped");
        }
    }
}

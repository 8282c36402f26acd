//! Reflected properties and their eligibility flags.

use crate::errors::{HostError, Result};
use crate::value::{PropertyKind, PropertyValue};

/// Metadata flags that decide whether the bridge may see a property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PropertyFlags {
    /// Not saved; runtime scratch state.
    pub transient: bool,
    /// Kept for data migration only.
    pub deprecated: bool,
    /// Only present in editor builds and hidden from tools.
    pub editor_only: bool,
    /// Visible but locked against per-instance edits.
    pub edit_const: bool,
    /// Exposed for external edit.
    pub exposed: bool,
}

impl PropertyFlags {
    /// Readable and writable.
    pub const EDITABLE: Self = Self {
        transient: false,
        deprecated: false,
        editor_only: false,
        edit_const: false,
        exposed: true,
    };

    /// Readable, never writable.
    pub const VISIBLE: Self = Self {
        transient: false,
        deprecated: false,
        editor_only: false,
        edit_const: false,
        exposed: false,
    };

    /// Runtime-only state, invisible to the bridge.
    pub const TRANSIENT: Self = Self {
        transient: true,
        deprecated: false,
        editor_only: false,
        edit_const: false,
        exposed: true,
    };

    /// Whether the bridge may read the property.
    pub fn is_readable(self) -> bool {
        !(self.transient || self.deprecated || self.editor_only || self.edit_const)
    }

    /// Whether the bridge may write the property.
    pub fn is_writable(self) -> bool {
        self.is_readable() && self.exposed
    }
}

/// A named, typed slot on an entity or component.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Property name. Lookups ignore ASCII case.
    pub name: &'static str,
    /// Declared kind.
    pub kind: PropertyKind,
    /// Eligibility flags.
    pub flags: PropertyFlags,
    /// Current value.
    pub value: PropertyValue,
}

impl Property {
    /// An editable property.
    pub fn editable(name: &'static str, kind: PropertyKind, value: PropertyValue) -> Self {
        Self::with_flags(name, kind, PropertyFlags::EDITABLE, value)
    }

    /// A property with explicit flags.
    pub fn with_flags(
        name: &'static str,
        kind: PropertyKind,
        flags: PropertyFlags,
        value: PropertyValue,
    ) -> Self {
        Self {
            name,
            kind,
            flags,
            value,
        }
    }

    /// Store `value` after checking it fits the declared kind.
    pub fn assign(&mut self, value: PropertyValue) -> Result<()> {
        if !self.kind.accepts(&value) {
            return Err(HostError::KindMismatch {
                property: self.name.to_owned(),
                expected: self.kind.type_name(),
            });
        }
        self.value = value;
        Ok(())
    }
}

/// Ordered property storage of one object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySet {
    props: Vec<Property>,
}

impl PropertySet {
    /// Build from a list.
    pub fn new(props: Vec<Property>) -> Self {
        Self { props }
    }

    /// Find by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Mutable find by name, ignoring ASCII case.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.props
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Current value of `name`.
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.find(name).map(|p| &p.value)
    }

    /// Overwrite `name` with `value`.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        self.find_mut(name)
            .ok_or_else(|| HostError::MissingProperty {
                name: name.to_owned(),
            })?
            .assign(value)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.props.iter()
    }

    /// Append a property.
    pub fn push(&mut self, prop: Property) {
        self.props.push(prop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample() -> PropertySet {
        PropertySet::new(vec![
            Property::editable("Intensity", PropertyKind::Float, PropertyValue::Float(5000.0)),
            Property::with_flags(
                "CreationTime",
                PropertyKind::Float,
                PropertyFlags::VISIBLE,
                PropertyValue::Float(0.0),
            ),
        ])
    }

    #[test]
    fn flags_gate_read_and_write() {
        assert!(PropertyFlags::EDITABLE.is_writable());
        assert!(PropertyFlags::VISIBLE.is_readable());
        assert!(!PropertyFlags::VISIBLE.is_writable());
        assert!(!PropertyFlags::TRANSIENT.is_readable());
        let locked = PropertyFlags {
            edit_const: true,
            ..PropertyFlags::EDITABLE
        };
        assert!(!locked.is_readable());
    }

    #[test]
    fn find_ignores_case() {
        let set = sample();
        assert_eq!(set.find("intensity").map(|p| p.name), Some("Intensity"));
        assert!(set.find("Intensit").is_none());
    }

    #[test]
    fn set_checks_kind() {
        let mut set = sample();
        set.set("Intensity", PropertyValue::Float(10.0)).unwrap();
        assert_eq!(set.value("Intensity"), Some(&PropertyValue::Float(10.0)));
        assert_matches!(
            set.set("Intensity", PropertyValue::Bool(true)),
            Err(HostError::KindMismatch { .. })
        );
        assert_matches!(
            set.set("Nope", PropertyValue::Int(1)),
            Err(HostError::MissingProperty { .. })
        );
    }
}

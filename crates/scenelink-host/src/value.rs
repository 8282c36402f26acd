//! Value kinds and stored values of reflected properties.

use serde_json::{Value, json};

use crate::enums::EnumDef;
use crate::math::{Color, LinearColor, Rotator, Vector};

/// Aggregate struct kinds the host knows how to store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructKind {
    /// `{x, y, z}`.
    Vector,
    /// `{pitch, yaw, roll}`.
    Rotator,
    /// Floating point `{r, g, b, a}`.
    LinearColor,
    /// 8-bit `{r, g, b, a}`.
    Color,
}

impl StructKind {
    /// Struct type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vector => "Vector",
            Self::Rotator => "Rotator",
            Self::LinearColor => "LinearColor",
            Self::Color => "Color",
        }
    }
}

/// Declared kind of a property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyKind {
    /// Signed integer storage.
    Int,
    /// Floating point storage.
    Float,
    /// Boolean.
    Bool,
    /// Free-form string.
    Str,
    /// Interned identifier.
    Name,
    /// Localizable display text.
    Text,
    /// Enumerated value.
    Enum(&'static EnumDef),
    /// Aggregate struct.
    Struct(StructKind),
    /// Hard reference to an asset of `class` (or a subclass).
    Object {
        /// Expected asset class.
        class: &'static str,
    },
    /// Soft (path-only) reference to an asset of `class`.
    SoftObject {
        /// Expected asset class.
        class: &'static str,
    },
    /// Array of names.
    NameArray,
}

impl PropertyKind {
    /// Human-readable kind, reported as `expected_type` on coercion failures.
    pub fn type_name(&self) -> String {
        match self {
            Self::Int => "int".into(),
            Self::Float => "float".into(),
            Self::Bool => "bool".into(),
            Self::Str => "string".into(),
            Self::Name => "name".into(),
            Self::Text => "text".into(),
            Self::Enum(def) => format!("enum {}", def.name),
            Self::Struct(kind) => format!("struct {}", kind.name()),
            Self::Object { class } => format!("object {class}"),
            Self::SoftObject { class } => format!("soft_object {class}"),
            Self::NameArray => "array<name>".into(),
        }
    }

    /// Whether `value` is storable under this kind.
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (Self::Int, PropertyValue::Int(_))
                | (Self::Float, PropertyValue::Float(_))
                | (Self::Bool, PropertyValue::Bool(_))
                | (Self::Str, PropertyValue::Str(_))
                | (Self::Name, PropertyValue::Name(_))
                | (Self::Text, PropertyValue::Text(_))
                | (Self::Enum(_), PropertyValue::Enum(_))
                | (Self::Struct(StructKind::Vector), PropertyValue::Vector(_))
                | (Self::Struct(StructKind::Rotator), PropertyValue::Rotator(_))
                | (Self::Struct(StructKind::LinearColor), PropertyValue::LinearColor(_))
                | (Self::Struct(StructKind::Color), PropertyValue::Color(_))
                | (Self::Object { .. }, PropertyValue::Object(_))
                | (Self::SoftObject { .. }, PropertyValue::SoftObject(_))
                | (Self::NameArray, PropertyValue::Names(_))
        )
    }
}

/// A stored property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// String.
    Str(String),
    /// Name.
    Name(String),
    /// Text.
    Text(String),
    /// Raw enum value.
    Enum(i64),
    /// Vector.
    Vector(Vector),
    /// Rotator.
    Rotator(Rotator),
    /// Linear color.
    LinearColor(LinearColor),
    /// 8-bit color.
    Color(Color),
    /// Object path of the referenced asset, `None` when cleared.
    Object(Option<String>),
    /// Soft object path, `None` when cleared.
    SoftObject(Option<String>),
    /// Names.
    Names(Vec<String>),
}

impl PropertyValue {
    /// Wire encoding of the value. Enums need their definition to render a name.
    pub fn to_json(&self, kind: &PropertyKind) -> Value {
        match self {
            Self::Enum(v) => match kind {
                PropertyKind::Enum(def) => def
                    .name_of(*v)
                    .map_or_else(|| json!(v), |name| json!(name)),
                _ => json!(v),
            },
            Self::Int(v) => json!(v),
            Self::Float(v) => json!(v),
            Self::Bool(v) => json!(v),
            Self::Str(v) | Self::Name(v) | Self::Text(v) => json!(v),
            Self::Vector(v) => json!({"x": v.x, "y": v.y, "z": v.z}),
            Self::Rotator(r) => json!({"pitch": r.pitch, "yaw": r.yaw, "roll": r.roll}),
            Self::LinearColor(c) => json!({"r": c.r, "g": c.g, "b": c.b, "a": c.a}),
            Self::Color(c) => json!({"r": c.r, "g": c.g, "b": c.b, "a": c.a}),
            Self::Object(path) | Self::SoftObject(path) => {
                path.as_ref().map_or(Value::Null, |p| json!(p))
            }
            Self::Names(names) => json!(names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::COMPONENT_MOBILITY;

    #[test]
    fn type_names() {
        assert_eq!(PropertyKind::Bool.type_name(), "bool");
        assert_eq!(
            PropertyKind::Enum(&COMPONENT_MOBILITY).type_name(),
            "enum EComponentMobility"
        );
        assert_eq!(
            PropertyKind::Struct(StructKind::Color).type_name(),
            "struct Color"
        );
        assert_eq!(
            PropertyKind::Object { class: "StaticMesh" }.type_name(),
            "object StaticMesh"
        );
    }

    #[test]
    fn enum_renders_variant_name() {
        let kind = PropertyKind::Enum(&COMPONENT_MOBILITY);
        assert_eq!(PropertyValue::Enum(2).to_json(&kind), json!("Movable"));
        assert_eq!(PropertyValue::Enum(9).to_json(&kind), json!(9));
    }

    #[test]
    fn struct_and_ref_encoding() {
        let color = PropertyValue::Color(Color::new(255, 0, 0, 255));
        assert_eq!(
            color.to_json(&PropertyKind::Struct(StructKind::Color)),
            json!({"r": 255, "g": 0, "b": 0, "a": 255})
        );
        let cleared = PropertyValue::Object(None);
        assert_eq!(
            cleared.to_json(&PropertyKind::Object { class: "StaticMesh" }),
            Value::Null
        );
    }

    #[test]
    fn accepts_matches_variants() {
        assert!(PropertyKind::Float.accepts(&PropertyValue::Float(1.0)));
        assert!(!PropertyKind::Float.accepts(&PropertyValue::Int(1)));
        assert!(PropertyKind::NameArray.accepts(&PropertyValue::Names(vec![])));
    }
}

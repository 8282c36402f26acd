//! Reflected enumerations.

/// A reflected enum: a name plus `(variant, value)` pairs.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDef {
    /// Enum type name, e.g. `EComponentMobility`.
    pub name: &'static str,
    /// Variants in declaration order.
    pub variants: &'static [(&'static str, i64)],
}

impl EnumDef {
    /// Value for an exact short (`Movable`) or qualified (`EComponentMobility::Movable`) name.
    pub fn value_by_name(&self, name: &str) -> Option<i64> {
        let short = name
            .strip_prefix(self.name)
            .and_then(|rest| rest.strip_prefix("::"))
            .unwrap_or(name);
        self.variants
            .iter()
            .find(|(variant, _)| *variant == short)
            .map(|(_, value)| *value)
    }

    /// Short variant name for a value.
    pub fn name_of(&self, value: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(variant, _)| *variant)
    }

    /// Whether `value` is one of the declared values.
    pub fn is_valid(&self, value: i64) -> bool {
        self.name_of(value).is_some()
    }

    /// Qualified variant names (`Enum::Variant`) with their values.
    pub fn qualified(&self) -> impl Iterator<Item = (String, i64)> + '_ {
        self.variants
            .iter()
            .map(move |(variant, value)| (format!("{}::{variant}", self.name), *value))
    }
}

/// Component mobility.
pub static COMPONENT_MOBILITY: EnumDef = EnumDef {
    name: "EComponentMobility",
    variants: &[("Static", 0), ("Stationary", 1), ("Movable", 2)],
};

/// Camera projection.
pub static CAMERA_PROJECTION_MODE: EnumDef = EnumDef {
    name: "ECameraProjectionMode",
    variants: &[("Perspective", 0), ("Orthographic", 1)],
};

/// Light intensity units.
pub static LIGHT_UNITS: EnumDef = EnumDef {
    name: "ELightUnits",
    variants: &[("Unitless", 0), ("Candelas", 1), ("Lumens", 2), ("EV", 3)],
};

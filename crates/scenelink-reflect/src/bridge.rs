//! Type-directed property get/set on live entities.
//!
//! Lookup walks the entity's own properties, then its root component, then
//! every other component; the first eligible property wins. Ineligible
//! properties are skipped as if absent.

use serde_json::Value;
use tracing::debug;

use scenelink_core::BridgeError;
use scenelink_host::entity::{Entity, Layer};
use scenelink_host::value::{PropertyKind, PropertyValue};
use scenelink_host::{AssetRegistry, Property};

use crate::coerce::coerce;
use crate::suggest::suggest;

/// Default number of suggestions on a failed lookup.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Access mode a lookup must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Property must be readable.
    Read,
    /// Property must be readable and exposed for edit.
    Write,
}

impl Access {
    fn allows(self, prop: &Property) -> bool {
        match self {
            Self::Read => prop.flags.is_readable(),
            Self::Write => prop.flags.is_writable(),
        }
    }
}

/// First eligible property named `name`, with the layer it lives on.
pub fn find_property<'e>(entity: &'e Entity, name: &str, access: Access) -> Option<(Layer, &'e Property)> {
    entity.layers().find_map(|(layer, props)| {
        props
            .find(name)
            .filter(|p| access.allows(p))
            .map(|p| (layer, p))
    })
}

/// Every eligible property name on the entity, deduplicated, in lookup order.
pub fn eligible_names(entity: &Entity, access: Access) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for (_, props) in entity.layers() {
        for prop in props.iter().filter(|p| access.allows(p)) {
            if !names.contains(&prop.name) {
                names.push(prop.name);
            }
        }
    }
    names
}

/// Property get/set with coercion and suggestions.
#[derive(Clone, Copy, Debug)]
pub struct PropertyBridge<'a> {
    assets: &'a AssetRegistry,
    suggestion_limit: usize,
}

impl<'a> PropertyBridge<'a> {
    /// Bridge resolving object references through `assets`.
    pub fn new(assets: &'a AssetRegistry) -> Self {
        Self {
            assets,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    /// Override how many suggestions a failed lookup returns.
    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    fn not_found(&self, entity: &Entity, name: &str, access: Access) -> BridgeError {
        let suggestions = suggest(name, eligible_names(entity, access), self.suggestion_limit)
            .into_iter()
            .map(|s| s.name)
            .collect();
        BridgeError::PropertyNotFound {
            property: name.to_owned(),
            suggestions,
        }
    }

    /// Read a property as wire JSON.
    pub fn get(&self, entity: &Entity, name: &str) -> Result<Value, BridgeError> {
        find_property(entity, name, Access::Read)
            .map(|(_, prop)| prop.value.to_json(&prop.kind))
            .ok_or_else(|| self.not_found(entity, name, Access::Read))
    }

    /// Read a property if present.
    pub fn try_get(entity: &Entity, name: &str) -> Option<Value> {
        find_property(entity, name, Access::Read).map(|(_, prop)| prop.value.to_json(&prop.kind))
    }

    /// Coerce `wire` and store it, returning the re-read stored value.
    pub fn set(&self, entity: &mut Entity, name: &str, wire: &Value) -> Result<Value, BridgeError> {
        let (layer, prop) = find_property(entity, name, Access::Write)
            .ok_or_else(|| self.not_found(entity, name, Access::Write))?;
        let prop_name = prop.name;
        let value = coerce(&prop.kind, wire, &prop.value, self.assets).map_err(|message| {
            BridgeError::TypeMismatch {
                property: name.to_owned(),
                message,
                expected_type: prop.kind.type_name(),
                current_value: Some(prop.value.to_json(&prop.kind).to_string()),
            }
        })?;

        let props = entity.layer_mut(layer).ok_or_else(|| BridgeError::WriteFailure {
            property: name.to_owned(),
            message: "property owner no longer exists".into(),
        })?;
        props
            .set(prop_name, value)
            .map_err(|e| BridgeError::WriteFailure {
                property: name.to_owned(),
                message: e.to_string(),
            })?;
        // Echo from the layer just written; an earlier layer may shadow the name for reads.
        let stored = props
            .find(prop_name)
            .map(|p| p.value.to_json(&p.kind))
            .ok_or_else(|| BridgeError::WriteFailure {
                property: name.to_owned(),
                message: "property vanished after write".into(),
            })?;
        debug!(entity = %entity.label, property = prop_name, ?layer, "property written");
        Ok(stored)
    }
}

/// Text form of a stored value, as property-match rules compare it.
///
/// Hard references compare by the referenced asset's short name and soft
/// references by the part after the last `.`; everything else uses the
/// exported text.
pub fn match_text(prop: &Property) -> String {
    match &prop.value {
        PropertyValue::Object(path) => path
            .as_deref()
            .map(|p| p.rsplit('.').next().unwrap_or(p).to_owned())
            .unwrap_or_default(),
        PropertyValue::SoftObject(path) => path.as_deref().map(soft_short_name).unwrap_or_default(),
        other => export_text(other, &prop.kind),
    }
}

fn soft_short_name(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, name)) => name.to_owned(),
        None => path.rsplit('/').next().unwrap_or(path).to_owned(),
    }
}

/// Host-style text export of a value.
pub fn export_text(value: &PropertyValue, kind: &PropertyKind) -> String {
    match value {
        PropertyValue::Int(v) => v.to_string(),
        PropertyValue::Float(v) => format!("{v:.6}"),
        PropertyValue::Bool(v) => String::from(if *v { "True" } else { "False" }),
        PropertyValue::Str(s) | PropertyValue::Name(s) | PropertyValue::Text(s) => s.clone(),
        PropertyValue::Enum(v) => match kind {
            PropertyKind::Enum(def) => def.name_of(*v).map_or_else(|| v.to_string(), ToOwned::to_owned),
            _ => v.to_string(),
        },
        PropertyValue::Vector(v) => format!("(X={:.6},Y={:.6},Z={:.6})", v.x, v.y, v.z),
        PropertyValue::Rotator(r) => {
            format!("(Pitch={:.6},Yaw={:.6},Roll={:.6})", r.pitch, r.yaw, r.roll)
        }
        PropertyValue::LinearColor(c) => {
            format!("(R={:.6},G={:.6},B={:.6},A={:.6})", c.r, c.g, c.b, c.a)
        }
        PropertyValue::Color(c) => format!("(B={},G={},R={},A={})", c.b, c.g, c.r, c.a),
        PropertyValue::Object(p) | PropertyValue::SoftObject(p) => {
            p.clone().unwrap_or_else(|| "None".to_owned())
        }
        PropertyValue::Names(names) => {
            let quoted: Vec<String> = names.iter().map(|n| format!("\"{n}\"")).collect();
            format!("({})", quoted.join(","))
        }
    }
}

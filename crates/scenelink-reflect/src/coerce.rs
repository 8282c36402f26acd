//! Wire value to host value coercion, one function per value kind.
//!
//! Each function returns the coerced value or a short diagnostic that the
//! bridge wraps into a type mismatch error.

use serde_json::{Map, Value};
use tracing::info;

use scenelink_host::classes::is_a;
use scenelink_host::value::{PropertyKind, PropertyValue, StructKind};
use scenelink_host::{AssetRegistry, Color, EnumDef, LinearColor, Rotator, Vector};

/// Coercion diagnostic.
pub type Diagnostic = String;

/// Convert `wire` into a value storable under `kind`.
///
/// `current` fills struct fields the wire object leaves out.
pub fn coerce(
    kind: &PropertyKind,
    wire: &Value,
    current: &PropertyValue,
    assets: &AssetRegistry,
) -> Result<PropertyValue, Diagnostic> {
    match kind {
        PropertyKind::Int | PropertyKind::Float => coerce_numeric(kind, wire),
        PropertyKind::Bool => coerce_bool(wire).map(PropertyValue::Bool),
        PropertyKind::Str => coerce_string(wire).map(PropertyValue::Str),
        PropertyKind::Name => coerce_string(wire).map(PropertyValue::Name),
        PropertyKind::Text => coerce_string(wire).map(PropertyValue::Text),
        PropertyKind::Enum(def) => coerce_enum(def, wire).map(PropertyValue::Enum),
        PropertyKind::Struct(kind) => coerce_struct(*kind, wire, current),
        PropertyKind::Object { class } => coerce_object(class, wire, assets).map(PropertyValue::Object),
        PropertyKind::SoftObject { .. } => coerce_soft_object(wire).map(PropertyValue::SoftObject),
        PropertyKind::NameArray => coerce_names(wire).map(PropertyValue::Names),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_numeric(kind: &PropertyKind, wire: &Value) -> Result<PropertyValue, Diagnostic> {
    let Value::Number(n) = wire else {
        return Err("expects a number".into());
    };
    if matches!(kind, PropertyKind::Int) {
        let int = n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| "expects a number".to_owned())?;
        return Ok(PropertyValue::Int(int));
    }
    n.as_f64()
        .map(PropertyValue::Float)
        .ok_or_else(|| "expects a number".into())
}

fn coerce_bool(wire: &Value) -> Result<bool, Diagnostic> {
    match wire {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => {
            let b = ["true", "1", "yes"]
                .iter()
                .any(|t| s.eq_ignore_ascii_case(t));
            info!(from = %s, to = b, "coerced string to bool");
            Ok(b)
        }
        Value::Number(n) => {
            let b = n.as_f64().is_some_and(|f| f > 0.0);
            info!(from = %n, to = b, "coerced number to bool");
            Ok(b)
        }
        _ => Err("expects a boolean (or string/number that can be converted)".into()),
    }
}

fn coerce_string(wire: &Value) -> Result<String, Diagnostic> {
    wire.as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| "expects a string".into())
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_enum(def: &EnumDef, wire: &Value) -> Result<i64, Diagnostic> {
    match wire {
        Value::String(name) => {
            if let Some(value) = def.value_by_name(name) {
                return Ok(value);
            }
            let needle = name.to_lowercase();
            let fuzzy = def
                .qualified()
                .find(|(full, _)| full.to_lowercase().contains(&needle));
            match fuzzy {
                Some((full, value)) if !needle.is_empty() => {
                    info!(from = %name, to = %full, "fuzzy matched enum value");
                    Ok(value)
                }
                _ => Err(format!("Invalid enum value '{name}' for {}", def.name)),
            }
        }
        Value::Number(n) => {
            let value = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(-1);
            if def.is_valid(value) {
                Ok(value)
            } else {
                Err(format!("Invalid enum value '{n}' for {}", def.name))
            }
        }
        _ => Err("expects a string (enum name) or number (enum index)".into()),
    }
}

/// Number under `key`, matching the key case-insensitively.
fn field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_f64())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_struct(
    kind: StructKind,
    wire: &Value,
    current: &PropertyValue,
) -> Result<PropertyValue, Diagnostic> {
    match kind {
        StructKind::Vector => {
            let obj = wire
                .as_object()
                .ok_or_else(|| "expects object with matching fields".to_owned())?;
            let base = match current {
                PropertyValue::Vector(v) => *v,
                _ => Vector::ZERO,
            };
            Ok(PropertyValue::Vector(Vector::new(
                field(obj, "x").unwrap_or(base.x),
                field(obj, "y").unwrap_or(base.y),
                field(obj, "z").unwrap_or(base.z),
            )))
        }
        StructKind::Rotator => {
            let obj = wire
                .as_object()
                .ok_or_else(|| "expects object with matching fields".to_owned())?;
            let base = match current {
                PropertyValue::Rotator(r) => *r,
                _ => Rotator::ZERO,
            };
            Ok(PropertyValue::Rotator(Rotator::new(
                field(obj, "pitch").unwrap_or(base.pitch),
                field(obj, "yaw").unwrap_or(base.yaw),
                field(obj, "roll").unwrap_or(base.roll),
            )))
        }
        StructKind::LinearColor => {
            let obj = wire
                .as_object()
                .ok_or_else(|| "expects object with r/g/b(/a)".to_owned())?;
            Ok(PropertyValue::LinearColor(LinearColor {
                r: field(obj, "r").unwrap_or(0.0),
                g: field(obj, "g").unwrap_or(0.0),
                b: field(obj, "b").unwrap_or(0.0),
                a: field(obj, "a").unwrap_or(1.0),
            }))
        }
        StructKind::Color => {
            let obj = wire
                .as_object()
                .ok_or_else(|| "expects object with r/g/b(/a)".to_owned())?;
            let (mut r, mut g, mut b) = (
                field(obj, "r").unwrap_or(0.0),
                field(obj, "g").unwrap_or(0.0),
                field(obj, "b").unwrap_or(0.0),
            );
            let alpha = field(obj, "a");
            let normalized = r <= 1.0 && g <= 1.0 && b <= 1.0 && alpha.is_none_or(|a| a <= 1.0);
            let not_black = r > 0.0 || g > 0.0 || b > 0.0;
            let a = if normalized && not_black {
                info!(r, g, b, "detected 0-1 color range, scaling by 255");
                r *= 255.0;
                g *= 255.0;
                b *= 255.0;
                alpha.map_or(255.0, |a| a * 255.0)
            } else {
                alpha.unwrap_or(255.0)
            };
            let to_u8 = |c: f64| c.clamp(0.0, 255.0) as u8;
            Ok(PropertyValue::Color(Color::new(to_u8(r), to_u8(g), to_u8(b), to_u8(a))))
        }
    }
}

/// Last path segment without extension, as a file base name.
fn base_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.split('.').next().unwrap_or(file)
}

fn coerce_object(
    class: &str,
    wire: &Value,
    assets: &AssetRegistry,
) -> Result<Option<String>, Diagnostic> {
    let path = match wire {
        Value::Null => return Ok(None),
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("path")
            .or_else(|| obj.get("asset_path"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        _ => {
            return Err(
                "expects a string (asset path) or object with 'path' field, or null".into(),
            );
        }
    };
    if path.is_empty() {
        return Err("empty asset path provided".into());
    }

    let mut candidates = vec![path.clone()];
    if !path.contains('.') {
        candidates.push(format!("{path}.{}", base_name(&path)));
    }
    if !path.starts_with('/') {
        candidates.push(format!("/Game/{path}"));
        candidates.push(format!("/Engine/{path}"));
    }

    let direct = candidates.iter().find_map(|candidate| assets.load(candidate));
    let asset = match direct {
        Some(asset) => asset,
        None => {
            let search_name = base_name(&path);
            let needle = path.to_lowercase();
            let found = assets.assets_of_class(class, true).find(|a| {
                a.name.eq_ignore_ascii_case(search_name) || a.path.to_lowercase().contains(&needle)
            });
            match found {
                Some(asset) => {
                    info!(from = %path, to = %asset.path, "found asset via registry search");
                    asset
                }
                None => {
                    return Err(format!(
                        "Failed to load asset: {path} (expected type: {class})"
                    ));
                }
            }
        }
    };

    if !is_a(asset.class, class) {
        return Err(format!(
            "Asset type mismatch: loaded '{}' but expected '{class}'",
            asset.class
        ));
    }
    Ok(Some(asset.path.clone()))
}

fn coerce_soft_object(wire: &Value) -> Result<Option<String>, Diagnostic> {
    match wire {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err("expects a string (asset path) or null".into()),
    }
}

fn coerce_names(wire: &Value) -> Result<Vec<String>, Diagnostic> {
    wire.as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(ToOwned::to_owned))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| "expects an array of strings".into())
}

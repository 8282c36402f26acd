//! Transform fields in request payloads.
//!
//! Vectors are `{x,y,z}` and rotations `{pitch,yaw,roll}`; any missing
//! component keeps the value it would otherwise have had. Nested objects
//! may also arrive JSON-encoded as a string.

use std::borrow::Cow;

use scenelink_host::{Rotator, Transform, Vector};
use serde_json::{Map, Value};

/// Object field that may also be sent as a JSON-encoded string.
pub(crate) fn flexible_object<'a>(parent: &'a Map<String, Value>, key: &str) -> Option<Cow<'a, Map<String, Value>>> {
    match parent.get(key)? {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::String(text) if !text.is_empty() => match serde_json::from_str(text) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            _ => None,
        },
        _ => None,
    }
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

/// Read `{x,y,z}` over `base`.
pub(crate) fn read_vector(map: &Map<String, Value>, base: Vector) -> Vector {
    Vector::new(
        number(map, "x").unwrap_or(base.x),
        number(map, "y").unwrap_or(base.y),
        number(map, "z").unwrap_or(base.z),
    )
}

/// Read `{pitch,yaw,roll}` over `base`.
pub(crate) fn read_rotator(map: &Map<String, Value>, base: Rotator) -> Rotator {
    Rotator::new(
        number(map, "pitch").unwrap_or(base.pitch),
        number(map, "yaw").unwrap_or(base.yaw),
        number(map, "roll").unwrap_or(base.roll),
    )
}

fn apply_fields(map: &Map<String, Value>, transform: &mut Transform) {
    if let Some(loc) = flexible_object(map, "location") {
        transform.location = read_vector(&loc, transform.location);
    }
    if let Some(rot) = flexible_object(map, "rotation") {
        transform.rotation = read_rotator(&rot, transform.rotation);
    }
    if let Some(scale) = flexible_object(map, "scale") {
        transform.scale = read_vector(&scale, transform.scale);
    }
}

/// Flat `location`/`rotation`/`scale`, then a nested `transform` object on top.
pub(crate) fn read_transform(item: &Map<String, Value>, base: Transform) -> Transform {
    let mut transform = base;
    apply_fields(item, &mut transform);
    if let Some(nested) = flexible_object(item, "transform") {
        apply_fields(&nested, &mut transform);
    }
    transform
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn flat_fields() {
        let t = read_transform(
            &obj(json!({"location": {"x": 1, "y": 2, "z": 3}, "scale": {"x": 2}})),
            Transform::default(),
        );
        assert_eq!(t.location, Vector::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vector::new(2.0, 1.0, 1.0));
        assert_eq!(t.rotation, Rotator::ZERO);
    }

    #[test]
    fn nested_overrides_flat() {
        let t = read_transform(
            &obj(json!({
                "location": {"x": 1, "y": 1, "z": 1},
                "transform": {"location": {"x": 9}, "rotation": {"yaw": 90}}
            })),
            Transform::default(),
        );
        assert_eq!(t.location, Vector::new(9.0, 1.0, 1.0));
        assert_eq!(t.rotation, Rotator::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn string_encoded_objects() {
        let t = read_transform(
            &obj(json!({"transform": "{\"location\": \"{\\\"z\\\": 5}\"}"})),
            Transform::default(),
        );
        assert_eq!(t.location, Vector::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn unparsable_string_is_ignored() {
        let item = obj(json!({"location": "nope"}));
        assert!(flexible_object(&item, "location").is_none());
        assert_eq!(read_transform(&item, Transform::default()), Transform::default());
    }
}

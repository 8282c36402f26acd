//! `entity.set_transform`.

use scenelink_core::BridgeError;
use scenelink_host::{EntityRegistry, Rotator, Transform, Vector};
use scenelink_reflect::resolve_sorted;
use serde_json::{Map, Value, json};
use tracing::info;

use super::args::{flexible_object, read_rotator, read_transform, read_vector};
use super::{entity_summary, require_object, require_targets};
use crate::context::HandlerContext;
use crate::registry::{CommandHandler, HandlerResult, Reply};

/// A parsed `operation` object.
struct Operation {
    set: Option<Map<String, Value>>,
    add: Option<Map<String, Value>>,
    multiply: Option<Map<String, Value>>,
    local: bool,
}

impl Operation {
    fn parse(operation: &Map<String, Value>) -> Result<Self, BridgeError> {
        let set = flexible_object(operation, "set").map(std::borrow::Cow::into_owned);
        let add = flexible_object(operation, "add").map(std::borrow::Cow::into_owned);
        let multiply = flexible_object(operation, "multiply").map(std::borrow::Cow::into_owned);
        if set.is_none() && add.is_none() && multiply.is_none() {
            return Err(BridgeError::invalid_params(
                "Missing operation fields: set/add/multiply",
            ));
        }
        let local = operation
            .get("space")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("Local"));
        Ok(Self {
            set,
            add,
            multiply,
            local,
        })
    }

    /// Set, then add, then multiply.
    fn apply(&self, current: Transform) -> Transform {
        let mut t = current;
        if let Some(set) = &self.set {
            t = read_transform(set, t);
        }
        if let Some(add) = &self.add {
            if let Some(loc) = flexible_object(add, "location") {
                let delta = read_vector(&loc, Vector::ZERO);
                let delta = if self.local {
                    t.rotation.rotate_vector(delta)
                } else {
                    delta
                };
                t.location += delta;
            }
            if let Some(rot) = flexible_object(add, "rotation") {
                let delta = read_rotator(&rot, Rotator::ZERO);
                t.rotation = if self.local {
                    (t.rotation.quaternion() * delta.quaternion()).rotator()
                } else {
                    t.rotation + delta
                };
            }
            if let Some(scale) = flexible_object(add, "scale") {
                t.scale += read_vector(&scale, Vector::ZERO);
            }
        }
        if let Some(multiply) = &self.multiply {
            if let Some(loc) = flexible_object(multiply, "location") {
                t.location = t.location.scale_by(read_vector(&loc, Vector::ONE));
            }
            if let Some(rot) = flexible_object(multiply, "rotation") {
                let k = read_rotator(&rot, Rotator::new(1.0, 1.0, 1.0));
                t.rotation = Rotator::new(
                    t.rotation.pitch * k.pitch,
                    t.rotation.yaw * k.yaw,
                    t.rotation.roll * k.roll,
                );
            }
            if let Some(scale) = flexible_object(multiply, "scale") {
                t.scale = t.scale.scale_by(read_vector(&scale, Vector::ONE));
            }
        }
        t
    }
}

/// Applies a set/add/multiply operation to every resolved entity.
pub struct SetTransformHandler;

impl CommandHandler for SetTransformHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let selector = require_targets(payload)?;
        let operation = Operation::parse(require_object(payload, "operation")?)?;
        let ids = resolve_sorted(&selector, &ctx.host.scene)?;
        let limit = ctx.settings.transform_report_limit;

        let mut count = 0usize;
        let mut reported = Vec::new();
        for id in ids {
            let Some(entity) = ctx.host.scene.get_mut(id) else {
                continue;
            };
            let next = operation.apply(entity.transform());
            entity.set_transform(next);
            count += 1;
            if reported.len() < limit {
                let mut entry = entity_summary(entity);
                let _ = entry.insert("location".into(), json!(next.location));
                let _ = entry.insert("rotation".into(), json!(next.rotation));
                let _ = entry.insert("scale".into(), json!(next.scale));
                reported.push(Value::Object(entry));
            }
        }
        info!(count, local = operation.local, "transforms applied");

        let mut data = Map::new();
        let _ = data.insert("count".into(), json!(count));
        if !reported.is_empty() {
            if reported.len() < count {
                let _ = data.insert("reported".into(), json!(reported.len()));
                let _ = data.insert("report_limit".into(), json!(limit));
            }
            let _ = data.insert("entities".into(), Value::Array(reported));
        }
        Ok(Reply::ok(Value::Object(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::{demo_host, run, run_with};
    use scenelink_host::HostContext;
    use scenelink_settings::HandlerSettings;

    fn transform_of(host: &HostContext, label: &str) -> Transform {
        host.scene.find_by_label(label).unwrap().transform()
    }

    fn apply(host: &mut HostContext, label: &str, operation: Value) -> Value {
        let reply = run(
            &SetTransformHandler,
            host,
            json!({"targets": {"names": [label]}, "operation": operation}),
        )
        .unwrap();
        assert_eq!(reply.code, 200);
        reply.data
    }

    // ── world space ─────────────────────────────────────────────────

    #[test]
    fn set_keeps_unspecified_components() {
        let mut host = demo_host();
        let data = apply(&mut host, "Crate", json!({"set": {"location": {"x": 10}}}));
        assert_eq!(data["count"], 1);
        assert_eq!(data["entities"][0]["location"], json!({"x": 10.0, "y": 0.0, "z": 50.0}));
        assert_eq!(transform_of(&host, "Crate").location, Vector::new(10.0, 0.0, 50.0));
    }

    #[test]
    fn add_then_multiply() {
        let mut host = demo_host();
        let _ = apply(
            &mut host,
            "Crate",
            json!({
                "add": {"location": {"z": 10}, "rotation": {"yaw": 45}, "scale": {"x": 1}},
                "multiply": {"scale": {"x": 2, "y": 3}}
            }),
        );
        let t = transform_of(&host, "Crate");
        assert_eq!(t.location, Vector::new(0.0, 0.0, 60.0));
        assert_eq!(t.rotation, Rotator::new(0.0, 45.0, 0.0));
        assert_eq!(t.scale, Vector::new(4.0, 3.0, 1.0));
    }

    #[test]
    fn string_encoded_operation_fields() {
        let mut host = demo_host();
        let _ = apply(&mut host, "Crate", json!({"set": "{\"scale\": {\"z\": 2}}"}));
        assert_eq!(transform_of(&host, "Crate").scale, Vector::new(1.0, 1.0, 2.0));
    }

    // ── local space ─────────────────────────────────────────────────

    #[test]
    fn local_add_rotates_location_delta() {
        let mut host = demo_host();
        let _ = apply(
            &mut host,
            "Crate",
            json!({"space": "local", "set": {"rotation": {"yaw": 90}}, "add": {"location": {"x": 100}}}),
        );
        let t = transform_of(&host, "Crate");
        assert!(t.location.approx_eq(Vector::new(0.0, 100.0, 50.0), 1e-6), "{:?}", t.location);
    }

    #[test]
    fn local_add_composes_rotation() {
        let mut host = demo_host();
        let _ = apply(
            &mut host,
            "Crate",
            json!({"space": "Local", "set": {"rotation": {"yaw": 90}}, "add": {"rotation": {"yaw": 30}}}),
        );
        let t = transform_of(&host, "Crate");
        assert!(t.rotation.approx_eq(Rotator::new(0.0, 120.0, 0.0), 1e-6), "{:?}", t.rotation);
    }

    // ── reporting and errors ────────────────────────────────────────

    #[test]
    fn report_is_capped() {
        let mut host = demo_host();
        let settings = HandlerSettings {
            transform_report_limit: 2,
            ..HandlerSettings::default()
        };
        let reply = run_with(
            &SetTransformHandler,
            &mut host,
            json!({"targets": {"filter": {"name_pattern": "*"}}, "operation": {"add": {"location": {"z": 1}}}}),
            &settings,
        )
        .unwrap();
        assert_eq!(reply.data["count"], 7);
        assert_eq!(reply.data["reported"], 2);
        assert_eq!(reply.data["report_limit"], 2);
        assert_eq!(reply.data["entities"].as_array().unwrap().len(), 2);
        assert_eq!(reply.data["entities"][0]["name"], "Crate");
    }

    #[test]
    fn operation_requires_a_field() {
        let mut host = demo_host();
        let err = run(
            &SetTransformHandler,
            &mut host,
            json!({"targets": {"names": ["Crate"]}, "operation": {"space": "Local"}}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing operation fields: set/add/multiply");

        let err = run(&SetTransformHandler, &mut host, json!({"targets": {"names": ["Crate"]}})).unwrap_err();
        assert_eq!(err.to_string(), "Missing object: operation");
    }
}

//! Read-only entity queries: `entity.get_info`, `entity.get`, `entity.inspect`.

use scenelink_core::BridgeError;
use scenelink_host::{EntityRegistry, Vector};
use scenelink_reflect::{PropertyBridge, resolve_sorted};
use serde_json::{Map, Value, json};

use super::{bool_param, entity_summary, legacy_selector, require_targets};
use crate::context::HandlerContext;
use crate::registry::{CommandHandler, HandlerResult, Reply};

fn vector_json(v: Vector) -> Value {
    json!({ "x": v.x, "y": v.y, "z": v.z })
}

/// Summaries of the resolved set with optional transform and bounds.
pub struct GetInfoHandler;

impl CommandHandler for GetInfoHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let selector = require_targets(payload)?;
        let limit = payload
            .get("limit")
            .and_then(Value::as_i64)
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(ctx.settings.info_limit);
        let return_transform = bool_param(payload, "return_transform", true);
        let return_bounds = bool_param(payload, "return_bounds", false);

        let ids = resolve_sorted(&selector, &ctx.host.scene)?;
        let total_found = ids.len();
        let entities: Vec<Value> = ids
            .iter()
            .take(limit)
            .filter_map(|id| ctx.host.scene.get(*id))
            .map(|entity| {
                let mut info = entity_summary(entity);
                if return_transform {
                    let t = entity.transform();
                    let _ = info.insert(
                        "transform".into(),
                        json!({
                            "location": vector_json(t.location),
                            "rotation": {
                                "pitch": t.rotation.pitch,
                                "yaw": t.rotation.yaw,
                                "roll": t.rotation.roll,
                            },
                            "scale": vector_json(t.scale),
                        }),
                    );
                }
                if return_bounds {
                    let _ = info.insert("bounds".into(), vector_json(ctx.host.bounds(entity)));
                }
                Value::Object(info)
            })
            .collect();

        Ok(Reply::ok(json!({
            "count": entities.len(),
            "total_found": total_found,
            "entities": entities,
        })))
    }
}

/// Summary of the first entity by label, from `targets` or legacy `name` / `path`.
pub struct GetHandler;

impl CommandHandler for GetHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let selector = if payload.get("targets").is_some_and(Value::is_object) {
            require_targets(payload)?
        } else {
            legacy_selector(payload)
                .ok_or_else(|| BridgeError::invalid_params("Missing field: name or path"))?
        };
        let ids = resolve_sorted(&selector, &ctx.host.scene)?;
        let entity = ids
            .first()
            .and_then(|id| ctx.host.scene.get(*id))
            .ok_or(BridgeError::NoFilterMatch)?;
        Ok(Reply::ok(Value::Object(entity_summary(entity))))
    }
}

/// Named property values of every resolved entity.
pub struct InspectHandler;

impl CommandHandler for InspectHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let selector = require_targets(payload)?;
        let requested: Vec<String> = match payload.get("properties").and_then(Value::as_array) {
            Some(names) => names
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            None => ctx.settings.inspect_defaults.clone(),
        };

        let ids = resolve_sorted(&selector, &ctx.host.scene)?;
        let entities: Vec<Value> = ids
            .iter()
            .filter_map(|id| ctx.host.scene.get(*id))
            .map(|entity| {
                let props: Map<String, Value> = requested
                    .iter()
                    .filter_map(|name| {
                        PropertyBridge::try_get(entity, name).map(|v| (name.clone(), v))
                    })
                    .collect();
                let mut info = entity_summary(entity);
                let _ = info.insert("props".into(), Value::Object(props));
                Value::Object(info)
            })
            .collect();

        Ok(Reply::ok(json!({ "count": entities.len(), "entities": entities })))
    }
}

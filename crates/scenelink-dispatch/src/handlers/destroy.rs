//! `entity.destroy` and `entity.destroy_batch`.

use scenelink_core::codes;
use scenelink_host::EntityRegistry;
use scenelink_reflect::{Selector, resolve_sorted};
use serde_json::{Map, Value, json};
use tracing::info;

use super::{entity_summary, require_array, string_param};
use crate::context::HandlerContext;
use crate::registry::{CommandHandler, HandlerResult, Reply};

/// Destroy every entity `selector` resolves to, each independently.
fn destroy_selected(selector: &Selector, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let ids = resolve_sorted(selector, &ctx.host.scene)?;
    let target_count = ids.len();
    let deleted: Vec<Value> = ids
        .into_iter()
        .filter_map(|id| ctx.host.scene.destroy(id))
        .map(|entity| Value::Object(entity_summary(&entity)))
        .collect();
    let count = deleted.len();
    info!(count, target_count, "entities destroyed");
    let code = if count > 0 { codes::OK } else { codes::NOT_FOUND };
    Ok(Reply::with_code(
        code,
        json!({ "count": count, "target_count": target_count, "deleted": deleted }),
    ))
}

/// Destroys `targets`, or a single entity by legacy `name` / `path`.
pub struct DestroyHandler;

impl CommandHandler for DestroyHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        if let Some(targets) = payload.get("targets").filter(|v| v.is_object()) {
            return destroy_selected(&Selector::from_value(targets)?, ctx);
        }

        let name = string_param(payload, "name");
        let path = string_param(payload, "path");
        let scene = &ctx.host.scene;
        let found = path
            .and_then(|p| scene.find_by_path(p))
            .or_else(|| name.and_then(|n| scene.find_by_label(n)))
            .map(|e| e.id);
        let Some(entity) = found.and_then(|id| ctx.host.scene.destroy(id)) else {
            return Ok(Reply::with_code(
                codes::NOT_FOUND,
                json!({ "message": "Entity not found or failed to destroy" }),
            ));
        };
        info!(label = %entity.label, "entity destroyed");

        let mut data = Map::new();
        let _ = data.insert("ok".into(), json!(true));
        let _ = data.insert("name".into(), json!(name.unwrap_or(&entity.label)));
        if let Some(path) = path {
            let _ = data.insert("path".into(), json!(path));
        }
        let _ = data.insert("count".into(), json!(1));
        let _ = data.insert("deleted".into(), json!([entity_summary(&entity)]));
        Ok(Reply::ok(Value::Object(data)))
    }
}

/// Destroys every `{name?, path?}` item of a required `batch` array.
pub struct DestroyBatchHandler;

impl CommandHandler for DestroyBatchHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let batch = require_array(payload, "batch")?;
        let mut names = Vec::new();
        let mut paths = Vec::new();
        for item in batch.iter().filter_map(Value::as_object) {
            if let Some(name) = string_param(item, "name") {
                names.push(name.to_owned());
            }
            if let Some(path) = string_param(item, "path") {
                paths.push(path.to_owned());
            }
        }
        let selector = Selector {
            names: (!names.is_empty()).then_some(names),
            paths: (!paths.is_empty()).then_some(paths),
            filter: None,
        };
        destroy_selected(&selector, ctx)
    }
}

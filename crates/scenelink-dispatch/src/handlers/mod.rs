//! Built-in command handlers and registration.

pub mod args;
pub mod destroy;
pub mod project;
pub mod properties;
pub mod query;
pub mod spawn;
pub mod transform;

use scenelink_core::BridgeError;
use scenelink_host::Entity;
use scenelink_reflect::Selector;
use serde_json::{Map, Value, json};

use crate::registry::MethodRegistry;

/// Register all built-in handlers with the registry.
pub fn register_all(registry: &mut MethodRegistry) {
    // Entity lifecycle
    registry.register("entity.spawn", spawn::SpawnHandler);
    registry.register("entity.spawn_batch", spawn::SpawnBatchHandler);
    registry.register("entity.destroy", destroy::DestroyHandler);
    registry.register("entity.destroy_batch", destroy::DestroyBatchHandler);

    // Entity queries
    registry.register("entity.get_info", query::GetInfoHandler);
    registry.register("entity.get", query::GetHandler);
    registry.register("entity.inspect", query::InspectHandler);

    // Entity mutation
    registry.register("entity.set_property", properties::SetPropertyHandler);
    registry.register("entity.set_transform", transform::SetTransformHandler);

    // Project
    registry.register("project.get_info", project::GetProjectInfoHandler);
    registry.register("project.info", project::GetProjectInfoHandler);
    registry.register("editor.get_project_info", project::GetProjectInfoHandler);
}

/// Extract a required object parameter.
pub(crate) fn require_object<'a>(
    payload: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, BridgeError> {
    payload
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| BridgeError::invalid_params(format!("Missing object: {key}")))
}

/// Extract a required array parameter.
pub(crate) fn require_array<'a>(payload: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], BridgeError> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| BridgeError::invalid_params(format!("Missing {key} array")))
}

/// Parse the `targets` selector.
pub(crate) fn require_targets(payload: &Map<String, Value>) -> Result<Selector, BridgeError> {
    Selector::from_value(payload.get("targets").unwrap_or(&Value::Null))
}

/// Non-empty string parameter.
pub(crate) fn string_param<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Boolean parameter with a default when absent or not a boolean.
pub(crate) fn bool_param(payload: &Map<String, Value>, key: &str, default: bool) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Selector built from legacy `name` / `path` fields, if either is set.
pub(crate) fn legacy_selector(payload: &Map<String, Value>) -> Option<Selector> {
    let name = string_param(payload, "name");
    let path = string_param(payload, "path");
    if name.is_none() && path.is_none() {
        return None;
    }
    Some(Selector {
        names: name.map(|n| vec![n.to_owned()]),
        paths: path.map(|p| vec![p.to_owned()]),
        filter: None,
    })
}

/// `{name, path, class}` for an entity.
pub(crate) fn entity_summary(entity: &Entity) -> Map<String, Value> {
    let mut map = Map::new();
    let _ = map.insert("name".into(), json!(entity.label));
    let _ = map.insert("path".into(), json!(entity.path));
    let _ = map.insert("class".into(), json!(entity.class));
    map
}

//! `entity.set_property`.
//!
//! `Label`/`ActorLabel` and `Tags` are handled here since they need scene
//! level behavior (unique labels, tag set operations). Everything else goes
//! through the property bridge. Per-property failures are reported in the
//! entity's `errors` list and never fail the request.

use scenelink_core::BridgeError;
use scenelink_host::{EntityId, EntityRegistry, HostContext, Scene};
use scenelink_reflect::{PropertyBridge, resolve_sorted};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{entity_summary, require_object, require_targets};
use crate::context::{HandlerContext, property_bridge};
use crate::registry::{CommandHandler, HandlerResult, Reply};

const TAGS_SHAPE: &str = "Tags must be a string, array of strings, or object with 'add'/'remove' arrays";

fn is_label(name: &str) -> bool {
    name.eq_ignore_ascii_case("Label") || name.eq_ignore_ascii_case("ActorLabel")
}

/// Non-empty strings of an array, first occurrence wins.
fn tag_list(items: &[Value]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in items.iter().filter_map(Value::as_str).filter(|s| !s.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

/// New tag list for `wire` applied over `current`.
fn apply_tags(current: Vec<String>, wire: &Value) -> Option<Vec<String>> {
    match wire {
        Value::Array(items) => Some(tag_list(items)),
        Value::Object(ops) => {
            let mut tags = current;
            if let Some(add) = ops.get("add").and_then(Value::as_array) {
                for tag in tag_list(add) {
                    if !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
            }
            if let Some(remove) = ops.get("remove").and_then(Value::as_array) {
                let remove = tag_list(remove);
                tags.retain(|t| !remove.contains(t));
            }
            Some(tags)
        }
        Value::String(tag) if !tag.is_empty() => {
            let mut tags = current;
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
            Some(tags)
        }
        _ => None,
    }
}

fn error_entry(property: &str, err: &BridgeError) -> Value {
    let mut entry = Map::new();
    let _ = entry.insert("property".into(), json!(property));
    let _ = entry.insert("error".into(), json!(err.to_string()));
    entry.extend(err.details());
    Value::Object(entry)
}

/// Per-entity write outcome.
#[derive(Default)]
struct Outcome {
    updated: Map<String, Value>,
    errors: Vec<Value>,
}

impl Outcome {
    fn fail(&mut self, property: &str, message: &str) {
        self.errors.push(json!({ "property": property, "error": message }));
    }
}

fn write_label(scene: &mut Scene, id: EntityId, name: &str, value: &Value, out: &mut Outcome) {
    let Some(requested) = value.as_str().filter(|s| !s.is_empty()) else {
        out.fail(name, "ActorLabel must be a non-empty string");
        return;
    };
    let Some(actual) = scene.set_label(id, requested) else {
        return;
    };
    if actual != requested {
        out.errors.push(json!({
            "property": "ActorLabel",
            "warning": "Name conflict resolved with suffix",
            "requested": requested,
            "actual": actual,
        }));
    }
    let _ = out.updated.insert("ActorLabel".into(), json!(actual));
}

fn write_tags(scene: &mut Scene, id: EntityId, name: &str, value: &Value, out: &mut Outcome) {
    let Some(entity) = scene.get_mut(id) else {
        return;
    };
    match apply_tags(entity.tags(), value) {
        Some(tags) => {
            entity.set_tags(tags.clone());
            let _ = out.updated.insert("Tags".into(), json!(tags));
        }
        None => out.fail(name, TAGS_SHAPE),
    }
}

fn write_property(
    scene: &mut Scene,
    bridge: &PropertyBridge<'_>,
    id: EntityId,
    name: &str,
    value: &Value,
    out: &mut Outcome,
) {
    let Some(entity) = scene.get_mut(id) else {
        return;
    };
    match bridge.set(entity, name, value) {
        Ok(stored) => {
            let _ = out.updated.insert(name.to_owned(), stored);
        }
        Err(err) => {
            debug!(entity = %entity.label, property = name, error = %err, "property write rejected");
            out.errors.push(error_entry(name, &err));
        }
    }
}

/// Writes every entry of `properties` on every resolved entity.
pub struct SetPropertyHandler;

impl CommandHandler for SetPropertyHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let selector = require_targets(payload)?;
        let properties = require_object(payload, "properties")?;
        let ids = resolve_sorted(&selector, &ctx.host.scene)?;

        let HostContext { scene, assets, .. } = &mut *ctx.host;
        let bridge = property_bridge(assets, ctx.settings);

        let mut count = 0usize;
        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            let mut outcome = Outcome::default();
            for (name, value) in properties {
                if is_label(name) {
                    write_label(scene, id, name, value, &mut outcome);
                } else if name.eq_ignore_ascii_case("Tags") {
                    write_tags(scene, id, name, value, &mut outcome);
                } else {
                    write_property(scene, &bridge, id, name, value, &mut outcome);
                }
            }
            let Some(entity) = scene.get(id) else {
                continue;
            };
            let mut entry = entity_summary(entity);
            if !outcome.updated.is_empty() {
                count += 1;
                let _ = entry.insert("updated".into(), Value::Object(outcome.updated));
            }
            if !outcome.errors.is_empty() {
                let _ = entry.insert("errors".into(), Value::Array(outcome.errors));
            }
            entities.push(Value::Object(entry));
        }

        Ok(Reply::ok(json!({ "count": count, "entities": entities })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::{demo_host, run};
    use assert_matches::assert_matches;

    fn set(host: &mut HostContext, names: &[&str], properties: Value) -> Value {
        let reply = run(
            &SetPropertyHandler,
            host,
            json!({"targets": {"names": names}, "properties": properties}),
        )
        .unwrap();
        assert_eq!(reply.code, 200);
        reply.data
    }

    // ── generic properties ──────────────────────────────────────────

    #[test]
    fn generic_write_reports_stored_value() {
        let mut host = demo_host();
        let data = set(&mut host, &["FillLight"], json!({"Intensity": 8000, "Mobility": "Stationary"}));
        assert_eq!(data["count"], 1);
        let updated = &data["entities"][0]["updated"];
        assert_eq!(updated["Intensity"], 8000.0);
        assert_eq!(updated["Mobility"], "Stationary");
        assert!(data["entities"][0].get("errors").is_none());
    }

    #[test]
    fn unknown_property_carries_suggestions() {
        let mut host = demo_host();
        let data = set(&mut host, &["FillLight"], json!({"Intensty": 1}));
        assert_eq!(data["count"], 0);
        let error = &data["entities"][0]["errors"][0];
        assert_eq!(error["property"], "Intensty");
        assert_eq!(error["error"], "Property not found: Intensty");
        assert_eq!(error["suggestions"][0], "Intensity");
    }

    #[test]
    fn type_mismatch_carries_expected_and_current() {
        let mut host = demo_host();
        let data = set(&mut host, &["FillLight"], json!({"Intensity": {"a": 1}}));
        let error = &data["entities"][0]["errors"][0];
        assert_eq!(error["error"], "expects a number");
        assert_eq!(error["expected_type"], "float");
        assert_eq!(error["current_value"], "5000.0");
    }

    #[test]
    fn partial_success_counts_entity() {
        let mut host = demo_host();
        let data = set(&mut host, &["Crate", "Sun"], json!({"CollisionProfileName": "NoCollision"}));
        assert_eq!(data["count"], 1);
        assert_eq!(data["entities"][0]["name"], "Crate");
        assert_eq!(data["entities"][0]["updated"]["CollisionProfileName"], "NoCollision");
        assert!(data["entities"][1].get("updated").is_none());
        assert!(data["entities"][1].get("errors").is_some());
    }

    // ── labels ──────────────────────────────────────────────────────

    #[test]
    fn label_rename() {
        let mut host = demo_host();
        let data = set(&mut host, &["Crate"], json!({"Label": "Box"}));
        assert_eq!(data["entities"][0]["updated"]["ActorLabel"], "Box");
        assert_eq!(data["entities"][0]["name"], "Box");
        assert!(host.scene.find_by_label("Box").is_some());
    }

    #[test]
    fn label_conflict_warns_with_suffix() {
        let mut host = demo_host();
        let data = set(&mut host, &["Crate"], json!({"ActorLabel": "Sun"}));
        let entity = &data["entities"][0];
        assert_eq!(entity["updated"]["ActorLabel"], "Sun_1");
        assert_eq!(entity["errors"][0]["warning"], "Name conflict resolved with suffix");
        assert_eq!(entity["errors"][0]["requested"], "Sun");
        assert_eq!(entity["errors"][0]["actual"], "Sun_1");
    }

    #[test]
    fn label_must_be_non_empty_string() {
        let mut host = demo_host();
        let data = set(&mut host, &["Crate"], json!({"actorlabel": ""}));
        assert_eq!(data["count"], 0);
        assert_eq!(
            data["entities"][0]["errors"][0]["error"],
            "ActorLabel must be a non-empty string"
        );
    }

    // ── tags ────────────────────────────────────────────────────────

    #[test]
    fn tags_replace_add_remove() {
        let mut host = demo_host();
        let data = set(&mut host, &["Rock_01"], json!({"Tags": ["a", "b", "a", ""]}));
        assert_eq!(data["entities"][0]["updated"]["Tags"], json!(["a", "b"]));

        let data = set(&mut host, &["Rock_01"], json!({"tags": "c"}));
        assert_eq!(data["entities"][0]["updated"]["Tags"], json!(["a", "b", "c"]));

        let data = set(&mut host, &["Rock_01"], json!({"Tags": {"add": ["d"], "remove": ["a", "c"]}}));
        assert_eq!(data["entities"][0]["updated"]["Tags"], json!(["b", "d"]));
        assert_eq!(host.scene.find_by_label("Rock_01").unwrap().tags(), vec!["b", "d"]);
    }

    #[test]
    fn tags_wrong_shape() {
        let mut host = demo_host();
        let data = set(&mut host, &["Crate"], json!({"Tags": 5}));
        assert_eq!(data["entities"][0]["errors"][0]["error"], TAGS_SHAPE);
    }

    // ── request errors ──────────────────────────────────────────────

    #[test]
    fn missing_properties_is_400() {
        let mut host = demo_host();
        let err = run(
            &SetPropertyHandler,
            &mut host,
            json!({"targets": {"names": ["Crate"]}, "properties": []}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing object: properties");
    }

    #[test]
    fn unresolved_targets() {
        let mut host = demo_host();
        assert_matches!(
            run(
                &SetPropertyHandler,
                &mut host,
                json!({"targets": {"names": ["Ghost"]}, "properties": {"bHidden": true}})
            ),
            Err(BridgeError::NoExplicitMatch)
        );
    }
}

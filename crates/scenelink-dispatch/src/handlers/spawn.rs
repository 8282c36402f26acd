//! `entity.spawn` and `entity.spawn_batch`.

use scenelink_core::{BridgeError, codes};
use scenelink_host::classes::{STATIC_MESH, STATIC_MESH_ACTOR, find_class, find_preset, is_a};
use scenelink_host::{Asset, AssetRegistry, EntityRegistry, SpawnOptions, Transform};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::args::read_transform;
use super::{entity_summary, require_array, string_param};
use crate::context::HandlerContext;
use crate::registry::{CommandHandler, HandlerResult, Reply};

/// What to spawn, resolved from `asset_id`, `preset` or `class`.
#[derive(Debug, PartialEq)]
struct SpawnPlan {
    class: &'static str,
    mesh: Option<String>,
    type_name: String,
    preset: Option<String>,
}

/// `/Script/Engine.PointLight` and `PointLight` both name `PointLight`.
fn short_class_name(identifier: &str) -> &str {
    identifier.rsplit('.').next().unwrap_or(identifier)
}

fn plan_from_preset(key: &str) -> Option<SpawnPlan> {
    find_preset(key).map(|preset| SpawnPlan {
        class: preset.class,
        mesh: preset.mesh.map(str::to_owned),
        type_name: preset.class.to_owned(),
        preset: Some(key.to_owned()),
    })
}

fn plan_from_class(identifier: &str) -> Option<SpawnPlan> {
    find_class(short_class_name(identifier)).map(|class| SpawnPlan {
        class: class.name,
        mesh: None,
        type_name: class.name.to_owned(),
        preset: None,
    })
}

/// Load a static mesh, accepting `/Pkg/Name` for `/Pkg/Name.Name`.
fn load_mesh<'a>(assets: &'a AssetRegistry, path: &str) -> Option<&'a Asset> {
    let asset = assets.load(path).or_else(|| {
        if path.rsplit('/').next().is_some_and(|leaf| leaf.contains('.')) {
            return None;
        }
        let base = path.rsplit('/').next()?;
        assets.load(&format!("{path}.{base}"))
    })?;
    is_a(asset.class, STATIC_MESH).then_some(asset)
}

/// Preset key, then static-mesh asset path, then class identifier.
fn plan_from_asset_id(asset_id: &str, assets: &AssetRegistry) -> Result<SpawnPlan, String> {
    if let Some(plan) = plan_from_preset(asset_id) {
        return Ok(plan);
    }
    if asset_id.starts_with('/') {
        if let Some(mesh) = load_mesh(assets, asset_id) {
            return Ok(SpawnPlan {
                class: STATIC_MESH_ACTOR,
                mesh: Some(mesh.path.clone()),
                type_name: STATIC_MESH.to_owned(),
                preset: None,
            });
        }
    }
    plan_from_class(asset_id).ok_or_else(|| format!("Failed to resolve asset_id: {asset_id}"))
}

fn plan(item: &Map<String, Value>, assets: &AssetRegistry) -> Result<SpawnPlan, String> {
    if let Some(asset_id) = string_param(item, "asset_id") {
        plan_from_asset_id(asset_id, assets)
    } else if let Some(key) = string_param(item, "preset") {
        plan_from_preset(key).ok_or_else(|| format!("Unknown preset: {key}"))
    } else if let Some(class) = string_param(item, "class") {
        plan_from_class(class).ok_or_else(|| format!("Unknown class: {class}"))
    } else {
        Err("Missing preset, class or asset_id".into())
    }
}

/// Spawn one item. A failed mesh assignment removes the new entity again.
fn spawn_one(item: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> Result<Map<String, Value>, String> {
    let plan = plan(item, &ctx.host.assets)?;
    let options = SpawnOptions {
        label: string_param(item, "name").map(str::to_owned),
        transform: read_transform(item, Transform::default()),
    };
    let id = ctx.host.scene.spawn(plan.class, options).map_err(|e| e.to_string())?;

    let requested_mesh = string_param(item, "mesh").map(str::to_owned).or(plan.mesh);
    if let Some(requested) = requested_mesh.filter(|_| plan.class == STATIC_MESH_ACTOR) {
        let resolved = load_mesh(&ctx.host.assets, &requested).map(|a| a.path.clone());
        let assigned = match resolved {
            Some(path) => ctx.host.assign_mesh(id, &path).map_err(|e| e.to_string()),
            None => Err(format!("Static mesh not found: {requested}")),
        };
        if let Err(error) = assigned {
            let _ = ctx.host.scene.destroy(id);
            return Err(error);
        }
    }

    let entity = ctx
        .host
        .scene
        .get(id)
        .ok_or_else(|| "spawned entity is gone".to_owned())?;
    let mut data = entity_summary(entity);
    if let Some(asset_id) = string_param(item, "asset_id") {
        let _ = data.insert("asset_id".into(), json!(asset_id));
    }
    let _ = data.insert("type".into(), json!(plan.type_name));
    if let Some(preset) = plan.preset {
        let _ = data.insert("preset".into(), json!(preset));
    }
    info!(label = %entity.label, class = entity.class, "entity spawned");
    Ok(data)
}

/// Spawn every item independently. 200 if any succeeded, else 500.
fn spawn_many(items: &[Value], ctx: &mut HandlerContext<'_>) -> Reply {
    let mut created = Vec::with_capacity(items.len());
    let mut count = 0usize;
    for (index, item) in items.iter().enumerate() {
        let result = item
            .as_object()
            .ok_or_else(|| "spawn item is not an object".to_owned())
            .and_then(|item| spawn_one(item, ctx));
        match result {
            Ok(data) => {
                count += 1;
                created.push(Value::Object(data));
            }
            Err(error) => {
                warn!(index, %error, "batch spawn item failed");
                created.push(Value::Null);
            }
        }
    }
    let code = if count > 0 { codes::OK } else { codes::INTERNAL };
    Reply::with_code(code, json!({ "created": created, "count": count }))
}

/// Spawns one entity, or many from `instances` (legacy: `batch`).
pub struct SpawnHandler;

impl CommandHandler for SpawnHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        if let Some(instances) = payload.get("instances").and_then(Value::as_array) {
            return Ok(spawn_many(instances, ctx));
        }
        if let Some(batch) = payload.get("batch").and_then(Value::as_array) {
            return Ok(spawn_many(batch, ctx));
        }
        match spawn_one(payload, ctx) {
            Ok(data) => Ok(Reply::ok(Value::Object(data))),
            Err(error) => {
                warn!(%error, "spawn failed");
                Err(BridgeError::internal("Spawn failed"))
            }
        }
    }
}

/// Spawns every item of a required `batch` array.
pub struct SpawnBatchHandler;

impl CommandHandler for SpawnBatchHandler {
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult {
        let batch = require_array(payload, "batch")?;
        Ok(spawn_many(batch, ctx))
    }
}

//! A small starter level for running the agent without a real host.

use crate::context::HostContext;
use crate::errors::Result;
use crate::math::{Rotator, Transform, Vector};
use crate::scene::SpawnOptions;

struct Seed {
    label: &'static str,
    class: &'static str,
    mesh: Option<&'static str>,
    location: Vector,
    rotation: Rotator,
    scale: Vector,
    tags: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        label: "Floor",
        class: "StaticMeshActor",
        mesh: Some("/Engine/BasicShapes/Plane.Plane"),
        location: Vector::ZERO,
        rotation: Rotator::ZERO,
        scale: Vector::new(20.0, 20.0, 1.0),
        tags: &["ground"],
    },
    Seed {
        label: "Rock_01",
        class: "StaticMeshActor",
        mesh: Some("/Game/Props/SM_Rock_01.SM_Rock_01"),
        location: Vector::new(250.0, -120.0, 0.0),
        rotation: Rotator::new(0.0, 35.0, 0.0),
        scale: Vector::ONE,
        tags: &["prop", "rock"],
    },
    Seed {
        label: "Rock_02",
        class: "StaticMeshActor",
        mesh: Some("/Game/Props/SM_Rock_01.SM_Rock_01"),
        location: Vector::new(-180.0, 300.0, 0.0),
        rotation: Rotator::new(0.0, -70.0, 0.0),
        scale: Vector::new(1.5, 1.5, 1.5),
        tags: &["prop", "rock"],
    },
    Seed {
        label: "Crate",
        class: "StaticMeshActor",
        mesh: Some("/Engine/BasicShapes/Cube.Cube"),
        location: Vector::new(0.0, 0.0, 50.0),
        rotation: Rotator::ZERO,
        scale: Vector::ONE,
        tags: &["prop"],
    },
    Seed {
        label: "Sun",
        class: "DirectionalLight",
        mesh: None,
        location: Vector::new(0.0, 0.0, 1000.0),
        rotation: Rotator::new(-45.0, 30.0, 0.0),
        scale: Vector::ONE,
        tags: &[],
    },
    Seed {
        label: "FillLight",
        class: "PointLight",
        mesh: None,
        location: Vector::new(300.0, 300.0, 400.0),
        rotation: Rotator::ZERO,
        scale: Vector::ONE,
        tags: &[],
    },
    Seed {
        label: "MainCamera",
        class: "CameraActor",
        mesh: None,
        location: Vector::new(-800.0, 0.0, 300.0),
        rotation: Rotator::new(-15.0, 0.0, 0.0),
        scale: Vector::ONE,
        tags: &[],
    },
];

/// Spawn the starter level into `ctx`.
pub fn populate(ctx: &mut HostContext) -> Result<()> {
    for seed in SEEDS {
        let options = SpawnOptions {
            label: Some(seed.label.to_owned()),
            transform: Transform {
                location: seed.location,
                rotation: seed.rotation,
                scale: seed.scale,
            },
        };
        let id = ctx.scene.spawn(seed.class, options)?;
        if let Some(mesh) = seed.mesh {
            ctx.assign_mesh(id, mesh)?;
        }
        if let Some(entity) = ctx.scene.get_mut(id) {
            entity.set_tags(seed.tags.iter().map(|t| (*t).to_owned()).collect());
        }
    }
    Ok(())
}

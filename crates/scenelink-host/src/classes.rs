//! Entity class catalog, spawn presets and the asset class hierarchy.

use crate::entity::{Component, RELATIVE_LOCATION, RELATIVE_ROTATION, RELATIVE_SCALE};
use crate::enums::{CAMERA_PROJECTION_MODE, COMPONENT_MOBILITY, LIGHT_UNITS};
use crate::math::{Color, LinearColor, Rotator, Vector};
use crate::property::{Property, PropertyFlags, PropertySet};
use crate::value::{PropertyKind, PropertyValue, StructKind};

/// Class of a static mesh asset.
pub const STATIC_MESH: &str = "StaticMesh";
/// Class spawned for mesh presets and mesh asset ids.
pub const STATIC_MESH_ACTOR: &str = "StaticMeshActor";
/// Property on the static mesh component holding the mesh reference.
pub const STATIC_MESH_PROPERTY: &str = "StaticMesh";

/// Components and extra properties a class contributes to a new entity.
#[derive(Debug, Default)]
pub struct ClassParts {
    /// Class-specific entity properties.
    pub properties: Vec<Property>,
    /// Root component.
    pub root: Option<Component>,
    /// Other components.
    pub components: Vec<Component>,
}

/// A spawnable entity class.
#[derive(Debug)]
pub struct EntityClass {
    /// Class name.
    pub name: &'static str,
    /// Parent class.
    pub parent: Option<&'static str>,
    build: fn() -> ClassParts,
}

impl EntityClass {
    /// Fresh components and properties for a new instance.
    pub fn build(&self) -> ClassParts {
        (self.build)()
    }
}

static CATALOG: &[EntityClass] = &[
    EntityClass {
        name: "Actor",
        parent: None,
        build: actor_parts,
    },
    EntityClass {
        name: STATIC_MESH_ACTOR,
        parent: Some("Actor"),
        build: static_mesh_actor_parts,
    },
    EntityClass {
        name: "PointLight",
        parent: Some("Actor"),
        build: point_light_parts,
    },
    EntityClass {
        name: "SpotLight",
        parent: Some("Actor"),
        build: spot_light_parts,
    },
    EntityClass {
        name: "DirectionalLight",
        parent: Some("Actor"),
        build: directional_light_parts,
    },
    EntityClass {
        name: "RectLight",
        parent: Some("Actor"),
        build: rect_light_parts,
    },
    EntityClass {
        name: "CameraActor",
        parent: Some("Actor"),
        build: camera_parts,
    },
];

/// Look up a class by name, ignoring ASCII case.
pub fn find_class(name: &str) -> Option<&'static EntityClass> {
    CATALOG.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// A named spawn shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPreset {
    /// Preset key, e.g. `cube`.
    pub key: &'static str,
    /// Class to spawn.
    pub class: &'static str,
    /// Mesh assigned after spawning.
    pub mesh: Option<&'static str>,
}

static PRESETS: &[SpawnPreset] = &[
    SpawnPreset {
        key: "cube",
        class: STATIC_MESH_ACTOR,
        mesh: Some("/Engine/BasicShapes/Cube.Cube"),
    },
    SpawnPreset {
        key: "sphere",
        class: STATIC_MESH_ACTOR,
        mesh: Some("/Engine/BasicShapes/Sphere.Sphere"),
    },
    SpawnPreset {
        key: "cylinder",
        class: STATIC_MESH_ACTOR,
        mesh: Some("/Engine/BasicShapes/Cylinder.Cylinder"),
    },
    SpawnPreset {
        key: "cone",
        class: STATIC_MESH_ACTOR,
        mesh: Some("/Engine/BasicShapes/Cone.Cone"),
    },
    SpawnPreset {
        key: "plane",
        class: STATIC_MESH_ACTOR,
        mesh: Some("/Engine/BasicShapes/Plane.Plane"),
    },
    SpawnPreset {
        key: "point_light",
        class: "PointLight",
        mesh: None,
    },
    SpawnPreset {
        key: "spot_light",
        class: "SpotLight",
        mesh: None,
    },
    SpawnPreset {
        key: "directional_light",
        class: "DirectionalLight",
        mesh: None,
    },
    SpawnPreset {
        key: "rect_light",
        class: "RectLight",
        mesh: None,
    },
    SpawnPreset {
        key: "camera",
        class: "CameraActor",
        mesh: None,
    },
];

/// Look up a preset by key, ignoring ASCII case.
pub fn find_preset(key: &str) -> Option<&'static SpawnPreset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// Asset classes as `(class, parent)`.
static ASSET_CLASSES: &[(&str, &str)] = &[
    (STATIC_MESH, "Object"),
    ("MaterialInterface", "Object"),
    ("Material", "MaterialInterface"),
    ("MaterialInstance", "MaterialInterface"),
    ("MaterialInstanceConstant", "MaterialInstance"),
    ("Texture", "Object"),
    ("Texture2D", "Texture"),
];

/// Whether asset class `class` is `ancestor` or derives from it.
pub fn is_a(class: &str, ancestor: &str) -> bool {
    let mut current = class;
    loop {
        if current == ancestor {
            return true;
        }
        match ASSET_CLASSES.iter().find(|(name, _)| *name == current) {
            Some((_, parent)) => current = *parent,
            None => return false,
        }
    }
}

// ── Property builders ──────────────────────────────────────────────

fn spatial_props(mobility: i64) -> Vec<Property> {
    vec![
        Property::editable(
            RELATIVE_LOCATION,
            PropertyKind::Struct(StructKind::Vector),
            PropertyValue::Vector(Vector::ZERO),
        ),
        Property::editable(
            RELATIVE_ROTATION,
            PropertyKind::Struct(StructKind::Rotator),
            PropertyValue::Rotator(Rotator::ZERO),
        ),
        Property::editable(
            RELATIVE_SCALE,
            PropertyKind::Struct(StructKind::Vector),
            PropertyValue::Vector(Vector::ONE),
        ),
        Property::editable(
            "Mobility",
            PropertyKind::Enum(&COMPONENT_MOBILITY),
            PropertyValue::Enum(mobility),
        ),
        Property::editable("bVisible", PropertyKind::Bool, PropertyValue::Bool(true)),
        Property::with_flags(
            "ComponentToWorld",
            PropertyKind::Struct(StructKind::Vector),
            PropertyFlags::TRANSIENT,
            PropertyValue::Vector(Vector::ZERO),
        ),
    ]
}

fn light_props(intensity: f64, mobility: i64) -> Vec<Property> {
    let mut props = spatial_props(mobility);
    props.extend([
        Property::editable("Intensity", PropertyKind::Float, PropertyValue::Float(intensity)),
        Property::editable(
            "LightColor",
            PropertyKind::Struct(StructKind::Color),
            PropertyValue::Color(Color::WHITE),
        ),
        Property::editable("bCastShadows", PropertyKind::Bool, PropertyValue::Bool(true)),
        Property::editable(
            "IntensityUnits",
            PropertyKind::Enum(&LIGHT_UNITS),
            PropertyValue::Enum(1),
        ),
        Property::editable("ShadowResolutionScale", PropertyKind::Float, PropertyValue::Float(1.0)),
    ]);
    props
}

fn actor_parts() -> ClassParts {
    ClassParts {
        root: Some(Component::new(
            "DefaultSceneRoot",
            "SceneComponent",
            PropertySet::new(spatial_props(0)),
        )),
        ..ClassParts::default()
    }
}

fn static_mesh_actor_parts() -> ClassParts {
    let mut props = spatial_props(0);
    props.extend([
        Property::editable(
            STATIC_MESH_PROPERTY,
            PropertyKind::Object { class: STATIC_MESH },
            PropertyValue::Object(None),
        ),
        Property::editable(
            "OverrideMaterial",
            PropertyKind::Object {
                class: "MaterialInterface",
            },
            PropertyValue::Object(None),
        ),
        Property::editable(
            "CollisionProfileName",
            PropertyKind::Name,
            PropertyValue::Name("BlockAll".into()),
        ),
        Property::editable("bSimulatePhysics", PropertyKind::Bool, PropertyValue::Bool(false)),
        Property::editable("ForcedLodModel", PropertyKind::Int, PropertyValue::Int(0)),
    ]);
    ClassParts {
        root: Some(Component::new(
            "StaticMeshComponent0",
            "StaticMeshComponent",
            PropertySet::new(props),
        )),
        ..ClassParts::default()
    }
}

fn point_light_parts() -> ClassParts {
    let mut props = light_props(5000.0, 2);
    props.push(Property::editable(
        "AttenuationRadius",
        PropertyKind::Float,
        PropertyValue::Float(1000.0),
    ));
    ClassParts {
        root: Some(Component::new(
            "LightComponent0",
            "PointLightComponent",
            PropertySet::new(props),
        )),
        ..ClassParts::default()
    }
}

fn spot_light_parts() -> ClassParts {
    let mut props = light_props(5000.0, 2);
    props.extend([
        Property::editable("AttenuationRadius", PropertyKind::Float, PropertyValue::Float(1000.0)),
        Property::editable("InnerConeAngle", PropertyKind::Float, PropertyValue::Float(0.0)),
        Property::editable("OuterConeAngle", PropertyKind::Float, PropertyValue::Float(44.0)),
    ]);
    ClassParts {
        root: Some(Component::new(
            "LightComponent0",
            "SpotLightComponent",
            PropertySet::new(props),
        )),
        ..ClassParts::default()
    }
}

fn directional_light_parts() -> ClassParts {
    ClassParts {
        root: Some(Component::new(
            "LightComponent0",
            "DirectionalLightComponent",
            PropertySet::new(light_props(10.0, 1)),
        )),
        ..ClassParts::default()
    }
}

fn rect_light_parts() -> ClassParts {
    let mut props = light_props(15.0, 2);
    props.extend([
        Property::editable("AttenuationRadius", PropertyKind::Float, PropertyValue::Float(1000.0)),
        Property::editable("SourceWidth", PropertyKind::Float, PropertyValue::Float(64.0)),
        Property::editable("SourceHeight", PropertyKind::Float, PropertyValue::Float(64.0)),
    ]);
    ClassParts {
        root: Some(Component::new(
            "LightComponent0",
            "RectLightComponent",
            PropertySet::new(props),
        )),
        ..ClassParts::default()
    }
}

fn camera_parts() -> ClassParts {
    let camera = PropertySet::new(vec![
        Property::editable("FieldOfView", PropertyKind::Float, PropertyValue::Float(90.0)),
        Property::editable("AspectRatio", PropertyKind::Float, PropertyValue::Float(1.777_778)),
        Property::editable("OrthoWidth", PropertyKind::Float, PropertyValue::Float(512.0)),
        Property::editable(
            "ProjectionMode",
            PropertyKind::Enum(&CAMERA_PROJECTION_MODE),
            PropertyValue::Enum(0),
        ),
        Property::editable("bConstrainAspectRatio", PropertyKind::Bool, PropertyValue::Bool(false)),
        Property::editable(
            "SceneColorTint",
            PropertyKind::Struct(StructKind::LinearColor),
            PropertyValue::LinearColor(LinearColor::WHITE),
        ),
        Property::editable(
            "ColorGradingLUT",
            PropertyKind::SoftObject { class: "Texture2D" },
            PropertyValue::SoftObject(None),
        ),
        Property::editable("bVisible", PropertyKind::Bool, PropertyValue::Bool(true)),
    ]);
    ClassParts {
        root: Some(Component::new(
            "SceneComponent",
            "SceneComponent",
            PropertySet::new(spatial_props(2)),
        )),
        components: vec![Component::new("CameraComponent", "CameraComponent", camera)],
        ..ClassParts::default()
    }
}

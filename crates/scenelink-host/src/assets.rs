//! In-memory asset registry.

use crate::classes::{STATIC_MESH, is_a};
use crate::math::Vector;

/// A loadable asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    /// Object path, `/Package/Path/Name.Name`.
    pub path: String,
    /// Short object name.
    pub name: String,
    /// Asset class.
    pub class: &'static str,
    /// Local bounding box size, for meshes.
    pub size: Option<Vector>,
}

impl Asset {
    /// Build an asset from its package path; the object name repeats the last segment.
    pub fn new(package: &str, class: &'static str) -> Self {
        let name = package.rsplit('/').next().unwrap_or(package).to_owned();
        Self {
            path: format!("{package}.{name}"),
            name,
            class,
            size: None,
        }
    }

    /// Attach a mesh size.
    #[must_use]
    pub fn with_size(mut self, size: Vector) -> Self {
        self.size = Some(size);
        self
    }
}

/// Registry of assets addressable by object path.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the engine basic shapes and a few project assets.
    pub fn with_defaults() -> Self {
        let cube = Vector::new(100.0, 100.0, 100.0);
        let mut registry = Self::new();
        for shape in ["Cube", "Sphere", "Cylinder", "Cone"] {
            registry.add(Asset::new(&format!("/Engine/BasicShapes/{shape}"), STATIC_MESH).with_size(cube));
        }
        registry.add(
            Asset::new("/Engine/BasicShapes/Plane", STATIC_MESH)
                .with_size(Vector::new(100.0, 100.0, 0.0)),
        );
        registry.add(Asset::new("/Engine/BasicShapes/BasicShapeMaterial", "Material"));
        registry.add(
            Asset::new("/Game/Props/SM_Rock_01", STATIC_MESH)
                .with_size(Vector::new(120.0, 90.0, 70.0)),
        );
        registry.add(Asset::new("/Game/Materials/M_Rock", "Material"));
        registry.add(Asset::new("/Game/Materials/MI_Rock_Wet", "MaterialInstanceConstant"));
        registry.add(Asset::new("/Game/Textures/T_Grid", "Texture2D"));
        registry
    }

    /// Register an asset, replacing any asset at the same path.
    pub fn add(&mut self, asset: Asset) {
        self.assets.retain(|a| a.path != asset.path);
        self.assets.push(asset);
    }

    /// Load by exact object path.
    pub fn load(&self, path: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.path == path)
    }

    /// Assets whose class is `class`, or derives from it when `recursive`.
    pub fn assets_of_class<'a>(
        &'a self,
        class: &'a str,
        recursive: bool,
    ) -> impl Iterator<Item = &'a Asset> + 'a {
        self.assets.iter().filter(move |a| {
            if recursive {
                is_a(a.class, class)
            } else {
                a.class == class
            }
        })
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_repeats_name() {
        let asset = Asset::new("/Game/Props/SM_Crate", STATIC_MESH);
        assert_eq!(asset.path, "/Game/Props/SM_Crate.SM_Crate");
        assert_eq!(asset.name, "SM_Crate");
    }

    #[test]
    fn load_is_exact() {
        let registry = AssetRegistry::with_defaults();
        assert!(registry.load("/Engine/BasicShapes/Cube.Cube").is_some());
        assert!(registry.load("/Engine/BasicShapes/Cube").is_none());
        assert!(registry.load("/engine/basicshapes/cube.cube").is_none());
    }

    #[test]
    fn class_search_follows_hierarchy() {
        let registry = AssetRegistry::with_defaults();
        let materials: Vec<_> = registry
            .assets_of_class("MaterialInterface", true)
            .map(|a| a.name.as_str())
            .collect();
        assert!(materials.contains(&"M_Rock"));
        assert!(materials.contains(&"MI_Rock_Wet"));
        assert_eq!(registry.assets_of_class("MaterialInterface", false).count(), 0);
    }

    #[test]
    fn add_replaces_same_path() {
        let mut registry = AssetRegistry::new();
        registry.add(Asset::new("/Game/A", "Material"));
        registry.add(Asset::new("/Game/A", "Texture2D"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.load("/Game/A.A").unwrap().class, "Texture2D");
    }
}

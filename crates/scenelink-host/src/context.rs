//! Everything the host thread owns.

use crate::assets::AssetRegistry;
use crate::classes::{STATIC_MESH, STATIC_MESH_PROPERTY, is_a};
use crate::entity::{Entity, EntityId};
use crate::errors::{HostError, Result};
use crate::math::Vector;
use crate::project::{Project, ProjectInfo};
use crate::scene::{EntityRegistry, Scene};
use crate::value::PropertyValue;

/// Host-thread state: the live scene, loadable assets and project metadata.
#[derive(Debug)]
pub struct HostContext {
    /// Live entities.
    pub scene: Scene,
    /// Loadable assets.
    pub assets: AssetRegistry,
    /// Project metadata.
    pub project: Project,
}

impl HostContext {
    /// Empty scene over the default asset set.
    pub fn new(project: Project) -> Self {
        Self {
            scene: Scene::new(&project.name),
            assets: AssetRegistry::with_defaults(),
            project,
        }
    }

    /// Current `project.info` payload.
    pub fn project_info(&self) -> ProjectInfo {
        self.project.info(self.scene.len())
    }

    /// Assign a static mesh to an entity's mesh component.
    pub fn assign_mesh(&mut self, id: EntityId, mesh_path: &str) -> Result<()> {
        let asset = self
            .assets
            .load(mesh_path)
            .filter(|a| is_a(a.class, STATIC_MESH))
            .ok_or_else(|| HostError::AssetNotFound {
                path: mesh_path.to_owned(),
            })?;
        let value = PropertyValue::Object(Some(asset.path.clone()));
        let root = self
            .scene
            .get_mut(id)
            .and_then(|e| e.root.as_mut())
            .ok_or_else(|| HostError::MissingProperty {
                name: STATIC_MESH_PROPERTY.to_owned(),
            })?;
        root.properties.set(STATIC_MESH_PROPERTY, value)
    }

    /// World-space bounding box size: mesh size scaled by |scale|, zero without a mesh.
    pub fn bounds(&self, entity: &Entity) -> Vector {
        let mesh = entity
            .root
            .as_ref()
            .and_then(|root| root.properties.value(STATIC_MESH_PROPERTY));
        let size = match mesh {
            Some(PropertyValue::Object(Some(path))) => {
                self.assets.load(path).and_then(|a| a.size)
            }
            _ => None,
        };
        size.map_or(Vector::ZERO, |s| s.scale_by(entity.transform().scale.abs()))
    }

    /// Bounds by id.
    pub fn bounds_of(&self, id: EntityId) -> Option<Vector> {
        self.scene.get(id).map(|e| self.bounds(e))
    }
}

//! Project metadata reported to the peer.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Version string reported as `engineVersion`.
pub const ENGINE_VERSION: &str = concat!("scenelink-host ", env!("CARGO_PKG_VERSION"));

/// Static project metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Project directory.
    pub dir: PathBuf,
}

/// The `project.info` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Project name.
    pub project_name: String,
    /// Project directory.
    pub project_path: String,
    /// Path of the project descriptor file.
    pub project_file: String,
    /// Content directory.
    pub content_dir: String,
    /// Config directory.
    pub config_dir: String,
    /// Saved directory.
    pub saved_dir: String,
    /// Plugins directory.
    pub plugins_dir: String,
    /// Host version.
    pub engine_version: String,
    /// Live entity count.
    pub entity_count: usize,
}

fn dir_string(path: &Path) -> String {
    let mut s = path.to_string_lossy().into_owned();
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}

impl Project {
    /// Build project metadata.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    /// Path of the `<Name>.uproject` descriptor.
    pub fn project_file(&self) -> PathBuf {
        self.dir.join(format!("{}.uproject", self.name))
    }

    /// Snapshot for `project.info`.
    pub fn info(&self, entity_count: usize) -> ProjectInfo {
        ProjectInfo {
            project_name: self.name.clone(),
            project_path: dir_string(&self.dir),
            project_file: self.project_file().to_string_lossy().into_owned(),
            content_dir: dir_string(&self.dir.join("Content")),
            config_dir: dir_string(&self.dir.join("Config")),
            saved_dir: dir_string(&self.dir.join("Saved")),
            plugins_dir: dir_string(&self.dir.join("Plugins")),
            engine_version: ENGINE_VERSION.to_owned(),
            entity_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lays_out_directories() {
        let project = Project::new("Demo", "/work/Demo");
        let info = project.info(3);
        assert_eq!(info.project_path, "/work/Demo/");
        assert_eq!(info.project_file, "/work/Demo/Demo.uproject");
        assert_eq!(info.content_dir, "/work/Demo/Content/");
        assert_eq!(info.entity_count, 3);
    }

    #[test]
    fn info_serializes_camel_case() {
        let v = serde_json::to_value(Project::new("Demo", "/p").info(0)).unwrap();
        assert_eq!(v["projectName"], "Demo");
        assert_eq!(v["pluginsDir"], "/p/Plugins/");
        assert!(v.get("engineVersion").is_some());
    }
}

//! Transport, host, project and handler settings.

use serde::{Deserialize, Serialize};

/// Outbound WebSocket session settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportSettings {
    /// Peer endpoint URL.
    pub endpoint: String,
    /// Reconnect ticker period in milliseconds.
    pub reconnect_interval_ms: u64,
    /// Heartbeat ticker period in milliseconds.
    pub heartbeat_interval_ms: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:17860".to_string(),
            reconnect_interval_ms: 5_000,
            heartbeat_interval_ms: 10_000,
        }
    }
}

/// Host loop settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSettings {
    /// Host tick period in milliseconds; deferred tasks drain once per tick.
    pub tick_interval_ms: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
        }
    }
}

/// Project metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    /// Project name, used for entity paths and `project.info`.
    pub name: String,
    /// Project directory. Empty means the working directory at load time.
    pub path: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "SceneLink".to_string(),
            path: String::new(),
        }
    }
}

/// Limits and defaults for the built-in handlers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerSettings {
    /// Default `limit` for `entity.get_info`.
    pub info_limit: usize,
    /// Maximum entities echoed by `entity.set_transform`.
    pub transform_report_limit: usize,
    /// Maximum property-name suggestions.
    pub suggestion_limit: usize,
    /// Properties read by `entity.inspect` when none are requested.
    pub inspect_defaults: Vec<String>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            info_limit: 50,
            transform_report_limit: 100,
            suggestion_limit: 5,
            inspect_defaults: ["Mobility", "bHidden", "CollisionProfileName", "Tags"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

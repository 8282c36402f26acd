use serde::{Deserialize, Serialize};

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level for local stderr output.
    pub level: String,
    /// Forward log events to the connected peer as `log.entry`.
    pub forward_logs: bool,
    /// Minimum level for forwarded events.
    pub forward_min_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            forward_logs: false,
            forward_min_level: "info".to_string(),
        }
    }
}

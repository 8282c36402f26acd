//! Settings type definitions.

mod bridge;
mod logging;

pub use bridge::{HandlerSettings, HostSettings, ProjectSettings, TransportSettings};
pub use logging::LoggingSettings;

use serde::{Deserialize, Serialize};

/// Root settings object, mirrors `~/.scenelink/settings.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneLinkSettings {
    /// Outbound connection.
    pub transport: TransportSettings,
    /// Host loop.
    pub host: HostSettings,
    /// Project metadata reported to the peer.
    pub project: ProjectSettings,
    /// Local logging and peer log forwarding.
    pub logging: LoggingSettings,
    /// Built-in handler limits and defaults.
    pub handlers: HandlerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serialize_camel_case() {
        let v = serde_json::to_value(SceneLinkSettings::default()).unwrap();
        assert_eq!(v["transport"]["endpoint"], "ws://127.0.0.1:17860");
        assert_eq!(v["transport"]["reconnectIntervalMs"], 5000);
        assert_eq!(v["handlers"]["inspectDefaults"][0], "Mobility");
        assert_eq!(v["logging"]["forwardLogs"], false);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: SceneLinkSettings =
            serde_json::from_str(r#"{"host": {"tickIntervalMs": 33}}"#).unwrap();
        assert_eq!(s.host.tick_interval_ms, 33);
        assert_eq!(s.transport.heartbeat_interval_ms, 10_000);
    }
}

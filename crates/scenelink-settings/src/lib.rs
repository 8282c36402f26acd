//! # scenelink-settings
//!
//! Layered configuration for the SceneLink bridge.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** ([`SceneLinkSettings::default()`])
//! 2. **User file** `~/.scenelink/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** `SCENELINK_*` overrides (highest priority)
//!
//! Command-line flags are applied on top by the binary.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, finalize, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = SceneLinkSettings::default();
        assert_eq!(settings.transport.endpoint, "ws://127.0.0.1:17860");
        assert_eq!(settings.transport.reconnect_interval_ms, 5_000);
        assert_eq!(settings.transport.heartbeat_interval_ms, 10_000);
        assert_eq!(settings.host.tick_interval_ms, 16);
        assert_eq!(settings.project.name, "SceneLink");
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.forward_logs);
        assert_eq!(settings.handlers.info_limit, 50);
        assert_eq!(settings.handlers.suggestion_limit, 5);
    }

    #[test]
    fn settings_path_is_under_home() {
        let path = settings_path();
        assert!(path.ends_with(".scenelink/settings.json"));
    }
}

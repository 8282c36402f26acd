//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons the bridge refuses to start with the configured settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read settings file {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not JSON, or its values have the wrong shape.
    #[error("settings file {} is malformed: {source}", path.display())]
    Malformed {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The transport endpoint is not a WebSocket URL.
    #[error("transport.endpoint must be a ws:// or wss:// URL, got '{0}'")]
    Endpoint(String),
    /// A timer period that drives the bridge is zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = SettingsError::Malformed {
            path: PathBuf::from("/home/u/.scenelink/settings.json"),
            source,
        };
        let text = err.to_string();
        assert!(text.starts_with("settings file /home/u/.scenelink/settings.json is malformed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn endpoint_display() {
        let err = SettingsError::Endpoint("http://127.0.0.1:1".into());
        assert_eq!(
            err.to_string(),
            "transport.endpoint must be a ws:// or wss:// URL, got 'http://127.0.0.1:1'"
        );
    }

    #[test]
    fn zero_interval_display() {
        let err = SettingsError::ZeroInterval("host.tickIntervalMs");
        assert_eq!(err.to_string(), "host.tickIntervalMs must be greater than zero");
    }
}

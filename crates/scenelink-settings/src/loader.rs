//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SceneLinkSettings::default()`]
//! 2. If `~/.scenelink/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `SCENELINK_*` environment variable overrides (highest priority)
//! 4. Fill derived values and validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::SceneLinkSettings;

/// Lower bound for timer periods set through the environment.
const MIN_INTERVAL_MS: u64 = 500;
/// Upper bound for timer periods set through the environment.
const MAX_INTERVAL_MS: u64 = 600_000;

/// Resolve the path to the settings file (`~/.scenelink/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".scenelink").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SceneLinkSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<SceneLinkSettings> {
    let mut settings = read_layered(path)?;
    apply_env_overrides(&mut settings);
    finalize(&mut settings)?;
    Ok(settings)
}

fn read_layered(path: &Path) -> Result<SceneLinkSettings> {
    let malformed = |source| SettingsError::Malformed {
        path: path.to_path_buf(),
        source,
    };
    let defaults = serde_json::to_value(SceneLinkSettings::default()).map_err(malformed)?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let user: Value = serde_json::from_str(&content).map_err(malformed)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    serde_json::from_value(merged).map_err(malformed)
}

/// Fill derived values and reject settings the bridge cannot run with.
pub fn finalize(settings: &mut SceneLinkSettings) -> Result<()> {
    if settings.project.path.is_empty() {
        if let Ok(cwd) = std::env::current_dir() {
            settings.project.path = cwd.display().to_string();
        }
    }
    let endpoint = settings.transport.endpoint.as_str();
    if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
        return Err(SettingsError::Endpoint(endpoint.to_owned()));
    }
    if settings.host.tick_interval_ms == 0 {
        return Err(SettingsError::ZeroInterval("host.tickIntervalMs"));
    }
    if settings.handlers.suggestion_limit == 0 {
        settings.handlers.suggestion_limit = 5;
    }
    Ok(())
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut SceneLinkSettings) {
    // ── Transport ───────────────────────────────────────────────────
    if let Some(v) = read_env_string("SCENELINK_ENDPOINT") {
        settings.transport.endpoint = v;
    }
    if let Some(v) = read_env_u64(
        "SCENELINK_RECONNECT_INTERVAL_MS",
        MIN_INTERVAL_MS,
        MAX_INTERVAL_MS,
    ) {
        settings.transport.reconnect_interval_ms = v;
    }
    if let Some(v) = read_env_u64(
        "SCENELINK_HEARTBEAT_INTERVAL_MS",
        MIN_INTERVAL_MS,
        MAX_INTERVAL_MS,
    ) {
        settings.transport.heartbeat_interval_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("SCENELINK_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("SCENELINK_FORWARD_LOGS") {
        settings.logging.forward_logs = v;
    }

    // ── Project ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("SCENELINK_PROJECT_NAME") {
        settings.project.name = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `TRAILHEAD_DEBUG` | `debug` |
//! | `TRAILHEAD_LOG_LEVEL` | `log_level` |
//! | `TRAILHEAD_HISTORY_SOURCE` | `history.source` (`auto`, `browser`, `memory`) |
//! | `TRAILHEAD_INITIAL_PATH` | `history.initial_path` |
//! | `TRAILHEAD_BASE_URL` | `history.base_url` |
//! | `TRAILHEAD_PUSH_QUOTA` | `history.push_quota` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use trailhead_core::settings_loader;
//!
//! // Load from TOML
//! let settings = settings_loader::from_toml_file("config/trailhead.toml").unwrap();
//!
//! // Load from TOML with environment overrides
//! let settings = settings_loader::from_toml_file_with_env("config/trailhead.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::TrailheadError;
use crate::settings::{Settings, SourceKind};

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, TrailheadError> {
    // Merge through serde_json so that missing keys keep their defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| TrailheadError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let merged = merge_json(default_json()?, toml_to_json(toml_value));
    serde_json::from_value(merged).map_err(|e| {
        TrailheadError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, TrailheadError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, TrailheadError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, TrailheadError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| TrailheadError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    let merged = merge_json(default_json()?, json_value);
    serde_json::from_value(merged).map_err(|e| {
        TrailheadError::ConfigurationError(format!("Failed to deserialize settings from JSON: {e}"))
    })
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, TrailheadError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `TRAILHEAD_*` environment variable overrides to a settings struct.
///
/// Unparseable values (an unknown source kind, a non-numeric quota) are
/// ignored and the previous value is kept.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_with(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using an arbitrary variable lookup.
///
/// [`apply_env_overrides`] is this function over the process environment.
pub fn apply_overrides_with<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("TRAILHEAD_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("TRAILHEAD_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("TRAILHEAD_HISTORY_SOURCE") {
        match val.to_lowercase().as_str() {
            "auto" => settings.history.source = SourceKind::Auto,
            "browser" => settings.history.source = SourceKind::Browser,
            "memory" => settings.history.source = SourceKind::Memory,
            other => tracing::warn!(value = other, "ignoring unknown TRAILHEAD_HISTORY_SOURCE"),
        }
    }

    if let Some(val) = lookup("TRAILHEAD_INITIAL_PATH") {
        settings.history.initial_path = val;
    }

    if let Some(val) = lookup("TRAILHEAD_BASE_URL") {
        let val = val.trim().to_string();
        settings.history.base_url = if val.is_empty() { None } else { Some(val) };
    }

    if let Some(val) = lookup("TRAILHEAD_PUSH_QUOTA") {
        if let Ok(quota) = val.parse::<usize>() {
            settings.history.push_quota = Some(quota);
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, TrailheadError> {
    std::fs::read_to_string(path).map_err(|e| {
        TrailheadError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn default_json() -> Result<serde_json::Value, TrailheadError> {
    serde_json::to_value(Settings::default()).map_err(|e| {
        TrailheadError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

//! Settings for trailhead.
//!
//! [`Settings`] holds logging configuration and the [`HistorySettings`] that
//! decide which history source backs the navigator. Settings are plain values:
//! the composition root loads them once (see
//! [`settings_loader`](crate::settings_loader)) and hands them to whatever
//! needs them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which history source backs a navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Use the browser-backed source when a platform URL is configured,
    /// otherwise fall back to the in-memory source.
    Auto,
    /// Always use the browser-backed source. Requires `base_url`.
    Browser,
    /// Always use the in-memory source.
    Memory,
}

/// History source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// The source selection strategy.
    pub source: SourceKind,
    /// The first entry of an in-memory history (path plus optional query).
    pub initial_path: String,
    /// The absolute URL of the page hosting a browser-backed history.
    pub base_url: Option<String>,
    /// How many `pushState`/`replaceState` calls the platform accepts before
    /// refusing further state changes. `None` means unlimited.
    pub push_quota: Option<usize>,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            source: SourceKind::Auto,
            initial_path: "/".to_string(),
            base_url: None,
            push_quota: None,
        }
    }
}

impl HistorySettings {
    /// Resolves [`SourceKind::Auto`] into a concrete kind.
    ///
    /// A configured `base_url` means a platform window is available.
    pub const fn effective_source(&self) -> SourceKind {
        match self.source {
            SourceKind::Auto => {
                if self.base_url.is_some() {
                    SourceKind::Browser
                } else {
                    SourceKind::Memory
                }
            }
            kind => kind,
        }
    }
}

/// The complete set of trailhead settings.
///
/// # Examples
///
/// ```
/// use trailhead_core::settings::{Settings, SourceKind};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.history.effective_source(), SourceKind::Memory);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or `EnvFilter` directive (e.g. "info", "trailhead=debug").
    pub log_level: String,

    // ── History ──────────────────────────────────────────────────────

    /// History source configuration.
    pub history: HistorySettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            history: HistorySettings::default(),
            extra: HashMap::new(),
        }
    }
}

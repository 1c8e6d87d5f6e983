//! # trailhead-core
//!
//! Core types for the trailhead workspace: the shared error enum, settings,
//! settings loading, and logging setup. Every other crate builds on these.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Workspace settings and history source selection
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{TrailheadError, TrailheadResult};
pub use settings::{HistorySettings, Settings, SourceKind};

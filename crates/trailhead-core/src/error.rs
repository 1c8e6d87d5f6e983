//! Core error types for trailhead.
//!
//! This module provides [`TrailheadError`], the single error enum shared by the
//! matcher and the history crates, and the [`TrailheadResult`] alias.
//!
//! Not every failure is an error: a path that matches no route is an ordinary
//! `Ok(None)` from the matcher, and an out-of-range history move is ignored by
//! the sources.

use thiserror::Error;

/// The primary error type for trailhead.
///
/// Variants fall into two groups. Configuration and input errors are fatal and
/// surface to the caller immediately. Platform navigation failures are
/// recoverable; see [`TrailheadError::is_recoverable`].
#[derive(Error, Debug)]
pub enum TrailheadError {
    // ── Matching ─────────────────────────────────────────────────────

    /// A dynamic segment uses a parameter name reserved by the matcher.
    #[error("dynamic segment \"{name}\" is a reserved name, use a different name in path \"{path}\"")]
    ReservedParamName {
        /// The offending parameter name.
        name: String,
        /// The route path that declared it.
        path: String,
    },

    /// A path component could not be percent-decoded into UTF-8.
    #[error("Malformed URI: {0}")]
    MalformedUri(String),

    /// A parameter required by a path template was not supplied.
    #[error("No value provided for parameter '{name}' in path \"{path}\"")]
    MissingParam {
        /// The parameter name.
        name: String,
        /// The path template being filled.
        path: String,
    },

    // ── History ──────────────────────────────────────────────────────

    /// The platform refused to record more history entries.
    #[error("History quota exceeded after {0} state changes")]
    QuotaExceeded(usize),

    /// The platform refused a state change, e.g. a cross-origin `pushState`.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// A URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The workspace is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TrailheadError {
    /// Returns `true` for failures that callers are expected to recover from
    /// locally.
    ///
    /// Only [`QuotaExceeded`](Self::QuotaExceeded) qualifies: the navigator
    /// falls back to a full location change and the navigation still succeeds.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }
}

/// A convenience type alias for `Result<T, TrailheadError>`.
pub type TrailheadResult<T> = Result<T, TrailheadError>;

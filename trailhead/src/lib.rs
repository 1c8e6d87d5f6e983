//! # trailhead
//!
//! Route ranking, relative path resolution, and history-backed navigation.
//!
//! This is the facade crate that re-exports the component crates. Depend on
//! `trailhead` for everything, or on the individual crates for finer-grained
//! control. It also owns the process-wide default [`Navigator`], which is built
//! once by [`init`] and never created implicitly.
//!
//! ```no_run
//! use trailhead::{NavigateOptions, Route, Settings};
//!
//! # async fn run() -> trailhead::TrailheadResult<()> {
//! let nav = trailhead::init(&Settings::default())?;
//! let routes = vec![Route::new("/", "home"), Route::new("/users/:id", "user")];
//!
//! let transition = trailhead::navigate("/users/7", NavigateOptions::default())?;
//! let active = trailhead::pick(&routes, &nav.location().pathname)?;
//! assert_eq!(active.map(|m| m.route.value), Some("user"));
//!
//! nav.on_transition_complete();
//! transition.await;
//! # Ok(())
//! # }
//! ```

/// Error type, settings, settings loader, and logging.
pub use trailhead_core as core;

/// Route ranking, matching, and path utilities.
#[cfg(feature = "matcher")]
pub use trailhead_matcher as matcher;

/// Locations, history sources, and the navigator.
#[cfg(feature = "history")]
pub use trailhead_history as history;

// Third-party re-exports for user convenience.
pub use serde_json;
pub use tracing;

pub use trailhead_core::{HistorySettings, Settings, SourceKind, TrailheadError, TrailheadResult};

#[cfg(feature = "matcher")]
pub use trailhead_matcher::{
    insert_params, match_path, pick, rank_routes, resolve, validate_redirect, Match, Params,
    Route,
};

#[cfg(feature = "history")]
pub use trailhead_history::{
    Action, HistoryEvent, HistorySource, Location, NavigateOptions, Navigator, To, Transition,
    Unsubscribe,
};

#[cfg(feature = "history")]
mod global {
    use std::sync::OnceLock;

    use trailhead_core::logging::setup_logging;
    use trailhead_core::{Settings, TrailheadError, TrailheadResult};
    use trailhead_history::{NavigateOptions, Navigator, To, Transition};

    static DEFAULT: OnceLock<Navigator> = OnceLock::new();

    /// Installs logging and builds the process-wide default navigator.
    ///
    /// # Errors
    ///
    /// Returns [`TrailheadError::ImproperlyConfigured`] if called more than
    /// once, and any error from building the history source.
    pub fn init(settings: &Settings) -> TrailheadResult<&'static Navigator> {
        if DEFAULT.get().is_some() {
            return Err(already_initialized());
        }
        setup_logging(settings);

        let navigator = Navigator::from_settings(&settings.history)?;
        DEFAULT.set(navigator).map_err(|_| already_initialized())?;
        tracing::info!(source = ?settings.history.effective_source(), "default navigator ready");
        default_navigator()
    }

    /// Returns the default navigator built by [`init`].
    ///
    /// # Errors
    ///
    /// Returns [`TrailheadError::ImproperlyConfigured`] before [`init`] has
    /// run.
    pub fn default_navigator() -> TrailheadResult<&'static Navigator> {
        DEFAULT.get().ok_or_else(|| {
            TrailheadError::ImproperlyConfigured(
                "the default navigator is not initialized; call trailhead::init first".to_string(),
            )
        })
    }

    /// Navigates the default navigator. See [`Navigator::navigate`].
    pub fn navigate(to: impl Into<To>, options: NavigateOptions) -> TrailheadResult<Transition> {
        default_navigator()?.navigate(to, options)
    }

    fn already_initialized() -> TrailheadError {
        TrailheadError::ImproperlyConfigured("the default navigator is already initialized".to_string())
    }
}

#[cfg(feature = "history")]
pub use global::{default_navigator, init, navigate};

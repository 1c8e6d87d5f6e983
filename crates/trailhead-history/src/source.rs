//! The history source abstraction.
//!
//! A [`HistorySource`] is the navigation stack a [`Navigator`](crate::Navigator)
//! drives. Two implementations ship with this crate:
//!
//! - [`BrowserSource`](crate::browser::BrowserSource): a browser window's session
//!   history with origins, quotas, and full-page fallbacks
//! - [`MemorySource`](crate::memory::MemorySource): an array-backed stack for
//!   tests and non-browser platforms
//!
//! Which one backs a navigator is decided once, at construction, by
//! [`create_source`].

use std::sync::Arc;

use trailhead_core::{HistorySettings, SourceKind, TrailheadError, TrailheadResult};

use crate::browser::BrowserSource;
use crate::listeners::{Listener, ListenerId};
use crate::location::{HistoryState, RawLocation};
use crate::memory::MemorySource;

/// Handler invoked with the new location after a move through history
/// (the `popstate` event of a browser).
pub type PopHandler = Listener<RawLocation>;

/// A navigation stack.
///
/// All methods take `&self`; implementations synchronize internally and must
/// call pop handlers without holding their own locks.
pub trait HistorySource: Send + Sync {
    /// Returns the current entry.
    fn location(&self) -> RawLocation;

    /// Adds an entry after the current one, discarding any forward entries.
    ///
    /// # Errors
    ///
    /// [`TrailheadError::QuotaExceeded`] if the platform refuses more state
    /// changes; other errors if `uri` cannot be navigated to at all.
    fn push_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()>;

    /// Overwrites the current entry.
    ///
    /// # Errors
    ///
    /// Same as [`push_state`](Self::push_state).
    fn replace_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()>;

    /// Moves `delta` entries through history. Moves outside the stack are
    /// ignored. Fires the pop handlers when the current entry changes.
    fn go(&self, delta: isize);

    /// Navigates to `uri` as a full location change that adds an entry
    /// without state.
    fn assign(&self, uri: &str) -> TrailheadResult<()>;

    /// Navigates to `uri` as a full location change that overwrites the
    /// current entry and drops its state.
    fn replace(&self, uri: &str) -> TrailheadResult<()>;

    /// Registers a handler for moves through history.
    fn add_pop_listener(&self, handler: PopHandler) -> ListenerId;

    /// Removes a handler registered with
    /// [`add_pop_listener`](Self::add_pop_listener).
    fn remove_pop_listener(&self, id: ListenerId) -> bool;
}

/// Builds the source described by `settings`.
///
/// # Errors
///
/// Returns [`TrailheadError::ImproperlyConfigured`] if a browser source is
/// requested without a `base_url`, and [`TrailheadError::InvalidUrl`] if the
/// `base_url` does not parse.
pub fn create_source(settings: &HistorySettings) -> TrailheadResult<Arc<dyn HistorySource>> {
    match settings.effective_source() {
        SourceKind::Browser => {
            let base_url = settings.base_url.as_deref().ok_or_else(|| {
                TrailheadError::ImproperlyConfigured(
                    "a browser history source requires history.base_url".to_string(),
                )
            })?;
            let source = BrowserSource::new(base_url)?.with_push_quota(settings.push_quota);
            tracing::debug!(base_url, "using browser history source");
            Ok(Arc::new(source))
        }
        SourceKind::Memory | SourceKind::Auto => {
            tracing::debug!(initial_path = %settings.initial_path, "using memory history source");
            Ok(Arc::new(MemorySource::new(&settings.initial_path)))
        }
    }
}

//! The navigator: current location, change listeners, and transitions.
//!
//! A [`Navigator`] wraps a [`HistorySource`] and is either idle or
//! transitioning. [`Navigator::navigate`] writes an entry, updates the
//! location, enters the transitioning state, notifies listeners, and returns a
//! [`Transition`] that resolves when the rendering layer calls
//! [`Navigator::on_transition_complete`]. Moves through history made outside
//! the navigator (back/forward) are reported to listeners as [`Action::Pop`]
//! and never enter the transitioning state.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use trailhead_core::logging::navigation_span;
use trailhead_core::{HistorySettings, TrailheadError, TrailheadResult};

use crate::listeners::{Listener, ListenerId, ListenerSet};
use crate::location::{HistoryState, Location, RawLocation};
use crate::source::{create_source, HistorySource};

/// What caused a location change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// A navigation made through [`Navigator::navigate`].
    Push,
    /// A move through history made by the source.
    Pop,
}

/// The event delivered to navigation listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEvent {
    pub location: Location,
    pub action: Action,
}

/// Where to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum To {
    /// A path with an optional query, e.g. `/users/7?tab=posts`.
    Path(String),
    /// A relative move through history, e.g. `-1` for back.
    Delta(isize),
}

impl From<&str> for To {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for To {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<isize> for To {
    fn from(delta: isize) -> Self {
        Self::Delta(delta)
    }
}

// Lets bare integer literals such as `-1` pick an impl.
impl From<i32> for To {
    #[allow(clippy::cast_possible_truncation)]
    fn from(delta: i32) -> Self {
        Self::Delta(delta as isize)
    }
}

/// Options for [`Navigator::navigate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// State stored with the new entry.
    pub state: Option<serde_json::Value>,
    /// Overwrite the current entry instead of adding one.
    pub replace: bool,
}

impl NavigateOptions {
    /// Options that store `state` with the new entry.
    pub fn with_state(state: serde_json::Value) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    /// Options that overwrite the current entry.
    pub fn replacing() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }
}

/// Completion of a navigation.
///
/// Resolves once [`Navigator::on_transition_complete`] is called, or at once
/// for moves through history. If completion is never signalled the transition
/// stays pending for as long as the navigator lives.
///
/// Dropping the last handle to the navigator also settles its pending
/// transitions, since nothing could complete them afterwards.
#[derive(Debug)]
#[must_use = "a transition does nothing unless awaited or inspected"]
pub struct Transition {
    rx: Option<oneshot::Receiver<()>>,
}

impl Transition {
    const fn settled() -> Self {
        Self { rx: None }
    }

    const fn pending(rx: oneshot::Receiver<()>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Returns `true` if the transition has completed, without waiting.
    pub fn is_settled(&mut self) -> bool {
        let settled = match self.rx.as_mut() {
            None => return true,
            Some(rx) => !matches!(rx.try_recv(), Err(TryRecvError::Empty)),
        };
        if settled {
            self.rx = None;
        }
        settled
    }
}

impl Future for Transition {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(());
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(_) => {
                self.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Detaches a listener registered with [`Navigator::listen`].
#[derive(Debug)]
#[must_use = "dropping an Unsubscribe keeps the listener attached for good"]
pub struct Unsubscribe {
    inner: Weak<NavigatorInner>,
    listener_id: ListenerId,
    pop_id: ListenerId,
}

impl Unsubscribe {
    /// Removes the listener and its pop handler. Other listeners are not
    /// affected.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.disconnect(self.listener_id);
            inner.source.remove_pop_listener(self.pop_id);
        }
    }
}

struct NavState {
    location: Location,
    transitioning: bool,
    pending: Vec<oneshot::Sender<()>>,
}

struct NavigatorInner {
    source: Arc<dyn HistorySource>,
    state: Mutex<NavState>,
    listeners: ListenerSet<HistoryEvent>,
    sync_id: ListenerId,
}

impl NavigatorInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, NavState> {
        self.state.lock().expect("navigator lock poisoned")
    }

    /// Recomputes the location from a popped entry.
    fn sync(&self, raw: &RawLocation) -> Option<Location> {
        match Location::from_raw(raw) {
            Ok(location) => {
                self.lock().location = location.clone();
                Some(location)
            }
            Err(err) => {
                tracing::warn!(error = %err, pathname = %raw.pathname, "ignoring undecodable location");
                None
            }
        }
    }
}

impl Drop for NavigatorInner {
    fn drop(&mut self) {
        self.source.remove_pop_listener(self.sync_id);
    }
}

/// Tracks the current location of a [`HistorySource`].
///
/// Cloning a navigator yields another handle to the same state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use trailhead_history::{MemorySource, NavigateOptions, Navigator};
///
/// let nav = Navigator::new(Arc::new(MemorySource::new("/"))).unwrap();
/// let mut transition = nav.navigate("/inbox", NavigateOptions::default()).unwrap();
///
/// assert_eq!(nav.location().pathname, "/inbox");
/// assert!(nav.is_transitioning());
/// assert!(!transition.is_settled());
///
/// nav.on_transition_complete();
/// assert!(transition.is_settled());
/// ```
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Navigator")
            .field("location", &state.location.path_and_query())
            .field("transitioning", &state.transitioning)
            .field("listeners", &self.inner.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Creates a navigator over `source`, starting at its current location.
    ///
    /// # Errors
    ///
    /// Returns an error if the source's current location cannot be decoded.
    pub fn new(source: Arc<dyn HistorySource>) -> TrailheadResult<Self> {
        let location = Location::from_raw(&source.location())?;

        let inner = Arc::new_cyclic(|weak: &Weak<NavigatorInner>| {
            let weak = weak.clone();
            let sync_id = source.add_pop_listener(Arc::new(move |raw: &RawLocation| {
                if let Some(inner) = weak.upgrade() {
                    inner.sync(raw);
                }
            }));
            NavigatorInner {
                source,
                state: Mutex::new(NavState {
                    location,
                    transitioning: false,
                    pending: Vec::new(),
                }),
                listeners: ListenerSet::new(),
                sync_id,
            }
        });

        Ok(Self { inner })
    }

    /// Creates a navigator over the source described by `settings`.
    ///
    /// # Errors
    ///
    /// See [`create_source`] and [`Navigator::new`].
    pub fn from_settings(settings: &HistorySettings) -> TrailheadResult<Self> {
        Self::new(create_source(settings)?)
    }

    /// Returns the underlying history source.
    pub fn source(&self) -> &Arc<dyn HistorySource> {
        &self.inner.source
    }

    /// Returns the current location.
    pub fn location(&self) -> Location {
        self.inner.lock().location.clone()
    }

    /// Returns `true` between a navigation and its completion.
    pub fn is_transitioning(&self) -> bool {
        self.inner.lock().transitioning
    }

    /// Registers `listener` for location changes.
    ///
    /// The listener receives [`Action::Push`] events from
    /// [`navigate`](Self::navigate) and [`Action::Pop`] events from moves
    /// through history. Listeners run synchronously, in registration order.
    pub fn listen<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&HistoryEvent) + Send + Sync + 'static,
    {
        let listener: Listener<HistoryEvent> = Arc::new(listener);
        let listener_id = self.inner.listeners.connect(Arc::clone(&listener));

        let weak = Arc::downgrade(&self.inner);
        let pop_id = self
            .inner
            .source
            .add_pop_listener(Arc::new(move |raw: &RawLocation| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(location) = inner.sync(raw) {
                    listener(&HistoryEvent {
                        location,
                        action: Action::Pop,
                    });
                }
            }));

        Unsubscribe {
            inner: Arc::downgrade(&self.inner),
            listener_id,
            pop_id,
        }
    }

    /// Navigates to a path or moves through history.
    ///
    /// A path navigation adds an entry (or overwrites the current one when
    /// `options.replace` is set or a transition is still in progress), enters
    /// the transitioning state, and notifies listeners before returning. If the
    /// source refuses more state changes, the navigation falls back to a full
    /// location change without state.
    ///
    /// A history move never enters the transitioning state and returns an
    /// already settled transition.
    ///
    /// The fallback replaces the current entry only when `options.replace` is
    /// set; a navigation forced to replace by a transition in progress falls
    /// back to adding an entry.
    ///
    /// # Errors
    ///
    /// Returns any error from the source other than
    /// [`TrailheadError::QuotaExceeded`], and decoding errors for the new
    /// location. A decoding error is reported after the source has been
    /// written: the source keeps the new entry while the navigator keeps its
    /// previous location and does not enter the transitioning state.
    pub fn navigate(
        &self,
        to: impl Into<To>,
        options: NavigateOptions,
    ) -> TrailheadResult<Transition> {
        match to.into() {
            To::Delta(delta) => {
                tracing::debug!(delta, "moving through history");
                self.inner.source.go(delta);
                let location = Location::from_raw(&self.inner.source.location())?;
                self.inner.lock().location = location;
                Ok(Transition::settled())
            }
            To::Path(uri) => self.push(&uri, options),
        }
    }

    fn push(&self, uri: &str, options: NavigateOptions) -> TrailheadResult<Transition> {
        let state = HistoryState::stamp(options.state);
        let span = navigation_span(&state.key);
        let _guard = span.enter();

        let options_replace = options.replace;
        let replace = options_replace || self.is_transitioning();
        let source = &self.inner.source;
        let written = if replace {
            source.replace_state(state, uri)
        } else {
            source.push_state(state, uri)
        };

        match written {
            Ok(()) => {}
            Err(TrailheadError::QuotaExceeded(quota)) => {
                tracing::warn!(quota, uri, "history quota exceeded, changing location without state");
                if options_replace {
                    source.replace(uri)?;
                } else {
                    source.assign(uri)?;
                }
            }
            Err(err) => return Err(err),
        }

        let location = Location::from_raw(&source.location())?;
        let (tx, rx) = oneshot::channel();
        {
            let mut nav = self.inner.lock();
            nav.location = location.clone();
            nav.transitioning = true;
            nav.pending.push(tx);
        }
        tracing::debug!(pathname = %location.pathname, replace, "navigated");

        self.inner.listeners.send(&HistoryEvent {
            location,
            action: Action::Push,
        });
        Ok(Transition::pending(rx))
    }

    /// Leaves the transitioning state and resolves every pending transition.
    pub fn on_transition_complete(&self) {
        let pending = {
            let mut nav = self.inner.lock();
            nav.transitioning = false;
            std::mem::take(&mut nav.pending)
        };
        tracing::debug!(settled = pending.len(), "transition complete");
        for tx in pending {
            tx.send(()).ok();
        }
    }
}

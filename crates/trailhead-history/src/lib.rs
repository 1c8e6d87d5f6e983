//! # trailhead-history
//!
//! Location tracking for trailhead. A [`Navigator`] wraps a pluggable
//! [`HistorySource`], either a [`BrowserSource`] modelling a browser window's
//! session history or an in-memory [`MemorySource`], and exposes the current
//! [`Location`], change listeners, and navigations whose completion can be
//! awaited.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use trailhead_history::{Action, MemorySource, NavigateOptions, Navigator};
//!
//! let nav = Navigator::new(Arc::new(MemorySource::new("/"))).unwrap();
//!
//! let unsubscribe = nav.listen(|event| {
//!     assert_eq!(event.action, Action::Push);
//!     println!("now at {}", event.location.pathname);
//! });
//!
//! let mut transition = nav.navigate("/settings", NavigateOptions::default()).unwrap();
//! nav.on_transition_complete();
//! assert!(transition.is_settled());
//!
//! unsubscribe.unsubscribe();
//! ```

pub mod browser;
pub mod listeners;
pub mod location;
pub mod memory;
pub mod navigator;
pub mod source;

pub use browser::BrowserSource;
pub use listeners::{Listener, ListenerId, ListenerSet};
pub use location::{normalize_pathname, HistoryState, Location, RawLocation, INITIAL_KEY};
pub use memory::{MemoryEntry, MemorySource};
pub use navigator::{Action, HistoryEvent, NavigateOptions, Navigator, To, Transition, Unsubscribe};
pub use source::{create_source, HistorySource, PopHandler};

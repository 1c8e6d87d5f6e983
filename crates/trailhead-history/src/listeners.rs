//! An ordered set of event listeners.
//!
//! [`ListenerSet`] backs both the navigator's change listeners and the pop
//! handlers of the history sources. Listeners run in the order they were
//! connected. Dispatch works on a snapshot taken under the lock and calls
//! listeners with no lock held, so a listener may connect, disconnect, or
//! trigger another dispatch without deadlocking.
//!
//! ```
//! use trailhead_history::listeners::ListenerSet;
//! use std::sync::Arc;
//!
//! let set: ListenerSet<String> = ListenerSet::new();
//! let id = set.connect(Arc::new(|msg: &String| println!("got {msg}")));
//!
//! set.send(&"hello".to_string());
//! assert!(set.disconnect(id));
//! assert!(set.is_empty());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// A shared listener callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Identifies one connected listener for later disconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// An ordered set of listeners for events of type `E`.
pub struct ListenerSet<E: 'static> {
    listeners: RwLock<Vec<(ListenerId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E: 'static> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<E: 'static> ListenerSet<E> {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Connects a listener and returns its id.
    ///
    /// Connecting the same callback twice registers it twice.
    pub fn connect(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .expect("listener lock poisoned")
            .push((id, listener));
        id
    }

    /// Disconnects the listener with the given id.
    ///
    /// Returns `true` if a listener was found and removed. Other listeners
    /// keep their relative order.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().expect("listener lock poisoned");
        let len_before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() < len_before
    }

    /// Calls every listener connected at the time of the call, in order.
    pub fn send(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .read()
            .expect("listener lock poisoned")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Returns the number of connected listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().expect("listener lock poisoned").len()
    }

    /// Returns `true` if no listener is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

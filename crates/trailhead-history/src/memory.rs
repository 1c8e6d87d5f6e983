//! An in-memory history source.
//!
//! [`MemorySource`] keeps its entries in a vector with a cursor. It is used in
//! tests and on platforms without a browser history, and it is not durable:
//! entries live as long as the source does.

use std::sync::RwLock;

use trailhead_core::TrailheadResult;

use crate::listeners::{ListenerId, ListenerSet};
use crate::location::{HistoryState, RawLocation};
use crate::source::{HistorySource, PopHandler};

/// One entry of a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    /// The entry's pathname.
    pub pathname: String,
    /// The entry's search, with its leading `?`, or empty.
    pub search: String,
    /// The state written with the entry.
    pub state: Option<HistoryState>,
}

impl MemoryEntry {
    fn new(uri: &str, state: Option<HistoryState>) -> Self {
        let raw = RawLocation::from_path(uri);
        Self {
            pathname: raw.pathname,
            search: raw.search,
            state,
        }
    }

    fn to_raw(&self) -> RawLocation {
        RawLocation {
            pathname: self.pathname.clone(),
            search: self.search.clone(),
            state: self.state.clone(),
            ..RawLocation::default()
        }
    }
}

#[derive(Debug)]
struct Stack {
    entries: Vec<MemoryEntry>,
    index: usize,
}

/// A history stack held in memory.
///
/// # Examples
///
/// ```
/// use trailhead_history::memory::MemorySource;
/// use trailhead_history::location::HistoryState;
/// use trailhead_history::source::HistorySource;
///
/// let source = MemorySource::new("/");
/// source.push_state(HistoryState::stamp(None), "/a?x=1").unwrap();
/// assert_eq!(source.index(), 1);
///
/// source.go(-1);
/// assert_eq!(source.location().pathname, "/");
///
/// source.go(-1); // out of range, ignored
/// assert_eq!(source.index(), 0);
/// ```
#[derive(Debug)]
pub struct MemorySource {
    stack: RwLock<Stack>,
    pop_listeners: ListenerSet<RawLocation>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemorySource {
    /// Creates a source with a single entry for `initial_path`, which may
    /// carry a query string.
    pub fn new(initial_path: &str) -> Self {
        Self {
            stack: RwLock::new(Stack {
                entries: vec![MemoryEntry::new(initial_path, None)],
                index: 0,
            }),
            pop_listeners: ListenerSet::new(),
        }
    }

    /// Returns a copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.stack.read().expect("memory history lock poisoned").entries.clone()
    }

    /// Returns the cursor position.
    pub fn index(&self) -> usize {
        self.stack.read().expect("memory history lock poisoned").index
    }

    /// Returns the state of the current entry.
    pub fn state(&self) -> Option<HistoryState> {
        let stack = self.stack.read().expect("memory history lock poisoned");
        stack.entries[stack.index].state.clone()
    }

    fn push(&self, entry: MemoryEntry) {
        let mut stack = self.stack.write().expect("memory history lock poisoned");
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(entry);
        stack.index = next;
    }

    fn overwrite(&self, entry: MemoryEntry) {
        let mut stack = self.stack.write().expect("memory history lock poisoned");
        let index = stack.index;
        stack.entries[index] = entry;
    }
}

impl HistorySource for MemorySource {
    fn location(&self) -> RawLocation {
        let stack = self.stack.read().expect("memory history lock poisoned");
        stack.entries[stack.index].to_raw()
    }

    fn push_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()> {
        self.push(MemoryEntry::new(uri, Some(state)));
        Ok(())
    }

    fn replace_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()> {
        self.overwrite(MemoryEntry::new(uri, Some(state)));
        Ok(())
    }

    fn go(&self, delta: isize) {
        let moved = {
            let mut stack = self.stack.write().expect("memory history lock poisoned");
            let target = stack.index.checked_add_signed(delta);
            match target {
                Some(target) if target < stack.entries.len() && target != stack.index => {
                    stack.index = target;
                    Some(stack.entries[target].to_raw())
                }
                _ => None,
            }
        };

        if let Some(location) = moved {
            self.pop_listeners.send(&location);
        }
    }

    fn assign(&self, uri: &str) -> TrailheadResult<()> {
        self.push(MemoryEntry::new(uri, None));
        Ok(())
    }

    fn replace(&self, uri: &str) -> TrailheadResult<()> {
        self.overwrite(MemoryEntry::new(uri, None));
        Ok(())
    }

    fn add_pop_listener(&self, handler: PopHandler) -> ListenerId {
        self.pop_listeners.connect(handler)
    }

    fn remove_pop_listener(&self, id: ListenerId) -> bool {
        self.pop_listeners.disconnect(id)
    }
}

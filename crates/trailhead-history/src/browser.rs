//! A browser session history.
//!
//! [`BrowserSource`] models the history of one browser window: absolute URLs
//! within an origin, state written by `pushState`/`replaceState`, a cap on how
//! many state changes a page may make, and full-page loads through
//! `location.assign`/`location.replace`. Hosts that bridge a real window feed
//! it through the same [`HistorySource`] calls.

use std::sync::RwLock;

use trailhead_core::{TrailheadError, TrailheadResult};
use url::Url;

use crate::listeners::{ListenerId, ListenerSet};
use crate::location::{HistoryState, RawLocation};
use crate::source::{HistorySource, PopHandler};

#[derive(Debug)]
struct Session {
    entries: Vec<(Url, Option<HistoryState>)>,
    index: usize,
    /// State changes made since the last full page load.
    state_changes: usize,
}

impl Session {
    fn current(&self) -> &Url {
        &self.entries[self.index].0
    }

    fn push(&mut self, url: Url, state: Option<HistoryState>) {
        let next = self.index + 1;
        self.entries.truncate(next);
        self.entries.push((url, state));
        self.index = next;
    }
}

/// The session history of a browser window.
#[derive(Debug)]
pub struct BrowserSource {
    session: RwLock<Session>,
    push_quota: Option<usize>,
    pop_listeners: ListenerSet<RawLocation>,
}

impl BrowserSource {
    /// Opens a session at the absolute URL `href`.
    ///
    /// # Errors
    ///
    /// Returns [`TrailheadError::InvalidUrl`] if `href` is not an absolute URL.
    pub fn new(href: &str) -> TrailheadResult<Self> {
        let url = Url::parse(href)?;
        Ok(Self {
            session: RwLock::new(Session {
                entries: vec![(url, None)],
                index: 0,
                state_changes: 0,
            }),
            push_quota: None,
            pop_listeners: ListenerSet::new(),
        })
    }

    /// Caps the number of state changes between full page loads. `None`
    /// means unlimited.
    #[must_use]
    pub const fn with_push_quota(mut self, quota: Option<usize>) -> Self {
        self.push_quota = quota;
        self
    }

    /// Returns the number of entries in the session.
    pub fn len(&self) -> usize {
        self.session.read().expect("browser history lock poisoned").entries.len()
    }

    /// Returns `true` if the session has no entries. A session always holds
    /// at least its initial page.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_state(&self, state: HistoryState, uri: &str, replace: bool) -> TrailheadResult<()> {
        let mut session = self.session.write().expect("browser history lock poisoned");

        if let Some(quota) = self.push_quota {
            if session.state_changes >= quota {
                return Err(TrailheadError::QuotaExceeded(quota));
            }
        }

        let current = session.current();
        let url = current.join(uri)?;
        if url.origin() != current.origin() {
            return Err(TrailheadError::SecurityError(format!(
                "cannot write history for {url} from origin {}",
                current.origin().ascii_serialization()
            )));
        }

        session.state_changes += 1;
        if replace {
            let index = session.index;
            session.entries[index] = (url, Some(state));
        } else {
            session.push(url, Some(state));
        }
        Ok(())
    }

    fn load(&self, uri: &str, replace: bool) -> TrailheadResult<()> {
        let mut session = self.session.write().expect("browser history lock poisoned");
        let url = session.current().join(uri)?;
        tracing::debug!(%url, replace, "full page load");

        session.state_changes = 0;
        if replace {
            let index = session.index;
            session.entries[index] = (url, None);
        } else {
            session.push(url, None);
        }
        Ok(())
    }
}

impl HistorySource for BrowserSource {
    fn location(&self) -> RawLocation {
        let session = self.session.read().expect("browser history lock poisoned");
        let (url, state) = &session.entries[session.index];
        RawLocation::from_url(url, state.clone())
    }

    fn push_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()> {
        self.write_state(state, uri, false)
    }

    fn replace_state(&self, state: HistoryState, uri: &str) -> TrailheadResult<()> {
        self.write_state(state, uri, true)
    }

    fn go(&self, delta: isize) {
        let moved = {
            let mut session = self.session.write().expect("browser history lock poisoned");
            match session.index.checked_add_signed(delta) {
                Some(target) if target < session.entries.len() && target != session.index => {
                    session.index = target;
                    let (url, state) = &session.entries[target];
                    Some(RawLocation::from_url(url, state.clone()))
                }
                _ => None,
            }
        };

        if let Some(location) = moved {
            self.pop_listeners.send(&location);
        }
    }

    fn assign(&self, uri: &str) -> TrailheadResult<()> {
        self.load(uri, false)
    }

    fn replace(&self, uri: &str) -> TrailheadResult<()> {
        self.load(uri, true)
    }

    fn add_pop_listener(&self, handler: PopHandler) -> ListenerId {
        self.pop_listeners.connect(handler)
    }

    fn remove_pop_listener(&self, id: ListenerId) -> bool {
        self.pop_listeners.disconnect(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn source() -> BrowserSource {
        BrowserSource::new("https://example.com/").unwrap()
    }

    #[test]
    fn test_new_rejects_relative_href() {
        assert!(matches!(
            BrowserSource::new("/relative"),
            Err(TrailheadError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_push_state_resolves_against_current() {
        let source = source();
        source.push_state(HistoryState::stamp(None), "/docs/intro").unwrap();
        source.push_state(HistoryState::stamp(None), "next?x=1").unwrap();

        let loc = source.location();
        assert_eq!(loc.pathname, "/docs/next");
        assert_eq!(loc.search, "?x=1");
        assert_eq!(loc.href, "https://example.com/docs/next?x=1");
        assert!(loc.state.is_some());
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_replace_state_keeps_length() {
        let source = source();
        let state = HistoryState::stamp(Some(serde_json::json!("s")));
        source.replace_state(state.clone(), "/other").unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.location().state, Some(state));
    }

    #[test]
    fn test_cross_origin_state_is_refused() {
        let source = source();
        let err = source
            .push_state(HistoryState::stamp(None), "https://evil.test/")
            .unwrap_err();
        assert!(matches!(err, TrailheadError::SecurityError(_)));
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_quota_exceeded_then_reset_by_load() {
        let source = source().with_push_quota(Some(2));
        source.push_state(HistoryState::stamp(None), "/a").unwrap();
        source.push_state(HistoryState::stamp(None), "/b").unwrap();

        let err = source.push_state(HistoryState::stamp(None), "/c").unwrap_err();
        assert!(matches!(err, TrailheadError::QuotaExceeded(2)));
        assert!(err.is_recoverable());
        assert_eq!(source.location().pathname, "/b");

        source.assign("/c").unwrap();
        assert_eq!(source.location().pathname, "/c");
        assert!(source.location().state.is_none());
        source.push_state(HistoryState::stamp(None), "/d").unwrap();
    }

    #[test]
    fn test_replace_overwrites_without_state() {
        let source = source();
        source.push_state(HistoryState::stamp(None), "/a").unwrap();
        source.replace("/b").unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.location().pathname, "/b");
        assert!(source.location().state.is_none());
    }

    #[test]
    fn test_go_dispatches_pop() {
        let source = source();
        source.push_state(HistoryState::stamp(None), "/a").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        source.add_pop_listener(Arc::new(move |loc: &RawLocation| {
            seen_clone.lock().unwrap().push(loc.href.clone());
        }));

        source.go(-1);
        source.go(-1);
        source.go(1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["https://example.com/", "https://example.com/a"]
        );
    }
}

//! Integration tests for the navigator.
//!
//! Tests cover: the transition lifecycle across awaits, memory history bounds,
//! pathname normalization, quota fallback on a browser session, back/forward
//! notifications, and listener detachment.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use trailhead_core::{HistorySettings, SourceKind, TrailheadError};
use trailhead_history::{
    Action, BrowserSource, HistorySource, MemorySource, NavigateOptions, Navigator,
};

fn memory_navigator(initial: &str) -> (Navigator, Arc<MemorySource>) {
    let source = Arc::new(MemorySource::new(initial));
    let nav = Navigator::new(source.clone()).unwrap();
    (nav, source)
}

// ═════════════════════════════════════════════════════════════════════
// 1. Transition lifecycle
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_transitioning_until_complete() {
    let (nav, _) = memory_navigator("/");
    let transition = nav.navigate("/new", NavigateOptions::default()).unwrap();
    assert!(nav.is_transitioning());

    let renderer = nav.clone();
    let waiter = tokio::spawn(async move {
        transition.await;
        renderer.is_transitioning()
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());
    assert!(nav.is_transitioning());

    nav.on_transition_complete();
    let transitioning_after = waiter.await.unwrap();
    assert!(!transitioning_after);
}

#[tokio::test(start_paused = true)]
async fn test_uncompleted_transition_stays_pending() {
    let (nav, _) = memory_navigator("/");
    let transition = nav.navigate("/slow", NavigateOptions::default()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(60), transition).await;
    assert!(result.is_err());
    assert!(nav.is_transitioning());
}

#[tokio::test]
async fn test_rapid_navigations_do_not_grow_the_stack() {
    let (nav, source) = memory_navigator("/");
    let transitions: Vec<_> = ["/a", "/b", "/c", "/d"]
        .into_iter()
        .map(|path| nav.navigate(path, NavigateOptions::default()).unwrap())
        .collect();

    assert_eq!(source.entries().len(), 2);
    assert_eq!(nav.location().pathname, "/d");

    nav.on_transition_complete();
    for transition in transitions {
        transition.await;
    }

    let _next = nav.navigate("/e", NavigateOptions::default()).unwrap();
    assert_eq!(source.entries().len(), 3);
}

// ═════════════════════════════════════════════════════════════════════
// 2. Memory history
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_memory_go_beyond_end_is_ignored() {
    let (nav, source) = memory_navigator("/");
    for path in ["/a", "/b"] {
        let _t = nav.navigate(path, NavigateOptions::default()).unwrap();
        nav.on_transition_complete();
    }
    assert_eq!(source.index(), 2);

    let _t = nav.navigate(5, NavigateOptions::default()).unwrap();
    assert_eq!(source.index(), 2);
    assert_eq!(nav.location().pathname, "/b");

    let _t = nav.navigate(-2, NavigateOptions::default()).unwrap();
    assert_eq!(source.index(), 0);
    assert_eq!(nav.location().pathname, "/");

    let _t = nav.navigate(-1, NavigateOptions::default()).unwrap();
    assert_eq!(source.index(), 0);
}

#[test]
fn test_state_round_trips_through_history() {
    let (nav, source) = memory_navigator("/");
    let _t = nav
        .navigate("/form", NavigateOptions::with_state(serde_json::json!({"draft": "hi"})))
        .unwrap();
    nav.on_transition_complete();
    let key = nav.location().key;

    let _t = nav.navigate("/other", NavigateOptions::default()).unwrap();
    nav.on_transition_complete();
    source.go(-1);

    let loc = nav.location();
    assert_eq!(loc.key, key);
    assert_eq!(loc.state, Some(serde_json::json!({"draft": "hi"})));
}

#[test]
fn test_pathname_normalization_round_trip() {
    let (nav, _) = memory_navigator("/");
    let _t = nav
        .navigate("/search/caf%c3%a9/a b?q=x y", NavigateOptions::default())
        .unwrap();
    let loc = nav.location();
    assert_eq!(loc.pathname, "/search/caf%C3%A9/a%20b");
    assert_eq!(loc.search, "?q=x y");

    nav.on_transition_complete();
    let _t = nav.navigate(loc.path_and_query(), NavigateOptions::default()).unwrap();
    assert_eq!(nav.location().pathname, loc.pathname);
}

#[test]
fn test_malformed_pathname_is_an_error() {
    let (nav, source) = memory_navigator("/");
    let err = nav.navigate("/%FF", NavigateOptions::default()).unwrap_err();
    assert!(matches!(err, TrailheadError::MalformedUri(_)));
    assert_eq!(nav.location().pathname, "/");
    assert!(!nav.is_transitioning());
    assert_eq!(source.location().pathname, "/%FF");
}

// ═════════════════════════════════════════════════════════════════════
// 3. Browser sessions
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_browser_location_components() {
    let settings = HistorySettings {
        source: SourceKind::Browser,
        base_url: Some("http://localhost:3000/app".into()),
        ..HistorySettings::default()
    };
    let nav = Navigator::from_settings(&settings).unwrap();
    let _t = nav.navigate("/app/inbox?unread=1#top", NavigateOptions::default()).unwrap();

    let loc = nav.location();
    assert_eq!(loc.origin, "http://localhost:3000");
    assert_eq!(loc.protocol, "http:");
    assert_eq!(loc.host, "localhost:3000");
    assert_eq!(loc.hostname, "localhost");
    assert_eq!(loc.port, "3000");
    assert_eq!(loc.pathname, "/app/inbox");
    assert_eq!(loc.search, "?unread=1");
    assert_eq!(loc.hash, "#top");
}

#[test]
fn test_quota_exceeded_falls_back_to_assign() {
    let source = Arc::new(
        BrowserSource::new("https://example.com/")
            .unwrap()
            .with_push_quota(Some(1)),
    );
    let nav = Navigator::new(source.clone()).unwrap();

    let _t = nav.navigate("/one", NavigateOptions::default()).unwrap();
    nav.on_transition_complete();
    let _t = nav
        .navigate("/two", NavigateOptions::with_state(serde_json::json!(2)))
        .unwrap();

    assert_eq!(source.len(), 3);
    let loc = nav.location();
    assert_eq!(loc.pathname, "/two");
    assert!(loc.state.is_none());
    assert_eq!(loc.key, "initial");
    assert!(nav.is_transitioning());
}

#[test]
fn test_quota_exceeded_on_replace_falls_back_to_replace() {
    let source = Arc::new(
        BrowserSource::new("https://example.com/")
            .unwrap()
            .with_push_quota(Some(0)),
    );
    let nav = Navigator::new(source.clone()).unwrap();

    let _t = nav.navigate("/swap", NavigateOptions::replacing()).unwrap();
    assert_eq!(source.len(), 1);
    assert_eq!(nav.location().pathname, "/swap");
}

#[test]
fn test_quota_exceeded_mid_transition_falls_back_to_assign() {
    let source = Arc::new(
        BrowserSource::new("https://example.com/")
            .unwrap()
            .with_push_quota(Some(1)),
    );
    let nav = Navigator::new(source.clone()).unwrap();

    let _first = nav.navigate("/one", NavigateOptions::default()).unwrap();
    assert!(nav.is_transitioning());
    assert_eq!(source.len(), 2);

    let _second = nav.navigate("/two", NavigateOptions::default()).unwrap();
    assert_eq!(source.len(), 3);
    assert_eq!(nav.location().pathname, "/two");
    assert!(nav.location().state.is_none());
}

#[test]
fn test_cross_origin_navigation_propagates() {
    let nav = Navigator::new(Arc::new(BrowserSource::new("https://example.com/").unwrap())).unwrap();
    let err = nav
        .navigate("https://other.example/", NavigateOptions::default())
        .unwrap_err();
    assert!(matches!(err, TrailheadError::SecurityError(_)));
    assert!(!nav.is_transitioning());
}

// ═════════════════════════════════════════════════════════════════════
// 4. Listeners
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_push_and_pop_notifications() {
    let (nav, source) = memory_navigator("/");
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);
    let unsub = nav.listen(move |event| {
        events_clone
            .lock()
            .unwrap()
            .push((event.action, event.location.pathname.clone()));
    });

    let _t = nav.navigate("/a", NavigateOptions::default()).unwrap();
    nav.on_transition_complete();
    let _t = nav.navigate("/b", NavigateOptions::default()).unwrap();
    nav.on_transition_complete();
    source.go(-1);
    let _t = nav.navigate(1, NavigateOptions::default()).unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            (Action::Push, "/a".to_string()),
            (Action::Push, "/b".to_string()),
            (Action::Pop, "/a".to_string()),
            (Action::Pop, "/b".to_string()),
        ]
    );
    assert!(!nav.is_transitioning());
    unsub.unsubscribe();
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let (nav, source) = memory_navigator("/");
    let count = Arc::new(Mutex::new(0));
    let count_clone = Arc::clone(&count);
    let unsub = nav.listen(move |_| *count_clone.lock().unwrap() += 1);

    let _t = nav.navigate("/a", NavigateOptions::default()).unwrap();
    nav.on_transition_complete();
    assert_eq!(*count.lock().unwrap(), 1);

    unsub.unsubscribe();
    let _t = nav.navigate("/b", NavigateOptions::default()).unwrap();
    source.go(-1);
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_listener_may_navigate_back() {
    let (nav, source) = memory_navigator("/");
    let handle = nav.clone();
    let unsub = nav.listen(move |event| {
        if event.action == Action::Push && event.location.pathname == "/forbidden" {
            let _t = handle.navigate(-1, NavigateOptions::default()).unwrap();
        }
    });

    let _t = nav.navigate("/forbidden", NavigateOptions::default()).unwrap();
    assert_eq!(source.index(), 0);
    assert_eq!(nav.location().pathname, "/");
    unsub.unsubscribe();
}

#[test]
fn test_serialized_event() {
    let (nav, _) = memory_navigator("/");
    let captured = Arc::new(Mutex::new(None));
    let captured_clone = Arc::clone(&captured);
    let unsub = nav.listen(move |event| {
        *captured_clone.lock().unwrap() = Some(serde_json::to_value(event).unwrap());
    });
    let _t = nav.navigate("/json", NavigateOptions::default()).unwrap();

    let value = captured.lock().unwrap().take().unwrap();
    assert_eq!(value["action"], "PUSH");
    assert_eq!(value["location"]["pathname"], "/json");
    unsub.unsubscribe();
}

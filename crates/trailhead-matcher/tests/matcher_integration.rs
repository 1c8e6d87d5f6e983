//! Integration tests for the matcher.
//!
//! Tests cover: route precedence independent of declaration order, splat and
//! default fallbacks, relative resolution feeding parameter substitution, and
//! property checks for the ranking order and segmentation.

use std::collections::HashMap;

use proptest::prelude::*;
use trailhead_core::TrailheadError;
use trailhead_matcher::{
    insert_params, match_path, pick, rank_routes, resolve, segmentize, shallow_compare,
    strip_slashes, validate_redirect, Route,
};

// ═════════════════════════════════════════════════════════════════════
// 1. A realistic route table
// ═════════════════════════════════════════════════════════════════════

fn app_routes() -> Vec<Route<&'static str>> {
    vec![
        Route::fallback("/", "not-found"),
        Route::new("/files/*", "files"),
        Route::new("/users/:user_id/repos/:repo", "repo"),
        Route::new("/users/:user_id", "user"),
        Route::new("/users/me", "me"),
        Route::new("/users", "users"),
        Route::new("/", "home"),
    ]
}

#[test]
fn test_route_table_resolution() {
    let routes = app_routes();
    let cases = [
        ("/", "home", "/"),
        ("/users", "users", "/users"),
        ("/users/", "users", "/users"),
        ("/users/me", "me", "/users/me"),
        ("/users/ryan", "user", "/users/ryan"),
        ("/users/ryan/repos/trail", "repo", "/users/ryan/repos/trail"),
        ("/files/a/b/c", "files", "/files"),
        ("/users/ryan/settings", "not-found", "/users/ryan/settings"),
    ];
    for (uri, expected, consumed) in cases {
        let m = pick(&routes, uri).unwrap().unwrap();
        assert_eq!(m.route.value, expected, "uri {uri}");
        assert_eq!(m.uri, consumed, "uri {uri}");
    }
}

#[test]
fn test_route_table_reversed_gives_same_answers() {
    let routes = app_routes();
    let mut reversed = app_routes();
    reversed.reverse();
    for uri in ["/", "/users", "/users/me", "/users/x", "/files/q", "/nope"] {
        let a = pick(&routes, uri).unwrap().unwrap();
        let b = pick(&reversed, uri).unwrap().unwrap();
        assert_eq!(a.route, b.route, "uri {uri}");
        assert_eq!(a.params, b.params, "uri {uri}");
    }
}

#[test]
fn test_nested_params() {
    let routes = app_routes();
    let m = pick(&routes, "/users/ryan/repos/trail?tab=code").unwrap().unwrap();
    let expected: HashMap<String, String> = [("user_id", "ryan"), ("repo", "trail")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert!(shallow_compare(&m.params, &expected));
}

#[test]
fn test_reserved_name_surfaces_at_match_time() {
    let routes = vec![Route::new("/docs/:path", ())];
    // Ranking alone never validates.
    assert_eq!(rank_routes(&routes).len(), 1);
    let err = pick(&routes, "/docs/intro").unwrap_err();
    assert!(matches!(err, TrailheadError::ReservedParamName { .. }));
}

// ═════════════════════════════════════════════════════════════════════
// 2. Link following: resolve, then fill params
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_link_following_flow() {
    let routes = app_routes();
    let current = pick(&routes, "/users/ryan").unwrap().unwrap();

    let deeper = resolve("repos/trail", &current.uri);
    assert_eq!(deeper, "/users/ryan/repos/trail");
    assert_eq!(pick(&routes, &deeper).unwrap().unwrap().route.value, "repo");

    let up = resolve("..", &current.uri);
    assert_eq!(up, "/users");

    let target = insert_params("/users/:user_id/repos/:repo", &current.params, None);
    assert!(matches!(target, Err(TrailheadError::MissingParam { .. })));

    let mut params = current.params.clone();
    params.insert("repo".into(), "trail".into());
    let target = insert_params("/users/:user_id/repos/:repo", &params, Some("?tab=code")).unwrap();
    assert_eq!(target, "/users/ryan/repos/trail?tab=code");
}

#[test]
fn test_redirect_validation_guards_params() {
    assert!(validate_redirect("/old/:id", "/new/:id"));
    assert!(!validate_redirect("/old/:id", "/new/:slug"));
    assert!(!validate_redirect("/old", "/new/:id"));
}

#[test]
fn test_match_path_splat_default_name() {
    let m = match_path("/static/*", "/static/css/site.css").unwrap().unwrap();
    assert_eq!(m.params["*"], "css/site.css");
}

// ═════════════════════════════════════════════════════════════════════
// 3. Properties
// ═════════════════════════════════════════════════════════════════════

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #[test]
    fn prop_static_beats_dynamic_beats_splat(
        prefix in prop::collection::vec(word(), 0..4),
        last in word(),
        order in 0usize..6,
    ) {
        let base = if prefix.is_empty() { String::new() } else { format!("/{}", prefix.join("/")) };
        let candidates = [
            Route::new(format!("{base}/{last}"), 0),
            Route::new(format!("{base}/:param"), 1),
            Route::new(format!("{base}/*"), 2),
        ];
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let routes: Vec<_> = permutations[order].iter().map(|&i| candidates[i].clone()).collect();

        let ranked = rank_routes(&routes);
        let values: Vec<i32> = ranked.iter().map(|r| r.route.value).collect();
        prop_assert_eq!(values, vec![0, 1, 2]);
        prop_assert!(ranked[0].score > ranked[1].score && ranked[1].score > ranked[2].score);

        let uri = format!("{base}/{last}");
        let m = pick(&routes, &uri).unwrap().unwrap();
        prop_assert_eq!(m.route.value, 0);
    }

    #[test]
    fn prop_ranking_is_sorted(paths in prop::collection::vec(
        prop::collection::vec(prop_oneof![word(), Just(":id".to_string()), Just("*".to_string())], 0..5),
        1..8,
    )) {
        let routes: Vec<_> = paths.iter().map(|segs| Route::new(format!("/{}", segs.join("/")), ())).collect();
        let ranked = rank_routes(&routes);
        for pair in ranked.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].index < pair[1].index)
            );
        }
    }

    #[test]
    fn prop_segmentize_is_stable(path in "/{0,2}([a-z]{1,5}/{1,2}){0,4}") {
        let once = segmentize(strip_slashes(&path));
        let joined = once.join("/");
        let twice = segmentize(strip_slashes(&joined));
        prop_assert_eq!(once, twice);
    }
}

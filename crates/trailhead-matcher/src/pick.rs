//! Picking the best route for a uri.

use trailhead_core::{TrailheadError, TrailheadResult};

use crate::rank::rank_routes;
use crate::route::{Match, Params, PathMatch, Route};
use crate::segment::{decode_segment, is_reserved, segmentize, Segment};
use crate::utils::split_query;

/// Picks the highest-ranked route that matches `uri`.
///
/// Routes are ranked first (see [`rank_routes`]), so the order of `routes`
/// only matters as a tie-break. The query string of `uri` is ignored. If no
/// regular route matches, the first default route is returned with empty
/// params; if there is none, the result is `Ok(None)`.
///
/// # Errors
///
/// Returns [`TrailheadError::ReservedParamName`] if a route that is compared
/// against `uri` declares a dynamic segment named `uri` or `path`, and
/// [`TrailheadError::MalformedUri`] if a captured component does not decode to
/// UTF-8.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::{pick, Route};
///
/// let routes = vec![Route::new("/users/:id", "user"), Route::new("/users/me", "me")];
///
/// let m = pick(&routes, "/users/42").unwrap().unwrap();
/// assert_eq!(m.route.value, "user");
/// assert_eq!(m.param("id"), Some("42"));
///
/// let m = pick(&routes, "/users/me").unwrap().unwrap();
/// assert_eq!(m.route.value, "me");
/// ```
pub fn pick<'a, T>(routes: &'a [Route<T>], uri: &str) -> TrailheadResult<Option<Match<'a, T>>> {
    let (uri_pathname, _) = split_query(uri);
    let uri_segments = segmentize(uri_pathname);
    let is_root_uri = uri_segments[0].is_empty();

    let mut fallback = None;

    for ranked in rank_routes(routes) {
        let route = ranked.route;

        if route.default {
            if fallback.is_none() {
                fallback = Some(Match {
                    route,
                    params: Params::new(),
                    uri: uri.to_string(),
                });
            }
            continue;
        }

        if let Some((params, consumed)) = match_segments(route, &uri_segments, is_root_uri)? {
            tracing::trace!(uri, route = %route.path, score = ranked.score, "picked route");
            return Ok(Some(Match {
                route,
                params,
                uri: format!("/{}", uri_segments[..consumed].join("/")),
            }));
        }
    }

    if fallback.is_some() {
        tracing::trace!(uri, "no route matched, using default route");
    }
    Ok(fallback)
}

/// Walks the route's segments against the uri's segments.
///
/// Returns the captured params and the number of uri segments consumed, or
/// `None` on a mismatch.
fn match_segments<T>(
    route: &Route<T>,
    uri_segments: &[&str],
    is_root_uri: bool,
) -> TrailheadResult<Option<(Params, usize)>> {
    let route_segments = segmentize(&route.path);
    let max = uri_segments.len().max(route_segments.len());
    let mut params = Params::new();

    for index in 0..max {
        let route_segment = route_segments.get(index).copied().map(Segment::parse);
        let uri_segment = uri_segments.get(index).copied();

        if let Some(Segment::Splat(name)) = route_segment {
            // uri:   /files/documents/work
            // route: /files/*
            let rest = uri_segments[index..]
                .iter()
                .map(|s| decode_segment(s))
                .collect::<TrailheadResult<Vec<_>>>()?;
            params.insert(name.to_string(), rest.join("/"));
            return Ok(Some((params, index)));
        }

        // uri:   /users
        // route: /users/:id
        let Some(uri_segment) = uri_segment else {
            return Ok(None);
        };

        match route_segment {
            Some(Segment::Dynamic(name)) if !is_root_uri => {
                if is_reserved(name) {
                    return Err(TrailheadError::ReservedParamName {
                        name: name.to_string(),
                        path: route.path.clone(),
                    });
                }
                params.insert(name.to_string(), decode_segment(uri_segment)?);
            }
            _ => {
                // Compared literally; a route shorter than the uri misses here.
                if route_segments.get(index) != Some(&uri_segment) {
                    return Ok(None);
                }
            }
        }
    }

    Ok(Some((params, max)))
}

/// Matches a single pattern against a uri.
///
/// Shorthand for [`pick`] over one ad-hoc, non-default route.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::match_path;
///
/// let m = match_path("/files/*", "/files/a/b/c").unwrap().unwrap();
/// assert_eq!(m.params["*"], "a/b/c");
/// assert_eq!(m.uri, "/files");
///
/// assert!(match_path("/a", "/b").unwrap().is_none());
/// ```
pub fn match_path(path: &str, uri: &str) -> TrailheadResult<Option<PathMatch>> {
    let routes = [Route::new(path, ())];
    Ok(pick(&routes, uri)?.map(PathMatch::from))
}

//! Relative path resolution.
//!
//! Paths are resolved as though every path is a directory and never a file,
//! the way `cd` works on a command line:
//!
//! ```text
//! resolve("profile", "/users/789")   => /users/789/profile
//! resolve("../",     "/users/123")   => /users
//! resolve("../..",   "/users/123")   => /
//! resolve("?a=b",    "/users?b=c")   => /users?a=b
//! resolve("/x",      "/anything")    => /x
//! ```
//!
//! A browser would resolve `foo` against `/bar` to `/foo`; here it is
//! `/bar/foo`, so a link only needs to know where it wants to go relative to
//! the route it lives in.

use crate::segment::segmentize;
use crate::utils::{add_query, split_query, starts_with};

/// Resolves `to` against `base`.
///
/// * An absolute `to` (leading `/`) is returned unchanged.
/// * A `to` that is only a query string replaces the query of `base`.
/// * A `to` whose first segment does not start with `.` is appended to `base`.
/// * Otherwise the segments of `base` and `to` are reduced left to right: `..`
///   drops the last kept segment (a no-op once nothing is left), `.` and empty
///   segments are skipped.
///
/// The query of `to` is always kept; the query of `base` never is.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::resolve;
///
/// assert_eq!(resolve("foo", "/bar/"), "/bar/foo");
/// assert_eq!(resolve("../../one", "/a/b/c/d"), "/a/b/one");
/// assert_eq!(resolve("../..", "/users/123"), "/");
/// ```
pub fn resolve(to: &str, base: &str) -> String {
    if to.starts_with('/') {
        return to.to_string();
    }

    let (to_pathname, to_query) = split_query(to);
    let (base_pathname, _) = split_query(base);

    let to_segments = segmentize(to_pathname);
    let base_segments = segmentize(base_pathname);

    if to_segments[0].is_empty() {
        return add_query(base_pathname, &[to_query]);
    }

    if !starts_with(to_segments[0], ".") {
        let pathname = if base_segments == [""] {
            to_segments.join("/")
        } else {
            let mut all = base_segments;
            all.extend(to_segments);
            all.join("/")
        };
        return add_query(&format!("/{pathname}"), &[to_query]);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in base_segments.into_iter().chain(to_segments) {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }

    add_query(&format!("/{}", segments.join("/")), &[to_query])
}

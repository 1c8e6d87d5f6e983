//! Small string and map helpers shared by the matcher and its callers.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Returns `true` if `string` starts with `search`.
pub fn starts_with(string: &str, search: &str) -> bool {
    string.starts_with(search)
}

/// Removes every leading and trailing `/` from `s`.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::strip_slashes;
///
/// assert_eq!(strip_slashes("//users/42/"), "users/42");
/// assert_eq!(strip_slashes("/"), "");
/// ```
pub fn strip_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

/// Shallow-compares two maps: same key set and equal values for every key.
///
/// Used to decide whether the params of a match changed between two
/// resolutions of the same route.
pub fn shallow_compare<K, V, S>(a: &HashMap<K, V, S>, b: &HashMap<K, V, S>) -> bool
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Appends the non-empty query fragments to `pathname`, joined by `&`.
pub(crate) fn add_query(pathname: &str, queries: &[&str]) -> String {
    let parts: Vec<&str> = queries.iter().copied().filter(|q| !q.is_empty()).collect();
    if parts.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{}", parts.join("&"))
    }
}

/// Splits `uri` on `?`, returning the text before the first `?` and the text
/// between the first and the second one.
pub(crate) fn split_query(uri: &str) -> (&str, &str) {
    let mut parts = uri.split('?');
    let pathname = parts.next().unwrap_or_default();
    let query = parts.next().unwrap_or_default();
    (pathname, query)
}

//! Path templating: substituting parameters back into a pattern, and checking
//! that a redirect target only uses parameters its source captures.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use trailhead_core::{TrailheadError, TrailheadResult};

use crate::segment::{is_dynamic, segmentize};
use crate::utils::{add_query, split_query};

/// Substitutes `params` into the dynamic segments of `path`.
///
/// Static and splat segments are kept as written. The query of `path` is kept,
/// and if `search` is given (a location search such as `?page=2`), the part
/// after its `?` is appended as another query fragment.
///
/// # Errors
///
/// Returns [`TrailheadError::MissingParam`] if a dynamic segment has no value
/// in `params`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use trailhead_matcher::insert_params;
///
/// let mut params = HashMap::new();
/// params.insert("id", "7");
/// assert_eq!(
///     insert_params("/users/:id/profile", &params, None).unwrap(),
///     "/users/7/profile"
/// );
/// assert_eq!(
///     insert_params("/users/:id?tab=a", &params, Some("?page=2")).unwrap(),
///     "/users/7?tab=a&page=2"
/// );
/// ```
pub fn insert_params<K, V, S>(
    path: &str,
    params: &HashMap<K, V, S>,
    search: Option<&str>,
) -> TrailheadResult<String>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    let (path_base, query) = split_query(path);

    let segments = segmentize(path_base)
        .into_iter()
        .map(|segment| {
            if is_dynamic(segment) {
                let name = &segment[1..];
                params
                    .get(name)
                    .map(|value| value.as_ref())
                    .ok_or_else(|| TrailheadError::MissingParam {
                        name: name.to_string(),
                        path: path.to_string(),
                    })
            } else {
                Ok(segment)
            }
        })
        .collect::<TrailheadResult<Vec<_>>>()?;

    let search_query = search.and_then(|s| s.split('?').nth(1)).unwrap_or_default();
    Ok(add_query(
        &format!("/{}", segments.join("/")),
        &[query, search_query],
    ))
}

/// Returns `true` if `from` and `to` declare the same dynamic parameters.
///
/// A redirect whose target names a parameter the source never captures could
/// not be filled in, so it is rejected.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::validate_redirect;
///
/// assert!(validate_redirect("/a/:x", "/b/:x"));
/// assert!(!validate_redirect("/a/:x", "/b/:y"));
/// ```
pub fn validate_redirect(from: &str, to: &str) -> bool {
    dynamic_segments(from) == dynamic_segments(to)
}

fn dynamic_segments(path: &str) -> Vec<&str> {
    let mut names: Vec<&str> = segmentize(path).into_iter().filter(|s| is_dynamic(s)).collect();
    names.sort_unstable();
    names
}

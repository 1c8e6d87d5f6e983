//! Route and match types.

use std::collections::HashMap;

use serde::Serialize;

/// Captured parameters of a match, keyed by parameter name.
pub type Params = HashMap<String, String>;

/// A route pattern with an arbitrary payload.
///
/// At most one route in a set should be a default (fallback) route; if several
/// are, the earliest one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route<T> {
    /// The pattern, e.g. `/users/:id` or `/files/*`.
    pub path: String,
    /// Whether this route is the fallback used when nothing else matches.
    pub default: bool,
    /// The payload selected when this route matches.
    pub value: T,
}

impl<T> Route<T> {
    /// Creates a regular route.
    pub fn new(path: impl Into<String>, value: T) -> Self {
        Self {
            path: path.into(),
            default: false,
            value,
        }
    }

    /// Creates a fallback route.
    pub fn fallback(path: impl Into<String>, value: T) -> Self {
        Self {
            path: path.into(),
            default: true,
            value,
        }
    }
}

/// The outcome of picking a route for a uri.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match<'a, T> {
    /// The selected route.
    pub route: &'a Route<T>,
    /// Parameters captured by dynamic and splat segments.
    pub params: Params,
    /// The part of the uri the route consumed, always starting with `/`.
    ///
    /// For a fallback route this is the full uri that was picked against.
    pub uri: String,
}

impl<T> Match<'_, T> {
    /// Get a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A match produced by [`match_path`](crate::match_path), detached from any
/// route set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathMatch {
    /// Parameters captured by dynamic and splat segments.
    pub params: Params,
    /// The part of the uri the pattern consumed.
    pub uri: String,
}

impl<T> From<Match<'_, T>> for PathMatch {
    fn from(m: Match<'_, T>) -> Self {
        Self {
            params: m.params,
            uri: m.uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_constructors() {
        let r = Route::new("/users/:id", 1);
        assert!(!r.default);
        assert_eq!(r.path, "/users/:id");

        let f = Route::fallback("/404", 2);
        assert!(f.default);
        assert_eq!(f.value, 2);
    }

    #[test]
    fn test_match_param_lookup() {
        let route = Route::new("/users/:id", ());
        let m = Match {
            route: &route,
            params: [("id".to_string(), "42".to_string())].into_iter().collect(),
            uri: "/users/42".into(),
        };
        assert_eq!(m.param("id"), Some("42"));
        assert_eq!(m.param("missing"), None);

        let detached = PathMatch::from(m);
        assert_eq!(detached.uri, "/users/42");
    }
}

//! # trailhead-matcher
//!
//! Pure, stateless path matching for trailhead. Given a set of route patterns
//! and a uri, it ranks the routes by specificity and picks the single best
//! match, so route declaration order never has to encode priority.
//!
//! - [`segment`]: splitting paths into segments and classifying them
//! - [`rank`]: scoring routes by specificity
//! - [`pick`]: selecting the best route and capturing its params
//! - [`resolve`]: resolving relative paths as directories
//! - [`params`]: substituting params into a pattern and validating redirects
//! - [`utils`]: string and map helpers
//!
//! # Examples
//!
//! ```
//! use trailhead_matcher::{pick, resolve, insert_params, Route};
//! use std::collections::HashMap;
//!
//! let routes = vec![
//!     Route::new("/", "home"),
//!     Route::new("/users/:id", "user"),
//!     Route::new("/users/me", "me"),
//!     Route::new("/files/*", "files"),
//!     Route::fallback("/", "not-found"),
//! ];
//!
//! let m = pick(&routes, "/users/42").unwrap().unwrap();
//! assert_eq!(m.route.value, "user");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! assert_eq!(pick(&routes, "/nope/nope").unwrap().unwrap().route.value, "not-found");
//!
//! let target = resolve("../me", &m.uri);
//! assert_eq!(target, "/users/me");
//!
//! let url = insert_params("/users/:id", &m.params, None).unwrap();
//! assert_eq!(url, "/users/42");
//! ```

pub mod params;
pub mod pick;
pub mod rank;
pub mod resolve;
pub mod route;
pub mod segment;
pub mod utils;

pub use params::{insert_params, validate_redirect};
pub use pick::{match_path, pick};
pub use rank::{rank_route, rank_routes, RankedRoute};
pub use resolve::resolve;
pub use route::{Match, Params, PathMatch, Route};
pub use segment::{segmentize, Segment};
pub use utils::{shallow_compare, starts_with, strip_slashes};

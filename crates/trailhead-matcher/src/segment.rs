//! Path segmentation.
//!
//! A path is split into `/`-delimited segments with every leading and trailing
//! slash removed first. Each segment is classified syntactically into a
//! [`Segment`] kind:
//!
//! | Syntax   | Kind                 | Example       |
//! |----------|----------------------|---------------|
//! | *(empty)*| [`Segment::Root`]    | `/`           |
//! | `:name`  | [`Segment::Dynamic`] | `/users/:id`  |
//! | `*name`  | [`Segment::Splat`]   | `/files/*rest`|
//! | other    | [`Segment::Static`]  | `/about`      |

use percent_encoding::percent_decode_str;
use trailhead_core::{TrailheadError, TrailheadResult};

use crate::utils::strip_slashes;

/// Parameter name used by a splat segment with no name of its own.
pub const DEFAULT_SPLAT_NAME: &str = "*";

/// Parameter names that dynamic segments may not use.
pub const RESERVED_NAMES: [&str; 2] = ["uri", "path"];

/// A classified path segment, borrowing from the path it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// The empty segment produced by the root path.
    Root,
    /// Literal text that must match exactly.
    Static(&'a str),
    /// `:name`, captures one component under `name`.
    Dynamic(&'a str),
    /// `*name`, captures every remaining component under `name`
    /// (or [`DEFAULT_SPLAT_NAME`]).
    Splat(&'a str),
}

impl<'a> Segment<'a> {
    /// Classifies a single raw segment.
    ///
    /// A lone `:` is static text, not a dynamic segment.
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() {
            Self::Root
        } else if is_dynamic(raw) {
            Self::Dynamic(&raw[1..])
        } else if let Some(name) = raw.strip_prefix('*') {
            Self::Splat(if name.is_empty() { DEFAULT_SPLAT_NAME } else { name })
        } else {
            Self::Static(raw)
        }
    }

    /// Returns the parameter name captured by this segment, if any.
    pub const fn param_name(&self) -> Option<&'a str> {
        match self {
            Self::Dynamic(name) | Self::Splat(name) => Some(name),
            Self::Root | Self::Static(_) => None,
        }
    }
}

/// Returns `true` if `segment` is a dynamic (`:name`) segment.
pub fn is_dynamic(segment: &str) -> bool {
    segment.len() > 1 && segment.starts_with(':')
}

/// Returns `true` if `segment` is a splat (`*` or `*name`) segment.
pub fn is_splat(segment: &str) -> bool {
    segment.starts_with('*')
}

/// Returns `true` if `name` may not be used as a dynamic parameter name.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Splits a path into its segments.
///
/// Leading and trailing slashes are stripped before splitting, so an empty or
/// all-slash path yields a single empty segment rather than no segments.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::segmentize;
///
/// assert_eq!(segmentize("/users/42/"), vec!["users", "42"]);
/// assert_eq!(segmentize("/"), vec![""]);
/// assert_eq!(segmentize(""), vec![""]);
/// ```
pub fn segmentize(path: &str) -> Vec<&str> {
    strip_slashes(path).split('/').collect()
}

/// Percent-decodes one path component.
///
/// Invalid escape sequences pass through unchanged; escapes that decode to
/// invalid UTF-8 are an error.
pub fn decode_segment(segment: &str) -> TrailheadResult<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| TrailheadError::MalformedUri(format!("{segment}: {e}")))
}

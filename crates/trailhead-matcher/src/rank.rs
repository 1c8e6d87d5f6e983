//! Route ranking.
//!
//! Every segment earns [`SEGMENT_POINTS`] and then a bonus or penalty for its
//! kind, so that
//!
//! ```text
//! static > dynamic > root > splat
//! ```
//!
//! at equal segment count. Longer routes accumulate more base points, so a
//! splat route still outranks a shorter route in some configurations. Default
//! routes always score zero. Sorting by score, then by declaration index,
//! gives a total order that does not depend on how routes were declared
//! beyond the tie-break.

use std::cmp::Ordering;

use crate::route::Route;
use crate::segment::{segmentize, Segment};

/// Base points for every segment.
pub const SEGMENT_POINTS: i32 = 4;
/// Bonus for a static segment.
pub const STATIC_POINTS: i32 = 3;
/// Bonus for a dynamic segment.
pub const DYNAMIC_POINTS: i32 = 2;
/// Extra penalty applied to a splat segment on top of cancelling its base points.
pub const SPLAT_PENALTY: i32 = 1;
/// Bonus for the root segment.
pub const ROOT_POINTS: i32 = 1;

/// A route annotated with its score and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedRoute<'a, T> {
    /// The ranked route.
    pub route: &'a Route<T>,
    /// The specificity score.
    pub score: i32,
    /// Position of the route in the slice it was ranked from.
    pub index: usize,
}

/// Scores a single segment.
const fn segment_score(segment: Segment<'_>) -> i32 {
    SEGMENT_POINTS
        + match segment {
            Segment::Root => ROOT_POINTS,
            Segment::Dynamic(_) => DYNAMIC_POINTS,
            Segment::Splat(_) => -(SEGMENT_POINTS + SPLAT_PENALTY),
            Segment::Static(_) => STATIC_POINTS,
        }
}

/// Scores a route. Default routes score zero.
///
/// # Examples
///
/// ```
/// use trailhead_matcher::{rank_route, Route};
///
/// assert_eq!(rank_route(&Route::new("/users/me", ()), 0).score, 14);
/// assert_eq!(rank_route(&Route::new("/users/:id", ()), 0).score, 13);
/// assert_eq!(rank_route(&Route::new("/users/*", ()), 0).score, 6);
/// assert_eq!(rank_route(&Route::new("/", ()), 0).score, 5);
/// ```
pub fn rank_route<T>(route: &Route<T>, index: usize) -> RankedRoute<'_, T> {
    let score = if route.default {
        0
    } else {
        segmentize(&route.path)
            .into_iter()
            .map(|raw| segment_score(Segment::parse(raw)))
            .sum::<i32>()
    };
    RankedRoute { route, score, index }
}

/// Ranks every route, highest score first, ties in declaration order.
pub fn rank_routes<T>(routes: &[Route<T>]) -> Vec<RankedRoute<'_, T>> {
    let mut ranked: Vec<_> = routes
        .iter()
        .enumerate()
        .map(|(index, route)| rank_route(route, index))
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked<T>(a: &RankedRoute<'_, T>, b: &RankedRoute<'_, T>) -> Ordering {
    b.score.cmp(&a.score).then(a.index.cmp(&b.index))
}

//! Overlap resolution for segments already known to be collinear.
//!
//! Both segments are canonical (`p1 <= p2`), so the overlap is the interval
//! `[max(a1, b1), min(a2, b2)]` under the point order, empty when the
//! intervals are strictly apart.

use std::cmp::Ordering;

use super::Intersection;
use crate::geom::{Point, Segment};
use crate::numeric::Scalar;

/// Overlap of two collinear segments: nothing, a touching point, or a sub-segment.
///
/// Pre: the caller established collinearity (all three determinants zero).
/// Zero-length inputs are fine; they resolve to a point overlap or nothing.
pub fn resolve_collinear<T: Scalar>(a: &Segment<T>, b: &Segment<T>) -> Option<Intersection<T>> {
    if a.p2.lex_cmp(&b.p1) == Ordering::Less || b.p2.lex_cmp(&a.p1) == Ordering::Less {
        return None;
    }
    let start = a.p1.lex_max(&b.p1);
    let end = a.p2.lex_min(&b.p2);
    let mut bounds: Vec<Point<T>> = Vec::with_capacity(2);
    bounds.push(start.clone());
    if end != start {
        bounds.push(end.clone());
    }
    Some(from_bounds(bounds))
}

/// Classify an overlap from its boundary points.
///
/// Panics when handed more than two points: the resolver never produces them,
/// so seeing one means the interval logic is broken.
pub(crate) fn from_bounds<T: Scalar>(bounds: Vec<Point<T>>) -> Intersection<T> {
    let n = bounds.len();
    let mut it = bounds.into_iter();
    match (it.next(), it.next(), n) {
        (Some(p), None, 1) => Intersection::PointOverlap(p),
        (Some(start), Some(end), 2) => {
            debug_assert!(start.lex_cmp(&end) == Ordering::Less);
            Intersection::SegmentOverlap(start, end)
        }
        _ => panic!("malformed collinear overlap: {n} boundary points"),
    }
}

//! Descriptive statistics of a segment input file.
//!
//! Purpose
//! - Characterize how degenerate a test input is before comparing engines on
//!   it: repeated coordinates, zero-length and axis-parallel segments, and how
//!   many pairs fall into each intersection class.
//!
//! Notes
//! - Coordinates are compared by value with `-0.0 == 0.0` (keys are the bits of
//!   `x + 0.0`). NaN coordinates are keyed by their bits.
//! - Pair classes come from the columnar double engine.
//!
//! Code cross-refs: `batch::intersect_columns`

use std::collections::HashSet;

use serde::Serialize;

use crate::batch::intersect_batch;
use crate::geom::{Point, Segment};
use crate::intersect::Intersection;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InputStats {
    /// Number of segments.
    pub segs: usize,
    /// Number of unordered pairs, `n(n-1)/2`.
    pub combs: usize,
    /// Distinct endpoints.
    pub points: usize,
    /// Segments whose endpoints coincide.
    pub length_0: usize,
    /// Nonzero-length segments with equal x.
    pub vertical: usize,
    /// Nonzero-length segments with equal y.
    pub horizontal: usize,
    /// Endpoint x values that repeat an earlier one.
    pub same_x: usize,
    /// Endpoint y values that repeat an earlier one.
    pub same_y: usize,
    /// Endpoints that repeat an earlier one.
    pub same_p: usize,
    /// Pairs sharing a sub-segment.
    pub overlap: usize,
    /// Collinear pairs touching in one point.
    pub online: usize,
    /// Pairs with a true crossing.
    pub intersect: usize,
    /// Distinct true crossing points.
    pub intersection_points: usize,
    /// Distinct true crossing points that are not also endpoints.
    pub true_intersection_points: usize,
}

#[inline]
fn key(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

#[inline]
fn point_key(p: &Point<f64>) -> (u64, u64) {
    (key(p.x), key(p.y))
}

impl InputStats {
    pub fn collect(segments: &[Segment<f64>]) -> Self {
        let n = segments.len();
        let mut stats = InputStats {
            segs: n,
            combs: n * n.saturating_sub(1) / 2,
            ..Default::default()
        };

        let mut xs = HashSet::new();
        let mut ys = HashSet::new();
        let mut endpoints = HashSet::new();
        for s in segments {
            if s.is_degenerate() {
                stats.length_0 += 1;
            } else if s.p1.x == s.p2.x {
                stats.vertical += 1;
            } else if s.p1.y == s.p2.y {
                stats.horizontal += 1;
            }
            for p in [&s.p1, &s.p2] {
                xs.insert(key(p.x));
                ys.insert(key(p.y));
                endpoints.insert(point_key(p));
            }
        }
        stats.points = endpoints.len();
        stats.same_x = 2 * n - xs.len();
        stats.same_y = 2 * n - ys.len();
        stats.same_p = 2 * n - endpoints.len();

        let mut crossings = HashSet::new();
        for record in intersect_batch(segments) {
            match &record.intersection {
                Intersection::SegmentOverlap(..) => stats.overlap += 1,
                Intersection::PointOverlap(_) => stats.online += 1,
                Intersection::TrueCrossing(p) => {
                    stats.intersect += 1;
                    crossings.insert(point_key(p));
                }
            }
        }
        stats.intersection_points = crossings.len();
        stats.true_intersection_points = crossings.difference(&endpoints).count();

        tracing::debug!(segs = n, records = stats.overlap + stats.online + stats.intersect, "input stats");
        stats
    }
}

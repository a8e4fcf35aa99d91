//! Pairwise segment intersection (determinant method) and the all-pairs driver.
//!
//! Purpose
//! - Reference O(n²) intersection over any numeric backend. No spatial index,
//!   no sweep; every unordered pair is tested once.
//!
//! Method (for `a = (p1, p2)`, `b = (p3, p4)`)
//! - `d1 = p2 - p1`, `d2 = p4 - p3`, `d3 = p1 - p3`.
//! - `det = d1 × d2`, `det1 = d1 × d3`, `det2 = d2 × d3`.
//! - `det == 0`: parallel; collinear iff `det1 == det2 == 0`, then the overlap
//!   resolver decides. Otherwise no intersection.
//! - else `s = det1 / det` (along `b`), `t = det2 / det` (along `a`); accept
//!   iff both lie in `[0 - tol, 1 + tol]`; the point is `p1 + t·d1`.
//!
//! Code cross-refs: `collinear::resolve_collinear`, `bbox::bbox_crossing`,
//! `batch::intersect_columns` (double-only columnar variant).

pub mod bbox;
mod collinear;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::{cross, Point, Segment, SegmentId};
use crate::numeric::{Backend, Scalar};

pub use collinear::resolve_collinear;

/// Class of an intersection record, without its geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntersectionKind {
    TrueCrossing,
    PointOverlap,
    SegmentOverlap,
}

/// Geometric result for one pair.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersection<T> {
    /// Non-collinear segments meeting at one point within both bounds.
    TrueCrossing(Point<T>),
    /// Collinear segments touching at exactly one point.
    PointOverlap(Point<T>),
    /// Collinear segments sharing a sub-segment; `start < end` in point order.
    SegmentOverlap(Point<T>, Point<T>),
}

impl<T> Intersection<T> {
    pub fn kind(&self) -> IntersectionKind {
        match self {
            Intersection::TrueCrossing(_) => IntersectionKind::TrueCrossing,
            Intersection::PointOverlap(_) => IntersectionKind::PointOverlap,
            Intersection::SegmentOverlap(..) => IntersectionKind::SegmentOverlap,
        }
    }

    /// Boundary points: one for crossings and point overlaps, two for segment overlaps.
    pub fn points(&self) -> impl Iterator<Item = &Point<T>> {
        let (first, second) = match self {
            Intersection::TrueCrossing(p) | Intersection::PointOverlap(p) => (p, None),
            Intersection::SegmentOverlap(s, e) => (s, Some(e)),
        };
        std::iter::once(first).chain(second)
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        match self {
            Intersection::SegmentOverlap(..) => 2,
            _ => 1,
        }
    }
}

/// An intersection plus the pair of input segments that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionRecord<T> {
    pub intersection: Intersection<T>,
    /// `(lower, higher)` input indices; `None` for ad hoc pair queries.
    pub segments: Option<(SegmentId, SegmentId)>,
}

impl<T> IntersectionRecord<T> {
    #[inline]
    pub fn kind(&self) -> IntersectionKind {
        self.intersection.kind()
    }
}

/// Total boundary points over a result set (segment overlaps count twice).
pub fn point_total<T>(records: &[IntersectionRecord<T>]) -> usize {
    records.iter().map(|r| r.intersection.point_count()).sum()
}

/// Engine configuration.
///
/// `tolerance` relaxes the parametric window to `[-tol, 1 + tol]`. Zero is the
/// exact reference path; nonzero values emulate epsilon-based implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineCfg {
    pub tolerance: f64,
}

impl EngineCfg {
    #[inline]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

/// How two supporting lines relate.
#[derive(Clone, Debug, PartialEq)]
pub enum LineRelation<T> {
    /// `det == 0` but the lines are distinct.
    Parallel,
    /// All three determinants vanish.
    Collinear,
    /// Unique crossing of the lines: `s` is the parameter along the second
    /// segment, `t` along the first.
    Crossing { s: T, t: T },
}

/// Steps 1–4 of the determinant method, without the bounds test.
pub fn line_relation<T: Scalar>(a: &Segment<T>, b: &Segment<T>) -> LineRelation<T> {
    let (d1x, d1y) = direction(a);
    let (d2x, d2y) = direction(b);
    let d3x = a.p1.x.clone() - b.p1.x.clone();
    let d3y = a.p1.y.clone() - b.p1.y.clone();

    let det = cross(&d1x, &d1y, &d2x, &d2y);
    let det1 = cross(&d1x, &d1y, &d3x, &d3y);
    let det2 = cross(&d2x, &d2y, &d3x, &d3y);

    if det.is_zero() {
        return if det1.is_zero() && det2.is_zero() {
            LineRelation::Collinear
        } else {
            LineRelation::Parallel
        };
    }
    LineRelation::Crossing {
        s: det1 / det.clone(),
        t: det2 / det,
    }
}

/// `p1 + t·d1` on the first segment.
pub fn point_on_first<T: Scalar>(a: &Segment<T>, t: &T) -> Point<T> {
    let (dx, dy) = direction(a);
    Point::new(
        a.p1.x.clone() + t.clone() * dx,
        a.p1.y.clone() + t.clone() * dy,
    )
}

/// `p3 + s·d2` on the second segment; the alternative formulation of the same point.
pub fn point_on_second<T: Scalar>(b: &Segment<T>, s: &T) -> Point<T> {
    point_on_first(b, s)
}

#[inline]
fn direction<T: Scalar>(s: &Segment<T>) -> (T, T) {
    (
        s.p2.x.clone() - s.p1.x.clone(),
        s.p2.y.clone() - s.p1.y.clone(),
    )
}

/// Configured pairwise engine for one backend.
///
/// Holds the parametric window already lifted into the backend, so the hot
/// path compares scalars only.
#[derive(Clone, Debug)]
pub struct Intersector<T> {
    lo: T,
    hi: T,
    cfg: EngineCfg,
}

impl<T: Scalar> Intersector<T> {
    pub fn new<B: Backend<Scalar = T>>(backend: &B, cfg: EngineCfg) -> Result<Self> {
        let tol = cfg.tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::InvalidTolerance(tol));
        }
        Ok(Self {
            lo: backend.lift(0.0 - tol)?,
            hi: backend.lift(1.0 + tol)?,
            cfg,
        })
    }

    /// Exact reference engine (`tolerance = 0`).
    pub fn exact<B: Backend<Scalar = T>>(backend: &B) -> Result<Self> {
        Self::new(backend, EngineCfg::default())
    }

    #[inline]
    pub fn cfg(&self) -> EngineCfg {
        self.cfg
    }

    #[inline]
    fn in_window(&self, v: &T) -> bool {
        self.lo <= *v && *v <= self.hi
    }

    /// Intersect two segments: nothing, a crossing, or a collinear overlap.
    pub fn intersect(&self, a: &Segment<T>, b: &Segment<T>) -> Option<Intersection<T>> {
        match line_relation(a, b) {
            LineRelation::Parallel => None,
            LineRelation::Collinear => resolve_collinear(a, b),
            LineRelation::Crossing { s, t } => {
                if self.in_window(&s) && self.in_window(&t) {
                    Some(Intersection::TrueCrossing(point_on_first(a, &t)))
                } else {
                    None
                }
            }
        }
    }

    /// All unordered pairs, flattened in `(i, j)` order with `i < j`.
    pub fn all_pairs(&self, segments: &[Segment<T>]) -> Vec<IntersectionRecord<T>> {
        self.all_pairs_with(segments, |_, _| {})
    }

    /// As [`Intersector::all_pairs`], calling `visit` for every evaluated pair.
    pub fn all_pairs_with<F>(&self, segments: &[Segment<T>], mut visit: F) -> Vec<IntersectionRecord<T>>
    where
        F: FnMut(SegmentId, SegmentId),
    {
        let mut out = Vec::new();
        for (i, j) in unordered_pairs(segments.len()) {
            visit(i, j);
            if let Some(hit) = self.intersect(&segments[i.0], &segments[j.0]) {
                out.push(IntersectionRecord {
                    intersection: hit,
                    segments: Some((i, j)),
                });
            }
        }
        tracing::debug!(
            segments = segments.len(),
            records = out.len(),
            tolerance = self.cfg.tolerance,
            "all_pairs"
        );
        out
    }
}

/// Every unordered pair `(i, j)`, `i < j < n`, exactly once: `n(n-1)/2` items.
pub fn unordered_pairs(n: usize) -> impl Iterator<Item = (SegmentId, SegmentId)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (SegmentId(i), SegmentId(j))))
}

/// One-shot pair query: build an engine for `backend` and intersect `a` with `b`.
pub fn intersect<B: Backend>(
    backend: &B,
    a: &Segment<B::Scalar>,
    b: &Segment<B::Scalar>,
    tolerance: f64,
) -> Result<Option<Intersection<B::Scalar>>> {
    let engine = Intersector::new(backend, EngineCfg::with_tolerance(tolerance))?;
    Ok(engine.intersect(a, b))
}

//! Columnar (vectorized) all-pairs intersection over doubles.
//!
//! Purpose
//! - Throughput variant of the all-pairs driver: segments live in four
//!   `DVector<f64>` columns and the determinants for a whole batch of pairs are
//!   computed with column arithmetic instead of per-pair scalar code.
//! - Output feeds statistics (overlap / on-line / crossing counts). It is not
//!   the reference; the rational scalar engine is.
//!
//! Pairing
//! - For `offset` in `1..n`, row `i` is paired with row `i + offset` by
//!   slicing `rows(0, n - offset)` against `rows(offset, n - offset)`. Each
//!   unordered pair is visited exactly once, lower row first, so records match
//!   the scalar driver's `(i, j)` orientation.
//!
//! Filter
//! - Per batch, `det`, `det1`, `det2` are sign-normalized so `det >= 0`, then a
//!   pair is a candidate iff `0 <= det1 <= det` and `0 <= det2 <= det`. With
//!   `det == 0` this forces `det1 == det2 == 0`, i.e. collinear, which goes to
//!   the overlap resolver; otherwise the point is `p1 + t·d1`, `t = det2 / det`.
//!
//! Code cross-refs: `intersect::Intersector::all_pairs` (scalar driver),
//! `intersect::resolve_collinear`, `stats::InputStats`

use nalgebra::DVector;

use crate::geom::{Point, Segment, SegmentId};
use crate::intersect::{resolve_collinear, Intersection, IntersectionRecord};

/// Four parallel coordinate columns, one row per canonical segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentColumns {
    pub x1: DVector<f64>,
    pub y1: DVector<f64>,
    pub x2: DVector<f64>,
    pub y2: DVector<f64>,
}

impl SegmentColumns {
    pub fn from_segments(segments: &[Segment<f64>]) -> Self {
        Self {
            x1: DVector::from_iterator(segments.len(), segments.iter().map(|s| s.p1.x)),
            y1: DVector::from_iterator(segments.len(), segments.iter().map(|s| s.p1.y)),
            x2: DVector::from_iterator(segments.len(), segments.iter().map(|s| s.p2.x)),
            y2: DVector::from_iterator(segments.len(), segments.iter().map(|s| s.p2.y)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x1.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x1.is_empty()
    }

    /// Row `i` as a segment (canonical, since rows are stored canonical).
    pub fn row(&self, i: usize) -> Segment<f64> {
        Segment::new(
            Point::new(self.x1[i], self.y1[i]),
            Point::new(self.x2[i], self.y2[i]),
        )
    }
}

/// Sign-normalized determinant columns for one offset batch.
struct Batch {
    det: DVector<f64>,
    det1: DVector<f64>,
    det2: DVector<f64>,
    dx1: DVector<f64>,
    dy1: DVector<f64>,
}

fn batch_for_offset(cols: &SegmentColumns, offset: usize) -> Batch {
    let m = cols.len() - offset;
    // a: rows 0..m, b: rows offset..n
    let (ax1, ay1) = (cols.x1.rows(0, m), cols.y1.rows(0, m));
    let (ax2, ay2) = (cols.x2.rows(0, m), cols.y2.rows(0, m));
    let (bx1, by1) = (cols.x1.rows(offset, m), cols.y1.rows(offset, m));
    let (bx2, by2) = (cols.x2.rows(offset, m), cols.y2.rows(offset, m));

    let dx1 = &ax2 - &ax1;
    let dy1 = &ay2 - &ay1;
    let dx2 = &bx2 - &bx1;
    let dy2 = &by2 - &by1;
    let dx3 = &ax1 - &bx1;
    let dy3 = &ay1 - &by1;

    let det = dx1.component_mul(&dy2) - dx2.component_mul(&dy1);
    let det1 = dx1.component_mul(&dy3) - dx3.component_mul(&dy1);
    let det2 = dx2.component_mul(&dy3) - dx3.component_mul(&dy2);

    let sign = det.map(|d| if d < 0.0 { -1.0 } else { 1.0 });
    Batch {
        det: det.component_mul(&sign),
        det1: det1.component_mul(&sign),
        det2: det2.component_mul(&sign),
        dx1,
        dy1,
    }
}

/// All-pairs intersection over columns. Output is grouped by offset, then by row.
pub fn intersect_columns(cols: &SegmentColumns) -> Vec<IntersectionRecord<f64>> {
    let n = cols.len();
    let mut out = Vec::new();
    for offset in 1..n {
        let b = batch_for_offset(cols, offset);
        let candidates = (0..n - offset).filter(|&k| {
            let (d, d1, d2) = (b.det[k], b.det1[k], b.det2[k]);
            0.0 <= d1 && d1 <= d && 0.0 <= d2 && d2 <= d
        });
        for k in candidates {
            let (i, j) = (k, k + offset);
            let hit = if b.det[k] == 0.0 {
                resolve_collinear(&cols.row(i), &cols.row(j))
            } else {
                let t = b.det2[k] / b.det[k];
                Some(Intersection::TrueCrossing(Point::new(
                    cols.x1[i] + t * b.dx1[k],
                    cols.y1[i] + t * b.dy1[k],
                )))
            };
            if let Some(intersection) = hit {
                out.push(IntersectionRecord {
                    intersection,
                    segments: Some((SegmentId(i), SegmentId(j))),
                });
            }
        }
    }
    tracing::debug!(segments = n, records = out.len(), "intersect_columns");
    out
}

/// Convenience: build columns from segments and run [`intersect_columns`].
pub fn intersect_batch(segments: &[Segment<f64>]) -> Vec<IntersectionRecord<f64>> {
    intersect_columns(&SegmentColumns::from_segments(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersect::{IntersectionKind, Intersector};
    use crate::numeric::DoubleBackend;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment<f64> {
        Segment::from_coords(x1, y1, x2, y2)
    }

    fn sorted_by_pair(mut v: Vec<IntersectionRecord<f64>>) -> Vec<IntersectionRecord<f64>> {
        v.sort_by_key(|r| r.segments);
        v
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(intersect_batch(&[]).is_empty());
        assert!(intersect_batch(&[seg(0.0, 0.0, 1.0, 1.0)]).is_empty());
    }

    #[test]
    fn columns_round_trip_rows() {
        let segs = vec![seg(3.0, 1.0, 0.0, 0.0), seg(1.0, 1.0, 1.0, 1.0)];
        let cols = SegmentColumns::from_segments(&segs);
        assert_eq!(cols.len(), 2);
        // rows come back canonical; the input orientation flag is not stored
        assert_eq!((cols.row(0).p1, cols.row(0).p2), (segs[0].p1.clone(), segs[0].p2.clone()));
        assert_eq!(cols.row(1), segs[1]);
    }

    #[test]
    fn negative_det_pairs_are_found() {
        // (10,10)-(90,90) × (10,90)-(90,10) has det < 0 in canonical order
        let segs = vec![seg(10.0, 10.0, 90.0, 90.0), seg(10.0, 90.0, 90.0, 10.0)];
        let got = intersect_batch(&segs);
        assert_eq!(
            got,
            vec![IntersectionRecord {
                intersection: Intersection::TrueCrossing(Point::new(50.0, 50.0)),
                segments: Some((SegmentId(0), SegmentId(1))),
            }]
        );
    }

    #[test]
    fn classes_from_mixed_input() {
        let segs = vec![
            seg(0.0, 0.0, 4.0, 0.0),
            seg(2.0, 0.0, 6.0, 0.0),  // overlaps 0 on [2,4]
            seg(6.0, 0.0, 6.0, 3.0),  // touches 1 at (6,0), not collinear
            seg(4.0, 0.0, 4.0, 0.0),  // dot on 0 and 1
            seg(9.0, 9.0, 10.0, 10.0), // far away
        ];
        let got = sorted_by_pair(intersect_batch(&segs));
        let kinds: Vec<_> = got
            .iter()
            .map(|r| (r.segments.unwrap().0 .0, r.segments.unwrap().1 .0, r.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, 1, IntersectionKind::SegmentOverlap),
                (0, 3, IntersectionKind::PointOverlap),
                (1, 2, IntersectionKind::TrueCrossing),
                (1, 3, IntersectionKind::PointOverlap),
            ]
        );
    }

    #[test]
    fn matches_scalar_engine_on_integer_inputs() {
        let mut rng = StdRng::seed_from_u64(99);
        let engine = Intersector::exact(&DoubleBackend).unwrap();
        for n in [2usize, 5, 30, 60] {
            let segs: Vec<_> = (0..n)
                .map(|_| {
                    seg(
                        rng.gen_range(0..12) as f64,
                        rng.gen_range(0..12) as f64,
                        rng.gen_range(0..12) as f64,
                        rng.gen_range(0..12) as f64,
                    )
                })
                .collect();
            let scalar = sorted_by_pair(engine.all_pairs(&segs));
            let batch = sorted_by_pair(intersect_batch(&segs));
            assert_eq!(batch, scalar, "n = {n}");
        }
    }
}

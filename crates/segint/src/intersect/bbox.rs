//! Bounding-box formulation of the pairwise test.
//!
//! Some implementations solve the two line equations for the crossing point
//! first and then accept it if it lies in both segments' axis-aligned boxes,
//! instead of testing `s, t ∈ [0, 1]`. In exact arithmetic both accept the
//! same pairs; with rounding they can disagree on boundary-touching and
//! near-degenerate inputs. This module keeps that formulation available so
//! the two can be compared; the engine itself uses the parametric test.

use super::{resolve_collinear, Intersection};
use crate::geom::{Point, Segment};
use crate::numeric::Scalar;

#[inline]
fn between<T: Scalar>(v: &T, a: &T, b: &T) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo <= v && v <= hi
}

/// Intersect via line-line solve plus bounding-box containment.
pub fn bbox_crossing<T: Scalar>(a: &Segment<T>, b: &Segment<T>) -> Option<Intersection<T>> {
    let (x1, y1) = (a.p1.x.clone(), a.p1.y.clone());
    let (x2, y2) = (a.p2.x.clone(), a.p2.y.clone());
    let (x3, y3) = (b.p1.x.clone(), b.p1.y.clone());
    let (x4, y4) = (b.p2.x.clone(), b.p2.y.clone());

    let den = (x1.clone() - x2.clone()) * (y3.clone() - y4.clone())
        - (y1.clone() - y2.clone()) * (x3.clone() - x4.clone());

    if den.is_zero() {
        // p3 on line(a) and p1 on line(b)
        let c1 = (y2.clone() - y1.clone()) * (x3.clone() - x1.clone())
            == (y3.clone() - y1.clone()) * (x2.clone() - x1.clone());
        let c2 = (y4.clone() - y3.clone()) * (x1.clone() - x3.clone())
            == (y1.clone() - y3.clone()) * (x4.clone() - x3.clone());
        return if c1 && c2 { resolve_collinear(a, b) } else { None };
    }

    let cross_a = x1.clone() * y2.clone() - y1.clone() * x2.clone();
    let cross_b = x3.clone() * y4.clone() - y3.clone() * x4.clone();
    let num_x = cross_a.clone() * (x3.clone() - x4.clone())
        - (x1.clone() - x2.clone()) * cross_b.clone();
    let num_y = cross_a * (y3.clone() - y4.clone()) - (y1.clone() - y2.clone()) * cross_b;

    let px = num_x / den.clone();
    let py = num_y / den;

    let inside = between(&px, &x1, &x2)
        && between(&py, &y1, &y2)
        && between(&px, &x3, &x4)
        && between(&py, &y3, &y4);
    inside.then(|| Intersection::TrueCrossing(Point::new(px, py)))
}

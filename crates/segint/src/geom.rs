//! Points and canonical segments over any [`Scalar`].
//!
//! - `Point`: `(x, y)` ordered lexicographically; the order used for endpoint
//!   canonicalization and overlap boundaries.
//! - `Segment`: endpoints stored with `p1 <= p2`. Zero-length segments are legal.
//! - `SegmentId`: index into the caller's input slice; records point back to it.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeric::{Backend, Scalar};

/// Index of a segment in the slice handed to a driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub usize);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Scalar> Point<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Lexicographic `(x, y)` comparison. Unordered doubles (NaN) compare equal.
    pub fn lex_cmp(&self, other: &Self) -> Ordering {
        match self.x.partial_cmp(&other.x).unwrap_or(Ordering::Equal) {
            Ordering::Equal => self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal),
            o => o,
        }
    }

    /// Larger of two points under the lexicographic order (first on ties).
    pub fn lex_max<'a>(&'a self, other: &'a Self) -> &'a Self {
        if other.lex_cmp(self) == Ordering::Greater {
            other
        } else {
            self
        }
    }

    /// Smaller of two points under the lexicographic order (first on ties).
    pub fn lex_min<'a>(&'a self, other: &'a Self) -> &'a Self {
        if other.lex_cmp(self) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// Nearest double coordinates.
    pub fn to_f64(&self) -> Point<f64> {
        Point::new(self.x.to_f64(), self.y.to_f64())
    }
}

impl<T: Scalar> PartialOrd for Point<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.lex_cmp(other))
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Canonical segment: `p1 <= p2` under the point order.
///
/// Invariants:
/// - `p1.lex_cmp(&p2) != Greater` (established by every constructor).
/// - `swapped` records whether the input endpoints were reversed, so the
///   original orientation can be reproduced with [`Segment::as_input`].
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<T> {
    pub p1: Point<T>,
    pub p2: Point<T>,
    swapped: bool,
}

impl<T: Scalar> Segment<T> {
    pub fn new(a: Point<T>, b: Point<T>) -> Self {
        if a.lex_cmp(&b) == Ordering::Greater {
            Self {
                p1: b,
                p2: a,
                swapped: true,
            }
        } else {
            Self {
                p1: a,
                p2: b,
                swapped: false,
            }
        }
    }

    #[inline]
    pub fn from_coords(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    /// Both endpoints coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }

    /// Endpoints in the orientation they were given in.
    pub fn as_input(&self) -> (&Point<T>, &Point<T>) {
        if self.swapped {
            (&self.p2, &self.p1)
        } else {
            (&self.p1, &self.p2)
        }
    }

    /// Input-orientation coordinates `(x1, y1, x2, y2)`.
    pub fn coords(&self) -> [T; 4] {
        let (a, b) = self.as_input();
        [a.x.clone(), a.y.clone(), b.x.clone(), b.y.clone()]
    }
}

impl Segment<f64> {
    /// Re-express a decoded double segment in another backend.
    ///
    /// Lifting is exact and monotone, so the canonical order is preserved; the
    /// input orientation flag carries over unchanged.
    pub fn lift<B: Backend>(&self, backend: &B) -> Result<Segment<B::Scalar>> {
        let p1 = Point::new(backend.lift(self.p1.x)?, backend.lift(self.p1.y)?);
        let p2 = Point::new(backend.lift(self.p2.x)?, backend.lift(self.p2.y)?);
        Ok(Segment {
            p1,
            p2,
            swapped: self.swapped,
        })
    }
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.p1, self.p2)
    }
}

/// 2D cross product `a × b = a.x·b.y − a.y·b.x` on owned components.
#[inline]
pub fn cross<T: Scalar>(ax: &T, ay: &T, bx: &T, by: &T) -> T {
    ax.clone() * by.clone() - ay.clone() * bx.clone()
}

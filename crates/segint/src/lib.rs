//! Planar segment intersection over interchangeable number systems.
//!
//! The same determinant-based engine runs over IEEE doubles, fixed-precision
//! decimals, and exact rationals, so the effect of rounding on intersection
//! results can be measured against an exact reference.
//!
//! Layout
//! - `numeric`: the `Scalar`/`Backend` traits and the three backends.
//! - `geom`: points, canonical segments, segment ids.
//! - `intersect`: pairwise test, collinear overlap resolver, all-pairs driver.
//! - `batch`: columnar all-pairs variant over doubles.
//! - `codec`: bit-string CSV input and `p_x;p_y` output.
//! - `stats`: descriptive statistics of an input file.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; breaking
//!   changes are fine when they make the engine clearer.

pub mod batch;
pub mod codec;
pub mod error;
pub mod geom;
pub mod intersect;
pub mod numeric;
pub mod stats;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom::{Point, Segment, SegmentId};
pub use intersect::{
    intersect, EngineCfg, Intersection, IntersectionKind, IntersectionRecord, Intersector,
};
pub use numeric::{Backend, DecimalBackend, DoubleBackend, RationalBackend, Scalar};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{intersect_batch, intersect_columns, SegmentColumns};
    pub use crate::codec::{CoordFormat, POINT_HEADER, SEGMENT_HEADER};
    pub use crate::geom::{Point, Segment, SegmentId};
    pub use crate::intersect::{
        point_total, resolve_collinear, EngineCfg, Intersection, IntersectionKind,
        IntersectionRecord, Intersector,
    };
    pub use crate::numeric::{
        Backend, BigRational, Decimal, DecimalBackend, DoubleBackend, RationalBackend, Scalar,
    };
    pub use crate::stats::InputStats;
}

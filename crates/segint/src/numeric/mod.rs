//! Interchangeable scalar arithmetic for the intersection engine.
//!
//! Purpose
//! - One engine, three number systems: IEEE doubles, fixed-precision decimals,
//!   and exact rationals. The engine is generic over [`Scalar`] and is
//!   monomorphized per backend, so there is no dynamic dispatch on the hot path.
//!
//! Contract
//! - `Scalar`: closed under `+ - * /`, ordered, exact zero test. No tolerance
//!   is hidden in `is_zero`; tolerances live in `EngineCfg`.
//! - `Backend`: a configured number system. It owns whatever context the
//!   scalars need (the decimal precision) and lifts decoded input doubles into
//!   its scalar type.
//!
//! Code cross-refs: `intersect::Intersector`, `geom::Segment::lift`

mod decimal;
mod double;
mod rational;

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::error::Result;

pub use decimal::{Decimal, DecimalBackend, DEFAULT_DECIMAL_PRECISION};
pub use double::DoubleBackend;
pub use rational::{BigRational, RationalBackend};

/// Scalar value usable by the engine.
///
/// `PartialOrd` is the order used everywhere (point order, parametric bounds).
/// For doubles NaN compares as unordered; callers feeding NaN get whatever the
/// comparisons say, the engine does not guard against it.
pub trait Scalar:
    Clone
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Exact zero test (bitwise `== 0.0` for doubles, so `-0.0` is zero too).
    fn is_zero(&self) -> bool;

    /// Nearest double, used for rendering and cross-backend comparisons.
    fn to_f64(&self) -> f64;
}

/// A configured number system.
pub trait Backend {
    type Scalar: Scalar;

    /// Short identifier used in logs and provenance (`double`, `decimal`, `rational`).
    fn name(&self) -> &'static str;

    /// Convert a decoded input coordinate into this backend.
    ///
    /// Conversion is exact for every backend; precision loss only happens in
    /// arithmetic. Fails with `Error::NonFinite` where NaN/inf has no value.
    fn lift(&self, value: f64) -> Result<Self::Scalar>;
}

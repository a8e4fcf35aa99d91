//! Fixed-precision decimal backend.
//!
//! Every arithmetic result is rounded half-to-even to `precision` significant
//! digits, the way a decimal context with a set precision behaves. Lifting an
//! input double is exact; only arithmetic rounds. The precision is carried by
//! each value so operator traits work without a global context.
//!
//! `+ - *` are exact on `BigDecimal` before rounding. Division is done on the
//! digit integers with a sticky digit, so the quotient is correctly rounded at
//! any precision.

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU64;
use std::ops::{Add, Div, Mul, Sub};

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use super::{Backend, Scalar};
use crate::error::{Error, Result};

/// Precision used when none is configured (matches the customary decimal context default).
pub const DEFAULT_DECIMAL_PRECISION: u64 = 28;

/// Decimal number system with a fixed number of significant digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimalBackend {
    precision: NonZeroU64,
}

impl DecimalBackend {
    pub fn new(precision: u64) -> Result<Self> {
        let precision = NonZeroU64::new(precision).ok_or(Error::InvalidPrecision)?;
        Ok(Self { precision })
    }

    #[inline]
    pub fn precision(&self) -> u64 {
        self.precision.get()
    }
}

impl Default for DecimalBackend {
    fn default() -> Self {
        Self {
            precision: NonZeroU64::MIN.saturating_add(DEFAULT_DECIMAL_PRECISION - 1),
        }
    }
}

impl Backend for DecimalBackend {
    type Scalar = Decimal;

    fn name(&self) -> &'static str {
        "decimal"
    }

    fn lift(&self, value: f64) -> Result<Decimal> {
        if !value.is_finite() {
            return Err(Error::NonFinite {
                value,
                backend: self.name(),
            });
        }
        Ok(Decimal {
            value: exact_decimal(value),
            precision: self.precision,
        })
    }
}

/// Decimal scalar: a value plus the precision its arithmetic rounds to.
///
/// Mixed-precision arithmetic rounds to the larger of the two precisions.
/// Comparisons look at the value only.
#[derive(Clone, Debug)]
pub struct Decimal {
    value: BigDecimal,
    precision: NonZeroU64,
}

impl Decimal {
    #[inline]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    #[inline]
    pub fn precision(&self) -> u64 {
        self.precision.get()
    }

    #[inline]
    fn rounded(value: BigDecimal, precision: NonZeroU64) -> Self {
        Self {
            value: value.with_precision_round(precision, RoundingMode::HalfEven),
            precision,
        }
    }
}

/// Decimal digits of `|n|`.
fn digit_count(n: &BigInt) -> u64 {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_string().len() as u64
    }
}

/// `num / den` with at least `precision + 2` significant digits, truncated,
/// plus one trailing sticky digit when the division is inexact. Rounding that
/// to `precision` digits gives the correctly rounded quotient.
///
/// Panics on a zero divisor.
fn divide(num: BigDecimal, den: BigDecimal, precision: NonZeroU64) -> BigDecimal {
    let (n, n_scale) = num.into_bigint_and_exponent();
    let (d, d_scale) = den.into_bigint_and_exponent();
    let negative = (n.sign() == Sign::Minus) != (d.sign() == Sign::Minus);
    let wanted = precision.get() + 2;
    let shift = (wanted + digit_count(&d)).saturating_sub(digit_count(&n));
    let scaled = n * BigInt::from(10u32).pow(shift as u32);
    let mut q = &scaled / &d;
    let mut scale = n_scale - d_scale + shift as i64;
    if !(scaled % &d).is_zero() {
        // q is truncated toward zero; the sticky digit pushes it off any tie
        let sticky = if negative { -1 } else { 1 };
        q = q * 10 + sticky;
        scale += 1;
    }
    BigDecimal::new(q, scale)
}

/// Exact decimal expansion of a finite double: `m * 2^e` written as `m * 5^-e / 10^-e`.
fn exact_decimal(value: f64) -> BigDecimal {
    let bits = value.to_bits();
    let negative = bits >> 63 != 0;
    let exp_bits = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    let mut digits = BigInt::from(mantissa);
    if negative {
        digits = -digits;
    }
    if exp >= 0 {
        BigDecimal::new(digits << (exp as usize), 0)
    } else {
        let k = (-exp) as u32;
        BigDecimal::new(digits * BigInt::from(5u32).pow(k), i64::from(k))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Add for Decimal {
    type Output = Decimal;
    #[inline]
    fn add(self, rhs: Decimal) -> Decimal {
        let precision = self.precision.max(rhs.precision);
        Decimal::rounded(self.value + rhs.value, precision)
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    #[inline]
    fn sub(self, rhs: Decimal) -> Decimal {
        let precision = self.precision.max(rhs.precision);
        Decimal::rounded(self.value - rhs.value, precision)
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    #[inline]
    fn mul(self, rhs: Decimal) -> Decimal {
        let precision = self.precision.max(rhs.precision);
        Decimal::rounded(self.value * rhs.value, precision)
    }
}

impl Div for Decimal {
    type Output = Decimal;
    /// Panics on a zero divisor; the engine only divides by nonzero determinants.
    #[inline]
    fn div(self, rhs: Decimal) -> Decimal {
        let precision = self.precision.max(rhs.precision);
        Decimal::rounded(divide(self.value, rhs.value, precision), precision)
    }
}

impl Scalar for Decimal {
    #[inline]
    fn is_zero(&self) -> bool {
        Zero::is_zero(&self.value)
    }

    /// Correctly rounded: goes through the decimal string rather than scaling
    /// the digit integer by a power of ten.
    fn to_f64(&self) -> f64 {
        self.value.to_string().parse().unwrap_or(f64::NAN)
    }
}

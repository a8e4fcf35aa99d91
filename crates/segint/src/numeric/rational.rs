use num_traits::{ToPrimitive, Zero};

pub use num_rational::BigRational;

use super::{Backend, Scalar};
use crate::error::{Error, Result};

/// Exact rational backend: the reference every other backend is graded against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RationalBackend;

impl Scalar for BigRational {
    #[inline]
    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn to_f64(&self) -> f64 {
        ToPrimitive::to_f64(self).unwrap_or_else(|| {
            let n = self.numer().to_f64().unwrap_or(f64::NAN);
            let d = self.denom().to_f64().unwrap_or(f64::NAN);
            n / d
        })
    }
}

impl Backend for RationalBackend {
    type Scalar = BigRational;

    fn name(&self) -> &'static str {
        "rational"
    }

    fn lift(&self, value: f64) -> Result<BigRational> {
        BigRational::from_float(value).ok_or(Error::NonFinite {
            value,
            backend: self.name(),
        })
    }
}

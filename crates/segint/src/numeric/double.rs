use super::{Backend, Scalar};
use crate::error::Result;

/// Native IEEE-754 double backend. Accepts every double, including NaN and inf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DoubleBackend;

impl Scalar for f64 {
    #[inline]
    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }
}

impl Backend for DoubleBackend {
    type Scalar = f64;

    fn name(&self) -> &'static str {
        "double"
    }

    #[inline]
    fn lift(&self, value: f64) -> Result<f64> {
        Ok(value)
    }
}

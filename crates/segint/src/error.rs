//! Error type shared by the codec, the backends, and the engine constructors.
//!
//! The engine itself never fails once constructed: a pair either intersects or
//! it does not. Everything here is raised while turning text or doubles into
//! engine inputs, and callers are expected to abort the current file on it.
//!
//! A resolver that produces more than two overlap boundary points is a bug,
//! not an input error; it panics instead of surfacing here.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A coordinate bit string has the wrong width or contains a non-binary digit.
    #[error("invalid coordinate encoding {found:?}: expected exactly {expected} binary digits")]
    InvalidEncoding { expected: usize, found: String },

    /// Plain-text coordinate that does not parse as a float.
    #[error("invalid plain coordinate {0:?}")]
    InvalidNumber(String),

    /// The segment CSV header differs from the required literal.
    #[error("invalid CSV header {found:?}, expected {expected:?}")]
    SchemaMismatch {
        expected: &'static str,
        found: String,
    },

    /// A data row that does not carry exactly four coordinates.
    #[error("row {row}: expected 4 coordinates, found {found}")]
    MalformedRow { row: usize, found: usize },

    /// NaN or infinity handed to a backend with no representation for it.
    #[error("coordinate {value} is not representable by the {backend} backend")]
    NonFinite { value: f64, backend: &'static str },

    /// Parametric tolerance must be a finite, non-negative number.
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    /// Decimal backends need at least one significant digit.
    #[error("decimal precision must be at least 1 digit")]
    InvalidPrecision,
}

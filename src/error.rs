//! Errors returned by the searches in this crate. Every failure is reported
//! through `SearchError`, never as a NaN or infinite result.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The interval bounds are not finite or are reversed.
    #[error("invalid interval [{a}, {b}]: bounds must be finite with a <= b")]
    InvalidInterval { a: f64, b: f64 },

    /// The tolerance must be finite and strictly positive.
    #[error("invalid tolerance {0}: must be finite and positive")]
    InvalidTolerance(f64),

    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A builder could not produce a configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The objective returned NaN.
    #[error("objective function returned NaN at x = {x}")]
    NotANumber { x: f64 },

    /// The interpolation triple is not ordered or does not bracket a minimum.
    #[error("degenerate triple ({x0}, {x1}, {x2}): need x0 < x1 < x2")]
    DegenerateTriple { x0: f64, x1: f64, x2: f64 },

    /// The parabola through the triple has no vertex (collinear points).
    #[error("parabola through ({x0}, {x1}, {x2}) has a zero denominator")]
    NumericDegeneracy { x0: f64, x1: f64, x2: f64 },

    /// The iteration cap was hit, typically because the objective is not unimodal.
    #[error("no convergence after {iterations} iterations")]
    MaxIterReached { iterations: usize },

    /// The tolerance asks for a Fibonacci number beyond `u64`.
    #[error("Fibonacci number {n} does not fit in u64")]
    FibonacciOverflow { n: usize },
}

/// Check that `[a, b]` is a usable search interval.
pub(crate) fn check_interval(a: f64, b: f64) -> Result<()> {
    if a.is_finite() && b.is_finite() && a <= b {
        Ok(())
    } else {
        Err(SearchError::InvalidInterval { a, b })
    }
}

pub(crate) fn check_tolerance(xtol: f64) -> Result<()> {
    if xtol.is_finite() && xtol > 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidTolerance(xtol))
    }
}

//! This module provides the base framework for all minimizers present in this crate, such as the
//! base trait and return type.
use crate::error::Result;

/// A closed interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// Builds an interval from two points in any order.
    pub fn new(a: f64, b: f64) -> Self {
        Interval {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }
}

/// A minimization result, storing the final estimate and the cost of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// The parameter value where the minimum is found.
    pub x: f64,
    /// The function value at `x`.
    pub fx: f64,
    /// The number of iterations run.
    pub iterations: usize,
    /// The number of function evaluations performed by the search.
    pub f_evals: usize,
}

/// A minimizer searching for a local minimum of a scalar function inside a bounded interval.
pub trait IntervalMinimizer {
    /// Minimizes `func` between `left` and `right`.
    fn minimize<F: Fn(f64) -> f64>(&self, func: F, left: f64, right: f64) -> Result<SearchResult>;
}

//! Bracketing search finds an interval containing a local minimum,
//! starting from a single point.
//!
//! First a descending direction is looked for around `x0` by probing
//! `x0 + step` and `x0 - step`. If neither probe improves on `x0`, the step
//! is halved until it falls below half the tolerance, in which case `x0`
//! itself is considered a minimum. Otherwise the search walks downhill,
//! doubling the step every time the function keeps decreasing:
//!
//! ```text
//!         +--+----+--------+----------------+
//!         x0 x1   x2       x3               x4
//! ```
//!
//! The walk stops at the first point that is worse than its predecessor.
//! With `f(x2) >= f(x3) < f(x4)` the minimum lies in `[x2, x4]`.
//!
//! The function must be unimodal around `x0`. An objective that keeps
//! decreasing is caught by `max_iter`, unless the walk is confined to
//! an interval with `within`: probes are then clamped to its bounds and the
//! walk stops at the bound it runs into.

use crate::error::{check_tolerance, Result, SearchError};
use crate::minimizer::Interval;
use crate::utils::WrappedFunction;

#[derive(Builder, Debug)]
pub struct Bracket {
    /// The initial probing step. Only its magnitude matters, the positive
    /// direction is tried first.
    #[builder(default = "0.01")]
    pub step: f64,

    /// Resolution below which the start point is accepted as a minimum.
    #[builder(default = "1e-8")]
    pub xtol: f64,

    /// The maximum number of downhill steps before the search gives up.
    #[builder(default = "1000")]
    pub max_iter: usize,

    /// Bounds no sample may cross.
    #[builder(default = "None")]
    #[builder(setter(into))]
    pub within: Option<Interval>,
}

/// The outcome of a bracketing search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketResult {
    /// An interval containing the minimum.
    pub interval: Interval,
    /// The function values at both ends of `interval`.
    pub f_interval: (f64, f64),
    /// The lowest point sampled, inside `interval`.
    pub x: f64,
    /// The function value at `x`.
    pub fx: f64,
    /// The start point and its function value.
    pub origin: (f64, f64),
    /// The number of function evaluations performed.
    pub f_evals: usize,
}

impl BracketResult {
    /// The function value at `x` if the search sampled it.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        if x == self.x {
            Some(self.fx)
        } else if x == self.origin.0 {
            Some(self.origin.1)
        } else if x == self.interval.start {
            Some(self.f_interval.0)
        } else if x == self.interval.end {
            Some(self.f_interval.1)
        } else {
            None
        }
    }
}

/// Builds the result from the two outer points of the walk and its lowest sample.
fn finish(prev: (f64, f64), outer: (f64, f64), best: (f64, f64), origin: (f64, f64), f_evals: usize) -> BracketResult {
    let (interval, f_interval) = if prev.0 <= outer.0 {
        (Interval::new(prev.0, outer.0), (prev.1, outer.1))
    } else {
        (Interval::new(outer.0, prev.0), (outer.1, prev.1))
    };
    let res = BracketResult {
        interval,
        f_interval,
        x: best.0,
        fx: best.1,
        origin,
        f_evals,
    };
    debug!("bracket: {:?}", res);
    res
}

impl Bracket {
    /// Searches for an interval around a local minimum of `func`, starting at `x0`.
    pub fn bracket<F>(&self, func: F, x0: f64) -> Result<BracketResult>
    where
        F: Fn(f64) -> f64,
    {
        check_tolerance(self.xtol)?;
        if !self.step.is_finite() || self.step == 0.0 {
            return Err(SearchError::InvalidParameter {
                name: "step",
                value: self.step,
                reason: "must be finite and non-zero",
            });
        }
        if !x0.is_finite() {
            return Err(SearchError::InvalidParameter {
                name: "x0",
                value: x0,
                reason: "must be finite",
            });
        }
        if let Some(bounds) = self.within {
            if !bounds.contains(x0) {
                return Err(SearchError::InvalidParameter {
                    name: "x0",
                    value: x0,
                    reason: "must lie within the bounds of the walk",
                });
            }
        }

        let mut func = WrappedFunction::new(func);
        let fx0 = func.call(x0)?;
        let mut step = self.step.abs();

        let (first, step) = loop {
            if let Some(first) = check_direction(&mut func, x0, fx0, self.clamp(x0 + step))? {
                break (first, step);
            }
            if let Some(first) = check_direction(&mut func, x0, fx0, self.clamp(x0 - step))? {
                break (first, -step);
            }
            step /= 2.0;
            if step < self.xtol / 2.0 {
                debug!("bracket: x0 = {} is a local minimum, {} evaluations", x0, func.num);
                return Ok(BracketResult {
                    interval: Interval::new(x0, x0),
                    f_interval: (fx0, fx0),
                    x: x0,
                    fx: fx0,
                    origin: (x0, fx0),
                    f_evals: func.num,
                });
            }
        };

        self.move_to_minimum(&mut func, (x0, fx0), first, step)
    }

    /// Walks from `start` in the direction of `step`, doubling the step while the
    /// function decreases. `prev` is the point before `start`, with `f(prev) >= f(start)`.
    fn move_to_minimum<F>(
        &self,
        func: &mut WrappedFunction<F>,
        mut prev: (f64, f64),
        mut start: (f64, f64),
        mut step: f64,
    ) -> Result<BracketResult>
    where
        F: Fn(f64) -> f64,
    {
        let origin = prev;
        let mut iter = 0;
        loop {
            step *= 2.0;
            let x_end = self.clamp(start.0 + step);
            if x_end == start.0 {
                // pinned to a bound: the minimum lies between prev and the bound
                return Ok(finish(prev, start, start, origin, func.num));
            }
            let end = (x_end, func.call(x_end)?);
            trace!("bracket: window [{}, {}], f = ({}, {})", start.0, end.0, start.1, end.1);

            if end.1 > start.1 {
                return Ok(finish(prev, end, start, origin, func.num));
            }

            iter += 1;
            if iter >= self.max_iter {
                warn!("bracket: still descending at x = {} after {} steps", end.0, iter);
                return Err(SearchError::MaxIterReached { iterations: iter });
            }
            prev = start;
            start = end;
        }
    }

    fn clamp(&self, x: f64) -> f64 {
        match self.within {
            Some(bounds) => x.max(bounds.start).min(bounds.end),
            None => x,
        }
    }
}

/// Returns the probe `x` and its value if it does not increase the function.
/// A point pinned onto `x0` by the bounds is skipped.
fn check_direction<F>(func: &mut WrappedFunction<F>, x0: f64, fx0: f64, x: f64) -> Result<Option<(f64, f64)>>
where
    F: Fn(f64) -> f64,
{
    if x == x0 {
        return Ok(None);
    }
    let fx = func.call(x)?;
    Ok(if fx <= fx0 { Some((x, fx)) } else { None })
}

/// Finds an interval containing a local minimum of `func` near `x0`.
pub fn search_interval<F>(x0: f64, func: F, step: f64, epsilon: f64) -> Result<Interval>
where
    F: Fn(f64) -> f64,
{
    let bracket = BracketBuilder::default()
        .step(step)
        .xtol(epsilon)
        .build()
        .map_err(SearchError::InvalidConfig)?;
    Ok(bracket.bracket(func, x0)?.interval)
}

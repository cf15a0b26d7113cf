//! Dichotomy is the direct analogue of bisection for minimization.
//! Every iteration evaluates the function at two points placed `delta`
//! apart around the midpoint of the interval:
//!
//! ```text
//!         +-----------+-+-----------+
//!         a          x1 x2          b
//! ```
//!
//! If `f(x1) <= f(x2)` the minimum lies in `[a, x2]`, otherwise in
//! `[x1, b]`. The interval roughly halves at each step and converges to
//! a width of `delta`, so `delta` has to be smaller than the tolerance.
//! No evaluation is reused between iterations.

use crate::error::{check_interval, check_tolerance, Result, SearchError};
use crate::minimizer::{IntervalMinimizer, SearchResult};
use crate::utils::WrappedFunction;

#[derive(Builder, Debug)]
pub struct Dichotomy {
    /// The width of the interval at which convergence is satisfactory.
    #[builder(default = "1e-8")]
    pub xtol: f64,

    /// Distance between the two probes of an iteration. Defaults to half of `xtol`.
    #[builder(default = "None")]
    #[builder(setter(into))]
    pub delta: Option<f64>,

    /// The maximum number of iterations before the search terminates.
    #[builder(default = "1000")]
    pub max_iter: usize,
}

impl IntervalMinimizer for Dichotomy {
    fn minimize<F: Fn(f64) -> f64>(&self, func: F, left: f64, right: f64) -> Result<SearchResult> {
        check_interval(left, right)?;
        check_tolerance(self.xtol)?;
        let delta = self.delta.unwrap_or(self.xtol / 2.0);
        if !(delta > 0.0 && delta < self.xtol) {
            return Err(SearchError::InvalidParameter {
                name: "delta",
                value: delta,
                reason: "must lie strictly between 0 and xtol",
            });
        }

        let mut func = WrappedFunction::new(func);
        let mut min = left;
        let mut max = right;
        let mut iter = 0;

        loop {
            let x_1 = (min + max - delta) / 2.0;
            let x_2 = (min + max + delta) / 2.0;

            if func.call(x_1)? <= func.call(x_2)? {
                max = x_2;
            } else {
                min = x_1;
            }
            iter += 1;
            trace!("dichotomy: iteration {}, interval [{}, {}]", iter, min, max);

            if max - min <= self.xtol {
                break;
            }
            if iter >= self.max_iter {
                warn!("dichotomy: interval still {} wide after {} iterations", max - min, iter);
                return Err(SearchError::MaxIterReached { iterations: iter });
            }
        }

        // the final value is reported, it plays no part in the search
        let x = ((min + max) / 2.0).max(left).min(right);
        let res = SearchResult {
            x,
            fx: func.peek(x)?,
            iterations: iter,
            f_evals: func.num,
        };
        debug!("dichotomy: {:?}", res);
        Ok(res)
    }
}

/// Dichotomy search for the minimum of `f` in `[a, b]` with probes `delta` apart.
pub fn search<F>(epsilon: f64, delta: f64, a: f64, b: f64, f: F) -> Result<SearchResult>
where
    F: Fn(f64) -> f64,
{
    DichotomyBuilder::default()
        .xtol(epsilon)
        .delta(delta)
        .build()
        .map_err(SearchError::InvalidConfig)?
        .minimize(f, a, b)
}

//! Golden ratio is to minimization what bisection is to root finding.
//! GoldenRatio searches within an interval for a local minimum. At
//! every iteration, the interval is decreased in size by a constant
//! factor, until the desired precision is obtained.
//!
//! This algorithm is guaranteed to converge on a local minimum in a
//! finite amount of steps under very light smoothess criteria for the
//! target function.
//!
//! In an iteration, the target function is known at 4 points:
//!         +---------+----+---------+
//! iter 1  a         u    v         b
//! The interval for the next iteration is chosen to be [a,v] if f(u)<=f(v),
//! and [u,b] otherwise. The distances u-a, v-u, and b-v are chosen in such
//! a way that 3 out of 4 points can be reused, and only 1 new function
//! evaluation is required in the next iteration. If f(u)<=f(v) this looks like:
//!         +---------+----+---------+
//! iter 1  a         u    v         b
//!         +----+----+----+
//! iter 2  a    u    v    b

use crate::error::{check_interval, check_tolerance, Result, SearchError};
use crate::minimizer::{IntervalMinimizer, SearchResult};
use crate::utils::WrappedFunction;
use std::mem;

#[derive(Builder, Debug)]
pub struct GoldenRatio {
    /// The width of the interval at which convergence is satisfactory.
    /// Smaller is more precise.
    #[builder(default = "1e-8")]
    pub xtol: f64,

    /// The maximum number of iterations before the search terminates.
    /// Bigger is more precise.
    #[builder(default = "1000")]
    pub max_iter: usize,
}

const RATIO: f64 = 2.618033988749895; //1.5 + 0.5*f64::sqrt(5.0);

impl IntervalMinimizer for GoldenRatio {
    /// The main minimization routine. Searches for the minimum of `func`
    /// between `left` and `right`.
    fn minimize<F: Fn(f64) -> f64>(&self, func: F, left: f64, right: f64) -> Result<SearchResult> {
        check_interval(left, right)?;
        check_tolerance(self.xtol)?;

        let mut func = WrappedFunction::new(func);
        let mut min = left;
        let mut max = right;
        let mut iter = 0;

        let mut x_u = min + (max - min) / RATIO;
        let mut x_v = max - (max - min) / RATIO;
        let mut f_u = func.call(x_u)?;
        let mut f_v = func.call(x_v)?;

        loop {
            if f_u <= f_v {
                max = x_v;
                x_v = x_u;
                x_u = min + (max - min) / RATIO;

                f_v = f_u;
                f_u = func.call(x_u)?;
            } else {
                min = x_u;
                x_u = x_v;
                x_v = max - (max - min) / RATIO;

                f_u = f_v;
                f_v = func.call(x_v)?;
            }
            // rounding can push the new point past the kept one
            if x_u > x_v {
                mem::swap(&mut x_u, &mut x_v);
                mem::swap(&mut f_u, &mut f_v);
            }
            iter += 1;
            trace!("golden ratio: iteration {}, interval [{}, {}]", iter, min, max);

            if max - min <= self.xtol {
                break;
            }
            if iter >= self.max_iter {
                warn!("golden ratio: interval still {} wide after {} iterations", max - min, iter);
                return Err(SearchError::MaxIterReached { iterations: iter });
            }
        }

        let (x, fx) = if f_u <= f_v { (x_u, f_u) } else { (x_v, f_v) };
        let res = SearchResult {
            x,
            fx,
            iterations: iter,
            f_evals: func.num,
        };
        debug!("golden ratio: {:?}", res);
        Ok(res)
    }
}

/// Golden-section search for the minimum of `f` in `[a, b]`.
pub fn search<F>(epsilon: f64, a: f64, b: f64, f: F) -> Result<SearchResult>
where
    F: Fn(f64) -> f64,
{
    GoldenRatioBuilder::default()
        .xtol(epsilon)
        .build()
        .map_err(SearchError::InvalidConfig)?
        .minimize(f, a, b)
}

//! Fibonacci search shrinks the interval the same way as the golden
//! ratio search, but the interior points are placed with ratios of
//! consecutive Fibonacci numbers. The number of iterations `n` is fixed
//! up front: it is the smallest `n` with `(b - a) / Fib(n + 2) < xtol`,
//! which makes this the optimal strategy for a given budget of evaluations.
//!
//! At step `k` the interval spans `Fib(n - k + 2)` units and the interior
//! points sit `Fib(n - k)` units from either end. In the last step both
//! would land on the midpoint, so the new point is offset slightly to keep
//! the final comparison meaningful.

use crate::error::{check_interval, check_tolerance, Result, SearchError};
use crate::minimizer::{IntervalMinimizer, SearchResult};
use crate::utils::{extend_fibonacci, WrappedFunction};

/// Fraction of the final interval separating the two last probes.
const FINAL_OFFSET: f64 = 0.01;

#[derive(Builder, Debug)]
pub struct Fibonacci {
    /// Half the width of the final interval is below this value.
    #[builder(default = "1e-8")]
    pub xtol: f64,
}

impl Fibonacci {
    /// Fibonacci numbers `Fib(0)..=Fib(n + 2)` for the smallest `n >= 1`
    /// resolving an interval of `width` to `xtol`.
    fn sequence(&self, width: f64) -> Result<Vec<u64>> {
        let mut fib: Vec<u64> = Vec::new();
        while fib.len() < 4 {
            extend_fibonacci(&mut fib);
        }
        while let Some(&last) = fib.last() {
            if width / (last as f64) < self.xtol {
                break;
            }
            extend_fibonacci(&mut fib).ok_or_else(|| SearchError::FibonacciOverflow { n: fib.len() })?;
        }
        Ok(fib)
    }

    /// Number of iterations needed to resolve `[left, right]` to `xtol`.
    pub fn iterations(&self, left: f64, right: f64) -> Result<usize> {
        check_interval(left, right)?;
        check_tolerance(self.xtol)?;
        Ok(self.sequence(right - left)?.len() - 3)
    }
}

impl IntervalMinimizer for Fibonacci {
    fn minimize<F: Fn(f64) -> f64>(&self, func: F, left: f64, right: f64) -> Result<SearchResult> {
        check_interval(left, right)?;
        check_tolerance(self.xtol)?;

        let fib = self.sequence(right - left)?;
        let n = fib.len() - 3;
        let ratio = |k: usize| fib[n - k] as f64 / fib[n - k + 2] as f64;

        let mut func = WrappedFunction::new(func);
        let mut min = left;
        let mut max = right;

        let mut x_u = min + ratio(0) * (max - min);
        let mut x_v = max - ratio(0) * (max - min);
        let mut f_u = func.call(x_u)?;
        let mut f_v = func.call(x_v)?;

        for k in 1..=n {
            if f_u <= f_v {
                max = x_v;
                x_v = x_u;
                f_v = f_u;
                x_u = if k < n {
                    min + ratio(k) * (max - min)
                } else {
                    x_v - FINAL_OFFSET * (max - min)
                };
                f_u = func.call(x_u)?;
            } else {
                min = x_u;
                x_u = x_v;
                f_u = f_v;
                x_v = if k < n {
                    max - ratio(k) * (max - min)
                } else {
                    x_u + FINAL_OFFSET * (max - min)
                };
                f_v = func.call(x_v)?;
            }
            trace!("fibonacci: step {} of {}, interval [{}, {}]", k, n, min, max);
        }

        let (x, fx) = if f_u <= f_v { (x_u, f_u) } else { (x_v, f_v) };
        let res = SearchResult {
            x,
            fx,
            iterations: n,
            f_evals: func.num,
        };
        debug!("fibonacci: {:?}", res);
        Ok(res)
    }
}

/// Fibonacci search for the minimum of `f` in `[a, b]`.
pub fn search<F>(epsilon: f64, a: f64, b: f64, f: F) -> Result<SearchResult>
where
    F: Fn(f64) -> f64,
{
    FibonacciBuilder::default()
        .xtol(epsilon)
        .build()
        .map_err(SearchError::InvalidConfig)?
        .minimize(f, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEq;
    use std::cell::Cell;

    #[test]
    fn fibonacci() {
        let f = |x: f64| (x - 0.2).powi(2);
        let res = search(1e-7, -1.0, 1.0, &f).unwrap();

        println!("res: {:?}", res);
        assert!((res.x - 0.2).abs() <= 1e-7);
        assert!(res.fx.approx_eq(&0.0, 1e-13, 10));
    }

    #[test]
    fn iteration_count() {
        let minimizer = FibonacciBuilder::default().xtol(1e-2).build().unwrap();
        // 5 / Fib(13) = 5 / 377 >= 0.01, 5 / Fib(14) = 5 / 610 < 0.01
        assert_eq!(minimizer.iterations(2.0, 7.0), Ok(12));
        let res = minimizer.minimize(|x: f64| x.log10() + x.sin(), 2.0, 7.0).unwrap();
        assert_eq!(res.iterations, 12);
        assert_eq!(res.f_evals, 14);
    }

    #[test]
    fn evaluations_bounded_by_iterations() {
        let calls = Cell::new(0);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x.log10() + x.sin()
        };
        for &eps in &[1e-2, 1e-4, 1e-6] {
            calls.set(0);
            let res = search(eps, 2.0, 7.0, &f).unwrap();
            assert!((res.x - 4.618210255690203).abs() <= eps);
            assert_eq!(res.f_evals, res.iterations + 2);
            assert_eq!(calls.get(), res.f_evals);
        }
    }

    #[test]
    fn wide_tolerance_runs_once() {
        let res = search(10.0, 0.0, 1.0, |x: f64| (x - 0.3).powi(2)).unwrap();
        assert_eq!(res.iterations, 1);
        assert_eq!(res.f_evals, 3);
    }

    #[test]
    fn tolerance_too_small() {
        let res = search(1e-300, 0.0, 1.0, |x: f64| x * x);
        match res {
            Err(SearchError::FibonacciOverflow { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}

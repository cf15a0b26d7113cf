//! Successive parabolic interpolation. A parabola is fitted through three
//! points `x0 < x1 < x2` and its vertex becomes the next estimate of the
//! minimum. The vertex is inserted among the three points and the adjacent
//! triple with the lowest middle value is kept for the next iteration:
//!
//! ```text
//!         +------+---+-----------+
//!         x0     x1  x_min       x2
//!         +------+---+
//!         x0     x1  x2                  if f(x1) <= f(x_min)
//!                +---+-----------+
//!                x0  x1          x2      otherwise
//! ```
//!
//! The search stops once two successive estimates are closer than `xtol`.
//! When searching an interval, the middle point is found with a bracketing
//! search started at the left bound and confined to the interval. If its
//! lowest sample is not strictly inside, the midpoint is used instead.
//! Values sampled by the bracketing search are not evaluated again.
//!
//! Convergence is superlinear near a smooth minimum, but nothing is
//! guaranteed for a triple that does not bracket one. Collinear points
//! have no vertex and are reported as an error.

use crate::error::{check_interval, check_tolerance, Result, SearchError};
use crate::minimizer::{Interval, IntervalMinimizer, SearchResult};
use crate::scalar::bracket::BracketBuilder;
use crate::utils::WrappedFunction;
use float_cmp::ApproxEqUlps;

#[derive(Builder, Debug)]
pub struct Quadratic {
    /// Distance between two successive estimates at which convergence is satisfactory.
    #[builder(default = "1e-8")]
    pub xtol: f64,

    /// Initial step of the bracketing search locating the middle point.
    #[builder(default = "0.01")]
    pub step: f64,

    /// The required number of floating point representations that separate two
    /// function values to consider them equal. See crate float_cmp for more information.
    #[builder(default = "1")]
    pub ulps: i64,

    /// The maximum number of iterations before the search terminates.
    #[builder(default = "500")]
    pub max_iter: usize,
}

/// A sample point whose function value is computed at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub x: f64,
    pub fx: Option<f64>,
}

impl Probe {
    pub fn new(x: f64) -> Self {
        Probe { x, fx: None }
    }

    /// A probe whose value is already known.
    pub fn evaluated(x: f64, fx: f64) -> Self {
        Probe { x, fx: Some(fx) }
    }

    fn value<F: Fn(f64) -> f64>(&mut self, func: &mut WrappedFunction<F>) -> Result<f64> {
        match self.fx {
            Some(fx) => Ok(fx),
            None => {
                let fx = func.call(self.x)?;
                self.fx = Some(fx);
                Ok(fx)
            }
        }
    }
}

/// The current triple, plus a fourth slot used while inserting a new point.
#[derive(Debug, Clone, Copy)]
struct Points {
    x0: f64,
    x1: f64,
    x2: f64,
    x3: f64,
    fx0: f64,
    fx1: f64,
    fx2: f64,
    fx3: f64,
}

impl Points {
    /// Vertex of the parabola through the triple.
    fn vertex(&self) -> Result<f64> {
        let (d_10, d_21) = (self.x1 - self.x0, self.x2 - self.x1);
        let (g_0, g_2) = (self.fx0 - self.fx1, self.fx2 - self.fx1);

        let denominator = d_21 * g_0 + d_10 * g_2;
        let x_min = self.x1 + 0.5 * (d_21 * d_21 * g_0 - d_10 * d_10 * g_2) / denominator;
        if denominator == 0.0 || !x_min.is_finite() {
            return Err(SearchError::NumericDegeneracy {
                x0: self.x0,
                x1: self.x1,
                x2: self.x2,
            });
        }
        Ok(x_min)
    }

    /// Inserts the new estimate by position, pushing the right end into `x3`.
    fn assign_x3(&mut self, x_min: f64, fx_min: f64) {
        self.x3 = self.x2;
        self.fx3 = self.fx2;
        if x_min > self.x1 {
            self.x2 = x_min;
            self.fx2 = fx_min;
        } else {
            self.x2 = self.x1;
            self.fx2 = self.fx1;
            self.x1 = x_min;
            self.fx1 = fx_min;
        }
    }

    /// Keeps `(x0, x1, x2)` or shifts to `(x1, x2, x3)`, whichever has the lower
    /// middle value. On a tie the narrower triple wins.
    fn reorder_for_best_triple(&mut self, ulps: i64) {
        let shift = if self.fx1.approx_eq_ulps(&self.fx2, ulps) {
            self.x2 - self.x0 > self.x3 - self.x1
        } else {
            self.fx1 > self.fx2
        };
        if shift {
            self.x0 = self.x1;
            self.fx0 = self.fx1;
            self.x1 = self.x2;
            self.fx1 = self.fx2;
            self.x2 = self.x3;
            self.fx2 = self.fx3;
        }
    }
}

impl Quadratic {
    /// Interpolates from a caller supplied triple `x0 < x1 < x2`. Known function
    /// values are reused, missing ones are evaluated once.
    pub fn minimize_triple<F>(&self, func: F, triple: [Probe; 3]) -> Result<SearchResult>
    where
        F: Fn(f64) -> f64,
    {
        check_tolerance(self.xtol)?;
        let [mut p_0, mut p_1, mut p_2] = triple;
        if !(p_0.x < p_1.x && p_1.x < p_2.x) {
            return Err(SearchError::DegenerateTriple {
                x0: p_0.x,
                x1: p_1.x,
                x2: p_2.x,
            });
        }

        // values handed in count as evaluations of the triple
        let cached = triple.iter().filter(|p| p.fx.is_some()).count();
        let mut func = WrappedFunction::new(func);
        let fx0 = p_0.value(&mut func)?;
        let fx1 = p_1.value(&mut func)?;
        let fx2 = p_2.value(&mut func)?;
        let mut points = Points {
            x0: p_0.x,
            x1: p_1.x,
            x2: p_2.x,
            x3: p_2.x,
            fx0,
            fx1,
            fx2,
            fx3: fx2,
        };

        let mut iter = 0;
        loop {
            let x_min = match points.vertex() {
                Ok(x) => x,
                Err(e) => {
                    warn!("quadratic: no vertex for {:?}", points);
                    return Err(e);
                }
            };
            let fx_min = func.call(x_min)?;
            iter += 1;

            let x_prev = points.x1;
            points.assign_x3(x_min, fx_min);
            points.reorder_for_best_triple(self.ulps);
            trace!(
                "quadratic: iteration {}, x_min = {}, triple ({}, {}, {})",
                iter, x_min, points.x0, points.x1, points.x2
            );

            if (x_min - x_prev).abs() <= self.xtol {
                let res = SearchResult {
                    x: x_min,
                    fx: fx_min,
                    iterations: iter,
                    f_evals: func.num + cached,
                };
                debug!("quadratic: {:?}", res);
                return Ok(res);
            }
            if iter >= self.max_iter {
                warn!("quadratic: estimates still moving after {} iterations", iter);
                return Err(SearchError::MaxIterReached { iterations: iter });
            }
        }
    }
}

impl IntervalMinimizer for Quadratic {
    fn minimize<F: Fn(f64) -> f64>(&self, func: F, left: f64, right: f64) -> Result<SearchResult> {
        check_interval(left, right)?;
        check_tolerance(self.xtol)?;

        let seed = BracketBuilder::default()
            .step(self.step)
            .xtol(self.xtol)
            .within(Interval::new(left, right))
            .build()
            .map_err(SearchError::InvalidConfig)?
            .bracket(&func, left)?;
        let middle = if left < seed.x && seed.x < right {
            seed.x
        } else {
            (left + right) / 2.0
        };
        trace!("quadratic: seeded middle point {} from {:?}", middle, seed.interval);

        let sampled = |x: f64| Probe { x, fx: seed.value_at(x) };
        self.minimize_triple(func, [sampled(left), sampled(middle), sampled(right)])
    }
}

/// Successive parabolic interpolation for the minimum of `f` in `[a, b]`.
pub fn search<F>(epsilon: f64, a: f64, b: f64, f: F) -> Result<SearchResult>
where
    F: Fn(f64) -> f64,
{
    QuadraticBuilder::default()
        .xtol(epsilon)
        .build()
        .map_err(SearchError::InvalidConfig)?
        .minimize(f, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEq;
    use std::cell::RefCell;

    fn points(xs: [f64; 3], fs: [f64; 3]) -> Points {
        Points {
            x0: xs[0],
            x1: xs[1],
            x2: xs[2],
            x3: xs[2],
            fx0: fs[0],
            fx1: fs[1],
            fx2: fs[2],
            fx3: fs[2],
        }
    }

    #[test]
    fn vertex_of_a_parabola() {
        let f = |x: f64| 3.0 * (x - 1.5).powi(2) + 2.0;
        let p = points([0.0, 1.0, 4.0], [f(0.0), f(1.0), f(4.0)]);
        assert!(p.vertex().unwrap().approx_eq(&1.5, 1e-12, 4));
    }

    #[test]
    fn collinear_points() {
        let p = points([0.0, 1.0, 2.0], [1.0, 2.0, 3.0]);
        assert_eq!(
            p.vertex(),
            Err(SearchError::NumericDegeneracy { x0: 0.0, x1: 1.0, x2: 2.0 })
        );
    }

    #[test]
    fn insert_right_of_middle() {
        let mut p = points([0.0, 2.0, 4.0], [3.0, 1.0, 5.0]);
        p.assign_x3(3.0, 0.5);
        assert_eq!((p.x0, p.x1, p.x2, p.x3), (0.0, 2.0, 3.0, 4.0));
        p.reorder_for_best_triple(1);
        assert_eq!((p.x0, p.x1, p.x2), (2.0, 3.0, 4.0));
        assert_eq!((p.fx0, p.fx1, p.fx2), (1.0, 0.5, 5.0));
    }

    #[test]
    fn insert_left_of_middle() {
        let mut p = points([0.0, 2.0, 4.0], [3.0, 1.0, 5.0]);
        p.assign_x3(1.0, 2.0);
        assert_eq!((p.x0, p.x1, p.x2, p.x3), (0.0, 1.0, 2.0, 4.0));
        p.reorder_for_best_triple(1);
        assert_eq!((p.x0, p.x1, p.x2), (1.0, 2.0, 4.0));
        assert_eq!((p.fx0, p.fx1, p.fx2), (2.0, 1.0, 5.0));
    }

    #[test]
    fn tie_prefers_narrow_triple() {
        let mut p = points([0.0, 1.0, 2.0], [4.0, 1.0, 1.0]);
        p.x3 = 5.0;
        p.fx3 = 7.0;
        // (0, 1, 2) spans 2, (1, 2, 5) spans 4
        p.reorder_for_best_triple(1);
        assert_eq!((p.x0, p.x1, p.x2), (0.0, 1.0, 2.0));

        p.x0 = -10.0;
        p.reorder_for_best_triple(1);
        assert_eq!((p.x0, p.x1, p.x2), (1.0, 2.0, 5.0));
    }

    #[test]
    fn exact_on_a_parabola() {
        let f = |x: f64| (x - 0.2).powi(2);
        let res = search(1e-8, -1.0, 1.0, &f).unwrap();
        println!("res: {:?}", res);
        assert!(res.x.approx_eq(&0.2, 1e-12, 10));
        assert_eq!(res.f_evals, res.iterations + 3);
    }

    #[test]
    fn converges_quickly() {
        let f = |x: f64| x.exp() - 3.0 * x;
        let res = search(1e-8, 0.0, 3.0, &f).unwrap();
        println!("res: {:?}", res);
        assert!(res.iterations <= 50);
        assert!((res.x - 3f64.ln()).abs() <= 1e-7);
        assert_eq!(res.f_evals, res.iterations + 3);
    }

    #[test]
    fn cached_values_are_reused() {
        let f = |x: f64| x.log10() + x.sin();
        let minimizer = QuadraticBuilder::default().build().unwrap();
        let fresh = minimizer
            .minimize_triple(&f, [Probe::new(2.0), Probe::new(4.55), Probe::new(7.0)])
            .unwrap();
        let seeded = minimizer
            .minimize_triple(&f, [Probe::new(2.0), Probe::evaluated(4.55, f(4.55)), Probe::new(7.0)])
            .unwrap();
        assert_eq!(fresh, seeded);
        assert_eq!(fresh.f_evals, fresh.iterations + 3);
    }

    #[test]
    fn zero_is_a_cached_value() {
        let mut func = WrappedFunction::new(|x: f64| x + 1.0);
        let mut probe = Probe::evaluated(3.0, 0.0);
        assert_eq!(probe.value(&mut func), Ok(0.0));
        assert_eq!(func.num, 0);

        let mut probe = Probe::new(3.0);
        assert_eq!(probe.value(&mut func), Ok(4.0));
        assert_eq!(probe.value(&mut func), Ok(4.0));
        assert_eq!(func.num, 1);
    }

    #[test]
    fn unordered_triple() {
        let minimizer = QuadraticBuilder::default().build().unwrap();
        let res = minimizer.minimize_triple(|x: f64| x * x, [Probe::new(1.0), Probe::new(0.0), Probe::new(2.0)]);
        assert_eq!(res, Err(SearchError::DegenerateTriple { x0: 1.0, x1: 0.0, x2: 2.0 }));
    }

    #[test]
    fn minimum_at_the_left_bound() {
        // seeded with the midpoint, the first vertex lands on the bound itself
        let res = search(1e-8, 0.0, 1.0, |x: f64| x * x);
        assert_eq!(res, Err(SearchError::NumericDegeneracy { x0: 0.0, x1: 0.0, x2: 0.5 }));
    }

    #[test]
    fn minimum_near_the_right_bound() {
        let f = |x: f64| (x - 0.99).powi(2);
        let res = search(1e-8, 0.0, 1.0, &f).unwrap();
        println!("res: {:?}", res);
        assert!(res.x.approx_eq(&0.99, 1e-12, 10));
        assert_eq!(res.f_evals, res.iterations + 3);

        let golden = crate::scalar::golden_ratio::search(1e-8, 0.0, 1.0, &f).unwrap();
        assert!((res.x - golden.x).abs() <= 1e-7);
    }

    #[test]
    fn minimum_near_the_right_bound_of_a_quartic() {
        let f = |x: f64| (x - 0.97).powi(4) - x;
        // f'(x) = 4 (x - 0.97)^3 - 1 = 0
        let x_min = 0.97 + 0.25f64.cbrt();
        let res = search(1e-8, 0.0, 1.8, &f).unwrap();
        println!("res: {:?}", res);
        assert!((res.x - x_min).abs() <= 1e-6);
    }

    #[test]
    fn bracketing_samples_are_not_evaluated_again() {
        let calls = RefCell::new(Vec::new());
        let f = |x: f64| {
            calls.borrow_mut().push(x);
            x.log10() + x.sin()
        };
        let res = search(1e-8, 2.0, 7.0, &f).unwrap();
        let calls = calls.into_inner();
        println!("res: {:?}, {} calls", res, calls.len());

        assert_eq!(calls.iter().filter(|&&x| x == 2.0).count(), 1);
        assert_eq!(calls.iter().filter(|&&x| x == 7.0).count(), 1);
        // ten bracketing samples, including both bounds, then one per iteration
        assert_eq!(calls.len(), 10 + res.iterations);
        assert_eq!(res.f_evals, res.iterations + 3);
    }

    #[test]
    fn linear_objective() {
        let res = QuadraticBuilder::default()
            .build()
            .unwrap()
            .minimize_triple(|x: f64| 2.0 * x, [Probe::new(0.0), Probe::new(1.0), Probe::new(3.0)]);
        match res {
            Err(SearchError::NumericDegeneracy { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}

use crate::error::{Result, SearchError};
use num_traits::{CheckedAdd, One};

/// Counts the evaluations of the wrapped objective and rejects NaN values.
pub struct WrappedFunction<F: Fn(f64) -> f64> {
    pub num: usize,
    pub func: F,
}

impl<F: Fn(f64) -> f64> WrappedFunction<F> {
    pub fn new(func: F) -> Self {
        WrappedFunction { num: 0, func }
    }

    pub fn call(&mut self, x: f64) -> Result<f64> {
        self.num += 1;
        self.peek(x)
    }

    /// Evaluates without counting, for values that are only reported.
    pub fn peek(&self, x: f64) -> Result<f64> {
        let fx = (self.func)(x);
        if fx.is_nan() {
            return Err(SearchError::NotANumber { x });
        }
        Ok(fx)
    }
}

/// Appends the next Fibonacci number to `seq` (seeded with `Fib(0) = Fib(1) = 1`)
/// and returns it, or `None` if it overflows `N`.
pub fn extend_fibonacci<N: Copy + One + CheckedAdd>(seq: &mut Vec<N>) -> Option<N> {
    let next = match seq.len() {
        0 | 1 => N::one(),
        n => seq[n - 1].checked_add(&seq[n - 2])?,
    };
    seq.push(next);
    Some(next)
}

/// The `n`-th Fibonacci number, `Fib(0) = Fib(1) = 1`. Computed bottom-up.
pub fn fibonacci<N: Copy + One + CheckedAdd>(n: usize) -> Option<N> {
    let (mut prev, mut cur) = (N::one(), N::one());
    for _ in 1..n {
        let next = prev.checked_add(&cur)?;
        prev = cur;
        cur = next;
    }
    Some(cur)
}

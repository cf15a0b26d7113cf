//! One-dimensional minimization of scalar functions.
//!
//! Every algorithm is a small configuration struct built with its builder and
//! implementing [`IntervalMinimizer`](minimizer/trait.IntervalMinimizer.html),
//! next to a free `search` function taking the tolerance directly.
//!
//! ```
//! # extern crate univariate;
//! use univariate::scalar::golden_ratio;
//!
//! let f = |x: f64| x.log10() + x.sin();
//! let res = golden_ratio::search(1e-8, 2.0, 7.0, &f).unwrap();
//! assert!((res.x - 4.6182).abs() < 1e-4);
//! ```

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;

extern crate float_cmp;
extern crate num_traits;
extern crate thiserror;

pub mod error;
pub mod minimizer;
pub mod scalar;
pub mod utils;

pub use error::{Result, SearchError};
pub use minimizer::{Interval, IntervalMinimizer, SearchResult};

//! This module contains algorithms that search for local minima of functions along a single dimension.

pub mod bracket;
pub mod dichotomy;
pub mod fibonacci;
pub mod golden_ratio;
pub mod quadratic;

pub use self::bracket::{search_interval, Bracket, BracketBuilder, BracketResult};
pub use self::dichotomy::{Dichotomy, DichotomyBuilder};
pub use self::fibonacci::{Fibonacci, FibonacciBuilder};
pub use self::golden_ratio::{GoldenRatio, GoldenRatioBuilder};
pub use self::quadratic::{Probe, Quadratic, QuadraticBuilder};

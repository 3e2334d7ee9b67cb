//! Mathematical utilities: least squares, descriptive statistics, special functions.

pub mod ols;
pub mod special;
pub mod stats;

pub use ols::*;
pub use special::*;
pub use stats::*;

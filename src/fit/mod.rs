//! Regression and uncertainty estimation.
//!
//! Responsibilities:
//!
//! - fit a line to nominal and Monte-Carlo data (parallel over samples)
//! - reduce Monte-Carlo samples to percentile confidence intervals

pub mod confidence;
pub mod linregmc;

pub use confidence::*;
pub use linregmc::*;

//! Monte-Carlo data generation.

pub mod sampling;

pub use sampling::*;

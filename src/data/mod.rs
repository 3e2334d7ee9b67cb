//! Experimental input data.

pub mod experiment;

pub use experiment::*;

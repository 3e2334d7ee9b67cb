//! Physical model of ion-pair dissociation.
//!
//! Kept as small, pure functions so the pipeline and the Monte-Carlo
//! propagation share one implementation.

pub mod ion_pair;

pub use ion_pair::*;

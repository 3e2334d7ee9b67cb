//! Input/output helpers.
//!
//! - report JSON read/write (`report`)
//! - per-substance CSV export (`export`)
//!
//! Measurement CSV ingest lives in `data`.

pub mod export;
pub mod report;

pub use export::*;
pub use report::*;

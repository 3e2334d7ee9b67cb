//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measured inputs (`Substance`, `Experiment`)
//! - run configuration (`AnalysisConfig`, `Distribution`)
//! - analysis outputs (`SubstanceResult`, `FitSummary`, `AnalysisReport`, etc.)

pub mod types;

pub use types::*;

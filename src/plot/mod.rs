//! Chart rendering: deterministic ASCII for the terminal, Plotters for SVG and the TUI.

pub mod ascii;
pub mod chart;

pub use ascii::*;
pub use chart::*;

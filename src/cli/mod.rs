//! Command-line parsing for the conductivity analysis.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the physics/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Distribution;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cond",
    version,
    about = "Ion radius and lattice energy from conductivity measurements (Monte-Carlo line fit)"
)]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the analysis, print the results and optionally plot/export.
    Analyze(AnalyzeArgs),
    /// Plot a previously exported report JSON.
    Plot(PlotArgs),
    /// Launch the interactive terminal view.
    ///
    /// This uses the same analysis pipeline as `cond analyze`, but renders the
    /// chart and results with Ratatui and lets you re-run with other settings.
    Show(AnalyzeArgs),
}

/// Common options for analysis runs.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Measurement CSV (substance, kappa, molar_conductivity, dielectric).
    /// The built-in lab dataset is used when omitted.
    #[arg(long, value_name = "CSV", env = "COND_DATA")]
    pub data: Option<PathBuf>,

    /// Number of Monte-Carlo samples.
    #[arg(short = 'n', long, env = "COND_SAMPLES", default_value_t = 1000)]
    pub samples: usize,

    /// Temperature (K).
    #[arg(long, env = "COND_TEMPERATURE", default_value_t = 293.0)]
    pub temperature: f64,

    /// Relative standard deviation of the concentrations.
    #[arg(long, env = "COND_SIGMA_REL", default_value_t = 0.3)]
    pub sigma_rel: f64,

    /// Confidence level of the reported intervals.
    #[arg(long, env = "COND_CONFIDENCE", default_value_t = 0.95)]
    pub confidence: f64,

    /// Sampling distribution of the concentrations.
    #[arg(long, value_enum, env = "COND_DISTRIBUTION", default_value_t = Distribution::Lognorm)]
    pub distribution: Distribution,

    /// Random seed for the Monte-Carlo samples.
    #[arg(long, env = "COND_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the chart as SVG.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    /// Export the full report to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export per-substance results to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

/// Options for plotting a saved report.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Report JSON file produced by `cond analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

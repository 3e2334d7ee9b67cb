//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the analysis
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One measured solvent in the conductivity experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    pub name: String,
    /// Conductivity κ (S/m).
    pub kappa: f64,
    /// Molar conductivity Λ (S/m/M).
    pub molar_conductivity: f64,
    /// Relative permittivity εr of the solvent.
    pub dielectric: f64,
}

impl Substance {
    pub fn new(name: impl Into<String>, kappa: f64, molar_conductivity: f64, dielectric: f64) -> Self {
        Self {
            name: name.into(),
            kappa,
            molar_conductivity,
            dielectric,
        }
    }
}

/// A full set of measurements taken at one temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub substances: Vec<Substance>,
    /// Temperature (K).
    pub temperature: f64,
}

/// Error distribution family used when resampling measured values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Normal around the nominal value.
    Norm,
    /// Lognormal with the nominal value as arithmetic mean. Never produces
    /// non-positive samples.
    Lognorm,
    /// Uniform with the same standard deviation as the normal family.
    Unif,
}

impl Distribution {
    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Norm => "norm",
            Distribution::Lognorm => "lognorm",
            Distribution::Unif => "unif",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Distribution::Norm => Distribution::Lognorm,
            Distribution::Lognorm => Distribution::Unif,
            Distribution::Unif => Distribution::Norm,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Optional measurement CSV; the built-in lab dataset is used when absent.
    pub data_path: Option<PathBuf>,
    /// Temperature (K).
    pub temperature: f64,
    /// Number of Monte-Carlo samples.
    pub sample_count: usize,
    /// Relative standard deviation of the concentrations.
    pub sigma_rel: f64,
    /// Confidence level for reported intervals (0.683 gives one standard error).
    pub confidence: f64,
    pub distribution: Distribution,
    pub seed: u64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub chart_path: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            temperature: 293.0,
            sample_count: 1000,
            sigma_rel: 0.3,
            confidence: 0.95,
            distribution: Distribution::Lognorm,
            seed: 42,
            plot: true,
            plot_width: 72,
            plot_height: 20,
            chart_path: None,
            export_json: None,
            export_csv: None,
        }
    }
}

/// A two-sided Monte-Carlo confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfInterval {
    /// Half-width of `[low, high]`.
    pub err: f64,
    pub low: f64,
    pub high: f64,
    pub confidence: f64,
}

/// A derived physical quantity with its Monte-Carlo interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantity {
    pub value: f64,
    pub unit: String,
    pub interval: ConfInterval,
}

/// Nominal per-substance values (SI units, energies in J/mol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceResult {
    pub name: String,
    pub kappa: f64,
    pub molar_conductivity: f64,
    pub dielectric: f64,
    /// Salt concentration `κ/Λ` (M).
    pub concentration: f64,
    pub ln_concentration: f64,
    /// `dG0` (J/mol).
    pub dg0: f64,
    /// Monte-Carlo standard error of `dG0` (J/mol).
    pub dg0_sigma: f64,
    /// Predictor `1/εr - 1`.
    pub x: f64,
}

/// Linear fit of `dG0` against `1/εr - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// J/mol per unit of `1/εr - 1`.
    pub slope: f64,
    /// J/mol.
    pub intercept: f64,
    pub slope_sigma: f64,
    pub intercept_sigma: f64,
    pub slope_interval: ConfInterval,
    pub intercept_interval: ConfInterval,
    pub chi2: f64,
    pub dof: usize,
    /// `P(χ²_dof ≥ chi2)`; absent when there are no degrees of freedom.
    pub p_chi2: Option<f64>,
}

/// Everything a run prints or plots, in a portable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub temperature: f64,
    pub sample_count: usize,
    pub sigma_rel: f64,
    pub confidence: f64,
    pub distribution: Distribution,
    pub seed: u64,
    pub substances: Vec<SubstanceResult>,
    pub fit: FitSummary,
    /// Mean ionic radius a± (Å).
    pub radius: DerivedQuantity,
    /// Lattice energy (kJ/mol).
    pub lattice_energy: DerivedQuantity,
    /// Mean radius from tabulated Na⁺/Cl⁻ radii (Å).
    pub literature_radius: f64,
}

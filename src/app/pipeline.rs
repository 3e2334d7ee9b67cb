//! Shared analysis pipeline used by the CLI, plot and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! measurements -> concentrations -> dG0 -> Monte-Carlo samples -> line fit ->
//! derived quantities -> report
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::domain::{
    AnalysisConfig, AnalysisReport, DerivedQuantity, Distribution, Experiment, FitSummary, SubstanceResult,
};
use crate::error::AppError;
use crate::fit::{McRegression, linreg_mc, mc_err_conf, mc_err_conf_columns, validate_confidence};
use crate::math::column_population_std;
use crate::mc::{McData, create_mc_data};
use crate::models::{
    CL_RADIUS, NA_RADIUS, concentrations, dielectric_predictor, gibbs_dissociation, gibbs_from_ln,
    ion_radius_angstrom, lattice_energy_kj, literature_radius,
};

pub const TOOL_NAME: &str = "cond";

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// The analysed measurements; front-ends re-run on them with other settings.
    pub experiment: Experiment,
    /// Sampled concentrations (M).
    pub concentrations: McData,
    pub regression: McRegression,
    pub report: AnalysisReport,
}

/// Load the configured measurements and run the analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisRun, AppError> {
    let experiment = match &config.data_path {
        Some(path) => crate::data::load_experiment_csv(path, config.temperature)?,
        None => Experiment::default_lab().with_temperature(config.temperature),
    };
    run_analysis_with_experiment(config, experiment)
}

/// Run the analysis on an already loaded experiment.
///
/// The experiment's own temperature is used; `config.temperature` only applies
/// when loading.
pub fn run_analysis_with_experiment(
    config: &AnalysisConfig,
    experiment: Experiment,
) -> Result<AnalysisRun, AppError> {
    validate_config(config)?;
    experiment.validate()?;
    let temperature = experiment.temperature;

    // 1) Nominal concentrations and free energies.
    let c = concentrations(&experiment);
    let dg0_nominal = c
        .iter()
        .map(|&ci| gibbs_dissociation(ci, temperature))
        .collect::<Result<Vec<_>, _>>()?;

    // 2) Monte-Carlo concentrations.
    let sigma: Vec<f64> = c.iter().map(|ci| config.sigma_rel * ci).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let c_mc = create_mc_data(&c, &sigma, config.sample_count, config.distribution, &mut rng)?;
    ensure_positive_samples(&c_mc, config.distribution)?;
    debug!(
        samples = c_mc.sample_count(),
        distribution = config.distribution.display_name(),
        "sampled concentrations"
    );

    // 3) Propagate to dG0 (all samples are positive at this point).
    let dg0_mc = c_mc.map(|v| gibbs_from_ln(v.ln(), temperature));
    let dg0_sigma = column_population_std(&dg0_mc.samples)
        .ok_or_else(|| AppError::numeric("Non-finite Monte-Carlo dG0 values."))?;

    // 4) Line fit against 1/εr - 1.
    let x: Vec<f64> = experiment
        .substances
        .iter()
        .map(|s| dielectric_predictor(s.dielectric))
        .collect();
    let regression = linreg_mc(&x, &dg0_mc)?;
    let coefficient_intervals = mc_err_conf_columns(&regression.samples, config.confidence)?;

    // 5) Derived quantities.
    let slope = regression.slope();
    if !(slope.is_finite() && slope != 0.0) {
        return Err(AppError::numeric(format!(
            "Fitted slope {slope} does not determine an ionic radius."
        )));
    }
    let radius_samples: Vec<f64> = regression
        .slope_samples()
        .into_iter()
        .map(ion_radius_angstrom)
        .collect();
    let lattice_samples: Vec<f64> = regression
        .intercept_samples()
        .into_iter()
        .map(lattice_energy_kj)
        .collect();

    let radius = DerivedQuantity {
        value: ion_radius_angstrom(slope),
        unit: "Å".to_string(),
        interval: mc_err_conf(&radius_samples, config.confidence)?,
    };
    let lattice_energy = DerivedQuantity {
        value: lattice_energy_kj(regression.intercept()),
        unit: "kJ/mol".to_string(),
        interval: mc_err_conf(&lattice_samples, config.confidence)?,
    };

    info!(
        radius = radius.value,
        radius_err = radius.interval.err,
        lattice_energy = lattice_energy.value,
        lattice_err = lattice_energy.interval.err,
        chi2 = regression.chi2,
        "analysis complete"
    );

    let substances = experiment
        .substances
        .iter()
        .enumerate()
        .map(|(i, s)| SubstanceResult {
            name: s.name.clone(),
            kappa: s.kappa,
            molar_conductivity: s.molar_conductivity,
            dielectric: s.dielectric,
            concentration: c[i],
            ln_concentration: c[i].ln(),
            dg0: dg0_nominal[i],
            dg0_sigma: dg0_sigma[i],
            x: x[i],
        })
        .collect();

    let fit = FitSummary {
        slope,
        intercept: regression.intercept(),
        slope_sigma: regression.sigmas[0],
        intercept_sigma: regression.sigmas[1],
        slope_interval: coefficient_intervals[0],
        intercept_interval: coefficient_intervals[1],
        chi2: regression.chi2,
        dof: regression.dof,
        p_chi2: regression.p_chi2,
    };

    let report = AnalysisReport {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        temperature,
        sample_count: config.sample_count,
        sigma_rel: config.sigma_rel,
        confidence: config.confidence,
        distribution: config.distribution,
        seed: config.seed,
        substances,
        fit,
        radius,
        lattice_energy,
        literature_radius: literature_radius(NA_RADIUS, CL_RADIUS),
    };

    Ok(AnalysisRun {
        experiment,
        concentrations: c_mc,
        regression,
        report,
    })
}

fn validate_config(config: &AnalysisConfig) -> Result<(), AppError> {
    if config.sample_count == 0 {
        return Err(AppError::data("Monte-Carlo sample count must be > 0."));
    }
    if !(config.sigma_rel.is_finite() && config.sigma_rel >= 0.0) {
        return Err(AppError::data(format!(
            "Relative uncertainty must be non-negative (got {}).",
            config.sigma_rel
        )));
    }
    validate_confidence(config.confidence)
}

/// Concentrations enter a logarithm, so every sample must be positive.
fn ensure_positive_samples(c_mc: &McData, distribution: Distribution) -> Result<(), AppError> {
    let bad = c_mc.samples.iter().filter(|&&v| v <= 0.0).count();
    if bad > 0 {
        return Err(AppError::data(format!(
            "{bad} sampled concentrations are non-positive with the '{}' distribution; \
             use 'lognorm' or a smaller relative uncertainty.",
            distribution.display_name()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Substance;

    fn config(samples: usize) -> AnalysisConfig {
        AnalysisConfig {
            sample_count: samples,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn default_lab_nominal_results() {
        let run = run_analysis(&config(2000)).unwrap();
        let report = &run.report;

        assert_eq!(report.substances.len(), 4);
        assert!((report.substances[0].dg0 - 25_078.92).abs() < 0.01);
        assert!((report.substances[3].dg0 + 9_823.29).abs() < 0.01);

        assert!((report.fit.slope - 790_371.72).abs() < 0.1, "slope {}", report.fit.slope);
        assert!((report.fit.intercept - 770_618.53).abs() < 0.1);
        assert!((report.radius.value - 1.7579).abs() < 1e-3);
        assert!((report.lattice_energy.value - 770.6185).abs() < 1e-3);
        assert!((report.literature_radius - 1.3690).abs() < 1e-3);
        assert_eq!(report.fit.dof, 2);

        // Lognormal with 30 % spread: sd(ln c) = sqrt(ln 1.09), scaled by 2RT.
        for s in &report.substances {
            assert!((s.dg0_sigma / 1430.3 - 1.0).abs() < 0.1, "{} sigma {}", s.name, s.dg0_sigma);
        }
        // With MC-estimated sigmas the chi-square lands near 8.6.
        assert!(report.fit.chi2 > 6.0 && report.fit.chi2 < 12.0, "chi2 {}", report.fit.chi2);
        let p = report.fit.p_chi2.unwrap();
        assert!(p > 0.0 && p < 0.1);
    }

    #[test]
    fn intervals_bracket_reasonable_ranges() {
        let run = run_analysis(&config(2000)).unwrap();
        let r = &run.report.radius;
        assert!(r.interval.low < r.value && r.value < r.interval.high);
        assert!(r.interval.err > 0.0);
        let g = &run.report.lattice_energy;
        assert!(g.interval.low < g.value && g.value < g.interval.high);
        assert_eq!(run.regression.samples.nrows(), 2000);
        assert_eq!(run.concentrations.sample_count(), 2000);
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = run_analysis(&config(300)).unwrap().report;
        let mut b = run_analysis(&config(300)).unwrap().report;
        b.generated_at = a.generated_at;
        assert_eq!(a, b);

        let mut other = config(300);
        other.seed = 43;
        let c = run_analysis(&other).unwrap().report;
        assert_ne!(a.radius.interval, c.radius.interval);
        assert_eq!(a.radius.value, c.radius.value);
    }

    #[test]
    fn normal_sampling_with_large_spread_is_rejected() {
        let cfg = AnalysisConfig {
            distribution: Distribution::Norm,
            sigma_rel: 0.6,
            sample_count: 2000,
            ..AnalysisConfig::default()
        };
        let err = run_analysis(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("lognorm"));
    }

    #[test]
    fn negligible_uniform_spread_collapses_to_nominal_values() {
        let cfg = AnalysisConfig {
            distribution: Distribution::Unif,
            sigma_rel: 1e-17,
            sample_count: 50,
            ..AnalysisConfig::default()
        };
        let report = run_analysis(&cfg).unwrap().report;
        assert!((report.radius.value - 1.7579).abs() < 1e-3);
        assert!(report.radius.interval.err < 1e-9);
        assert!(report.substances.iter().all(|s| s.dg0_sigma < 1e-6));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut cfg = config(100);
        cfg.confidence = 1.2;
        assert_eq!(run_analysis(&cfg).unwrap_err().exit_code(), 3);

        let cfg = config(0);
        assert_eq!(run_analysis(&cfg).unwrap_err().exit_code(), 3);

        let mut cfg = config(100);
        cfg.sigma_rel = -0.1;
        assert!(run_analysis(&cfg).is_err());
    }

    #[test]
    fn custom_experiment_uses_its_temperature() {
        let experiment = Experiment {
            substances: vec![
                Substance::new("a", 1e-3, 0.1, 10.0),
                Substance::new("b", 1e-2, 0.5, 20.0),
                Substance::new("c", 1.0, 2.0, 40.0),
            ],
            temperature: 300.0,
        };
        let run = run_analysis_with_experiment(&config(100), experiment).unwrap();
        assert_eq!(run.report.temperature, 300.0);
        let expected = -2.0 * crate::models::GAS_CONSTANT * 300.0 * (0.01_f64).ln();
        assert!((run.report.substances[0].dg0 - expected).abs() < 1e-9);
    }
}

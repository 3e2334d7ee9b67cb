//! Monte-Carlo linear regression.
//!
//! Given:
//! - predictor values `x_i`
//! - nominal observations `y_i`
//! - `n` simulated data sets (one per Monte-Carlo sample)
//!
//! we fit a straight line to the nominal data and to every simulated data set.
//! The spread of the per-sample coefficients is the coefficient uncertainty;
//! the per-point spread of the simulated data weights the chi-square statistic.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::debug;

use crate::error::AppError;
use crate::math::{chi_squared_sf, column_population_std, design_svd, polyfit, polyval, solve_with_svd};
use crate::mc::McData;

/// Result of a Monte-Carlo line fit. Coefficients are `[slope, intercept]`.
#[derive(Debug, Clone)]
pub struct McRegression {
    /// Best-fit coefficients from the nominal data.
    pub coefficients: Vec<f64>,
    /// Standard deviation of each coefficient over the Monte-Carlo fits.
    pub sigmas: Vec<f64>,
    pub chi2: f64,
    pub dof: usize,
    /// Probability of a chi-square at least as large as `chi2`.
    pub p_chi2: Option<f64>,
    /// Per-sample coefficients, one row per Monte-Carlo sample.
    pub samples: DMatrix<f64>,
}

impl McRegression {
    pub fn slope(&self) -> f64 {
        self.coefficients[0]
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients[1]
    }

    pub fn slope_samples(&self) -> Vec<f64> {
        self.samples.column(0).iter().copied().collect()
    }

    pub fn intercept_samples(&self) -> Vec<f64> {
        self.samples.column(1).iter().copied().collect()
    }
}

/// Fit `y = slope·x + intercept` to the nominal data and every MC sample.
pub fn linreg_mc(x: &[f64], data: &McData) -> Result<McRegression, AppError> {
    let n_points = x.len();
    if n_points < 2 {
        return Err(AppError::data("A line fit needs at least two points."));
    }
    if data.nominal.len() != n_points || data.point_count() != n_points {
        return Err(AppError::data(format!(
            "Predictor has {n_points} values but the data has {} points.",
            data.point_count()
        )));
    }

    let svd = design_svd(x, 1).ok_or_else(|| {
        AppError::numeric("Predictor values are degenerate; cannot fit a line.")
    })?;

    let coefficients = polyfit(x, &data.nominal, 1)
        .ok_or_else(|| AppError::numeric("Line fit of the nominal data failed."))?;

    // Each sample is an independent least squares solve against the shared
    // decomposition (parallel; collection keeps sample order).
    let n_samples = data.sample_count();
    let fits: Vec<Vec<f64>> = (0..n_samples)
        .into_par_iter()
        .map(|r| {
            let y = DVector::from_iterator(n_points, data.samples.row(r).iter().copied());
            solve_with_svd(&svd, &y)
                .map(|beta| beta.iter().copied().collect())
                .ok_or_else(|| AppError::numeric(format!("Line fit of Monte-Carlo sample {r} failed.")))
        })
        .collect::<Result<_, _>>()?;

    let samples = DMatrix::from_fn(n_samples, 2, |r, c| fits[r][c]);
    let sigmas = column_population_std(&samples)
        .ok_or_else(|| AppError::numeric("Non-finite Monte-Carlo coefficients."))?;

    let point_sigmas = column_population_std(&data.samples)
        .ok_or_else(|| AppError::numeric("Non-finite Monte-Carlo data."))?;
    let chi2 = chi_square(x, &data.nominal, &coefficients, &point_sigmas);
    let dof = n_points - 2;
    let p_chi2 = (dof > 0).then(|| chi_squared_sf(chi2, dof as f64));

    debug!(
        slope = coefficients[0],
        intercept = coefficients[1],
        chi2,
        dof,
        samples = n_samples,
        "monte-carlo line fit"
    );

    Ok(McRegression {
        coefficients,
        sigmas,
        chi2,
        dof,
        p_chi2,
        samples,
    })
}

/// `Σ ((y_i - ŷ_i) / s_i)²`, skipping points without spread.
fn chi_square(x: &[f64], y: &[f64], coefficients: &[f64], sigmas: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .zip(sigmas)
        .filter(|(_, s)| **s > 0.0)
        .map(|((&xi, &yi), &s)| {
            let r = (yi - polyval(coefficients, xi)) / s;
            r * r
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Distribution;
    use crate::mc::create_mc_data;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn exact_line_without_noise() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let data = create_mc_data(&y, &[0.0; 4], 10, Distribution::Norm, &mut StdRng::seed_from_u64(1)).unwrap();

        let fit = linreg_mc(&x, &data).unwrap();
        assert!((fit.slope() - 2.0).abs() < 1e-10);
        assert!((fit.intercept() - 1.0).abs() < 1e-10);
        assert!(fit.sigmas.iter().all(|s| s.abs() < 1e-10));
        assert_eq!(fit.samples.nrows(), 10);
        assert_eq!(fit.chi2, 0.0);
        assert_eq!(fit.dof, 2);
        assert_eq!(fit.p_chi2, Some(1.0));
    }

    #[test]
    fn sample_rows_are_fitted_in_order() {
        let x = [0.0, 1.0, 2.0];
        let data = McData {
            nominal: vec![0.0, 1.0, 2.0],
            samples: DMatrix::from_row_slice(3, 3, &[
                0.0, 1.0, 2.0, //
                0.0, 2.0, 4.0, //
                5.0, 5.0, 5.0,
            ]),
        };
        let fit = linreg_mc(&x, &data).unwrap();
        assert!((fit.samples[(0, 0)] - 1.0).abs() < 1e-10);
        assert!((fit.samples[(1, 0)] - 2.0).abs() < 1e-10);
        assert!(fit.samples[(2, 0)].abs() < 1e-10);
        assert!((fit.samples[(2, 1)] - 5.0).abs() < 1e-10);
        assert_eq!(fit.slope_samples().len(), 3);
        assert_eq!(fit.intercept_samples()[2], fit.samples[(2, 1)]);
    }

    #[test]
    fn noisy_fit_recovers_line_and_reports_spread() {
        let x = [-0.94, -0.96, -0.97, -0.99];
        let y: Vec<f64> = x.iter().map(|v| 8.0e5 * v + 7.7e5).collect();
        let sigma = [1500.0; 4];
        let data = create_mc_data(&y, &sigma, 4000, Distribution::Norm, &mut StdRng::seed_from_u64(9)).unwrap();

        let fit = linreg_mc(&x, &data).unwrap();
        assert!((fit.slope() - 8.0e5).abs() < 1e-3);
        assert!(fit.sigmas[0] > 0.0 && fit.sigmas[1] > 0.0);

        let mean_slope = crate::math::mean(&fit.slope_samples()).unwrap();
        assert!((mean_slope / 8.0e5 - 1.0).abs() < 0.02, "mean slope {mean_slope}");
        // Nominal data lies exactly on the line.
        assert!(fit.chi2 < 1e-12);
    }

    #[test]
    fn nominal_coefficients_come_from_polyfit() {
        let x = [-0.94, -0.96, -0.97, -0.99];
        let y = [25.1e3, 16.2e3, 2.5e3, -9.8e3];
        let data = create_mc_data(&y, &[900.0; 4], 50, Distribution::Norm, &mut StdRng::seed_from_u64(3)).unwrap();

        let fit = linreg_mc(&x, &data).unwrap();
        assert_eq!(fit.coefficients, polyfit(&x, &y, 1).unwrap());
        assert!(fit.chi2 > 0.0);
    }

    #[test]
    fn two_points_have_no_p_value() {
        let x = [0.0, 1.0];
        let data = create_mc_data(&[1.0, 2.0], &[0.1, 0.1], 20, Distribution::Norm, &mut StdRng::seed_from_u64(4))
            .unwrap();
        let fit = linreg_mc(&x, &data).unwrap();
        assert_eq!(fit.dof, 0);
        assert!(fit.p_chi2.is_none());
    }

    #[test]
    fn rejects_bad_shapes_and_degenerate_x() {
        let data = create_mc_data(&[1.0, 2.0, 3.0], &[0.1; 3], 5, Distribution::Norm, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(linreg_mc(&[0.0, 1.0], &data).unwrap_err().exit_code(), 3);
        assert_eq!(linreg_mc(&[1.0, 1.0, 1.0], &data).unwrap_err().exit_code(), 4);
        assert!(linreg_mc(&[1.0], &data).is_err());
    }
}

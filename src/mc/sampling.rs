//! Monte-Carlo resampling of measured values.
//!
//! Each nominal value `y_i` with standard deviation `σ_i` is redrawn `n` times
//! from the chosen distribution family. Columns are independent; row `r` of the
//! sample matrix is one complete simulated data set.

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution as _, LogNormal, Normal, Uniform};

use crate::domain::Distribution;
use crate::error::AppError;

/// Nominal data plus `n × N` simulated data sets.
#[derive(Debug, Clone, PartialEq)]
pub struct McData {
    pub nominal: Vec<f64>,
    pub samples: DMatrix<f64>,
}

impl McData {
    pub fn sample_count(&self) -> usize {
        self.samples.nrows()
    }

    pub fn point_count(&self) -> usize {
        self.samples.ncols()
    }

    /// Apply `f` elementwise to nominal values and samples alike.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> McData {
        McData {
            nominal: self.nominal.iter().map(|&v| f(v)).collect(),
            samples: self.samples.map(f),
        }
    }
}

/// Generate Monte-Carlo data around `nominal` with absolute errors `sigma`.
pub fn create_mc_data<R: Rng + ?Sized>(
    nominal: &[f64],
    sigma: &[f64],
    n: usize,
    dist: Distribution,
    rng: &mut R,
) -> Result<McData, AppError> {
    if n == 0 {
        return Err(AppError::data("Monte-Carlo sample count must be > 0."));
    }
    if nominal.len() != sigma.len() {
        return Err(AppError::data(format!(
            "Got {} nominal values but {} uncertainties.",
            nominal.len(),
            sigma.len()
        )));
    }
    if nominal.is_empty() {
        return Err(AppError::data("No values to resample."));
    }

    let mut samples = DMatrix::zeros(n, nominal.len());
    for (j, (&y, &s)) in nominal.iter().zip(sigma).enumerate() {
        if !y.is_finite() {
            return Err(AppError::data(format!("Non-finite nominal value at index {j}.")));
        }
        if !(s.is_finite() && s >= 0.0) {
            return Err(AppError::data(format!(
                "Uncertainty at index {j} must be finite and non-negative (got {s})."
            )));
        }

        if s == 0.0 {
            samples.column_mut(j).fill(y);
            continue;
        }

        let column = sample_column(y, s, n, dist, rng)
            .map_err(|e| AppError::data(format!("Cannot sample value {y} ± {s} ({}): {e}", dist.display_name())))?;
        for (r, v) in column.into_iter().enumerate() {
            samples[(r, j)] = v;
        }
    }

    Ok(McData {
        nominal: nominal.to_vec(),
        samples,
    })
}

fn sample_column<R: Rng + ?Sized>(
    y: f64,
    s: f64,
    n: usize,
    dist: Distribution,
    rng: &mut R,
) -> Result<Vec<f64>, String> {
    match dist {
        Distribution::Norm => {
            let normal = Normal::new(y, s).map_err(|e| e.to_string())?;
            Ok((0..n).map(|_| normal.sample(&mut *rng)).collect())
        }
        Distribution::Lognorm => {
            if y <= 0.0 {
                return Err("lognormal sampling needs a positive nominal value".to_string());
            }
            let (mu, sigma_ln) = lognormal_params(y, s);
            let lognormal = LogNormal::new(mu, sigma_ln).map_err(|e| e.to_string())?;
            Ok((0..n).map(|_| lognormal.sample(&mut *rng)).collect())
        }
        Distribution::Unif => {
            let half_width = 3.0_f64.sqrt() * s;
            let (low, high) = (y - half_width, y + half_width);
            // Spreads below the resolution of `y` collapse the range.
            if low >= high {
                return Ok(vec![y; n]);
            }
            let uniform = Uniform::new(low, high);
            Ok((0..n).map(|_| uniform.sample(&mut *rng)).collect())
        }
    }
}

/// Parameters `(μ, σ)` of the underlying normal so that the lognormal has
/// arithmetic mean `mean` and standard deviation `sd`.
pub fn lognormal_params(mean: f64, sd: f64) -> (f64, f64) {
    let cv = sd / mean;
    let var_ln = (1.0 + cv * cv).ln();
    (mean.ln() - 0.5 * var_ln, var_ln.sqrt())
}

//! Confidence intervals from Monte-Carlo samples.
//!
//! The interval at level `p` spans the `(1-p)/2` and `(1+p)/2` percentiles of
//! the sampled values; the reported error is half its width. For a normal
//! sample and `p = 0.683` this reduces to one standard deviation.

use nalgebra::DMatrix;

use crate::domain::ConfInterval;
use crate::error::AppError;
use crate::math::quantile_sorted;

/// Percentile interval of `values` at confidence `pconf`.
pub fn mc_err_conf(values: &[f64], pconf: f64) -> Result<ConfInterval, AppError> {
    validate_confidence(pconf)?;
    if values.is_empty() {
        return Err(AppError::data("No Monte-Carlo values to summarize."));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(AppError::numeric(format!("Non-finite Monte-Carlo value ({bad}).")));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let tail = (1.0 - pconf) / 2.0;
    let low = quantile_sorted(&sorted, tail)
        .ok_or_else(|| AppError::numeric("Lower percentile out of range."))?;
    let high = quantile_sorted(&sorted, 1.0 - tail)
        .ok_or_else(|| AppError::numeric("Upper percentile out of range."))?;

    Ok(ConfInterval {
        err: (high - low) / 2.0,
        low,
        high,
        confidence: pconf,
    })
}

/// `mc_err_conf` applied to every column of `samples`.
pub fn mc_err_conf_columns(samples: &DMatrix<f64>, pconf: f64) -> Result<Vec<ConfInterval>, AppError> {
    samples
        .column_iter()
        .map(|col| mc_err_conf(&col.iter().copied().collect::<Vec<_>>(), pconf))
        .collect()
}

pub fn validate_confidence(pconf: f64) -> Result<(), AppError> {
    if pconf.is_finite() && pconf > 0.0 && pconf < 1.0 {
        Ok(())
    } else {
        Err(AppError::data(format!("Confidence level must lie in (0, 1) (got {pconf}).")))
    }
}

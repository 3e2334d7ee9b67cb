//! Descriptive statistics over Monte-Carlo samples.
//!
//! All functions return `None` on empty or non-finite input rather than NaN.
//! Standard deviations use Welford's online update; percentiles use linear
//! interpolation between order statistics (Hyndman & Fan type 7), which is the
//! common default in R and most numeric libraries.

use nalgebra::DMatrix;

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> Option<f64> {
    moments(data).map(|(_, mean, _)| mean)
}

/// Population standard deviation (divides by `n`).
pub fn population_std(data: &[f64]) -> Option<f64> {
    let (n, _, m2) = moments(data)?;
    Some((m2 / n as f64).sqrt())
}

/// Population standard deviation of every column of `samples`.
pub fn column_population_std(samples: &DMatrix<f64>) -> Option<Vec<f64>> {
    samples
        .column_iter()
        .map(|col| population_std(&col.iter().copied().collect::<Vec<_>>()))
        .collect()
}

/// Percentile `p ∈ [0, 1]` of already sorted, finite data, with linear interpolation.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Welford accumulation: `(n, mean, sum of squared deviations)`.
fn moments(data: &[f64]) -> Option<(usize, f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in data.iter().enumerate() {
        if !x.is_finite() {
            return None;
        }
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    Some((data.len(), mean, m2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_known_values() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data).unwrap() - 5.0).abs() < 1e-12);
        assert!((population_std(&data).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_and_non_finite_inputs() {
        assert!(mean(&[]).is_none());
        assert!(population_std(&[1.0, f64::NAN]).is_none());
        assert_eq!(population_std(&[3.0]), Some(0.0));
        assert!(quantile_sorted(&[], 0.5).is_none());
        assert!(quantile_sorted(&[1.0, 2.0], 1.5).is_none());
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&data, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&data, 1.0), Some(5.0));
        assert_eq!(quantile_sorted(&data, 0.5), Some(3.0));
        assert!((quantile_sorted(&data, 0.1).unwrap() - 1.4).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[7.0], 0.3), Some(7.0));
    }

    #[test]
    fn column_std_per_column() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 10.0, 3.0, 10.0]);
        let s = column_population_std(&m).unwrap();
        assert!((s[0] - 1.0).abs() < 1e-12);
        assert!(s[1].abs() < 1e-12);
    }
}

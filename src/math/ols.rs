//! Least squares polynomial fitting.
//!
//! Every regression in this crate is a small problem of the form:
//!
//! ```text
//! minimize Σ (y_i - p(x_i))^2,    p(x) = p_0 x^d + p_1 x^(d-1) + ... + p_d
//! ```
//!
//! Coefficients are stored highest power first, so a straight line is
//! `[slope, intercept]`.
//!
//! Implementation choices:
//! - The Vandermonde design matrix is solved with SVD, which handles tall
//!   systems (more points than coefficients) robustly.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The design matrix is built once per x-vector and reused for every
//!   Monte-Carlo sample.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value cutoff below which a design is treated as singular.
const RANK_TOL: f64 = 1e-12;

/// Solve using a precomputed decomposition of the design matrix.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_with_svd(
    svd: &nalgebra::SVD<f64, nalgebra::Dyn, nalgebra::Dyn>,
    y: &DVector<f64>,
) -> Option<DVector<f64>> {
    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Build the Vandermonde matrix for `degree`, highest power in column 0.
pub fn vandermonde(x: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    DMatrix::from_fn(x.len(), cols, |i, j| x[i].powi((degree - j) as i32))
}

/// Fit a polynomial of `degree` to `(x, y)`.
///
/// Returns `None` for mismatched lengths, too few points, or a singular system.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
    if x.len() != y.len() || x.len() <= degree {
        return None;
    }
    let svd = design_svd(x, degree)?;
    let rhs = DVector::from_column_slice(y);
    solve_with_svd(&svd, &rhs).map(|beta| beta.iter().copied().collect())
}

/// Decompose the Vandermonde matrix of `x`, rejecting rank-deficient designs
/// (e.g. all x values equal for a line).
pub fn design_svd(x: &[f64], degree: usize) -> Option<nalgebra::SVD<f64, nalgebra::Dyn, nalgebra::Dyn>> {
    let svd = vandermonde(x, degree).svd(true, true);
    let largest = svd.singular_values.max();
    if !(largest.is_finite() && largest > 0.0) || svd.rank(largest * RANK_TOL) <= degree {
        return None;
    }
    Some(svd)
}

/// Evaluate a polynomial (highest power first) at `x` using Horner's scheme.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

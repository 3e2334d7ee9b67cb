//! Ion-pair dissociation model.
//!
//! The dissociation free energy of a 1:1 salt in a solvent with relative
//! permittivity `εr` follows a Born-type expression that is linear in
//! `x = 1/εr - 1`:
//!
//! ```text
//! dG0 = ΔG_lattice + (k / a±) · x,     k = F² / (4π ε0 N_A)
//! ```
//!
//! so the slope of `dG0` against `x` yields the mean ionic radius `a±` and the
//! intercept yields the lattice energy. `dG0` itself comes from the measured
//! concentration via `dG0 = -RT ln([Na][Cl]) = -2RT ln c`.

use crate::domain::{Experiment, Substance};
use crate::error::AppError;

/// Gas constant (J/(mol·K)).
pub const GAS_CONSTANT: f64 = 8.3145;
/// Faraday constant (C/mol).
pub const FARADAY: f64 = 96485.0;
/// Vacuum permittivity (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854e-12;
/// Avogadro constant (1/mol).
pub const AVOGADRO: f64 = 6.022e23;

/// Tabulated Na⁺ radius (Å).
pub const NA_RADIUS: f64 = 1.16;
/// Tabulated Cl⁻ radius (Å).
pub const CL_RADIUS: f64 = 1.67;

const METERS_TO_ANGSTROM: f64 = 1e10;

/// Salt concentration `κ/Λ` (M).
pub fn concentration(substance: &Substance) -> f64 {
    substance.kappa / substance.molar_conductivity
}

/// Concentrations for every substance, in experiment order.
pub fn concentrations(experiment: &Experiment) -> Vec<f64> {
    experiment.substances.iter().map(concentration).collect()
}

/// `dG0 = -2RT ln c` (J/mol).
pub fn gibbs_dissociation(c: f64, temperature: f64) -> Result<f64, AppError> {
    if !(c.is_finite() && c > 0.0) {
        return Err(AppError::data(format!(
            "Concentration must be positive to take its logarithm (got {c})."
        )));
    }
    Ok(gibbs_from_ln(c.ln(), temperature))
}

/// `dG0` from an already computed `ln c`.
pub fn gibbs_from_ln(ln_c: f64, temperature: f64) -> f64 {
    -2.0 * GAS_CONSTANT * temperature * ln_c
}

/// Regression predictor `1/εr - 1`.
pub fn dielectric_predictor(dielectric: f64) -> f64 {
    1.0 / dielectric - 1.0
}

/// Born prefactor `k = F² / (4π ε0 N_A)` (J·m/mol).
pub fn born_constant() -> f64 {
    FARADAY * FARADAY / (4.0 * std::f64::consts::PI * VACUUM_PERMITTIVITY * AVOGADRO)
}

/// Mean ionic radius `k / slope`, converted to Å.
///
/// Not guarded: a Monte-Carlo slope near zero maps to a huge radius, which is
/// what the percentile interval should see.
pub fn ion_radius_angstrom(slope: f64) -> f64 {
    born_constant() / slope * METERS_TO_ANGSTROM
}

/// Lattice energy from the fit intercept, converted to kJ/mol.
pub fn lattice_energy_kj(intercept: f64) -> f64 {
    intercept / 1000.0
}

/// Harmonic-mean style radius `2 / (1/a+ + 1/a-)` used for comparison.
pub fn literature_radius(a_plus: f64, a_minus: f64) -> f64 {
    2.0 / (1.0 / a_plus + 1.0 / a_minus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concentration_is_kappa_over_lambda() {
        let s = Substance::new("butanol", 7.56e-4, 0.13, 17.10);
        assert!((concentration(&s) - 7.56e-4 / 0.13).abs() < 1e-15);
    }

    #[test]
    fn gibbs_matches_formula() {
        let c = 7.56e-4 / 0.13;
        let g = gibbs_dissociation(c, 293.0).unwrap();
        assert!((g - 25_078.92).abs() < 0.01, "got {g}");

        // c = 1 M is the standard state: no free energy change.
        assert_eq!(gibbs_dissociation(1.0, 293.0).unwrap(), 0.0);
        // c > 1 gives a negative dG0.
        assert!(gibbs_dissociation(7.5, 293.0).unwrap() < 0.0);
    }

    #[test]
    fn gibbs_rejects_non_positive_concentration() {
        let err = gibbs_dissociation(0.0, 293.0).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(gibbs_dissociation(-1.0, 293.0).is_err());
        assert!(gibbs_dissociation(f64::NAN, 293.0).is_err());
    }

    #[test]
    fn predictor_for_water() {
        assert!((dielectric_predictor(78.54) - (1.0 / 78.54 - 1.0)).abs() < 1e-15);
        assert_eq!(dielectric_predictor(1.0), 0.0);
    }

    #[test]
    fn born_constant_value() {
        let k = born_constant();
        assert!((k - 1.389_407e-4).abs() < 1e-9, "got {k}");
    }

    #[test]
    fn derived_quantities() {
        let a = ion_radius_angstrom(790_371.72);
        assert!((a - 1.7579).abs() < 1e-3, "got {a}");
        assert!((lattice_energy_kj(770_618.5) - 770.6185).abs() < 1e-9);
        let lit = literature_radius(NA_RADIUS, CL_RADIUS);
        assert!((lit - 1.36905).abs() < 1e-4, "got {lit}");
    }
}

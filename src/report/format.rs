//! Terminal formatting of an `AnalysisReport`.

use crate::domain::{AnalysisReport, ConfInterval, SubstanceResult};

/// The radius and lattice energy result lines.
pub fn format_results(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "a = {:.2} +/- {:.2} Å (pconf = {:.2})\n",
        report.radius.value, report.radius.interval.err, report.confidence
    ));
    out.push_str(&format!(
        "dG0gitter = {:.1} +/- {:.1} kJ/mol (pconf = {:.2})\n",
        report.lattice_energy.value, report.lattice_energy.interval.err, report.confidence
    ));
    out.push_str(&format!("Literature: {:.2} Å\n", report.literature_radius));
    out.push_str(&format_goodness_of_fit(report));
    out
}

pub fn format_goodness_of_fit(report: &AnalysisReport) -> String {
    match report.fit.p_chi2 {
        Some(p) => format!("chi2 = {:.3} (dof = {}), p = {:.4}\n", report.fit.chi2, report.fit.dof, p),
        None => format!("chi2 = {:.3} (dof = {})\n", report.fit.chi2, report.fit.dof),
    }
}

/// Format the run header: configuration, per-substance table, fit coefficients.
pub fn format_run_summary(report: &AnalysisReport, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== cond - Conductivity Analysis (Monte-Carlo) ===\n");
    out.push_str(&format!("Data: {source} | T = {:.1} K\n", report.temperature));
    out.push_str(&format!(
        "MC: n={} | sigma_rel={:.2} | dist={} | seed={} | pconf={:.2}\n",
        report.sample_count,
        report.sigma_rel,
        report.distribution.display_name(),
        report.seed,
        report.confidence,
    ));
    out.push('\n');

    out.push_str(&format_substance_table(&report.substances));
    out.push('\n');

    out.push_str("Fit: dG0 = slope * (1/er - 1) + intercept\n");
    out.push_str(&format!(
        "- slope    : {:>12.1} J/mol  sigma={:.1}  {}\n",
        report.fit.slope,
        report.fit.slope_sigma,
        fmt_interval(&report.fit.slope_interval, 1),
    ));
    out.push_str(&format!(
        "- intercept: {:>12.1} J/mol  sigma={:.1}  {}\n",
        report.fit.intercept,
        report.fit.intercept_sigma,
        fmt_interval(&report.fit.intercept_interval, 1),
    ));
    out.push('\n');

    out
}

fn format_substance_table(rows: &[SubstanceResult]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:>11} {:>8} {:>7} {:>11} {:>8} {:>10} {:>8} {:>9}\n",
            "substance", "kappa", "lambda", "er", "c (M)", "ln c", "dG0", "+/-", "x"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<11} {:-<8} {:-<7} {:-<11} {:-<8} {:-<10} {:-<8} {:-<9}\n",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<12} {:>11.4e} {:>8.3} {:>7.2} {:>11.4e} {:>8.3} {:>10.2} {:>8.2} {:>9.5}\n",
                truncate(&r.name, 12),
                r.kappa,
                r.molar_conductivity,
                r.dielectric,
                r.concentration,
                r.ln_concentration,
                r.dg0 / 1000.0,
                r.dg0_sigma / 1000.0,
                r.x,
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push_str("(dG0 and +/- in kJ/mol)\n");

    out
}

fn fmt_interval(ci: &ConfInterval, decimals: usize) -> String {
    format!(
        "[{:.*}, {:.*}] @ {:.2}",
        decimals, ci.low, decimals, ci.high, ci.confidence
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::domain::{DerivedQuantity, Distribution, FitSummary};

    fn interval(err: f64, low: f64, high: f64) -> ConfInterval {
        ConfInterval { err, low, high, confidence: 0.95 }
    }

    fn sample_report(p_chi2: Option<f64>) -> AnalysisReport {
        AnalysisReport {
            tool: "cond".to_string(),
            generated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            temperature: 293.0,
            sample_count: 1000,
            sigma_rel: 0.3,
            confidence: 0.95,
            distribution: Distribution::Lognorm,
            seed: 42,
            substances: vec![SubstanceResult {
                name: "water".to_string(),
                kappa: 24.03,
                molar_conductivity: 3.2,
                dielectric: 78.54,
                concentration: 7.509375,
                ln_concentration: 2.016,
                dg0: -9823.29,
                dg0_sigma: 1430.3,
                x: -0.98727,
            }],
            fit: FitSummary {
                slope: 790_371.7,
                intercept: 770_618.5,
                slope_sigma: 43_000.0,
                intercept_sigma: 41_600.0,
                slope_interval: interval(84_000.0, 706_000.0, 874_000.0),
                intercept_interval: interval(81_000.0, 690_000.0, 852_000.0),
                chi2: 8.5916,
                dof: 2,
                p_chi2,
            },
            radius: DerivedQuantity {
                value: 1.7579,
                unit: "Å".to_string(),
                interval: interval(0.1049, 1.59, 1.80),
            },
            lattice_energy: DerivedQuantity {
                value: 770.6185,
                unit: "kJ/mol".to_string(),
                interval: interval(81.04, 690.0, 852.0),
            },
            literature_radius: 1.369046,
        }
    }

    #[test]
    fn result_lines_match_templates() {
        let txt = format_results(&sample_report(Some(0.01363)));
        let expected = concat!(
            "a = 1.76 +/- 0.10 Å (pconf = 0.95)\n",
            "dG0gitter = 770.6 +/- 81.0 kJ/mol (pconf = 0.95)\n",
            "Literature: 1.37 Å\n",
            "chi2 = 8.592 (dof = 2), p = 0.0136\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn goodness_of_fit_without_p_value() {
        let txt = format_goodness_of_fit(&sample_report(None));
        assert_eq!(txt, "chi2 = 8.592 (dof = 2)\n");
    }

    #[test]
    fn summary_contains_table_and_fit() {
        let txt = format_run_summary(&sample_report(None), "built-in lab dataset");
        assert!(txt.contains("Data: built-in lab dataset | T = 293.0 K"));
        assert!(txt.contains("MC: n=1000 | sigma_rel=0.30 | dist=lognorm | seed=42 | pconf=0.95"));
        assert!(txt.lines().any(|l| l.starts_with("water") && l.contains("-9.82")));
        assert!(txt.contains("- slope    :     790371.7 J/mol"));
        assert!(txt.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("propan-2-ol-mixture", 8), "propan-.");
        assert_eq!(truncate("water", 8), "water");
    }
}

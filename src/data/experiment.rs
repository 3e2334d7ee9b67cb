//! Measurement input: the built-in lab dataset and CSV ingest.
//!
//! CSV schema (header required, case-insensitive, extra columns ignored):
//!
//! ```text
//! substance,kappa,molar_conductivity,dielectric
//! butanol,7.56e-4,0.13,17.10
//! ```
//!
//! Aliases: `name` for `substance`, `conductivity` for `kappa`, `lambda` for
//! `molar_conductivity`, `er`/`eps_r` for `dielectric`. Lines starting with
//! `#` are comments.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Experiment, Substance};
use crate::error::AppError;

/// A line needs two points; a goodness-of-fit needs a third.
pub const MIN_SUBSTANCES: usize = 3;

const COL_NAME: &[&str] = &["substance", "name"];
const COL_KAPPA: &[&str] = &["kappa", "conductivity"];
const COL_LAMBDA: &[&str] = &["molar_conductivity", "lambda"];
const COL_DIELECTRIC: &[&str] = &["dielectric", "er", "eps_r"];

impl Experiment {
    /// The NaCl measurements of the lab: butanol, ethanol, methanol, water at 293 K.
    pub fn default_lab() -> Self {
        Self {
            substances: vec![
                Substance::new("butanol", 7.56e-4, 0.13, 17.10),
                Substance::new("ethanol", 236.3e-4, 0.66, 24.30),
                Substance::new("methanol", 0.95, 1.6, 32.63),
                Substance::new("water", 24.03, 3.2, 78.54),
            ],
            temperature: 293.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Check the invariants every later stage relies on.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(AppError::data(format!(
                "Temperature must be positive (got {} K).",
                self.temperature
            )));
        }
        if self.substances.len() < MIN_SUBSTANCES {
            return Err(AppError::data(format!(
                "Need at least {MIN_SUBSTANCES} substances, got {}.",
                self.substances.len()
            )));
        }
        for s in &self.substances {
            for (label, v) in [
                ("kappa", s.kappa),
                ("molar_conductivity", s.molar_conductivity),
                ("dielectric", s.dielectric),
            ] {
                if !(v.is_finite() && v > 0.0) {
                    return Err(AppError::data(format!(
                        "Substance '{}': {label} must be positive (got {v}).",
                        s.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load an experiment from a CSV file.
pub fn load_experiment_csv(path: &Path, temperature: f64) -> Result<Experiment, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let experiment = read_experiment(file, temperature)?;
    info!(
        path = %path.display(),
        substances = experiment.substances.len(),
        "loaded measurements"
    );
    Ok(experiment)
}

/// Parse an experiment from any CSV reader.
pub fn read_experiment<R: Read>(input: R, temperature: f64) -> Result<Experiment, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let name_idx = find_column(&header_map, COL_NAME)?;
    let kappa_idx = find_column(&header_map, COL_KAPPA)?;
    let lambda_idx = find_column(&header_map, COL_LAMBDA)?;
    let dielectric_idx = find_column(&header_map, COL_DIELECTRIC)?;

    let mut substances = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Fallback when the reader has no position: records() starts after the header.
        let fallback = idx + 2;
        let record =
            result.map_err(|e| AppError::input(format!("CSV parse error near line {fallback}: {e}")))?;
        let line = record.position().map_or(fallback, |p| p.line() as usize);

        let name = field(&record, name_idx, line, COL_NAME[0])?;
        if name.is_empty() {
            return Err(AppError::input(format!("Line {line}: empty substance name.")));
        }
        let substance = Substance::new(
            name,
            parse_positive(&record, kappa_idx, line, COL_KAPPA[0])?,
            parse_positive(&record, lambda_idx, line, COL_LAMBDA[0])?,
            parse_positive(&record, dielectric_idx, line, COL_DIELECTRIC[0])?,
        );
        debug!(line, substance = %substance.name, "parsed row");
        substances.push(substance);
    }

    let experiment = Experiment {
        substances,
        temperature,
    };
    experiment.validate()?;
    Ok(experiment)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    name.trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Result<usize, AppError> {
    aliases
        .iter()
        .find_map(|a| header_map.get(*a).copied())
        .ok_or_else(|| {
            AppError::input(format!(
                "Missing required CSV column '{}' (aliases: {}).",
                aliases[0],
                aliases.join(", ")
            ))
        })
}

fn field<'r>(record: &'r StringRecord, idx: usize, line: usize, column: &str) -> Result<&'r str, AppError> {
    record
        .get(idx)
        .ok_or_else(|| AppError::input(format!("Line {line}: missing value for '{column}'.")))
}

fn parse_positive(record: &StringRecord, idx: usize, line: usize, column: &str) -> Result<f64, AppError> {
    let raw = field(record, idx, line, column)?;
    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::input(format!("Line {line}: '{column}' is not a number ('{raw}').")))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(AppError::input(format!(
            "Line {line}: '{column}' must be positive (got {value})."
        )));
    }
    Ok(value)
}

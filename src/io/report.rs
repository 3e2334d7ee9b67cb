//! Read/write report JSON files.
//!
//! Report JSON is the portable representation of a run: configuration echo,
//! per-substance values, fit coefficients and the derived quantities. It is
//! enough to re-render the plot without repeating the Monte-Carlo analysis.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::AnalysisReport;
use crate::error::AppError;

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::input(format!("Failed to write report JSON '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to write report JSON '{}': {e}", path.display())))?;

    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<AnalysisReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: AnalysisReport = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

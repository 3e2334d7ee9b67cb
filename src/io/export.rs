//! Export per-substance results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::AnalysisReport;
use crate::error::AppError;

/// Write one row per substance (header taken from `SubstanceResult` fields).
pub fn write_substances_csv(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in &report.substances {
        writer
            .serialize(row)
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

//! Writers for report tables.
//!
//! CSV export produces one file per table; JSON export produces a single
//! document with the whole report. Files land in the requested output
//! directory, which is created on demand.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::Serialize;

use super::report_model::PortfolioReport;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::CorrelationMatrix;

/// Output encoding for the report tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown export format '{}', expected csv or json",
                other
            )))),
        }
    }
}

/// Writes the report to `output_dir` and returns the files written.
pub fn export_report(
    report: &PortfolioReport,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .map_err(|e| Error::Export(format!("cannot create {}: {}", output_dir.display(), e)))?;

    let written = match format {
        ExportFormat::Csv => export_csv_tables(report, output_dir)?,
        ExportFormat::Json => vec![export_json(report, output_dir)?],
    };

    info!(
        "Wrote {} report file(s) to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

fn export_csv_tables(report: &PortfolioReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    written.push(write_csv_table(
        output_dir.join("positions.csv"),
        &report.daily_positions,
    )?);
    written.push(write_csv_table(
        output_dir.join("snapshots.csv"),
        &report.snapshots,
    )?);
    written.push(write_csv_table(
        output_dir.join("monthly_activity.csv"),
        &report.statistics.monthly_activity,
    )?);
    written.push(write_csv_table(
        output_dir.join("composition.csv"),
        &report.statistics.composition,
    )?);
    written.push(write_correlation_csv(
        output_dir.join("correlation.csv"),
        &report.statistics.correlation,
    )?);
    written.push(write_csv_table(
        output_dir.join("return_risk.csv"),
        &report.statistics.return_risk,
    )?);
    if !report.dropped_tickers.is_empty() {
        written.push(write_csv_table(
            output_dir.join("dropped_tickers.csv"),
            &report.dropped_tickers,
        )?);
    }

    Ok(written)
}

fn export_json(report: &PortfolioReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("report.json");
    let file =
        File::create(&path).map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}

fn write_csv_table<T: Serialize>(path: PathBuf, rows: &[T]) -> Result<PathBuf> {
    let mut writer =
        csv::Writer::from_path(&path).map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    }
    writer
        .flush()
        .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}

/// The correlation matrix is square rather than row-shaped, so it is
/// written record by record: a header of ticker names, then one row per
/// ticker. Undefined coefficients come out as empty cells.
fn write_correlation_csv(path: PathBuf, matrix: &CorrelationMatrix) -> Result<PathBuf> {
    let mut writer =
        csv::Writer::from_path(&path).map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;

    let mut header = vec!["ticker".to_string()];
    header.extend(matrix.tickers.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;

    for (ticker, row) in matrix.tickers.iter().zip(matrix.values.iter()) {
        let mut record = vec![ticker.clone()];
        record.extend(row.iter().map(|value| match value {
            Some(v) => v.to_string(),
            None => String::new(),
        }));
        writer
            .write_record(&record)
            .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}

//! Export functionality for Hobart valuation data.
//!
//! Provides CSV and JSON export for the per-fiscal-year valuation table
//! and the five-year projection table.

use chrono::NaiveDate;
use hobart_valuation::{ProjectionRow, ValuationReport, ValuationRow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Parse a format name as given on a command line.
    pub fn parse(name: &str) -> Result<Self, ExportError> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One valuation row flattened for tabular export.
///
/// Absent prices and ratios serialize as empty CSV cells and JSON nulls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationRowExport {
    /// Security symbol.
    pub symbol: String,

    /// Fiscal year.
    pub fiscal_year: i32,

    /// Fiscal period end date.
    pub period_end: NaiveDate,

    /// Earnings per share for the fiscal year.
    pub eps: f64,

    /// As-of market price.
    pub price: Option<f64>,

    /// Price-to-earnings ratio.
    pub ratio: Option<f64>,
}

/// The full valuation table for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationExport {
    /// Security symbol.
    pub symbol: String,

    /// One row per fiscal year, ascending.
    pub rows: Vec<ValuationRowExport>,
}

impl ValuationExport {
    /// Flatten a report into its exportable table.
    pub fn from_report(report: &ValuationReport) -> Self {
        let rows = report
            .rows
            .iter()
            .map(|row: &ValuationRow| ValuationRowExport {
                symbol: report.symbol.clone(),
                fiscal_year: row.fiscal_year,
                period_end: row.period_end,
                eps: row.eps,
                price: row.price,
                ratio: row.ratio,
            })
            .collect();

        Self {
            symbol: report.symbol.clone(),
            rows,
        }
    }
}

/// One projected year labeled with its future fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionExportRow {
    /// Future fiscal year (last known fiscal year + years ahead).
    pub fiscal_year: i32,

    /// Years past the last known fiscal year.
    pub years_ahead: u32,

    /// Projected earnings per share.
    pub projected_eps: f64,

    /// Projected price at 80% of the base ratio.
    pub price_pessimistic: f64,

    /// Projected price at the base ratio.
    pub price_base: f64,

    /// Projected price at 120% of the base ratio.
    pub price_optimistic: f64,
}

/// The projection table for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionExport {
    /// Security symbol.
    pub symbol: String,

    /// One row per projected year.
    pub rows: Vec<ProjectionExportRow>,
}

impl ProjectionExport {
    /// Label projection rows with their future fiscal years.
    pub fn from_rows(symbol: &str, last_fiscal_year: i32, rows: &[ProjectionRow]) -> Self {
        let rows = rows
            .iter()
            .map(|row| ProjectionExportRow {
                fiscal_year: last_fiscal_year + row.years_ahead as i32,
                years_ahead: row.years_ahead,
                projected_eps: row.projected_eps,
                price_pessimistic: row.price_pessimistic,
                price_base: row.price_base,
                price_optimistic: row.price_optimistic,
            })
            .collect();

        Self {
            symbol: symbol.to_string(),
            rows,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for ValuationExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in &self.rows {
                    wtr.serialize(record)?;
                }
                let data =
                    String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for ProjectionExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in &self.rows {
                    wtr.serialize(record)?;
                }
                let data =
                    String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_valuation::{TrendSummary, project};

    fn sample_report() -> ValuationReport {
        ValuationReport {
            symbol: "TEST".to_string(),
            rows: vec![
                ValuationRow {
                    fiscal_year: 2022,
                    period_end: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
                    eps: 5.0,
                    price: Some(100.0),
                    ratio: Some(20.0),
                },
                ValuationRow {
                    fiscal_year: 2023,
                    period_end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
                    eps: -1.0,
                    price: Some(90.0),
                    ratio: None,
                },
            ],
            trend: TrendSummary::default(),
            ttm_ratio: None,
        }
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("JSON").unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::parse("xml"),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_valuation_csv_has_empty_cell_for_absent_ratio() {
        let export = ValuationExport::from_report(&sample_report());
        let csv = export.export_to_string(ExportFormat::Csv).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "symbol,fiscal_year,period_end,eps,price,ratio"
        );
        assert_eq!(lines.next().unwrap(), "TEST,2022,2022-12-31,5.0,100.0,20.0");
        assert_eq!(lines.next().unwrap(), "TEST,2023,2023-12-31,-1.0,90.0,");
    }

    #[test]
    fn test_valuation_json_round_trip() {
        let export = ValuationExport::from_report(&sample_report());
        let json = export.export_to_string(ExportFormat::Json).unwrap();

        let parsed: ValuationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_projection_export_labels_fiscal_years() {
        let rows = project(hobart_valuation::ProjectionInputs {
            current_eps: 10.0,
            base_ratio: 15.0,
            growth_rate_pct: 10.0,
        })
        .unwrap();

        let export = ProjectionExport::from_rows("TEST", 2023, &rows);
        let years: Vec<i32> = export.rows.iter().map(|r| r.fiscal_year).collect();
        assert_eq!(years, vec![2024, 2025, 2026, 2027, 2028]);
    }

    #[test]
    fn test_projection_csv_header() {
        let rows = project(hobart_valuation::ProjectionInputs {
            current_eps: 10.0,
            base_ratio: 15.0,
            growth_rate_pct: 0.0,
        })
        .unwrap();
        let export = ProjectionExport::from_rows("TEST", 2023, &rows);

        let csv = export.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with(
            "fiscal_year,years_ahead,projected_eps,price_pessimistic,price_base,price_optimistic"
        ));
        assert_eq!(csv.lines().count(), 6);
    }

    #[test]
    fn test_export_to_file() {
        let export = ValuationExport::from_report(&sample_report());
        let path = std::env::temp_dir().join("hobart_test_export.csv");

        export.export_to_file(&path, ExportFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("TEST,2022"));

        std::fs::remove_file(&path).ok();
    }
}

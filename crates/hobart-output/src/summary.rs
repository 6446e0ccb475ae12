//! Plain-text summary of the headline valuation figures.

use hobart_valuation::{TrendSummary, ValuationReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline figures of one analysis, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationSummary {
    /// Security symbol.
    pub symbol: String,

    /// First fiscal year covered.
    pub first_fiscal_year: Option<i32>,

    /// Last fiscal year covered.
    pub last_fiscal_year: Option<i32>,

    /// Number of fiscal years in the table.
    pub fiscal_years: usize,

    /// Last known annual earnings per share.
    pub latest_eps: Option<f64>,

    /// Trend figures.
    pub trend: TrendSummary,

    /// Trailing-twelve-month price-to-earnings ratio.
    pub ttm_ratio: Option<f64>,
}

/// Format an optional figure with a suffix, or "N/A".
fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}{}", v, suffix))
}

impl fmt::Display for ValuationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Valuation summary for {}", self.symbol)?;
        match (self.first_fiscal_year, self.last_fiscal_year) {
            (Some(first), Some(last)) => {
                writeln!(f, "  Fiscal years:        FY{} - FY{} ({})", first, last, self.fiscal_years)?;
            }
            _ => writeln!(f, "  Fiscal years:        none")?,
        }
        writeln!(f, "  Latest annual EPS:   {}", fmt_opt(self.latest_eps, ""))?;
        writeln!(f, "  EPS CAGR (10y):      {}", fmt_opt(self.trend.eps_cagr_10y, " %"))?;
        writeln!(f, "  EPS CAGR (5y):       {}", fmt_opt(self.trend.eps_cagr_5y, " %"))?;
        writeln!(f, "  Mean P/E (10y):      {}", fmt_opt(self.trend.ratio_mean_10y, ""))?;
        writeln!(f, "  Mean P/E (5y):       {}", fmt_opt(self.trend.ratio_mean_5y, ""))?;
        write!(f, "  TTM P/E:             {}", fmt_opt(self.ttm_ratio, ""))
    }
}

/// Build the display summary from a report.
pub fn generate_valuation_summary(report: &ValuationReport) -> ValuationSummary {
    ValuationSummary {
        symbol: report.symbol.clone(),
        first_fiscal_year: report.rows.first().map(|row| row.fiscal_year),
        last_fiscal_year: report.latest_fiscal_year(),
        fiscal_years: report.rows.len(),
        latest_eps: report.latest_eps(),
        trend: report.trend,
        ttm_ratio: report.ttm_ratio,
    }
}

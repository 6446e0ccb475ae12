//! Per-company valuation report assembly.
//!
//! The report is the core's outbound surface: the ordered valuation rows,
//! the headline trend figures, and the optional trailing-twelve-month
//! ratio, bundled for display, export, and projection.

use crate::analytics::{TrendSummary, trend_summary};
use crate::error::{Result, ValuationError};
use crate::fiscal::{FilingRecord, normalize_annual_eps};
use crate::join::{ValuationRow, join_as_of, per_ratio};
use crate::prices::PriceSeries;
use crate::projection::{ProjectionInputs, ProjectionRow, project};
use serde::{Deserialize, Serialize};

/// Current market snapshot used for the trailing-twelve-month headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ticker symbol
    pub symbol: String,
    /// Last traded price
    pub price: Option<f64>,
    /// Trailing-twelve-month earnings per share
    pub trailing_eps: Option<f64>,
}

impl MarketSnapshot {
    /// Trailing P/E under the shared ratio presence rules.
    pub fn ttm_ratio(&self) -> Option<f64> {
        match (self.price, self.trailing_eps) {
            (Some(price), Some(eps)) => per_ratio(price, eps),
            _ => None,
        }
    }
}

/// Structured result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// Ticker symbol the report was built for
    pub symbol: String,
    /// One row per fiscal year, ascending
    pub rows: Vec<ValuationRow>,
    /// Headline trend figures
    pub trend: TrendSummary,
    /// Trailing-twelve-month P/E, when a snapshot was available
    pub ttm_ratio: Option<f64>,
}

impl ValuationReport {
    /// Last known fiscal year.
    pub fn latest_fiscal_year(&self) -> Option<i32> {
        self.rows.last().map(|row| row.fiscal_year)
    }

    /// Last known annual earnings per share.
    pub fn latest_eps(&self) -> Option<f64> {
        self.rows.last().map(|row| row.eps)
    }

    /// Project forward from the report's last annual EPS.
    pub fn project(&self, base_ratio: f64, growth_rate_pct: f64) -> Result<Vec<ProjectionRow>> {
        let current_eps = self
            .latest_eps()
            .ok_or_else(|| ValuationError::NoFundamentals(self.symbol.clone()))?;
        project(ProjectionInputs {
            current_eps,
            base_ratio,
            growth_rate_pct,
        })
    }
}

/// Assemble a report from raw-source inputs.
///
/// `prices` is `None` when the ticker has no trading history; rows are
/// still produced so the earnings series stays visible, with absent
/// prices and ratios. No qualifying filings at all is an error, since
/// nothing downstream can be computed.
pub fn build_report(
    symbol: &str,
    filings: &[FilingRecord],
    prices: Option<&PriceSeries>,
    snapshot: Option<&MarketSnapshot>,
) -> Result<ValuationReport> {
    let annual = normalize_annual_eps(filings);
    if annual.is_empty() {
        return Err(ValuationError::NoFundamentals(symbol.to_string()));
    }

    let rows = match prices {
        Some(prices) => join_as_of(&annual, prices),
        None => annual
            .iter()
            .map(|record| ValuationRow {
                fiscal_year: record.fiscal_year,
                period_end: record.period_end,
                eps: record.eps,
                price: None,
                ratio: None,
            })
            .collect(),
    };

    let trend = trend_summary(&rows);
    let ttm_ratio = snapshot.and_then(MarketSnapshot::ttm_ratio);

    Ok(ValuationReport {
        symbol: symbol.to_string(),
        rows,
        trend,
        ttm_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::FiscalPeriod;
    use crate::prices::RawQuote;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn filing(fy: i32, end: (i32, u32, u32), filed: (i32, u32, u32), value: f64) -> FilingRecord {
        FilingRecord {
            period_end: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
            filed: NaiveDate::from_ymd_opt(filed.0, filed.1, filed.2),
            fiscal_year: fy,
            fiscal_period: FiscalPeriod::FullYear,
            form: "10-K".to_string(),
            value,
        }
    }

    fn prices(quotes: &[(i32, u32, u32, f64)]) -> PriceSeries {
        let raw: Vec<RawQuote> = quotes
            .iter()
            .map(|&(y, m, d, close)| RawQuote {
                timestamp: Utc.with_ymd_and_hms(y, m, d, 21, 0, 0).unwrap(),
                close: Some(close),
            })
            .collect();
        PriceSeries::from_quotes(&raw).unwrap()
    }

    #[test]
    fn test_build_report_end_to_end() {
        let filings = vec![
            filing(2022, (2022, 12, 31), (2023, 2, 1), 5.0),
            filing(2023, (2023, 12, 31), (2024, 2, 1), 6.0),
        ];
        let series = prices(&[(2022, 12, 30, 100.0), (2023, 12, 29, 120.0)]);

        let report = build_report("TEST", &filings, Some(&series), None).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.latest_fiscal_year(), Some(2023));
        assert_eq!(report.latest_eps(), Some(6.0));
        assert_eq!(report.rows[0].ratio, Some(20.0));
        assert_eq!(report.rows[1].ratio, Some(20.0));
        assert_eq!(report.ttm_ratio, None);
    }

    #[test]
    fn test_no_qualifying_filings_is_an_error() {
        let result = build_report("TEST", &[], None, None);
        assert!(matches!(result, Err(ValuationError::NoFundamentals(_))));
    }

    #[test]
    fn test_missing_price_history_keeps_eps_series() {
        let filings = vec![filing(2023, (2023, 12, 31), (2024, 2, 1), 6.0)];

        let report = build_report("TEST", &filings, None, None).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].eps, 6.0);
        assert_eq!(report.rows[0].price, None);
        assert_eq!(report.rows[0].ratio, None);
    }

    #[test]
    fn test_ttm_ratio_from_snapshot() {
        let snapshot = MarketSnapshot {
            symbol: "TEST".to_string(),
            price: Some(150.0),
            trailing_eps: Some(6.0),
        };
        let filings = vec![filing(2023, (2023, 12, 31), (2024, 2, 1), 6.0)];

        let report = build_report("TEST", &filings, None, Some(&snapshot)).unwrap();
        assert_eq!(report.ttm_ratio, Some(25.0));
    }

    #[test]
    fn test_ttm_ratio_absent_for_negative_trailing_eps() {
        let snapshot = MarketSnapshot {
            symbol: "TEST".to_string(),
            price: Some(150.0),
            trailing_eps: Some(-1.0),
        };
        assert_eq!(snapshot.ttm_ratio(), None);
    }

    #[test]
    fn test_report_projection_uses_latest_eps() {
        let filings = vec![
            filing(2022, (2022, 12, 31), (2023, 2, 1), 5.0),
            filing(2023, (2023, 12, 31), (2024, 2, 1), 10.0),
        ];
        let report = build_report("TEST", &filings, None, None).unwrap();

        let rows = report.project(15.0, 10.0).unwrap();
        assert_eq!(rows.len(), 5);
        assert!((rows[0].projected_eps - 11.0).abs() < 1e-10);
    }
}

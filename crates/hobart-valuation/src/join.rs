//! Backward as-of join of annual fiscal records against the price series.
//!
//! Filings publish months after their fiscal period ends, while prices
//! trade daily; the two series never share timestamps. Each fiscal year is
//! matched to the latest price at or before its period end.

use crate::fiscal::AnnualFiscalRecord;
use crate::prices::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fiscal year joined with its as-of market price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal period end; the as-of date used for the price match
    pub period_end: NaiveDate,
    /// Earnings per share for the fiscal year
    pub eps: f64,
    /// Latest close on or before `period_end`; `None` when the fiscal
    /// period predates all price history
    pub price: Option<f64>,
    /// Price-to-earnings ratio; present only for positive earnings with a
    /// matched price
    pub ratio: Option<f64>,
}

/// Price-to-earnings ratio under the presence rules shared by historical
/// rows and the trailing-twelve-month headline: earnings must be positive
/// and the quotient finite, anything else is absent. A ratio against
/// negative or zero earnings is not economically meaningful, so neither a
/// negative ratio nor a division blowup ever surfaces.
pub fn per_ratio(price: f64, eps: f64) -> Option<f64> {
    if eps > 0.0 {
        let ratio = price / eps;
        ratio.is_finite().then_some(ratio)
    } else {
        None
    }
}

/// Join each annual record to the latest price at or before its period
/// end.
///
/// Records are matched independently by binary search over the ascending
/// price series, so a restated period end that breaks fiscal-year
/// monotonicity still matches correctly. Pure in its inputs: joining the
/// same series twice yields identical rows.
pub fn join_as_of(records: &[AnnualFiscalRecord], prices: &PriceSeries) -> Vec<ValuationRow> {
    records
        .iter()
        .map(|record| {
            let price = prices
                .latest_at_or_before(record.period_end)
                .map(|point| point.price);
            let ratio = price.and_then(|price| per_ratio(price, record.eps));
            ValuationRow {
                fiscal_year: record.fiscal_year,
                period_end: record.period_end,
                eps: record.eps,
                price,
                ratio,
            }
        })
        .collect()
}

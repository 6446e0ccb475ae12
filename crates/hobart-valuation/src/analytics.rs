//! Trailing growth and ratio analytics over the merged valuation rows.

use crate::join::ValuationRow;
use serde::{Deserialize, Serialize};

/// Lookback window for the long-horizon headline figures.
pub const LONG_WINDOW: usize = 10;

/// Lookback window for the short-horizon headline figures.
pub const SHORT_WINDOW: usize = 5;

/// Trailing compound annual growth rate over `window` steps, in percent.
///
/// Non-finite values are dropped before windowing. The base is the value
/// `window` positions before the last one; at least `window` values must
/// exist and the base must be positive, otherwise the growth rate is
/// undefined and absent. A negative ending value drives the fractional
/// power out of the reals and is likewise absent.
pub fn trailing_cagr(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 {
        return None;
    }
    let values: Vec<f64> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .collect();
    if values.len() < window {
        return None;
    }

    let start = values[values.len() - window];
    let end = values[values.len() - 1];
    if start <= 0.0 {
        return None;
    }

    let rate = ((end / start).powf(1.0 / window as f64) - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

/// Mean of the last `window` present values.
///
/// Fewer than `window` values still average over what exists; an empty
/// set stays absent, never zero.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 {
        return None;
    }
    let values: Vec<f64> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }

    let tail = &values[values.len().saturating_sub(window)..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// The four headline trend figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// 10-year EPS compound annual growth rate, percent
    pub eps_cagr_10y: Option<f64>,
    /// 5-year EPS compound annual growth rate, percent
    pub eps_cagr_5y: Option<f64>,
    /// Mean P/E over the last 10 fiscal years with a ratio
    pub ratio_mean_10y: Option<f64>,
    /// Mean P/E over the last 5 fiscal years with a ratio
    pub ratio_mean_5y: Option<f64>,
}

/// Compute the headline figures from the merged rows.
///
/// The EPS series keeps every fiscal year; the ratio series keeps only
/// years where a ratio is present, so the mean windows slide over actual
/// ratios rather than gaps.
pub fn trend_summary(rows: &[ValuationRow]) -> TrendSummary {
    let eps: Vec<f64> = rows.iter().map(|row| row.eps).collect();
    let ratios: Vec<f64> = rows.iter().filter_map(|row| row.ratio).collect();

    TrendSummary {
        eps_cagr_10y: trailing_cagr(&eps, LONG_WINDOW),
        eps_cagr_5y: trailing_cagr(&eps, SHORT_WINDOW),
        ratio_mean_10y: trailing_mean(&ratios, LONG_WINDOW),
        ratio_mean_5y: trailing_mean(&ratios, SHORT_WINDOW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn row(fy: i32, eps: f64, price: Option<f64>, ratio: Option<f64>) -> ValuationRow {
        ValuationRow {
            fiscal_year: fy,
            period_end: NaiveDate::from_ymd_opt(fy, 12, 31).unwrap(),
            eps,
            price,
            ratio,
        }
    }

    #[test]
    fn test_cagr_doubling_over_five_steps() {
        // 1 -> 2 over a 5-wide window is 2^(1/5) - 1 per year.
        let values = [1.0, 1.2, 1.4, 1.7, 2.0];
        let cagr = trailing_cagr(&values, 5).unwrap();
        assert_relative_eq!(cagr, (2.0f64.powf(0.2) - 1.0) * 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cagr_insufficient_history() {
        assert_eq!(trailing_cagr(&[1.0, 2.0, 3.0], 5), None);
        assert_eq!(trailing_cagr(&[], 5), None);
    }

    #[test]
    fn test_cagr_non_positive_base() {
        // Exactly five points with a zero base value.
        assert_eq!(trailing_cagr(&[0.0, 1.0, 2.0, 3.0, 4.0], 5), None);
        assert_eq!(trailing_cagr(&[-1.0, 1.0, 2.0, 3.0, 4.0], 5), None);
    }

    #[test]
    fn test_cagr_negative_ending_value() {
        assert_eq!(trailing_cagr(&[1.0, 1.0, 1.0, 1.0, -2.0], 5), None);
    }

    #[test]
    fn test_cagr_drops_non_finite_values() {
        // The NaN disappears, leaving four finite points for window 4.
        let values = [1.0, f64::NAN, 1.5, 1.8, 2.0];
        let cagr = trailing_cagr(&values, 4).unwrap();
        assert_relative_eq!(cagr, (2.0f64.powf(0.25) - 1.0) * 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_trailing_mean_full_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_relative_eq!(trailing_mean(&values, 5).unwrap(), 4.0);
    }

    #[test]
    fn test_trailing_mean_short_series_still_averages() {
        let values = [2.0, 4.0];
        assert_relative_eq!(trailing_mean(&values, 10).unwrap(), 3.0);
    }

    #[test]
    fn test_trailing_mean_empty_is_absent() {
        assert_eq!(trailing_mean(&[], 5), None);
    }

    #[test]
    fn test_trend_summary_skips_absent_ratios() {
        let rows = vec![
            row(2019, 1.0, Some(20.0), Some(20.0)),
            row(2020, -1.0, Some(25.0), None),
            row(2021, 2.0, Some(40.0), Some(20.0)),
            row(2022, 3.0, Some(90.0), Some(30.0)),
            row(2023, 4.0, Some(80.0), Some(20.0)),
        ];

        let summary = trend_summary(&rows);
        // Four present ratios averaged, the absent 2020 entry skipped.
        assert_relative_eq!(summary.ratio_mean_5y.unwrap(), 22.5);
        assert_eq!(summary.eps_cagr_10y, None);
        assert_relative_eq!(
            summary.eps_cagr_5y.unwrap(),
            (4.0f64.powf(0.2) - 1.0) * 100.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_trend_summary_empty_rows() {
        let summary = trend_summary(&[]);
        assert_eq!(summary, TrendSummary::default());
    }
}

//! Daily price series adaptation and as-of lookup.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One raw daily quote as delivered by a price source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Quote timestamp as delivered (any zone; reduced to a calendar date)
    pub timestamp: DateTime<Utc>,
    /// Closing price; `None` when the source row had no usable close
    pub close: Option<f64>,
}

/// One market closing price on a trading date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date, calendar granularity
    pub date: NaiveDate,
    /// Closing price, finite and positive
    pub price: f64,
}

/// Ascending-by-date daily closing price series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Adapt raw quotes into an ordered series.
    ///
    /// Returns `None` when the source yielded zero rows, so callers can
    /// distinguish a ticker with no trading history at all from one whose
    /// rows were all unusable (`Some` holding an empty series). Rows with
    /// a missing, non-finite, or non-positive close are dropped; the join
    /// only ever needs calendar-date granularity, so timestamps lose
    /// their time and zone here.
    pub fn from_quotes(quotes: &[RawQuote]) -> Option<Self> {
        if quotes.is_empty() {
            return None;
        }

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|quote| {
                let price = quote.close?;
                (price.is_finite() && price > 0.0).then(|| PricePoint {
                    date: quote.timestamp.date_naive(),
                    price,
                })
            })
            .collect();
        points.sort_by_key(|point| point.date);

        Some(Self { points })
    }

    /// Number of usable points in the series.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no usable points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The ordered points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Latest price on or before `date`, if the series reaches back that
    /// far.
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.points.partition_point(|point| point.date <= date);
        idx.checked_sub(1).map(|i| self.points[i])
    }
}

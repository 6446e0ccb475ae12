//! Current-quote snapshot fetching from Yahoo Finance.
//!
//! The quoteSummary endpoint carries the two headline inputs the chart
//! API does not: the live market price and the trailing-twelve-month
//! earnings per share.

use crate::error::{DataError, Result};
use hobart_valuation::MarketSnapshot;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// quoteSummary endpoint base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules carrying the market price and trailing EPS.
const MODULES: &str = "price,defaultKeyStatistics";

/// Yahoo Finance snapshot provider.
#[derive(Debug)]
pub struct SnapshotProvider {
    client: reqwest::Client,
    rate_limit_delay: Duration,
}

impl SnapshotProvider {
    /// Create a new snapshot provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
                .build()
                .expect("Failed to create HTTP client"),
            rate_limit_delay: Duration::from_millis(1000),
        }
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
                .build()
                .expect("Failed to create HTTP client"),
            rate_limit_delay,
        }
    }

    /// Fetch the current price and trailing-twelve-month EPS for a symbol.
    ///
    /// Fields the endpoint does not return come back absent rather than
    /// failing the snapshot; the snapshot itself is an optional input to
    /// the analysis, so callers typically downgrade any error here to
    /// "no snapshot".
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let url = format!("{}/{}?modules={}", QUOTE_SUMMARY_URL, symbol, MODULES);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch quote summary for {}: HTTP {}",
                symbol,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let result = body.pointer("/quoteSummary/result/0").ok_or_else(|| {
            DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "quoteSummary returned no result".to_string(),
            }
        })?;

        let snapshot = MarketSnapshot {
            symbol: symbol.to_string(),
            price: raw_value(result, "/price/regularMarketPrice"),
            trailing_eps: raw_value(result, "/defaultKeyStatistics/trailingEps"),
        };

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(snapshot)
    }
}

/// Yahoo wraps numeric fields as `{"raw": 1.23, "fmt": "1.23"}`; take the
/// raw field, tolerating plain numbers as well.
fn raw_value(node: &Value, pointer: &str) -> Option<f64> {
    let field = node.pointer(pointer)?;
    field
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| field.as_f64())
}

impl Default for SnapshotProvider {
    fn default() -> Self {
        Self::new()
    }
}

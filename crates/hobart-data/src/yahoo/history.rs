//! Daily close history fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::DateTime;
use hobart_valuation::RawQuote;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Chart range requesting all available history.
const MAX_RANGE: &str = "max";

/// Daily bar interval.
const DAILY_INTERVAL: &str = "1d";

/// Yahoo Finance price history provider with rate limiting.
pub struct YahooHistoryProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooHistoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooHistoryProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooHistoryProvider {
    /// Create a new provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self {
            provider: yahoo::YahooConnector::new().expect("Failed to create Yahoo connector"),
            rate_limit_delay: Duration::from_millis(1000),
        }
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            provider: yahoo::YahooConnector::new().expect("Failed to create Yahoo connector"),
            rate_limit_delay,
        }
    }

    /// Fetch the maximum available daily close history for a symbol.
    ///
    /// Rows come back in source order with a missing close mapped to
    /// `None`; ordering, timezone stripping, and filtering belong to
    /// `PriceSeries::from_quotes` downstream. A symbol with no trading
    /// history at all yields an empty vector.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL")
    pub async fn fetch_full_history(&self, symbol: &str) -> Result<Vec<RawQuote>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let response = self
            .provider
            .get_quote_range(symbol, DAILY_INTERVAL, MAX_RANGE)
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        let mut rows = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let timestamp = DateTime::from_timestamp(quote.timestamp, 0).ok_or_else(|| {
                DataError::TimeConversion(format!(
                    "quote timestamp {} out of range",
                    quote.timestamp
                ))
            })?;
            rows.push(RawQuote {
                timestamp,
                close: quote.close.is_finite().then_some(quote.close),
            });
        }

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(rows)
    }
}

impl Default for YahooHistoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_valuation::PriceSeries;

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_full_history_live() {
        let provider = YahooHistoryProvider::new();
        let rows = provider.fetch_full_history("AAPL").await.unwrap();
        assert!(!rows.is_empty());

        let series = PriceSeries::from_quotes(&rows).unwrap();
        assert!(!series.is_empty());
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected() {
        let provider = YahooHistoryProvider::new();
        let result = provider.fetch_full_history("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }
}

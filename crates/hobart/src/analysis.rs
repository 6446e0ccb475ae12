//! Per-ticker analysis orchestration.
//!
//! Wires the data-source collaborators through the session cache and hands
//! their outputs to the pure valuation core. One invocation analyzes one
//! ticker and produces one report; nothing is shared between invocations
//! except the read-through cache.

use hobart_data::DataError;
use hobart_data::cache::{CacheSource, CacheStats, SessionCache};
use hobart_data::edgar::EdgarClient;
use hobart_data::yahoo::{SnapshotProvider, YahooHistoryProvider};
use hobart_valuation::{
    FilingRecord, MarketSnapshot, PriceSeries, RawQuote, ValuationError, ValuationReport,
    build_report,
};
use thiserror::Error;

/// Errors surfaced by an analysis run.
///
/// The first two are data conditions a caller reports and moves on from;
/// `Data` aborts the run but leaves previously cached entries intact.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Ticker has no CIK mapping
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),

    /// No qualifying annual filings for the company
    #[error("no annual earnings history for {0}")]
    NoFundamentals(String),

    /// Upstream fetch or cache failure
    #[error("data source error: {0}")]
    Data(#[from] DataError),

    /// Invalid valuation input
    #[error("valuation error: {0}")]
    Valuation(#[from] ValuationError),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Per-session analyzer: one ticker in, one report out.
///
/// Holds the data-source clients and the session cache, so repeated
/// analyses of the same company skip redundant network fetches. No
/// automatic retry: a failed fetch surfaces immediately and retrying is
/// the caller's decision.
#[derive(Debug)]
pub struct Analyzer {
    edgar: EdgarClient,
    history: YahooHistoryProvider,
    snapshot: SnapshotProvider,
    cache: SessionCache,
}

impl Analyzer {
    /// Create an analyzer with default clients and an empty session cache.
    pub fn new() -> Result<Self> {
        Ok(Self {
            edgar: EdgarClient::new()?,
            history: YahooHistoryProvider::new(),
            snapshot: SnapshotProvider::new(),
            cache: SessionCache::new()?,
        })
    }

    /// Run one full analysis for a ticker.
    ///
    /// Resolves the CIK, fetches the EPS filing history and the full
    /// price history (reusing session-cached copies where present),
    /// attaches the best-effort market snapshot, and builds the valuation
    /// report.
    pub async fn analyze(&self, ticker: &str) -> Result<ValuationReport> {
        let ticker = ticker.trim().to_uppercase();

        let cik = self.resolve_cik(&ticker).await?;
        let filings = self.eps_history(&cik).await?;
        let quotes = self.price_history(&ticker).await?;
        let snapshot = self.market_snapshot(&ticker).await;

        let prices = PriceSeries::from_quotes(&quotes);
        build_report(&ticker, &filings, prices.as_ref(), snapshot.as_ref()).map_err(|err| {
            match err {
                ValuationError::NoFundamentals(symbol) => AnalysisError::NoFundamentals(symbol),
                other => AnalysisError::Valuation(other),
            }
        })
    }

    /// Resolve the ticker's CIK, read-through cached.
    async fn resolve_cik(&self, ticker: &str) -> Result<String> {
        if let Some(cik) = self.cache.get::<String>(ticker, CacheSource::CikMapping)? {
            return Ok(cik);
        }
        match self.edgar.get_company_cik(ticker).await {
            Ok(cik) => {
                self.cache.put(ticker, CacheSource::CikMapping, &cik)?;
                Ok(cik)
            }
            Err(DataError::CikNotFound(_)) => Err(AnalysisError::UnknownTicker(ticker.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// EPS filing history, read-through cached by CIK.
    async fn eps_history(&self, cik: &str) -> Result<Vec<FilingRecord>> {
        if let Some(filings) = self
            .cache
            .get::<Vec<FilingRecord>>(cik, CacheSource::EdgarEps)?
        {
            return Ok(filings);
        }
        let filings = self.edgar.get_eps_history(cik).await?;
        self.cache.put(cik, CacheSource::EdgarEps, &filings)?;
        Ok(filings)
    }

    /// Full price history, read-through cached by ticker.
    async fn price_history(&self, ticker: &str) -> Result<Vec<RawQuote>> {
        if let Some(quotes) = self
            .cache
            .get::<Vec<RawQuote>>(ticker, CacheSource::PriceHistory)?
        {
            return Ok(quotes);
        }
        let quotes = self.history.fetch_full_history(ticker).await?;
        self.cache.put(ticker, CacheSource::PriceHistory, &quotes)?;
        Ok(quotes)
    }

    /// Best-effort snapshot: the TTM headline is optional, so any failure
    /// here degrades to "no snapshot" instead of aborting the analysis.
    async fn market_snapshot(&self, ticker: &str) -> Option<MarketSnapshot> {
        if let Ok(Some(snapshot)) = self.cache.get::<MarketSnapshot>(ticker, CacheSource::Snapshot)
        {
            return Some(snapshot);
        }
        match self.snapshot.fetch_snapshot(ticker).await {
            Ok(snapshot) => {
                self.cache
                    .put(ticker, CacheSource::Snapshot, &snapshot)
                    .ok();
                Some(snapshot)
            }
            Err(_) => None,
        }
    }

    /// Cache occupancy for the session.
    pub fn cache_stats(&self) -> Result<CacheStats> {
        Ok(self.cache.stats()?)
    }
}

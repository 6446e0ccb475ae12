//! SEC EDGAR API client with rate limiting.

use crate::edgar::tickers::CikLookup;
use crate::error::{DataError, Result};
use chrono::NaiveDate;
use hobart_valuation::{FilingRecord, FiscalPeriod};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// User agent for SEC EDGAR requests (SEC requires identifying information)
const USER_AGENT: &str = "Hobart-Valuation/0.1 (contact@example.com)";

/// XBRL tag for basic earnings per share.
pub const EPS_BASIC_TAG: &str = "EarningsPerShareBasic";

/// Unit bucket of the company-concept response carrying per-share dollar
/// figures.
pub const PER_SHARE_UNIT: &str = "USD/shares";

/// Response from the company-concept API for a single XBRL tag.
///
/// Facts are grouped by unit of measure; per-share dollar figures live
/// under `USD/shares`. A company that never reported the tag in a given
/// unit simply lacks that bucket.
#[derive(Debug, Deserialize)]
struct ConceptResponse {
    /// Fact values grouped by unit of measure
    #[serde(default)]
    units: HashMap<String, Vec<ConceptFact>>,
}

/// One disclosed fact value with its filing metadata.
#[derive(Debug, Clone, Deserialize)]
struct ConceptFact {
    /// End date of the covered period, YYYY-MM-DD
    #[serde(default)]
    end: Option<String>,
    /// Disclosed value
    val: f64,
    /// Fiscal year the value was reported against
    #[serde(default)]
    fy: Option<i32>,
    /// Fiscal period code ("FY", "Q1", ...)
    #[serde(default)]
    fp: Option<String>,
    /// Form type of the filing ("10-K", "10-Q", ...)
    #[serde(default)]
    form: Option<String>,
    /// Date the filing was submitted, YYYY-MM-DD
    #[serde(default)]
    filed: Option<String>,
}

/// Rate limiter to ensure we don't exceed SEC's rate limits
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR API client with rate limiting
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    base_url: String,
}

impl EdgarClient {
    /// Create a new EDGAR client with default settings (10 req/sec)
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a new EDGAR client with custom rate limit
    ///
    /// # Arguments
    /// * `min_interval` - Minimum duration between requests
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            base_url: EDGAR_BASE_URL.to_string(),
        })
    }

    /// Look up a company's CIK number from its ticker symbol
    ///
    /// # Arguments
    /// * `ticker` - Stock ticker symbol (e.g., "AAPL")
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string
    ///
    /// # Errors
    /// Returns `DataError::CikNotFound` if the ticker is not found
    pub async fn get_company_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        self.rate_limiter.lock().await.wait().await;

        let lookup = CikLookup::fetch(&self.client).await?;
        lookup.resolve(ticker)
    }

    /// Fetch the full basic-EPS disclosure history for a company.
    ///
    /// Calls the company-concept API for `EarningsPerShareBasic` and maps
    /// the `USD/shares` bucket into filing records. A company with no such
    /// concept on file (HTTP 404) or without the per-share unit bucket
    /// yields an empty vector: "no fundamentals" is a data condition for
    /// the caller to report, not a transport failure.
    ///
    /// # Arguments
    /// * `cik` - Company's CIK number (with or without zero padding)
    pub async fn get_eps_history(&self, cik: &str) -> Result<Vec<FilingRecord>> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let cik_padded = CikLookup::pad_cik(cik);

        self.rate_limiter.lock().await.wait().await;

        let url = format!(
            "{}/api/xbrl/companyconcept/CIK{}/us-gaap/{}.json",
            self.base_url, cik_padded, EPS_BASIC_TAG
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch {} for CIK {}: HTTP {}",
                EPS_BASIC_TAG,
                cik_padded,
                response.status()
            )));
        }

        let concept: ConceptResponse = response
            .json()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to parse company concept: {}", e)))?;

        Ok(concept
            .units
            .get(PER_SHARE_UNIT)
            .map(|facts| facts.iter().filter_map(to_filing_record).collect())
            .unwrap_or_default())
    }
}

/// Map one concept fact into a filing record.
///
/// Facts without a fiscal year cannot be grouped and are skipped;
/// malformed dates become `None` so normalization can still order what
/// remains.
fn to_filing_record(fact: &ConceptFact) -> Option<FilingRecord> {
    let fiscal_year = fact.fy?;
    let fiscal_period = fact
        .fp
        .as_deref()
        .map_or(FiscalPeriod::Interim, FiscalPeriod::from_code);

    Some(FilingRecord {
        period_end: parse_date(fact.end.as_deref()),
        filed: parse_date(fact.filed.as_deref()),
        fiscal_year,
        fiscal_period,
        form: fact.form.clone().unwrap_or_default(),
        value: fact.val,
    })
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl Default for EdgarClient {
    fn default() -> Self {
        Self::new().expect("Failed to create EDGAR client")
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(
        end: Option<&str>,
        filed: Option<&str>,
        fy: Option<i32>,
        fp: Option<&str>,
        form: Option<&str>,
        val: f64,
    ) -> ConceptFact {
        ConceptFact {
            end: end.map(String::from),
            val,
            fy,
            fp: fp.map(String::from),
            form: form.map(String::from),
            filed: filed.map(String::from),
        }
    }

    #[test]
    fn test_to_filing_record_full_year() {
        let fact = fact(
            Some("2022-12-31"),
            Some("2023-02-01"),
            Some(2022),
            Some("FY"),
            Some("10-K"),
            5.0,
        );

        let record = to_filing_record(&fact).unwrap();
        assert_eq!(record.fiscal_year, 2022);
        assert_eq!(record.fiscal_period, FiscalPeriod::FullYear);
        assert_eq!(record.form, "10-K");
        assert_eq!(record.value, 5.0);
        assert_eq!(
            record.period_end,
            NaiveDate::from_ymd_opt(2022, 12, 31),
        );
        assert_eq!(record.filed, NaiveDate::from_ymd_opt(2023, 2, 1));
    }

    #[test]
    fn test_to_filing_record_skips_missing_fiscal_year() {
        let fact = fact(
            Some("2022-12-31"),
            Some("2023-02-01"),
            None,
            Some("FY"),
            Some("10-K"),
            5.0,
        );
        assert!(to_filing_record(&fact).is_none());
    }

    #[test]
    fn test_to_filing_record_malformed_dates_become_none() {
        let fact = fact(
            Some("not-a-date"),
            None,
            Some(2022),
            Some("FY"),
            Some("10-K"),
            5.0,
        );

        let record = to_filing_record(&fact).unwrap();
        assert_eq!(record.period_end, None);
        assert_eq!(record.filed, None);
    }

    #[test]
    fn test_missing_fiscal_period_is_interim() {
        let fact = fact(
            Some("2022-12-31"),
            Some("2023-02-01"),
            Some(2022),
            None,
            Some("10-K"),
            5.0,
        );

        let record = to_filing_record(&fact).unwrap();
        assert_eq!(record.fiscal_period, FiscalPeriod::Interim);
        assert!(!record.qualifies());
    }

    #[test]
    fn test_concept_response_parsing() {
        let body = r#"{
            "cik": 320193,
            "entityName": "Apple Inc.",
            "units": {
                "USD/shares": [
                    {"end": "2022-09-24", "val": 6.15, "fy": 2022, "fp": "FY",
                     "form": "10-K", "filed": "2022-10-28"}
                ]
            }
        }"#;

        let concept: ConceptResponse = serde_json::from_str(body).unwrap();
        let facts = concept.units.get(PER_SHARE_UNIT).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].val, 6.15);
    }

    #[test]
    fn test_concept_response_without_per_share_bucket() {
        let body = r#"{"cik": 1, "entityName": "Test", "units": {"USD": []}}"#;
        let concept: ConceptResponse = serde_json::from_str(body).unwrap();
        assert!(concept.units.get(PER_SHARE_UNIT).is_none());
    }

    #[tokio::test]
    #[ignore = "requires network access to SEC EDGAR"]
    async fn test_get_eps_history_live() {
        let client = EdgarClient::new().unwrap();
        let cik = client.get_company_cik("AAPL").await.unwrap();
        assert_eq!(cik.len(), 10);

        let filings = client.get_eps_history(&cik).await.unwrap();
        assert!(!filings.is_empty());
        assert!(filings.iter().any(|f| f.qualifies()));
    }
}

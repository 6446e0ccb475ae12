//! Ticker-to-CIK resolution.
//!
//! CIK (Central Index Key) is the identifier the SEC assigns to filing
//! companies. The mapping comes from the SEC's `company_tickers.json`,
//! fetched over HTTP or read from a local static copy of the same file.

use crate::error::{DataError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Lookup table for converting ticker symbols to CIK numbers.
#[derive(Debug, Clone)]
pub struct CikLookup {
    /// Map from ticker to (CIK, company name)
    ticker_to_cik: HashMap<String, (String, String)>,
}

/// Raw company ticker data from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTicker {
    cik_str: u64,
    ticker: String,
    title: String,
}

impl CikLookup {
    /// Fetch and parse the company tickers JSON from the SEC website.
    ///
    /// # Arguments
    /// * `client` - HTTP client for making requests
    ///
    /// # Errors
    /// Returns error if the network request or JSON parsing fails
    pub async fn fetch(client: &reqwest::Client) -> Result<Self> {
        let url = "https://www.sec.gov/files/company_tickers.json";

        // SEC requires a User-Agent header with contact info
        let response = client
            .get(url)
            .header("User-Agent", "Hobart-Valuation/0.1 (contact@example.com)")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        // The JSON is a map from index to company data
        let data: HashMap<String, CompanyTicker> = response.json().await?;
        Ok(Self::from_entries(data))
    }

    /// Read the same mapping from a local copy of `company_tickers.json`.
    ///
    /// Useful for offline runs and for pinning the mapping to a known
    /// snapshot.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let data: HashMap<String, CompanyTicker> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_entries(data))
    }

    fn from_entries(data: HashMap<String, CompanyTicker>) -> Self {
        let mut ticker_to_cik = HashMap::new();
        for (_idx, company) in data {
            let cik = company.cik_str.to_string();
            let ticker = company.ticker.to_uppercase();
            ticker_to_cik.insert(ticker, (cik, company.title));
        }
        Self { ticker_to_cik }
    }

    /// Look up CIK by ticker symbol (case-insensitive).
    ///
    /// # Returns
    /// Optional tuple of (CIK, company name)
    pub fn get_cik(&self, ticker: &str) -> Option<&(String, String)> {
        self.ticker_to_cik.get(&ticker.to_uppercase())
    }

    /// Resolve a ticker to its zero-padded 10-digit CIK.
    ///
    /// An unmapped ticker is the recoverable "unknown ticker" condition,
    /// surfaced as [`DataError::CikNotFound`].
    pub fn resolve(&self, ticker: &str) -> Result<String> {
        self.get_cik(ticker)
            .map(|(cik, _name)| Self::pad_cik(cik))
            .ok_or_else(|| DataError::CikNotFound(ticker.to_string()))
    }

    /// Number of mapped tickers.
    pub fn len(&self) -> usize {
        self.ticker_to_cik.len()
    }

    /// Whether the mapping holds no tickers.
    pub fn is_empty(&self) -> bool {
        self.ticker_to_cik.is_empty()
    }

    /// Pad a CIK to the 10 digits EDGAR URLs require.
    ///
    /// # Example
    /// ```
    /// # use hobart_data::edgar::CikLookup;
    /// let padded = CikLookup::pad_cik("320193");
    /// assert_eq!(padded, "0000320193");
    /// ```
    pub fn pad_cik(cik: &str) -> String {
        format!("{:0>10}", cik)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
    }"#;

    #[test]
    fn test_pad_cik() {
        assert_eq!(CikLookup::pad_cik("320193"), "0000320193");
        assert_eq!(CikLookup::pad_cik("1234"), "0000001234");
        assert_eq!(CikLookup::pad_cik("1234567890"), "1234567890");
    }

    #[test]
    fn test_from_file_and_lookup() {
        let dir = std::env::temp_dir();
        let path = dir.join("hobart_test_company_tickers.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let lookup = CikLookup::from_file(&path).unwrap();
        assert_eq!(lookup.len(), 2);

        let (cik, name) = lookup.get_cik("aapl").unwrap();
        assert_eq!(cik, "320193");
        assert_eq!(name, "Apple Inc.");

        assert_eq!(lookup.resolve("AAPL").unwrap(), "0000320193");
        assert!(matches!(
            lookup.resolve("NOTREAL"),
            Err(DataError::CikNotFound(_))
        ));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = CikLookup::from_file("/nonexistent/company_tickers.json");
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access to sec.gov"]
    async fn test_fetch_live() {
        let client = reqwest::Client::builder()
            .user_agent("Hobart-Valuation/0.1 (test)")
            .build()
            .unwrap();
        let lookup = CikLookup::fetch(&client).await.unwrap();

        assert!(lookup.get_cik("AAPL").is_some());
        assert!(lookup.get_cik("MSFT").is_some());
    }
}

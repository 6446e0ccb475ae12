//! SEC EDGAR data fetching.
//!
//! This module provides access to the two EDGAR surfaces the valuation
//! pipeline needs:
//! - Ticker-to-CIK resolution from the SEC company tickers file (remote
//!   or a local static copy)
//! - The XBRL company-concept API for per-filing basic EPS disclosures
//!
//! # Example
//!
//! ```no_run
//! use hobart_data::edgar::EdgarClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new()?;
//!     let cik = client.get_company_cik("AAPL").await?;
//!     let filings = client.get_eps_history(&cik).await?;
//!     println!("Found {} EPS disclosures", filings.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod tickers;

pub use client::{EPS_BASIC_TAG, EdgarClient, PER_SHARE_UNIT};
pub use tickers::CikLookup;

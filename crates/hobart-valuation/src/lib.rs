#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytics;
pub mod error;
pub mod fiscal;
pub mod join;
pub mod prices;
pub mod projection;
pub mod report;

pub use analytics::{TrendSummary, trailing_cagr, trailing_mean, trend_summary};
pub use error::{Result, ValuationError};
pub use fiscal::{AnnualFiscalRecord, FilingRecord, FiscalPeriod, normalize_annual_eps};
pub use join::{ValuationRow, join_as_of, per_ratio};
pub use prices::{PricePoint, PriceSeries, RawQuote};
pub use projection::{ProjectionInputs, ProjectionRow, project};
pub use report::{MarketSnapshot, ValuationReport, build_report};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

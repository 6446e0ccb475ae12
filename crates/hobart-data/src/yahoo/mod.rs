//! Yahoo Finance data providers.

pub mod history;
pub mod snapshot;

pub use history::YahooHistoryProvider;
pub use snapshot::SnapshotProvider;

//! Session-scoped caching for fetched source data.

pub mod session;

pub use session::{CacheSource, CacheStats, SessionCache};

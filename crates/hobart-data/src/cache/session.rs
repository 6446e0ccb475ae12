//! In-memory session cache keyed by (identifier, source).
//!
//! Repeated analyses of the same company within a session skip redundant
//! network fetches. The cache is read-through: callers look up first,
//! fetch on a miss, then store. Entries are never evicted or invalidated
//! within a session — staleness is an accepted tradeoff for
//! responsiveness — and the backing database lives in memory, so the
//! whole cache disappears when the process exits.

use crate::error::{DataError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Logical data source a cached payload came from.
///
/// Part of the cache key: the same identifier holds independent entries
/// per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// EDGAR basic-EPS filing history
    EdgarEps,
    /// Daily close price history
    PriceHistory,
    /// Current price / trailing EPS snapshot
    Snapshot,
    /// Ticker-to-CIK resolution
    CikMapping,
}

impl CacheSource {
    /// Stable string used in the cache table.
    pub const fn to_db_str(self) -> &'static str {
        match self {
            Self::EdgarEps => "edgar_eps",
            Self::PriceHistory => "price_history",
            Self::Snapshot => "snapshot",
            Self::CikMapping => "cik_mapping",
        }
    }

    /// Parse from the cache table string representation.
    pub fn from_db_str(s: &str) -> Result<Self> {
        match s {
            "edgar_eps" => Ok(Self::EdgarEps),
            "price_history" => Ok(Self::PriceHistory),
            "snapshot" => Ok(Self::Snapshot),
            "cik_mapping" => Ok(Self::CikMapping),
            _ => Err(DataError::Parse(format!("Invalid cache source: {}", s))),
        }
    }
}

/// Session-scoped read-through cache.
#[derive(Debug)]
pub struct SessionCache {
    conn: Connection,
}

impl SessionCache {
    /// Create an empty session cache backed by an in-memory database.
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS session_cache (
                identifier TEXT NOT NULL,
                source TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (identifier, source)
            )",
            [],
        )?;
        Ok(())
    }

    /// Fetch a cached payload, if one was stored this session.
    pub fn get<T: DeserializeOwned>(
        &self,
        identifier: &str,
        source: CacheSource,
    ) -> Result<Option<T>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM session_cache WHERE identifier = ?1 AND source = ?2",
                params![identifier, source.to_db_str()],
                |row| row.get(0),
            )
            .optional()?;

        data.map(|data| serde_json::from_str(&data).map_err(DataError::from))
            .transpose()
    }

    /// Store a payload; storing under the same key again replaces it.
    pub fn put<T: Serialize>(&self, identifier: &str, source: CacheSource, value: &T) -> Result<()> {
        let data = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session_cache (identifier, source, data)
             VALUES (?1, ?2, ?3)",
            params![identifier, source.to_db_str(), data],
        )?;
        Ok(())
    }

    /// Cache occupancy counters.
    pub fn stats(&self) -> Result<CacheStats> {
        let entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM session_cache", [], |row| row.get(0))?;

        let identifiers: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT identifier) FROM session_cache",
            [],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            entries: entries as usize,
            identifiers: identifiers as usize,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total number of cached entries
    pub entries: usize,
    /// Number of distinct identifiers with at least one entry
    pub identifiers: usize,
}

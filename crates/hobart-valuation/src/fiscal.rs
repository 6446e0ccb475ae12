//! Annual fiscal record normalization.
//!
//! Filings arrive as an unordered stream of disclosed values: quarterly and
//! annual periods mixed together, amendments restating earlier figures, the
//! same fiscal year reported several times. This module collapses that
//! stream into one authoritative earnings figure per fiscal year.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Form types that carry an authoritative annual figure.
const ANNUAL_FORMS: [&str; 2] = ["10-K", "10-K/A"];

/// Fiscal period covered by a disclosed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// Full fiscal year ("FY")
    FullYear,
    /// Any partial period (quarters, year-to-date)
    Interim,
}

impl FiscalPeriod {
    /// Parse from the SEC fiscal period code ("FY", "Q1", ...).
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("FY") {
            Self::FullYear
        } else {
            Self::Interim
        }
    }
}

/// One disclosed value from a regulatory filing.
///
/// `filed >= period_end` is expected but never enforced; backdated source
/// rows are valid input. Malformed source dates surface as `None` rather
/// than aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingRecord {
    /// End date of the covered period
    pub period_end: Option<NaiveDate>,
    /// Date the filing was submitted
    pub filed: Option<NaiveDate>,
    /// Fiscal year the value belongs to
    pub fiscal_year: i32,
    /// Period covered by the value
    pub fiscal_period: FiscalPeriod,
    /// SEC form type (e.g. "10-K", "10-K/A", "10-Q")
    pub form: String,
    /// Reported value; may be negative or zero
    pub value: f64,
}

impl FilingRecord {
    /// Whether this record can contribute an annual figure: an annual (or
    /// amended annual) report covering the full fiscal year, with a
    /// parseable period end to anchor the price join.
    pub fn qualifies(&self) -> bool {
        self.fiscal_period == FiscalPeriod::FullYear
            && ANNUAL_FORMS.contains(&self.form.as_str())
            && self.period_end.is_some()
    }
}

/// One finalized per-fiscal-year earnings figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualFiscalRecord {
    /// Fiscal year, unique within a company
    pub fiscal_year: i32,
    /// Period end date; the join key against the price series
    pub period_end: NaiveDate,
    /// Earnings per share for the fiscal year
    pub eps: f64,
}

/// Collapse raw filing disclosures into one authoritative EPS figure per
/// fiscal year, ascending by fiscal year.
///
/// Within a fiscal year the qualifying record with the latest filed date
/// wins; a record with no parseable filed date loses to any dated one.
/// Remaining ties fall to the later period end, then to the record
/// appearing last in the input (deterministic for a fixed input order).
///
/// No qualifying records yields an empty vector, not an error.
pub fn normalize_annual_eps(records: &[FilingRecord]) -> Vec<AnnualFiscalRecord> {
    let mut winners: BTreeMap<i32, usize> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        if !record.qualifies() {
            continue;
        }
        let entry = winners.entry(record.fiscal_year).or_insert(idx);
        let incumbent = &records[*entry];
        if (record.filed, record.period_end, idx) > (incumbent.filed, incumbent.period_end, *entry)
        {
            *entry = idx;
        }
    }

    winners
        .into_values()
        .filter_map(|idx| {
            let record = &records[idx];
            record.period_end.map(|period_end| AnnualFiscalRecord {
                fiscal_year: record.fiscal_year,
                period_end,
                eps: record.value,
            })
        })
        .collect()
}

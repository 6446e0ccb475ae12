//! Five-year earnings projection under pessimistic, base, and optimistic
//! scenarios.

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Number of forward fiscal years projected.
pub const HORIZON_YEARS: u32 = 5;

/// Lower bound accepted for a growth rate, percent.
pub const MIN_GROWTH_PCT: f64 = -50.0;

/// Upper bound accepted for a growth rate, percent.
pub const MAX_GROWTH_PCT: f64 = 100.0;

/// Scenario dispersion applied below the base ratio.
pub const PESSIMISTIC_FACTOR: f64 = 0.8;

/// Scenario dispersion applied above the base ratio.
pub const OPTIMISTIC_FACTOR: f64 = 1.2;

/// Inputs to a projection run.
///
/// The base ratio may come from the trailing-twelve-month figure, a
/// historical mean, or manual entry; the growth rate likewise. Validation
/// happens once up front so no partial projection is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    /// Last known annual earnings per share
    pub current_eps: f64,
    /// Ratio applied to projected earnings
    pub base_ratio: f64,
    /// Assumed annual earnings growth, percent
    pub growth_rate_pct: f64,
}

impl ProjectionInputs {
    /// Reject inputs that would produce a meaningless projection.
    pub fn validate(&self) -> Result<()> {
        if !self.current_eps.is_finite() {
            return Err(ValuationError::NonFiniteEps(self.current_eps));
        }
        if !self.base_ratio.is_finite() || self.base_ratio <= 0.0 {
            return Err(ValuationError::InvalidBaseRatio(self.base_ratio));
        }
        if !self.growth_rate_pct.is_finite()
            || !(MIN_GROWTH_PCT..=MAX_GROWTH_PCT).contains(&self.growth_rate_pct)
        {
            return Err(ValuationError::GrowthRateOutOfRange(self.growth_rate_pct));
        }
        Ok(())
    }
}

/// One projected forward year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Years past the last known fiscal year, 1-based
    pub years_ahead: u32,
    /// Earnings per share compounded forward
    pub projected_eps: f64,
    /// Projected price at 80% of the base ratio
    pub price_pessimistic: f64,
    /// Projected price at the base ratio
    pub price_base: f64,
    /// Projected price at 120% of the base ratio
    pub price_optimistic: f64,
}

/// Project earnings and scenario prices for the next five fiscal years.
///
/// A pure function of its inputs; re-invoke freely with different
/// assumptions for what-if exploration.
pub fn project(inputs: ProjectionInputs) -> Result<Vec<ProjectionRow>> {
    inputs.validate()?;

    let growth = 1.0 + inputs.growth_rate_pct / 100.0;
    Ok((1..=HORIZON_YEARS)
        .map(|years_ahead| {
            let projected_eps = inputs.current_eps * growth.powi(years_ahead as i32);
            let price_base = projected_eps * inputs.base_ratio;
            ProjectionRow {
                years_ahead,
                projected_eps,
                price_pessimistic: price_base * PESSIMISTIC_FACTOR,
                price_base,
                price_optimistic: price_base * OPTIMISTIC_FACTOR,
            }
        })
        .collect())
}

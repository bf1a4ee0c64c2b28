//! Snapshot — one quarter of company state, plus its JSON shape.
//!
//! Field names are the persisted compatibility surface:
//! `Quarter`, `Countries`, `Occupations`, `Capital`, and the
//! revenue fields once the estimator has run.

use crate::{
    error::{SimError, SimResult},
    revenue::RevenueEstimate,
    types::{total, Headcount, QuarterIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub quarter: String,
    pub countries: Headcount,
    pub occupations: Headcount,
    /// Raised-to-date, in millions.
    pub capital: f64,
    #[serde(flatten)]
    pub revenue: Option<RevenueEstimate>,
}

impl Snapshot {
    pub fn new(quarter: String, countries: Headcount, occupations: Headcount, capital: f64) -> Self {
        Self {
            quarter,
            countries,
            occupations,
            capital,
            revenue: None,
        }
    }

    /// Total headcount, counted by country.
    pub fn headcount(&self) -> u64 {
        total(&self.countries)
    }

    /// Check the cross-dimension and capital invariants.
    /// `index` is only used to label the error.
    pub fn validate(&self, index: QuarterIndex) -> SimResult<()> {
        let by_country = total(&self.countries);
        let by_role = total(&self.occupations);
        if by_country != by_role {
            return Err(SimError::InvariantViolation {
                quarter: index,
                detail: format!(
                    "country total {by_country} != occupation total {by_role}"
                ),
            });
        }
        if !self.capital.is_finite() || self.capital < 0.0 {
            return Err(SimError::InvariantViolation {
                quarter: index,
                detail: format!("capital {} is not a non-negative number", self.capital),
            });
        }
        Ok(())
    }
}

/// Check every snapshot plus the capital ordering along the sequence.
pub fn validate_sequence(snapshots: &[Snapshot]) -> SimResult<()> {
    for (i, snap) in snapshots.iter().enumerate() {
        snap.validate(i)?;
    }
    for (i, pair) in snapshots.windows(2).enumerate() {
        if pair[1].capital < pair[0].capital {
            return Err(SimError::InvariantViolation {
                quarter: i + 1,
                detail: format!(
                    "capital decreased from {} to {}",
                    pair[0].capital, pair[1].capital
                ),
            });
        }
    }
    Ok(())
}

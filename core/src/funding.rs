//! Funding schedule — which quarters raise capital, and how much.
//!
//! Built once per run from the run length, before the first quarter
//! is simulated. Never mutated afterwards.

use crate::{
    rng::StreamRng,
    types::{round2, QuarterIndex},
};
use serde::{Deserialize, Serialize};

/// Earliest quarter index at which a round can close.
pub const FIRST_FUNDING_QUARTER: QuarterIndex = 4;
/// Rounds are only drawn from indices below this horizon.
pub const FUNDING_HORIZON: QuarterIndex = 20;
pub const MAX_ROUNDS: usize = 4;
/// Growth multiplier applied on a funding quarter.
pub const FUNDED_GROWTH_MULTIPLIER: f64 = 2.0;

/// Growth multiplier for a quarter: doubled when a round closed in it.
pub fn growth_multiplier(funded: bool) -> f64 {
    if funded {
        FUNDED_GROWTH_MULTIPLIER
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub quarter: QuarterIndex,
    /// Millions, rounded to cents.
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingSchedule {
    rounds: Vec<FundingRound>,
}

impl FundingSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rounds a run of `total_quarters` receives.
    pub fn round_count(total_quarters: usize) -> usize {
        (total_quarters / 5).min(MAX_ROUNDS)
    }

    /// Draw the schedule for a run. Runs shorter than five quarters
    /// get an empty schedule.
    pub fn build(total_quarters: usize, rng: &mut StreamRng) -> Self {
        let upper = total_quarters.min(FUNDING_HORIZON);
        let mut pool: Vec<QuarterIndex> = (FIRST_FUNDING_QUARTER..upper.max(FIRST_FUNDING_QUARTER)).collect();
        let k = Self::round_count(total_quarters).min(pool.len());

        // Partial Fisher-Yates: the first k slots become the sample.
        for slot in 0..k {
            let pick = slot + rng.next_u64_below((pool.len() - slot) as u64) as usize;
            pool.swap(slot, pick);
        }
        pool.truncate(k);
        pool.sort_unstable();

        let rounds = pool
            .into_iter()
            .map(|quarter| {
                let scale = 1.0 + quarter as f64 / total_quarters as f64;
                let amount = round2(rng.uniform(2.0, 5.0) * scale);
                FundingRound { quarter, amount }
            })
            .collect();

        Self { rounds }
    }

    pub fn rounds(&self) -> &[FundingRound] {
        &self.rounds
    }

    pub fn quarters(&self) -> impl Iterator<Item = QuarterIndex> + '_ {
        self.rounds.iter().map(|r| r.quarter)
    }

    pub fn contains(&self, quarter: QuarterIndex) -> bool {
        self.round_at(quarter).is_some()
    }

    pub fn round_at(&self, quarter: QuarterIndex) -> Option<&FundingRound> {
        self.rounds.iter().find(|r| r.quarter == quarter)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

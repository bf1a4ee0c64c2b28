//! Trajectory builder: folds a seed snapshot forward one quarter at a time.
//!
//! STEP ORDER (fixed, never reordered), for each quarter i = 1..N-1:
//!   1. Copy snapshot i-1.
//!   2. Apply the funding round for i, if scheduled.
//!   3. Ask the growth policy for a delta.
//!   4. Let the allocator realize it across countries and roles.
//!   5. Relabel from i and validate.
//!
//! RULES:
//!   - A step reads ONLY its immediate predecessor.
//!   - All randomness flows through the run's RngBank.
//!   - The seed snapshot at index 0 is never altered.

use crate::{
    allocator::DistributionAllocator,
    clock::QuarterCalendar,
    error::{SimError, SimResult},
    funding::FundingSchedule,
    growth::{GrowthPolicy, QuarterContext, RunState},
    rng::{RngBank, StreamRng, StreamSlot},
    snapshot::Snapshot,
    types::{round2, QuarterIndex},
};
use serde::Serialize;

/// A finished, immutable run.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub model: &'static str,
    pub replicate: usize,
    pub funding: FundingSchedule,
    snapshots: Vec<Snapshot>,
}

impl Trajectory {
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Append revenue fields to every quarter.
    pub fn with_revenue(mut self) -> Self {
        crate::revenue::annotate(&mut self.snapshots);
        self
    }

    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary::from_snapshots(&self.snapshots)
    }
}

pub struct TrajectoryBuilder {
    policy: Box<dyn GrowthPolicy>,
    total_quarters: usize,
    calendar: QuarterCalendar,
    rngs: RngBank,
    replicate: usize,
}

impl TrajectoryBuilder {
    /// Fails before any simulation work if `total_quarters` is 0.
    pub fn new(
        policy: Box<dyn GrowthPolicy>,
        total_quarters: usize,
        rngs: RngBank,
    ) -> SimResult<Self> {
        if total_quarters < 1 {
            return Err(SimError::InvalidRunLength { quarters: total_quarters });
        }
        Ok(Self {
            policy,
            total_quarters,
            calendar: QuarterCalendar::default(),
            rngs,
            replicate: 0,
        })
    }

    pub fn with_calendar(mut self, calendar: QuarterCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_replicate(mut self, replicate: usize) -> Self {
        self.replicate = replicate;
        self
    }

    /// Fold the seed forward through every quarter of the run.
    pub fn build(self, seed: Snapshot) -> SimResult<Trajectory> {
        seed.validate(0)?;

        let mut funding_rng = self.rngs.for_stream(StreamSlot::Funding);
        let mut growth_rng = self.rngs.for_stream(StreamSlot::Growth);
        let mut alloc_rng = self.rngs.for_stream(StreamSlot::Allocation);

        let funding = if self.total_quarters > 1 {
            FundingSchedule::build(self.total_quarters, &mut funding_rng)
        } else {
            FundingSchedule::empty()
        };
        let allocator = DistributionAllocator::for_keys(&seed.countries, &seed.occupations)?;

        let mut run_state = RunState::default();
        let mut snapshots = Vec::with_capacity(self.total_quarters);
        snapshots.push(seed);

        for i in 1..self.total_quarters {
            let next = self.step(
                &snapshots[i - 1],
                i,
                &funding,
                &allocator,
                &mut run_state,
                &mut growth_rng,
                &mut alloc_rng,
            )?;
            snapshots.push(next);
        }

        Ok(Trajectory {
            model: self.policy.name(),
            replicate: self.replicate,
            funding,
            snapshots,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn step(
        &self,
        previous: &Snapshot,
        i: QuarterIndex,
        funding: &FundingSchedule,
        allocator: &DistributionAllocator,
        run_state: &mut RunState,
        growth_rng: &mut StreamRng,
        alloc_rng: &mut StreamRng,
    ) -> SimResult<Snapshot> {
        let mut candidate = previous.clone();
        candidate.revenue = None;
        let headcount = candidate.headcount();

        let funded = match funding.round_at(i) {
            Some(round) => {
                candidate.capital = round2(candidate.capital + round.amount);
                log::info!(
                    "{} r{}: funding round of ${:.2}M at quarter {i}, capital now ${:.2}M",
                    self.policy.name(),
                    self.replicate,
                    round.amount,
                    candidate.capital
                );
                true
            }
            None => false,
        };

        let ctx = QuarterContext {
            headcount,
            quarter: i,
            total_quarters: self.total_quarters,
            funded,
        };
        let delta = self.policy.compute_delta(&ctx, run_state, growth_rng);

        let (countries, occupations) =
            allocator.apply_delta(&candidate.countries, &candidate.occupations, delta, alloc_rng);
        candidate.countries = countries;
        candidate.occupations = occupations;
        candidate.quarter = self.calendar.label(i);

        log::debug!(
            "{} r{} quarter={i} label={} delta={delta} headcount {headcount} -> {}",
            self.policy.name(),
            self.replicate,
            candidate.quarter,
            candidate.headcount()
        );

        candidate.validate(i)?;
        Ok(candidate)
    }
}

/// End-of-run figures for reporting and the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub quarters: usize,
    pub first_quarter: Option<String>,
    pub last_quarter: Option<String>,
    pub starting_headcount: u64,
    pub final_headcount: u64,
    pub peak_headcount: u64,
    pub final_capital: f64,
    /// Indices where capital rose over the previous quarter.
    pub funded_quarters: Vec<QuarterIndex>,
}

impl TrajectorySummary {
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        let funded_quarters = snapshots
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1].capital > pair[0].capital)
            .map(|(i, _)| i + 1)
            .collect();
        Self {
            quarters: snapshots.len(),
            first_quarter: snapshots.first().map(|s| s.quarter.clone()),
            last_quarter: snapshots.last().map(|s| s.quarter.clone()),
            starting_headcount: snapshots.first().map(Snapshot::headcount).unwrap_or(0),
            final_headcount: snapshots.last().map(Snapshot::headcount).unwrap_or(0),
            peak_headcount: snapshots.iter().map(Snapshot::headcount).max().unwrap_or(0),
            final_capital: snapshots.last().map(|s| s.capital).unwrap_or(0.0),
            funded_quarters,
        }
    }
}

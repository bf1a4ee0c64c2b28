//! Growth policies — how many people a company nets each quarter.
//!
//! RULE: A policy is selected once per run and held for the run's
//! lifetime. It sees only the previous quarter's headcount, its own
//! position in the run, and the run-scoped `RunState`.
//!
//! Every policy returns a *base* delta. The funding multiplier is
//! applied on top by `compute_delta`, except for policies that react
//! to funding themselves (`PiecewiseFunding`).

use crate::{
    error::SimError,
    funding::growth_multiplier,
    rng::StreamRng,
    types::{HeadcountDelta, QuarterIndex},
};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

/// Number of quarters `PiecewiseFunding` keeps growing proportionally
/// after its first post-funding quarter.
pub const POST_FUNDING_PERIODS: u32 = 3;

/// Run-scoped flags threaded alongside each snapshot.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub just_funded: bool,
    pub post_funding_periods_remaining: u32,
}

/// Everything a policy may look at for one quarter.
#[derive(Debug, Clone, Copy)]
pub struct QuarterContext {
    /// Total headcount of the previous quarter.
    pub headcount: u64,
    pub quarter: QuarterIndex,
    pub total_quarters: usize,
    pub funded: bool,
}

impl QuarterContext {
    /// Fraction of the run elapsed at this quarter, `i / N`.
    pub fn elapsed(&self) -> f64 {
        self.quarter as f64 / self.total_quarters as f64
    }

    fn h(&self) -> i64 {
        self.headcount as i64
    }

    fn hf(&self) -> f64 {
        self.headcount as f64
    }
}

/// The contract every growth curve fulfills.
pub trait GrowthPolicy: Send + Sync {
    /// Stable tag, used in file names and logs.
    fn name(&self) -> &'static str;

    /// Net change before the funding multiplier.
    fn base_delta(
        &self,
        ctx: &QuarterContext,
        state: &mut RunState,
        rng: &mut StreamRng,
    ) -> HeadcountDelta;

    /// Policies that model their own reaction to a funding round
    /// opt out of the uniform doubling.
    fn reacts_to_funding(&self) -> bool {
        false
    }

    /// Net change for the quarter, funding multiplier included.
    fn compute_delta(
        &self,
        ctx: &QuarterContext,
        state: &mut RunState,
        rng: &mut StreamRng,
    ) -> HeadcountDelta {
        let base = self.base_delta(ctx, state, rng);
        if self.reacts_to_funding() {
            base
        } else {
            (base as f64 * growth_multiplier(ctx.funded)).round() as HeadcountDelta
        }
    }
}

/// Truncate toward zero.
fn int(x: f64) -> i64 {
    x.trunc() as i64
}

// ── Model selector ──────────────────────────────────────────────────

/// Selectable growth curve. Tags are part of the file naming scheme.
/// Variants may be appended, never reordered: the position seeds runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GrowthModel {
    Linear,
    Quadratic,
    Exponential,
    BellCurve,
    Logistic,
    Cyclic,
    StagnationGrowth,
    Decline,
    Acquisition,
    Failure,
    PiecewiseFunding,
    LinearToExponential,
    ExponentialToDecline,
}

impl GrowthModel {
    pub const ALL: [GrowthModel; 13] = [
        Self::Linear,
        Self::Quadratic,
        Self::Exponential,
        Self::BellCurve,
        Self::Logistic,
        Self::Cyclic,
        Self::StagnationGrowth,
        Self::Decline,
        Self::Acquisition,
        Self::Failure,
        Self::PiecewiseFunding,
        Self::LinearToExponential,
        Self::ExponentialToDecline,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Linear               => "linear",
            Self::Quadratic            => "quadratic",
            Self::Exponential          => "exponential",
            Self::BellCurve            => "bell_curve",
            Self::Logistic             => "logistic",
            Self::Cyclic               => "cyclic",
            Self::StagnationGrowth     => "stagnation-growth",
            Self::Decline              => "decline",
            Self::Acquisition          => "acquisition",
            Self::Failure              => "failure",
            Self::PiecewiseFunding     => "piecewise_funding",
            Self::LinearToExponential  => "linear_to_exponential",
            Self::ExponentialToDecline => "exponential_to_decline",
        }
    }

    /// Stable position in `ALL`, used to derive per-run seeds.
    pub fn ordinal(&self) -> u64 {
        *self as u64
    }

    pub fn policy(&self) -> Box<dyn GrowthPolicy> {
        match self {
            Self::Linear               => Box::new(Linear),
            Self::Quadratic            => Box::new(Quadratic),
            Self::Exponential          => Box::new(Exponential),
            Self::BellCurve            => Box::new(BellCurve),
            Self::Logistic             => Box::new(Logistic::default()),
            Self::Cyclic               => Box::new(Cyclic),
            Self::StagnationGrowth     => Box::new(StagnationGrowth),
            Self::Decline              => Box::new(Decline),
            Self::Acquisition          => Box::new(Acquisition),
            Self::Failure              => Box::new(Failure),
            Self::PiecewiseFunding     => Box::new(PiecewiseFunding),
            Self::LinearToExponential  => Box::new(LinearToExponential),
            Self::ExponentialToDecline => Box::new(ExponentialToDecline),
        }
    }
}

impl fmt::Display for GrowthModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GrowthModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.tag() == s)
            .ok_or_else(|| SimError::UnknownGrowthModel { tag: s.to_string() })
    }
}

impl TryFrom<String> for GrowthModel {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GrowthModel> for String {
    fn from(model: GrowthModel) -> Self {
        model.tag().to_string()
    }
}

// ── Curves ──────────────────────────────────────────────────────────

/// Steady, predictable hiring of 1–3 per quarter.
pub struct Linear;

impl GrowthPolicy for Linear {
    fn name(&self) -> &'static str { "linear" }

    fn base_delta(&self, _ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        rng.int_inclusive(1, 3)
    }
}

/// Hiring proportional to size: one per ten heads, plus one.
pub struct Quadratic;

impl GrowthPolicy for Quadratic {
    fn name(&self) -> &'static str { "quadratic" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, _rng: &mut StreamRng) -> i64 {
        ctx.h() / 10 + 1
    }
}

/// 10–30% growth per quarter.
pub struct Exponential;

impl GrowthPolicy for Exponential {
    fn name(&self) -> &'static str { "exponential" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        int(ctx.hf() * rng.uniform(0.1, 0.3)).max(1)
    }
}

/// Fast growth towards the run's midpoint, then a slowdown.
pub struct BellCurve;

impl GrowthPolicy for BellCurve {
    fn name(&self) -> &'static str { "bell_curve" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        let midpoint = (ctx.total_quarters / 2) as i64;
        let i = ctx.quarter as i64;
        let variance = (midpoint - (midpoint - i).abs()).max(1);
        rng.int_inclusive(1, variance)
    }
}

/// S-curve towards a carrying capacity.
pub struct Logistic {
    pub capacity: f64,
    pub rate: f64,
}

impl Default for Logistic {
    fn default() -> Self {
        Self { capacity: 100.0, rate: 0.2 }
    }
}

impl GrowthPolicy for Logistic {
    fn name(&self) -> &'static str { "logistic" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, _rng: &mut StreamRng) -> i64 {
        let h = ctx.hf();
        int(self.rate * h * (1.0 - h / self.capacity)).max(1)
    }
}

/// Seasonal hiring with a 12-quarter period.
pub struct Cyclic;

impl GrowthPolicy for Cyclic {
    fn name(&self) -> &'static str { "cyclic" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, _rng: &mut StreamRng) -> i64 {
        let base = (ctx.h() / 10).max(1) as f64;
        let phase = ctx.quarter as f64 * PI / 6.0;
        int(base + base * phase.sin())
    }
}

/// Quiet quarters punctuated by a spurt every third quarter.
pub struct StagnationGrowth;

impl GrowthPolicy for StagnationGrowth {
    fn name(&self) -> &'static str { "stagnation-growth" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        let h = ctx.h();
        if ctx.quarter % 3 != 0 {
            rng.int_inclusive(0, (h / 20).max(1))
        } else {
            rng.int_inclusive((h / 10).max(1), (h / 5).max(2))
        }
    }
}

/// Growth, then slowdown, then gradual attrition with the odd
/// recovery quarter.
pub struct Decline;

impl GrowthPolicy for Decline {
    fn name(&self) -> &'static str { "decline" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        let p = ctx.elapsed();
        if p < 0.3 {
            rng.int_inclusive(1, 3)
        } else if p < 0.5 {
            rng.int_inclusive(0, 1)
        } else {
            // At most 5% of staff per quarter.
            let decline_rate = ((p - 0.5) * 0.1).min(0.05);
            let loss = int(ctx.hf() * decline_rate).max(1);
            if rng.chance(0.2) {
                rng.int_inclusive(1, (loss / 2).max(2))
            } else {
                -loss
            }
        }
    }
}

/// Baseline hiring with a one-off acquisition spike at the midpoint.
pub struct Acquisition;

impl GrowthPolicy for Acquisition {
    fn name(&self) -> &'static str { "acquisition" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        let h = ctx.h();
        let mut hires = rng.int_inclusive(1, (h / 15).max(2));
        let distance = (ctx.elapsed() - 0.5).abs();
        if distance < 0.05 {
            let acquired = rng.int_inclusive(10, h.max(20));
            log::info!("acquisition event: +{acquired} employees at quarter {}", ctx.quarter);
            hires += acquired;
        } else if distance < 0.1 {
            hires += rng.int_inclusive(3, 8);
        }
        hires
    }
}

/// Flat headcount: the company never hires or loses anyone.
pub struct Failure;

impl GrowthPolicy for Failure {
    fn name(&self) -> &'static str { "failure" }

    fn base_delta(&self, _ctx: &QuarterContext, _state: &mut RunState, _rng: &mut StreamRng) -> i64 {
        0
    }
}

/// Linear hiring that turns proportional for a few quarters after
/// each funding round.
pub struct PiecewiseFunding;

impl GrowthPolicy for PiecewiseFunding {
    fn name(&self) -> &'static str { "piecewise_funding" }

    fn reacts_to_funding(&self) -> bool {
        true
    }

    fn base_delta(&self, ctx: &QuarterContext, state: &mut RunState, rng: &mut StreamRng) -> i64 {
        if ctx.funded {
            state.just_funded = true;
            rng.int_inclusive(3, 6)
        } else if state.just_funded {
            state.just_funded = false;
            state.post_funding_periods_remaining = POST_FUNDING_PERIODS;
            int(ctx.hf() * rng.uniform(0.15, 0.3)).max(2)
        } else if state.post_funding_periods_remaining > 0 {
            state.post_funding_periods_remaining -= 1;
            int(ctx.hf() * rng.uniform(0.1, 0.2)).max(2)
        } else {
            rng.int_inclusive(1, 3)
        }
    }
}

/// Linear until product-market fit at 40% of the run, then
/// proportional growth that accelerates with time.
pub struct LinearToExponential;

impl GrowthPolicy for LinearToExponential {
    fn name(&self) -> &'static str { "linear_to_exponential" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        const TRANSITION: f64 = 0.4;
        let p = ctx.elapsed();
        if p < TRANSITION {
            rng.int_inclusive(1, 3)
        } else {
            let rate = (0.1 + (p - TRANSITION)).min(0.3);
            int(ctx.hf() * rate).max(2)
        }
    }
}

/// Hot growth to the midpoint, a plateau, then accelerating attrition.
pub struct ExponentialToDecline;

impl GrowthPolicy for ExponentialToDecline {
    fn name(&self) -> &'static str { "exponential_to_decline" }

    fn base_delta(&self, ctx: &QuarterContext, _state: &mut RunState, rng: &mut StreamRng) -> i64 {
        const PEAK: f64 = 0.5;
        const DECLINE: f64 = 0.7;
        let p = ctx.elapsed();
        let h = ctx.hf();
        if p < PEAK {
            int(h * (0.2 + p * 0.4)).max(2)
        } else if p < DECLINE {
            rng.int_inclusive(1, int(h * 0.05).max(2))
        } else {
            let decline_rate = (0.03 + (p - DECLINE) * 0.2).min(0.1);
            let loss = int(h * decline_rate).max(1);
            if rng.chance(0.3) {
                0
            } else {
                -loss
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    fn ctx(headcount: u64, quarter: usize, total_quarters: usize, funded: bool) -> QuarterContext {
        QuarterContext { headcount, quarter, total_quarters, funded }
    }

    #[test]
    fn tags_round_trip_through_from_str() {
        for model in GrowthModel::ALL {
            assert_eq!(model.tag().parse::<GrowthModel>().unwrap(), model);
            assert_eq!(model.policy().name(), model.tag());
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "hockey_stick".parse::<GrowthModel>().unwrap_err();
        assert!(matches!(err, SimError::UnknownGrowthModel { ref tag } if tag == "hockey_stick"));
    }

    #[test]
    fn quadratic_doubles_on_funding_quarter() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();
        assert_eq!(Quadratic.compute_delta(&ctx(25, 5, 12, false), &mut state, &mut rng), 3);
        assert_eq!(Quadratic.compute_delta(&ctx(25, 5, 12, true), &mut state, &mut rng), 6);
    }

    #[test]
    fn failure_is_flat_even_when_funded() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();
        assert_eq!(Failure.compute_delta(&ctx(40, 6, 12, true), &mut state, &mut rng), 0);
    }

    #[test]
    fn logistic_floors_at_one_past_capacity() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();
        assert_eq!(Logistic::default().compute_delta(&ctx(150, 3, 12, false), &mut state, &mut rng), 1);
        assert_eq!(Logistic::default().compute_delta(&ctx(50, 3, 12, false), &mut state, &mut rng), 5);
    }

    #[test]
    fn cyclic_follows_sine_of_quarter() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();
        // sin(3π/6) = 1 → 2 × base; sin(9π/6) = -1 → 0.
        assert_eq!(Cyclic.compute_delta(&ctx(50, 3, 12, false), &mut state, &mut rng), 10);
        assert_eq!(Cyclic.compute_delta(&ctx(50, 9, 12, false), &mut state, &mut rng), 0);
    }

    #[test]
    fn piecewise_funding_walks_its_state_machine() {
        let policy = PiecewiseFunding;
        let mut rng = RngBank::new(5).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();

        let funded = policy.compute_delta(&ctx(100, 4, 12, true), &mut state, &mut rng);
        assert!((3..=6).contains(&funded), "funding batch not doubled: {funded}");
        assert!(state.just_funded);

        let burst = policy.compute_delta(&ctx(100, 5, 12, false), &mut state, &mut rng);
        assert!((15..=30).contains(&burst), "first post-funding quarter: {burst}");
        assert!(!state.just_funded);
        assert_eq!(state.post_funding_periods_remaining, POST_FUNDING_PERIODS);

        for remaining in (0..POST_FUNDING_PERIODS).rev() {
            let d = policy.compute_delta(&ctx(100, 6, 12, false), &mut state, &mut rng);
            assert!((10..=20).contains(&d), "armed quarter: {d}");
            assert_eq!(state.post_funding_periods_remaining, remaining);
        }

        let linear = policy.compute_delta(&ctx(100, 10, 12, false), &mut state, &mut rng);
        assert!((1..=3).contains(&linear));
    }

    #[test]
    fn decline_late_quarters_lose_staff_or_recover_modestly() {
        let mut state = RunState::default();
        let mut negatives = 0;
        for seed in 0..500 {
            let mut rng = RngBank::new(seed).for_stream(StreamSlot::Growth);
            let d = Decline.compute_delta(&ctx(60, 18, 20, false), &mut state, &mut rng);
            if d <= 0 {
                negatives += 1;
                // 60 × min(0.05, 0.04) = 2.4 → 2 lost.
                assert_eq!(d, -2);
            } else {
                assert!(d <= 2, "recovery quarter too large: {d}");
            }
        }
        assert!(negatives > 300, "expected mostly losses, got {negatives}/500");
    }

    #[test]
    fn exponential_to_decline_phases() {
        let mut rng = RngBank::new(9).for_stream(StreamSlot::Growth);
        let mut state = RunState::default();
        // p = 0.25 → rate 0.3.
        assert_eq!(ExponentialToDecline.compute_delta(&ctx(100, 5, 20, false), &mut state, &mut rng), 30);
        for _ in 0..100 {
            let d = ExponentialToDecline.compute_delta(&ctx(100, 18, 20, false), &mut state, &mut rng);
            // p = 0.9 → rate min(0.1, 0.07) = 0.07.
            assert!(d == 0 || d == -7, "unexpected late delta {d}");
        }
    }

    #[test]
    fn acquisition_spikes_only_near_midpoint() {
        let mut state = RunState::default();
        for seed in 0..50 {
            let mut rng = RngBank::new(seed).for_stream(StreamSlot::Growth);
            let spike = Acquisition.compute_delta(&ctx(30, 10, 20, false), &mut state, &mut rng);
            assert!(spike >= 11, "midpoint quarter should include the acquisition: {spike}");
            let calm = Acquisition.compute_delta(&ctx(30, 2, 20, false), &mut state, &mut rng);
            assert!((1..=2).contains(&calm), "baseline quarter: {calm}");
        }
    }
}

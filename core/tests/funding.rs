//! Funding schedule tests.

use saas_growth_core::{
    funding::{growth_multiplier, FundingSchedule, FIRST_FUNDING_QUARTER, FUNDED_GROWTH_MULTIPLIER},
    rng::{RngBank, StreamSlot},
};

fn schedule(total_quarters: usize, seed: u64) -> FundingSchedule {
    let mut rng = RngBank::new(seed).for_stream(StreamSlot::Funding);
    FundingSchedule::build(total_quarters, &mut rng)
}

#[test]
fn short_runs_get_no_rounds() {
    for n in 0..5 {
        assert!(schedule(n, 1).is_empty(), "N={n} should have an empty schedule");
    }
}

#[test]
fn round_count_follows_run_length() {
    assert_eq!(schedule(5, 1).len(), 1);
    assert_eq!(schedule(12, 1).len(), 2);
    assert_eq!(schedule(19, 1).len(), 3);
    assert_eq!(schedule(40, 1).len(), 4);
}

#[test]
fn rounds_are_sorted_distinct_and_in_window() {
    for seed in 0..200 {
        for n in [5usize, 8, 12, 20, 33] {
            let s = schedule(n, seed);
            let quarters: Vec<usize> = s.quarters().collect();
            assert!(quarters.windows(2).all(|w| w[0] < w[1]), "not strictly ascending: {quarters:?}");
            for &q in &quarters {
                assert!(q >= FIRST_FUNDING_QUARTER, "round at {q} before quarter 4");
                assert!(q < n.min(20), "round at {q} outside window for N={n}");
            }
        }
    }
}

#[test]
fn round_sizes_scale_with_timing() {
    for seed in 0..100 {
        let n = 12;
        for round in schedule(n, seed).rounds() {
            let scale = 1.0 + round.quarter as f64 / n as f64;
            assert!(round.amount >= (2.0 * scale * 100.0).floor() / 100.0);
            assert!(round.amount <= (5.0 * scale * 100.0).ceil() / 100.0);
            assert_eq!((round.amount * 100.0).round() / 100.0, round.amount, "not rounded to cents");
        }
    }
}

#[test]
fn growth_multiplier_doubles_only_on_rounds() {
    let s = schedule(20, 3);
    for q in 0..20 {
        let expected = if s.contains(q) { FUNDED_GROWTH_MULTIPLIER } else { 1.0 };
        assert_eq!(growth_multiplier(s.contains(q)), expected);
    }
}

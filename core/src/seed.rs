//! Initial conditions for an early-stage B2B SaaS company.
//!
//! A small founding team, almost entirely in the USA, concentrated
//! in engineering and sales, with a seed round of $0.5M–$3M.

use crate::{
    clock::QuarterCalendar,
    rng::StreamRng,
    snapshot::Snapshot,
    types::{round2, zeroed, COUNTRIES, OCCUPATIONS},
};

pub const MIN_FOUNDING_TEAM: i64 = 3;
pub const MAX_FOUNDING_TEAM: i64 = 8;
pub const USA_PLACEMENT_PROBABILITY: f64 = 0.9;

/// Draw a seed snapshot for quarter index 0.
pub fn generate_seed_snapshot(rng: &mut StreamRng, calendar: &QuarterCalendar) -> Snapshot {
    let mut countries = zeroed(&COUNTRIES);
    let mut occupations = zeroed(&OCCUPATIONS);

    let team = rng.int_inclusive(MIN_FOUNDING_TEAM, MAX_FOUNDING_TEAM);
    for _ in 0..team {
        let country = if rng.chance(USA_PLACEMENT_PROBABILITY) { "USA" } else { "India" };
        *countries.entry(country.to_string()).or_default() += 1;

        let roll = rng.next_f64();
        let role = if roll < 0.6 {
            "Software Engineering"
        } else if roll < 0.9 {
            "Sales"
        } else {
            "Administration"
        };
        *occupations.entry(role.to_string()).or_default() += 1;
    }

    let capital = round2(rng.uniform(0.5, 3.0));
    Snapshot::new(calendar.label(0), countries, occupations, capital)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn seed_snapshots_are_valid_and_bounded() {
        let cal = QuarterCalendar::default();
        for seed in 0..200 {
            let mut rng = RngBank::new(seed).for_stream(StreamSlot::Seed);
            let snap = generate_seed_snapshot(&mut rng, &cal);
            snap.validate(0).unwrap();
            let team = snap.headcount() as i64;
            assert!((MIN_FOUNDING_TEAM..=MAX_FOUNDING_TEAM).contains(&team));
            assert!((0.5..=3.0).contains(&snap.capital), "capital {}", snap.capital);
            assert_eq!(snap.quarter, "Q1-2022");
            assert_eq!(snap.countries.len(), COUNTRIES.len());
            assert_eq!(snap.occupations.len(), OCCUPATIONS.len());
            assert_eq!(snap.countries["UK"], 0);
            assert_eq!(snap.occupations["Legal"], 0);
        }
    }
}

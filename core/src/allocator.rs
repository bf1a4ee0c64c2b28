//! Distribution allocator — turns a signed headcount delta into
//! concrete per-country and per-role changes.
//!
//! RULE: On return, the country total equals the occupation total.
//! Clamping at zero may absorb part of a negative delta; that loss is
//! accepted and never corrected.

use crate::{
    error::SimResult,
    rng::StreamRng,
    sampler::WeightedTable,
    types::{total, Headcount, HeadcountDelta},
};
use std::collections::BTreeMap;

/// Hiring weight for a country. Unknown countries get 0.05.
pub fn country_weight(country: &str) -> f64 {
    match country {
        "USA"    => 0.8,
        "India"  => 0.1,
        "UK"     => 0.05,
        "France" => 0.03,
        "Brazil" => 0.02,
        _        => 0.05,
    }
}

/// Hiring weight for a role, given how many roles the run tracks.
/// The roles outside the core four share 0.15 evenly.
pub fn occupation_weight(role: &str, role_count: usize) -> f64 {
    match role {
        "Software Engineering" => 0.4,
        "Sales" => 0.3,
        "Customer Success" | "Product Management" => 0.15,
        _ if role_count > 4 => 0.15 / (role_count - 4) as f64,
        _ => 0.15,
    }
}

#[derive(Debug, Clone)]
pub struct DistributionAllocator {
    countries: WeightedTable,
    occupations: WeightedTable,
}

impl DistributionAllocator {
    /// Build the weight tables for a run's fixed key sets.
    pub fn for_keys(countries: &Headcount, occupations: &Headcount) -> SimResult<Self> {
        let country_entries = countries
            .keys()
            .map(|k| (k.clone(), country_weight(k)))
            .collect();
        let role_count = occupations.len();
        let occupation_entries = occupations
            .keys()
            .map(|k| (k.clone(), occupation_weight(k, role_count)))
            .collect();
        Ok(Self {
            countries: WeightedTable::new("countries", country_entries)?,
            occupations: WeightedTable::new("occupations", occupation_entries)?,
        })
    }

    pub fn country_table(&self) -> &WeightedTable {
        &self.countries
    }

    pub fn occupation_table(&self) -> &WeightedTable {
        &self.occupations
    }

    /// Spread `delta` over both dimensions and reconcile the totals.
    pub fn apply_delta(
        &self,
        countries: &Headcount,
        occupations: &Headcount,
        delta: HeadcountDelta,
        rng: &mut StreamRng,
    ) -> (Headcount, Headcount) {
        if delta == 0 {
            return (countries.clone(), occupations.clone());
        }

        let step: i64 = if delta > 0 { 1 } else { -1 };
        let mut country_changes: BTreeMap<&str, i64> = BTreeMap::new();
        let mut occupation_changes: BTreeMap<&str, i64> = BTreeMap::new();

        for _ in 0..delta.unsigned_abs() {
            *country_changes.entry(self.countries.pick(rng)).or_default() += step;
            *occupation_changes.entry(self.occupations.pick(rng)).or_default() += step;
        }

        let mut new_countries = apply_clamped(countries, &country_changes);
        let mut new_occupations = apply_clamped(occupations, &occupation_changes);

        let requested = delta.unsigned_abs();
        let realized = total(countries).abs_diff(total(&new_countries));
        if realized != requested {
            log::debug!("clamp absorbed part of delta {delta}: countries moved by {realized}");
        }

        self.reconcile(&mut new_countries, &mut new_occupations, rng);
        (new_countries, new_occupations)
    }

    /// Top up the smaller side until both totals match.
    fn reconcile(&self, countries: &mut Headcount, occupations: &mut Headcount, rng: &mut StreamRng) {
        let by_country = total(countries);
        let by_role = total(occupations);
        let (short_side, table, missing) = if by_country > by_role {
            (occupations, &self.occupations, by_country - by_role)
        } else {
            (countries, &self.countries, by_role - by_country)
        };
        for _ in 0..missing {
            *short_side.entry(table.pick(rng).to_string()).or_default() += 1;
        }
    }
}

fn apply_clamped(previous: &Headcount, changes: &BTreeMap<&str, i64>) -> Headcount {
    previous
        .iter()
        .map(|(key, &count)| {
            let change = changes.get(key.as_str()).copied().unwrap_or(0);
            let value = (count as i64 + change).max(0) as u32;
            (key.clone(), value)
        })
        .collect()
}

//! Shared primitive types used across the entire simulation.

use std::collections::BTreeMap;

/// Position of a snapshot within its trajectory. Index 0 is the seed.
pub type QuarterIndex = usize;

/// Headcount keyed by country or role name.
pub type Headcount = BTreeMap<String, u32>;

/// Signed net change in headcount for one quarter.
pub type HeadcountDelta = i64;

/// Fixed country key set for every run.
pub const COUNTRIES: [&str; 5] = ["USA", "UK", "India", "Brazil", "France"];

/// Fixed role key set for every run.
pub const OCCUPATIONS: [&str; 7] = [
    "Software Engineering",
    "Sales",
    "Administration",
    "Product Management",
    "Customer Success",
    "Finance",
    "Legal",
];

/// A headcount map with every key present at zero.
pub fn zeroed(keys: &[&str]) -> Headcount {
    keys.iter().map(|k| (k.to_string(), 0)).collect()
}

/// Sum of all values in a headcount map.
pub fn total(map: &Headcount) -> u64 {
    map.values().map(|&v| v as u64).sum()
}

/// Round to two decimal places (capital amounts, in millions).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

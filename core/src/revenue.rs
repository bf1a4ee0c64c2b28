//! Revenue estimator — derives an illustrative revenue range from a
//! snapshot's headcount mix.
//!
//! This is REACTIVE. It reads simulator output and never feeds back
//! into the trajectory; the only write is appending the derived
//! fields to a snapshot.

use crate::{snapshot::Snapshot, types::total};
use serde::{Deserialize, Serialize};

/// Salary multiplier for countries not in the table.
pub const DEFAULT_COUNTRY_MULTIPLIER: f64 = 0.70;
pub const DEFAULT_ROLE: RoleEconomics = RoleEconomics {
    base_salary: 90_000.0,
    min_multiplier: 1.5,
    max_multiplier: 2.5,
};

/// Salary relative to the USA.
pub fn country_multiplier(country: &str) -> f64 {
    match country {
        "USA"    => 1.0,
        "UK"     => 0.85,
        "India"  => 0.30,
        "France" => 0.78,
        "Brazil" => 0.38,
        _        => DEFAULT_COUNTRY_MULTIPLIER,
    }
}

/// US base salary and revenue generated per $1 of salary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleEconomics {
    pub base_salary: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

pub fn role_economics(role: &str) -> RoleEconomics {
    let (base_salary, min_multiplier, max_multiplier) = match role {
        "Sales"                => (110_000.0, 2.5, 4.0),
        "Software Engineering" => (130_000.0, 2.0, 3.5),
        "Product Management"   => (125_000.0, 2.0, 3.0),
        "Customer Success"     => (85_000.0, 2.0, 3.0),
        "Administration"       => (65_000.0, 1.0, 2.0),
        "Finance"              => (95_000.0, 1.5, 2.5),
        "Legal"                => (120_000.0, 1.0, 2.0),
        _ => return DEFAULT_ROLE,
    };
    RoleEconomics { base_salary, min_multiplier, max_multiplier }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevenueEstimate {
    pub revenue: i64,
    pub revenue_min: i64,
    pub revenue_max: i64,
    pub revenue_per_employee: i64,
    pub capital_to_revenue_ratio: f64,
}

/// Round to the nearest thousand, ties to even.
fn nearest_thousand(value: f64) -> i64 {
    (value / 1000.0).round_ties_even() as i64 * 1000
}

/// Estimate revenue for one snapshot. Pure: only `countries`,
/// `occupations` and `capital` are read.
pub fn estimate(snapshot: &Snapshot) -> RevenueEstimate {
    let employees = total(&snapshot.countries);
    let role_total = total(&snapshot.occupations);
    let capital_dollars = snapshot.capital * 1_000_000.0;

    let mut revenue_min = 0.0;
    let mut revenue_max = 0.0;
    if employees > 0 && role_total > 0 {
        for (country, &country_count) in &snapshot.countries {
            let factor = country_multiplier(country);
            for (role, &role_count) in &snapshot.occupations {
                let share = role_count as f64 / role_total as f64;
                let econ = role_economics(role);
                let salary_cost = econ.base_salary * factor * country_count as f64 * share;
                revenue_min += salary_cost * econ.min_multiplier;
                revenue_max += salary_cost * econ.max_multiplier;
            }
        }
    }

    let revenue = nearest_thousand((revenue_min + revenue_max) / 2.0);
    let revenue_per_employee = if employees > 0 {
        (revenue as f64 / employees as f64).round_ties_even() as i64
    } else {
        0
    };
    let capital_to_revenue_ratio = if revenue > 0 {
        capital_dollars / revenue as f64
    } else {
        0.0
    };

    RevenueEstimate {
        revenue,
        revenue_min: nearest_thousand(revenue_min),
        revenue_max: nearest_thousand(revenue_max),
        revenue_per_employee,
        capital_to_revenue_ratio,
    }
}

/// Append revenue fields to every snapshot, replacing any stale ones.
pub fn annotate(snapshots: &mut [Snapshot]) {
    for snap in snapshots {
        snap.revenue = Some(estimate(snap));
    }
}

//! Quarterly headcount-growth simulator for a hypothetical B2B SaaS
//! company, plus the revenue estimate derived from its headcount mix.

pub mod allocator;
pub mod batch;
pub mod clock;
pub mod config;
pub mod error;
pub mod funding;
pub mod growth;
pub mod pool;
pub mod revenue;
pub mod rng;
pub mod sampler;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod trajectory;
pub mod types;

pub use error::{SimError, SimResult};
pub use growth::{GrowthModel, GrowthPolicy, RunState};
pub use snapshot::Snapshot;
pub use trajectory::{Trajectory, TrajectoryBuilder, TrajectorySummary};

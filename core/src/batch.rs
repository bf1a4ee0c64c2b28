//! Batch generation — many independent companies in one go.
//!
//! Each (model, replicate) pair is one run with its own RngBank
//! derived from the batch seed, so the output does not depend on how
//! runs are scheduled across worker threads.

use crate::{
    clock::QuarterCalendar,
    config::BatchConfig,
    error::SimResult,
    growth::GrowthModel,
    pool::WorkerPool,
    rng::{RngBank, StreamSlot},
    seed::generate_seed_snapshot,
    store::TrajectoryStore,
    trajectory::{Trajectory, TrajectoryBuilder},
};
use rayon::prelude::*;
use std::path::PathBuf;

/// One run of a batch. `replicate` counts from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpec {
    pub model: GrowthModel,
    pub replicate: usize,
}

impl RunSpec {
    pub fn rng_bank(&self, master: &RngBank) -> RngBank {
        master.for_run(self.model.ordinal(), self.replicate as u64)
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub trajectories: Vec<Trajectory>,
}

/// Expand a config into its runs, model-major, in a stable order.
pub fn plan_runs(config: &BatchConfig) -> Vec<RunSpec> {
    config
        .models
        .iter()
        .flat_map(|&model| (1..=config.replicates).map(move |replicate| RunSpec { model, replicate }))
        .collect()
}

/// Simulate one run from its own seed snapshot.
pub fn simulate_run(config: &BatchConfig, spec: RunSpec) -> SimResult<Trajectory> {
    let bank = spec.rng_bank(&RngBank::new(config.seed));
    let calendar = QuarterCalendar::new(config.start_year);
    let mut seed_rng = bank.for_stream(StreamSlot::Seed);
    let seed = generate_seed_snapshot(&mut seed_rng, &calendar);

    let trajectory = TrajectoryBuilder::new(spec.model.policy(), config.quarters, bank)?
        .with_calendar(calendar)
        .with_replicate(spec.replicate)
        .build(seed)?;

    Ok(if config.with_revenue {
        trajectory.with_revenue()
    } else {
        trajectory
    })
}

/// Simulate every run in parallel. Results come back in plan order.
pub fn generate_trajectories(config: &BatchConfig) -> SimResult<Vec<Trajectory>> {
    config.validate()?;
    let runs = plan_runs(config);
    log::info!(
        "simulating {} runs ({} models × {} replicates, {} quarters)",
        runs.len(),
        config.models.len(),
        config.replicates,
        config.quarters
    );
    WorkerPool::with_workers(config.workers).install(|| {
        runs.par_iter()
            .map(|&spec| simulate_run(config, spec))
            .collect::<SimResult<Vec<_>>>()
    })?
}

/// Simulate and persist a whole batch. A file that fails to write is
/// logged and recorded; the remaining files are still written.
pub fn run_batch(config: &BatchConfig, store: &TrajectoryStore) -> SimResult<BatchReport> {
    let trajectories = generate_trajectories(config)?;

    let mut report = BatchReport::default();
    for trajectory in &trajectories {
        let path = store.path_for(trajectory.model, trajectory.replicate);
        match store.save(trajectory.model, trajectory.replicate, trajectory.snapshots()) {
            Ok(path) => {
                log::info!("wrote {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                log::error!("failed to write {}: {e}", path.display());
                report.failed.push((path, e.to_string()));
            }
        }
    }
    report.trajectories = trajectories;
    Ok(report)
}

use crate::{
    clock::DEFAULT_START_YEAR,
    error::{SimError, SimResult},
    growth::GrowthModel,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_QUARTERS: usize = 12;
pub const DEFAULT_REPLICATES: usize = 3;
pub const DEFAULT_SEED: u64 = 42;

/// Everything a batch of simulated companies needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub models: Vec<GrowthModel>,
    /// Runs per model.
    pub replicates: usize,
    /// Trajectory length, seed quarter included.
    pub quarters: usize,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub start_year: i32,
    /// Worker threads; 0 uses every core.
    pub workers: usize,
    /// Append revenue fields before writing.
    pub with_revenue: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            models: vec![GrowthModel::Linear],
            replicates: DEFAULT_REPLICATES,
            quarters: DEFAULT_QUARTERS,
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from("."),
            start_year: DEFAULT_START_YEAR,
            workers: 0,
            with_revenue: false,
        }
    }
}

impl BatchConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, build the struct directly.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: BatchConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Every model, in tag order.
    pub fn all_models() -> Self {
        Self {
            models: GrowthModel::ALL.to_vec(),
            ..Self::default()
        }
    }

    /// Reject configurations that cannot produce a trajectory.
    /// Called before any simulation work begins.
    pub fn validate(&self) -> SimResult<()> {
        if self.quarters < 1 {
            return Err(SimError::InvalidRunLength { quarters: self.quarters });
        }
        if self.models.is_empty() {
            return Err(SimError::InvalidConfig {
                reason: "no growth models selected".into(),
            });
        }
        if self.replicates < 1 {
            return Err(SimError::InvalidConfig {
                reason: "replicates must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Number of runs the batch will produce.
    pub fn run_count(&self) -> usize {
        self.models.len() * self.replicates
    }
}

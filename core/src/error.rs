use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown growth model '{tag}'")]
    UnknownGrowthModel { tag: String },

    #[error("Invalid run length: {quarters} (must be at least 1)")]
    InvalidRunLength { quarters: usize },

    #[error("Invalid batch configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Weighted sampling over '{table}' has zero total weight")]
    ZeroWeight { table: &'static str },

    #[error("Invariant violated at quarter {quarter}: {detail}")]
    InvariantViolation { quarter: usize, detail: String },

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;

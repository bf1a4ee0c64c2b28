//! Rayon thread pool configuration for batch runs.
//!
//! Runs share nothing, so the pool only decides how many run at once.

use crate::error::SimResult;
use rayon::ThreadPoolBuilder;

/// Configures how many worker threads simulate runs in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` on a pool of this size. With 0 workers the global Rayon
    /// pool is used; otherwise a temporary pool is built.
    pub fn install<F, R>(&self, f: F) -> SimResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            Ok(f())
        } else {
            let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
            Ok(pool.install(f))
        }
    }
}

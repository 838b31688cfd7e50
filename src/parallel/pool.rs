use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;

use super::ParallelConfig;
use crate::error_handling::EngineError;

/// A private rayon pool; parallel iterators used inside `install` run on it
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(config: &ParallelConfig) -> Result<Self, EngineError> {
        let workers = config.effective_workers();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("logbatch-worker-{}", index))
            .build()?;
        tracing::debug!(workers, "worker pool created");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` with this pool as the current rayon pool
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_runs_on_requested_thread_count() {
        let pool = WorkerPool::new(&ParallelConfig::with_workers(2)).unwrap();
        assert_eq!(pool.workers(), 2);
        let threads = pool.install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }
}

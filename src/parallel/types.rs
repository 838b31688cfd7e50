//! Type definitions for parallel processing

/// Configuration for parallel processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of worker threads; 0 means one per CPU
    pub num_workers: usize,
}

impl ParallelConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self { num_workers }
    }

    pub fn sequential() -> Self {
        Self::with_workers(1)
    }

    /// Worker count after resolving the "auto" setting
    pub fn effective_workers(&self) -> usize {
        if self.num_workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.num_workers
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { num_workers: 0 }
    }
}

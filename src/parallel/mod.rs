//! Parallel execution context for the engine
//!
//! Every engine owns its own worker pool instead of configuring a process-wide
//! one, so callers (and tests) can pin the degree of parallelism per engine.
//!
//! # Module Structure
//!
//! - `types`: Worker-count configuration
//! - `pool`: The rayon-backed worker pool operations run inside

mod pool;
mod types;

pub use pool::WorkerPool;
pub use types::ParallelConfig;

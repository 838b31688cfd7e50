// Core library for logbatch: parallel parsing, validation, statistics and
// filtering over finite batches of JSON log lines.

pub mod engine;
pub mod entry;
pub mod error_handling;
pub mod filter;
pub mod parallel;
pub mod parsers;
pub mod stats;

pub use engine::{BatchReport, Engine};
pub use entry::{Level, LogEntry};
pub use error_handling::{EngineError, ErrorKind, ErrorSummary, FailureKind, ValidationError};
pub use filter::FilterCriteria;
pub use parallel::ParallelConfig;
pub use parsers::{JsonlParser, ParseOutcome, RecordParser};
pub use stats::LogStats;

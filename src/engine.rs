use serde::Serialize;
use tracing::{debug, warn};

use crate::entry::LogEntry;
use crate::error_handling::{EngineError, ValidationError};
use crate::filter::{filter_entries, FilterCriteria};
use crate::parallel::{ParallelConfig, WorkerPool};
use crate::parsers::{parse_batch, JsonlParser, ParseOutcome, RecordParser};
use crate::stats::{compute_stats, LogStats};

/// Everything one `analyze` call produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Stats over all valid entries, not only the matches
    pub stats: LogStats,
    pub matches: Vec<LogEntry>,
    pub errors: Vec<ValidationError>,
}

/// Runs parse, validation, aggregation and filtering on its own worker pool.
///
/// Calls share nothing but the pool: every call allocates its own output, and
/// the worker count never changes a result.
#[derive(Debug)]
pub struct Engine<P = JsonlParser> {
    pool: WorkerPool,
    parser: P,
}

impl Engine<JsonlParser> {
    pub fn new(config: ParallelConfig) -> Result<Self, EngineError> {
        Self::with_parser(config, JsonlParser::new())
    }

    pub fn with_workers(num_workers: usize) -> Result<Self, EngineError> {
        Self::new(ParallelConfig::with_workers(num_workers))
    }

    pub fn sequential() -> Result<Self, EngineError> {
        Self::new(ParallelConfig::sequential())
    }
}

impl<P: RecordParser> Engine<P> {
    pub fn with_parser(config: ParallelConfig, parser: P) -> Result<Self, EngineError> {
        Ok(Self {
            pool: WorkerPool::new(&config)?,
            parser,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Partition `lines` into entries and per-line errors. Empty input is not an error.
    pub fn parse<S: AsRef<str> + Sync>(&self, lines: &[S]) -> ParseOutcome {
        let outcome = self.pool.install(|| parse_batch(&self.parser, lines));
        debug!(
            lines = lines.len(),
            valid = outcome.entries.len(),
            rejected = outcome.errors.len(),
            "parsed batch"
        );
        outcome
    }

    /// Count of valid lines plus one message per rejected line
    pub fn validate<S: AsRef<str> + Sync>(&self, lines: &[S]) -> (usize, Vec<String>) {
        let outcome = self.parse(lines);
        let messages = outcome.errors.iter().map(ToString::to_string).collect();
        (outcome.entries.len(), messages)
    }

    pub fn compute_stats(&self, entries: &[LogEntry]) -> Result<LogStats, EngineError> {
        let stats = self.pool.install(|| compute_stats(entries))?;
        debug!(
            total = stats.total_count,
            errors = stats.error_count,
            "computed stats"
        );
        Ok(stats)
    }

    /// Parse then aggregate; the failure carries the rejected lines when nothing parsed
    pub fn compute_stats_from_lines<S: AsRef<str> + Sync>(
        &self,
        lines: &[S],
    ) -> Result<LogStats, EngineError> {
        self.batch_process(lines).map(|(stats, _)| stats)
    }

    pub fn filter(&self, entries: &[LogEntry], criteria: &FilterCriteria) -> Vec<LogEntry> {
        let matches = self.pool.install(|| filter_entries(entries, criteria));
        debug!(entries = entries.len(), matched = matches.len(), "filtered entries");
        matches
    }

    /// Parse then filter; rejected lines are dropped
    pub fn filter_lines<S: AsRef<str> + Sync>(
        &self,
        lines: &[S],
        criteria: &FilterCriteria,
    ) -> Vec<LogEntry> {
        let outcome = self.parse(lines);
        self.filter(&outcome.entries, criteria)
    }

    /// One parse, one aggregation. With no valid entries the failure carries
    /// every per-line error.
    pub fn batch_process<S: AsRef<str> + Sync>(
        &self,
        lines: &[S],
    ) -> Result<(LogStats, Vec<ValidationError>), EngineError> {
        let (entries, errors) = self.parse(lines).into_parts();
        self.aggregate(&entries, errors)
    }

    /// One parse feeding both the aggregation and the filter
    pub fn analyze<S: AsRef<str> + Sync>(
        &self,
        lines: &[S],
        criteria: &FilterCriteria,
    ) -> Result<BatchReport, EngineError> {
        let (entries, errors) = self.parse(lines).into_parts();
        let (stats, errors) = self.aggregate(&entries, errors)?;
        let matches = self.filter(&entries, criteria);
        Ok(BatchReport {
            stats,
            matches,
            errors,
        })
    }

    fn aggregate(
        &self,
        entries: &[LogEntry],
        errors: Vec<ValidationError>,
    ) -> Result<(LogStats, Vec<ValidationError>), EngineError> {
        match self.compute_stats(entries) {
            Ok(stats) => Ok((stats, errors)),
            Err(EngineError::EmptyInput { .. }) => {
                warn!(rejected = errors.len(), "batch has no valid entries");
                Err(EngineError::EmptyInput { errors })
            }
            Err(other) => Err(other),
        }
    }
}

pub mod jsonl;

pub use jsonl::JsonlParser;

use rayon::prelude::*;

use crate::entry::LogEntry;
use crate::error_handling::{ErrorKind, ValidationError};

/// Turns one raw line into a record, or says why it cannot
pub trait RecordParser: Send + Sync {
    fn parse_record(&self, line: &str) -> Result<LogEntry, ErrorKind>;
}

/// Successes and failures of one parse call, each in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub entries: Vec<LogEntry>,
    pub errors: Vec<ValidationError>,
}

impl ParseOutcome {
    fn push(mut self, line_index: usize, result: Result<LogEntry, ErrorKind>) -> Self {
        match result {
            Ok(entry) => self.entries.push(entry),
            Err(kind) => self.errors.push(ValidationError::new(line_index, kind)),
        }
        self
    }

    // Associative but not commutative: `self` must hold the earlier lines
    fn merge(mut self, mut later: Self) -> Self {
        self.entries.append(&mut later.entries);
        self.errors.append(&mut later.errors);
        self
    }

    pub fn total_lines(&self) -> usize {
        self.entries.len() + self.errors.len()
    }

    pub fn valid_count(&self) -> usize {
        self.entries.len()
    }

    pub fn into_parts(self) -> (Vec<LogEntry>, Vec<ValidationError>) {
        (self.entries, self.errors)
    }
}

/// Parse every line independently on the current rayon pool.
///
/// Each contiguous run of lines is folded into its own outcome and the runs are
/// merged left to right, so both partitions keep input order for any number of
/// workers.
pub fn parse_batch<P, S>(parser: &P, lines: &[S]) -> ParseOutcome
where
    P: RecordParser + ?Sized,
    S: AsRef<str> + Sync,
{
    lines
        .par_iter()
        .enumerate()
        .fold(ParseOutcome::default, |outcome, (index, line)| {
            outcome.push(index, parser.parse_record(line.as_ref()))
        })
        .reduce(ParseOutcome::default, ParseOutcome::merge)
}

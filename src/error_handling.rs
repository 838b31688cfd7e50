use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Why a single line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The line is not a JSON object with usable field types
    MalformedRecord,
    MissingLevel,
    InvalidDuration,
    MissingTimestamp,
}

impl ErrorKind {
    pub fn reason(self) -> &'static str {
        match self {
            ErrorKind::MalformedRecord => "malformed record",
            ErrorKind::MissingLevel => "missing or empty level",
            ErrorKind::InvalidDuration => "invalid duration",
            ErrorKind::MissingTimestamp => "missing timestamp",
        }
    }

    /// Structural failures happen before any field rule runs
    pub fn is_structural(self) -> bool {
        matches!(self, ErrorKind::MalformedRecord)
    }
}

/// A rejected line, referenced by its 0-based position in the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub line_index: usize,
    pub kind: ErrorKind,
    pub reason: String,
}

impl ValidationError {
    pub fn new(line_index: usize, kind: ErrorKind) -> Self {
        Self {
            line_index,
            kind,
            reason: kind.reason().to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_index, self.reason)
    }
}

/// Batch-level failure kinds, stable for callers that branch on them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyInput,
    ExecutionContext,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Nothing to aggregate. Carries the per-line errors collected on the way, if any.
    #[error("no valid entries ({} lines rejected)", errors.len())]
    EmptyInput { errors: Vec<ValidationError> },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::EmptyInput { .. } => FailureKind::EmptyInput,
            EngineError::ThreadPool(_) => FailureKind::ExecutionContext,
        }
    }

    /// Per-line errors attached to the failure (empty unless raised by a line-based operation)
    pub fn line_errors(&self) -> &[ValidationError] {
        match self {
            EngineError::EmptyInput { errors } => errors,
            EngineError::ThreadPool(_) => &[],
        }
    }
}

const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Default)]
struct KindTally {
    count: usize,
    examples: Vec<String>,
}

/// Groups a batch's per-line errors so the caller can judge whether the batch is acceptable
#[derive(Debug, Clone)]
pub struct ErrorSummary {
    total_lines: usize,
    tallies: IndexMap<ErrorKind, KindTally>,
}

impl ErrorSummary {
    pub fn new(total_lines: usize, errors: &[ValidationError]) -> Self {
        let mut tallies: IndexMap<ErrorKind, KindTally> = IndexMap::new();
        for error in errors {
            let tally = tallies.entry(error.kind).or_default();
            tally.count += 1;
            if tally.examples.len() < MAX_EXAMPLES {
                tally.examples.push(error.to_string());
            }
        }
        Self {
            total_lines,
            tallies,
        }
    }

    pub fn error_count(&self) -> usize {
        self.tallies.values().map(|t| t.count).sum()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.tallies.get(&kind).map_or(0, |t| t.count)
    }

    /// Per-kind counts and example messages, in order of first occurrence
    pub fn kinds(&self) -> impl Iterator<Item = (ErrorKind, usize, &[String])> + '_ {
        self.tallies
            .iter()
            .map(|(kind, tally)| (*kind, tally.count, tally.examples.as_slice()))
    }

    pub fn has_errors(&self) -> bool {
        !self.tallies.is_empty()
    }

    /// Share of lines that failed, 0.0 for an empty batch
    pub fn failure_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.error_count() as f64 / self.total_lines as f64
        }
    }

    pub fn exceeds(&self, max_ratio: f64) -> bool {
        self.failure_ratio() > max_ratio
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut kinds = serde_json::Map::new();
        for (kind, tally) in &self.tallies {
            kinds.insert(
                kind.reason().to_string(),
                json!({
                    "count": tally.count,
                    "examples": tally.examples,
                }),
            );
        }
        json!({
            "total_lines": self.total_lines,
            "error_count": self.error_count(),
            "failure_ratio": self.failure_ratio(),
            "errors": kinds,
        })
    }
}

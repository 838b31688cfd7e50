use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::entry::{Level, LogEntry, UNKNOWN_LEVEL_KEY};
use crate::error_handling::EngineError;

/// Status codes at or above this count as error responses
pub const ERROR_STATUS_THRESHOLD: i64 = 400;

/// Aggregate statistics over one batch of entries.
///
/// Duration fields are `None` when no entry carried a duration; they are never
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogStats {
    pub total_count: usize,
    /// Observed levels in severity order, unrecognized ones under "unknown"
    pub count_by_level: IndexMap<String, usize>,
    pub error_count: usize,
    pub avg_duration_ms: Option<f64>,
    pub min_duration_ms: Option<f64>,
    pub max_duration_ms: Option<f64>,
    pub p50_duration_ms: Option<f64>,
    pub p95_duration_ms: Option<f64>,
    pub p99_duration_ms: Option<f64>,
    pub status_code_distribution: BTreeMap<i64, usize>,
    pub error_count_by_code: BTreeMap<i64, usize>,
}

/// Per-worker partial result, merged before the final sort
#[derive(Debug, Default)]
struct Tally {
    ranked: [usize; 4],
    unknown: usize,
    durations: Vec<f64>,
    status_codes: BTreeMap<i64, usize>,
}

impl Tally {
    fn add(mut self, entry: &LogEntry) -> Self {
        match entry.level.rank() {
            Some(rank) => self.ranked[rank as usize] += 1,
            None => self.unknown += 1,
        }
        if let Some(ms) = entry.duration() {
            self.durations.push(ms);
        }
        if let Some(code) = entry.status_code {
            *self.status_codes.entry(code).or_insert(0) += 1;
        }
        self
    }

    fn merge(mut self, mut other: Self) -> Self {
        for (own, theirs) in self.ranked.iter_mut().zip(other.ranked) {
            *own += theirs;
        }
        self.unknown += other.unknown;
        self.durations.append(&mut other.durations);
        for (code, count) in other.status_codes {
            *self.status_codes.entry(code).or_insert(0) += count;
        }
        self
    }

    fn total(&self) -> usize {
        self.ranked.iter().sum::<usize>() + self.unknown
    }
}

/// Value at index `floor(p * (n - 1))` of an ascending slice, no interpolation
pub fn nearest_rank(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let index = (p * last as f64).floor() as usize;
    sorted.get(index.min(last)).copied()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DurationSummary {
    avg: f64,
    min: f64,
    max: f64,
    p50: f64,
    p95: f64,
    p99: f64,
}

impl DurationSummary {
    /// Sorts in place. The sum runs over the sorted values so the mean does
    /// not depend on how the values were gathered.
    fn from_unsorted(durations: &mut [f64]) -> Option<Self> {
        durations.sort_unstable_by(f64::total_cmp);
        let min = *durations.first()?;
        let max = *durations.last()?;
        let sum: f64 = durations.iter().sum();
        Some(Self {
            avg: sum / durations.len() as f64,
            min,
            max,
            p50: nearest_rank(durations, 0.50)?,
            p95: nearest_rank(durations, 0.95)?,
            p99: nearest_rank(durations, 0.99)?,
        })
    }
}

/// Compute stats over `entries` on the current rayon pool.
///
/// Counting and duration collection run per entry in parallel; the sort is the
/// only step that waits for every worker.
pub fn compute_stats(entries: &[LogEntry]) -> Result<LogStats, EngineError> {
    if entries.is_empty() {
        return Err(EngineError::EmptyInput { errors: Vec::new() });
    }

    let mut tally = entries
        .par_iter()
        .fold(Tally::default, Tally::add)
        .reduce(Tally::default, Tally::merge);

    let mut count_by_level = IndexMap::new();
    for (level, count) in Level::RANKED.iter().zip(tally.ranked) {
        if count > 0 {
            count_by_level.insert(level.as_str().to_string(), count);
        }
    }
    if tally.unknown > 0 {
        count_by_level.insert(UNKNOWN_LEVEL_KEY.to_string(), tally.unknown);
    }

    let error_count_by_code = tally
        .status_codes
        .iter()
        .filter(|(code, _)| **code >= ERROR_STATUS_THRESHOLD)
        .map(|(code, count)| (*code, *count))
        .collect();

    let durations = DurationSummary::from_unsorted(&mut tally.durations);

    Ok(LogStats {
        total_count: tally.total(),
        count_by_level,
        error_count: tally.ranked[3],
        avg_duration_ms: durations.map(|d| d.avg),
        min_duration_ms: durations.map(|d| d.min),
        max_duration_ms: durations.map(|d| d.max),
        p50_duration_ms: durations.map(|d| d.p50),
        p95_duration_ms: durations.map(|d| d.p95),
        p99_duration_ms: durations.map(|d| d.p99),
        status_code_distribution: tally.status_codes,
        error_count_by_code,
    })
}

fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.2}ms", ms),
        None => "n/a".to_string(),
    }
}

impl LogStats {
    pub fn level_count(&self, level: &Level) -> usize {
        self.count_by_level.get(level.bucket()).copied().unwrap_or(0)
    }

    pub fn has_durations(&self) -> bool {
        self.min_duration_ms.is_some()
    }

    pub fn summary(&self) -> String {
        let mut output = format!("Total logs: {}\n", self.total_count);
        for (level, count) in &self.count_by_level {
            output.push_str(&format!("{} count: {}\n", level, count));
        }
        output.push_str(&format!("Error count: {}\n", self.error_count));
        output.push_str(&format!(
            "Duration: avg {}, min {}, max {}\n",
            format_ms(self.avg_duration_ms),
            format_ms(self.min_duration_ms),
            format_ms(self.max_duration_ms)
        ));
        output.push_str(&format!(
            "Percentiles: p50 {}, p95 {}, p99 {}",
            format_ms(self.p50_duration_ms),
            format_ms(self.p95_duration_ms),
            format_ms(self.p99_duration_ms)
        ));
        if !self.error_count_by_code.is_empty() {
            let codes: Vec<String> = self
                .error_count_by_code
                .iter()
                .map(|(code, count)| format!("{}={}", code, count))
                .collect();
            output.push_str(&format!("\nError status codes: {}", codes.join(", ")));
        }
        output
    }
}

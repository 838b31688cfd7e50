use rayon::prelude::*;
use std::collections::HashSet;

use crate::entry::{Level, LogEntry};

/// Selection criteria, combined with AND. An unset criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub min_level: Option<Level>,
    pub min_duration_ms: Option<f64>,
    /// An empty set is treated like an unset criterion
    pub status_codes: Option<HashSet<i64>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn min_duration_ms(mut self, ms: f64) -> Self {
        self.min_duration_ms = Some(ms);
        self
    }

    pub fn status_codes<I: IntoIterator<Item = i64>>(mut self, codes: I) -> Self {
        self.status_codes = Some(codes.into_iter().collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.min_level.is_none()
            && self.min_duration_ms.is_none()
            && self.status_codes.as_ref().map_or(true, HashSet::is_empty)
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(ref min) = self.min_level {
            if !entry.level.at_least(min) {
                return false;
            }
        }

        if let Some(min_ms) = self.min_duration_ms {
            match entry.duration() {
                Some(ms) if ms >= min_ms => {}
                _ => return false,
            }
        }

        if let Some(ref codes) = self.status_codes {
            if !codes.is_empty() {
                match entry.status_code {
                    Some(code) if codes.contains(&code) => {}
                    _ => return false,
                }
            }
        }

        true
    }
}

/// Matching entries in their original relative order, evaluated on the current rayon pool
pub fn filter_entries(entries: &[LogEntry], criteria: &FilterCriteria) -> Vec<LogEntry> {
    if criteria.is_empty() {
        return entries.to_vec();
    }
    entries
        .par_iter()
        .filter(|entry| criteria.matches(entry))
        .cloned()
        .collect()
}

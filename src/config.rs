use logbatch::{FilterCriteria, ParallelConfig};

use crate::cli::{Cli, Mode, OutputFormat};

/// Main configuration struct for the logbatch binary
#[derive(Debug, Clone)]
pub struct LogbatchConfig {
    pub input: InputConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub performance: PerformanceConfig,
}

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Empty means stdin
    pub files: Vec<String>,
}

/// Processing configuration
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub mode: Mode,
    pub criteria: FilterCriteria,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub max_error_ratio: Option<f64>,
}

/// Performance configuration
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    pub threads: usize,
}

impl LogbatchConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut criteria = FilterCriteria::new();
        criteria.min_level = cli.min_level.map(Into::into);
        criteria.min_duration_ms = cli.min_duration;
        if !cli.status_codes.is_empty() {
            criteria = criteria.status_codes(cli.status_codes.iter().copied());
        }

        Self {
            input: InputConfig {
                files: cli.files.clone(),
            },
            processing: ProcessingConfig {
                mode: cli.mode,
                criteria,
            },
            output: OutputConfig {
                format: cli.output_format,
                max_error_ratio: cli.max_error_ratio,
            },
            performance: PerformanceConfig {
                threads: cli.threads,
            },
        }
    }

    pub fn parallel_config(&self) -> ParallelConfig {
        ParallelConfig::with_workers(self.performance.threads)
    }

    /// Filter flags given in stats mode turn the run into a combined analyze call
    pub fn wants_matches(&self) -> bool {
        !self.processing.criteria.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ratio) = self.output.max_error_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(format!("--max-error-ratio must be between 0 and 1, got {}", ratio));
            }
        }
        if let Some(ms) = self.processing.criteria.min_duration_ms {
            if !ms.is_finite() {
                return Err(format!("--min-duration must be a finite number, got {}", ms));
            }
        }
        Ok(())
    }
}

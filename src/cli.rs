// Command-line interface definitions for the logbatch binary

use clap::Parser;
use logbatch::Level;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Parse, aggregate and report statistics plus rejected lines
    #[default]
    Stats,
    /// Print every valid entry as a JSON line
    Parse,
    /// Report how many lines are valid and why the others are not
    Validate,
    /// Print the entries matching --min-level/--min-duration/--status
    Filter,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum LevelArg {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Debug => Level::Debug,
            LevelArg::Info => Level::Info,
            LevelArg::Warn => Level::Warn,
            LevelArg::Error => Level::Error,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "logbatch")]
#[command(about = "Parallel batch analytics for JSON log lines")]
#[command(
    long_about = "Parallel batch analytics for JSON log lines\n\nEach input line must be a JSON object with timestamp, level, message and optional\nduration_ms, status_code and user_id fields. Lines that fail to parse or validate are\nreported by their 0-based index and never abort the batch.\n\nCOMMON EXAMPLES:\n  logbatch app.jsonl\n  logbatch app.jsonl --mode filter --min-level WARN --min-duration 500\n  logbatch app.jsonl --mode validate -F json\n  cat app.jsonl | logbatch --threads 1 --max-error-ratio 0.05"
)]
#[command(author = "Dirk Loss <mail@dirk-loss.de>")]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Input files (stdin if not specified, or use "-" to explicitly specify stdin)
    pub files: Vec<String>,

    /// Operation to run on the batch
    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        default_value = "stats",
        help_heading = "Processing Options"
    )]
    pub mode: Mode,

    /// Keep entries at least this severe (DEBUG < INFO < WARN < ERROR)
    #[arg(short = 'l', long = "min-level", value_enum, help_heading = "Filtering Options")]
    pub min_level: Option<LevelArg>,

    /// Keep entries whose duration_ms is at least this value
    #[arg(long = "min-duration", help_heading = "Filtering Options")]
    pub min_duration: Option<f64>,

    /// Keep entries whose status_code is in this comma-separated list
    #[arg(long = "status", value_delimiter = ',', help_heading = "Filtering Options")]
    pub status_codes: Vec<i64>,

    /// Output format for stats and validation reports
    #[arg(
        short = 'F',
        long = "output-format",
        value_enum,
        default_value = "table",
        help_heading = "Output Options"
    )]
    pub output_format: OutputFormat,

    /// Exit with an error when more than this share of lines was rejected (0.0-1.0)
    #[arg(long = "max-error-ratio", help_heading = "Output Options")]
    pub max_error_ratio: Option<f64>,

    /// Worker threads (0 = one per CPU)
    #[arg(long = "threads", default_value_t = 0, help_heading = "Performance Options")]
    pub threads: usize,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help_heading = "Display Options"
    )]
    pub verbose: u8,

    /// Expand a named alias from the configuration file
    #[arg(short = 'a', long = "alias", help_heading = "Configuration Options")]
    pub alias: Vec<String>,

    /// Read configuration from this file instead of searching for one
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,

    /// Do not load any configuration file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,
}

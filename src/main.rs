use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process;

mod cli;
mod config;
mod config_file;
mod formatters;
mod logging;
mod readers;

use cli::{Cli, Mode};
use config::LogbatchConfig;
use config_file::ConfigFile;
use logbatch::{Engine, ErrorSummary, FailureKind};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
}

impl ExitCode {
    fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Extract --config-file from raw args before clap sees them
fn extract_config_file_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config-file" {
            return iter.next().cloned();
        }
        if let Some(path) = arg.strip_prefix("--config-file=") {
            return Some(path.to_string());
        }
    }
    None
}

/// Apply config-file defaults and aliases, then parse
fn parse_args_with_config(raw_args: Vec<String>) -> Cli {
    let config_file_path = extract_config_file_arg(&raw_args);

    if raw_args.iter().any(|arg| arg == "--show-config") {
        print!("{}", ConfigFile::describe(config_file_path.as_deref()));
        ExitCode::Success.exit();
    }

    let processed_args = if raw_args.iter().any(|arg| arg == "--ignore-config") {
        raw_args
    } else {
        let loaded = ConfigFile::load_with_custom_path(config_file_path.as_deref())
            .and_then(|config| config.process_args(raw_args));
        match loaded {
            Ok(args) => args,
            Err(e) => {
                eprintln!("logbatch: Config error: {:#}", e);
                ExitCode::GeneralError.exit();
            }
        }
    };

    Cli::try_parse_from(processed_args).unwrap_or_else(|e| e.exit())
}

fn main() {
    let cli = parse_args_with_config(std::env::args().collect());
    logging::init_logging(cli.verbose);
    tracing::debug!(
        config_file = ?cli.config_file,
        ignore_config = cli.ignore_config,
        show_config = cli.show_config,
        "arguments parsed"
    );

    // Aliases are expanded before parsing, so any left over had no config to resolve against
    if let Some(name) = cli.alias.first() {
        eprintln!("logbatch: Error: alias '{}' needs a configuration file", name);
        ExitCode::InvalidUsage.exit();
    }

    let config = LogbatchConfig::from_cli(&cli);
    if let Err(message) = config.validate() {
        eprintln!("logbatch: Error: {}", message);
        ExitCode::InvalidUsage.exit();
    }

    match run(&config) {
        Ok(code) => code.exit(),
        Err(e) => {
            eprintln!("logbatch: Error: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    }
}

fn run(config: &LogbatchConfig) -> Result<ExitCode> {
    let lines = crate::readers::read_batch(&config.input.files)?;
    tracing::info!(lines = lines.len(), "batch loaded");

    let engine = Engine::new(config.parallel_config()).context("Failed to start engine")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let format = config.output.format;

    let rejected = match config.processing.mode {
        Mode::Parse => {
            let outcome = engine.parse(&lines);
            formatters::write_entries(&mut out, &outcome.entries)?;
            for error in &outcome.errors {
                eprintln!("logbatch: {}", error);
            }
            ErrorSummary::new(lines.len(), &outcome.errors)
        }
        Mode::Validate => {
            let outcome = engine.parse(&lines);
            let messages: Vec<String> = outcome.errors.iter().map(ToString::to_string).collect();
            writeln!(
                out,
                "{}",
                formatters::format_validation(outcome.entries.len(), &messages, format)
            )?;
            ErrorSummary::new(lines.len(), &outcome.errors)
        }
        Mode::Filter => {
            let outcome = engine.parse(&lines);
            let matches = engine.filter(&outcome.entries, &config.processing.criteria);
            formatters::write_entries(&mut out, &matches)?;
            ErrorSummary::new(lines.len(), &outcome.errors)
        }
        Mode::Stats => {
            let result = if config.wants_matches() {
                engine
                    .analyze(&lines, &config.processing.criteria)
                    .map(|report| (report.stats, report.errors, Some(report.matches.len())))
            } else {
                engine
                    .batch_process(&lines)
                    .map(|(stats, errors)| (stats, errors, None))
            };

            match result {
                Ok((stats, errors, matched)) => {
                    let summary = ErrorSummary::new(lines.len(), &errors);
                    writeln!(
                        out,
                        "{}",
                        formatters::format_stats(&stats, &summary, matched, format)
                    )?;
                    summary
                }
                Err(e) if e.kind() == FailureKind::EmptyInput => {
                    let summary = ErrorSummary::new(lines.len(), e.line_errors());
                    writeln!(out, "{}", formatters::format_no_entries(&summary, format))?;
                    out.flush()?;
                    eprintln!("logbatch: Error: {}", e);
                    return Ok(ExitCode::GeneralError);
                }
                Err(e) => return Err(anyhow::Error::new(e).context("Batch processing failed")),
            }
        }
    };
    out.flush()?;

    if let Some(max_ratio) = config.output.max_error_ratio {
        if rejected.exceeds(max_ratio) {
            eprintln!(
                "logbatch: Error: {:.1}% of lines rejected, limit is {:.1}%",
                rejected.failure_ratio() * 100.0,
                max_ratio * 100.0
            );
            return Ok(ExitCode::GeneralError);
        }
    }

    Ok(ExitCode::Success)
}

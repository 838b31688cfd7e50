use logbatch::{ErrorSummary, LogEntry, LogStats};
use serde_json::json;
use std::io::{self, Write};

use crate::cli::OutputFormat;

/// One compact JSON object per entry
pub fn write_entries<W: Write>(output: &mut W, entries: &[LogEntry]) -> io::Result<()> {
    for entry in entries {
        serde_json::to_writer(&mut *output, entry)?;
        output.write_all(b"\n")?;
    }
    Ok(())
}

fn format_error_table(summary: &ErrorSummary) -> String {
    let mut out = format!(
        "Rejected lines: {} ({:.1}%)",
        summary.error_count(),
        summary.failure_ratio() * 100.0
    );
    for (kind, count, examples) in summary.kinds() {
        out.push_str(&format!("\n  {}: {}", kind.reason(), count));
        for example in examples {
            out.push_str(&format!("\n    {}", example));
        }
    }
    out
}

pub fn format_stats(
    stats: &LogStats,
    summary: &ErrorSummary,
    matched: Option<usize>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Table => {
            let mut out = stats.summary();
            if let Some(matched) = matched {
                out.push_str(&format!("\nMatched entries: {}", matched));
            }
            out.push('\n');
            out.push_str(&format_error_table(summary));
            out
        }
        OutputFormat::Json => {
            let mut value = json!({
                "stats": stats,
                "validation": summary.to_json(),
            });
            if let Some(matched) = matched {
                value["matched"] = json!(matched);
            }
            value.to_string()
        }
    }
}

/// Report for a batch with nothing to aggregate
pub fn format_no_entries(summary: &ErrorSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format!("No valid entries\n{}", format_error_table(summary)),
        OutputFormat::Json => json!({
            "stats": null,
            "validation": summary.to_json(),
        })
        .to_string(),
    }
}

pub fn format_validation(valid: usize, messages: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut out = format!(
                "Valid lines: {}\nRejected lines: {}",
                valid,
                messages.len()
            );
            for message in messages {
                out.push_str(&format!("\n  {}", message));
            }
            out
        }
        OutputFormat::Json => json!({
            "valid_count": valid,
            "errors": messages,
        })
        .to_string(),
    }
}

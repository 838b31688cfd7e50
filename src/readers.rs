use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Read all non-blank lines from `files` in order, or from stdin when `files`
/// is empty. "-" names stdin explicitly.
pub fn read_batch(files: &[String]) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    if files.is_empty() {
        collect_lines(io::stdin().lock(), "<stdin>", &mut lines)?;
        return Ok(lines);
    }

    for path in files {
        if path == "-" {
            collect_lines(io::stdin().lock(), "<stdin>", &mut lines)?;
        } else {
            let file = File::open(path).with_context(|| format!("Failed to open file: {}", path))?;
            collect_lines(BufReader::new(file), path, &mut lines)?;
        }
    }

    Ok(lines)
}

fn collect_lines<R: BufRead>(reader: R, source: &str, lines: &mut Vec<String>) -> Result<()> {
    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read from {}", source))?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(())
}

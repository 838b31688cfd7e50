// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::{self, Write};
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_logbatch")
}

/// Run logbatch with the given arguments, feeding `input` on stdin.
/// Config files are ignored so the developer's own rc file cannot leak in.
pub fn run_logbatch_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path())
        .arg("--ignore-config")
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start logbatch");

    // Runs that exit before reading stdin (usage errors) close the pipe early
    if let Some(mut stdin) = cmd.stdin.take() {
        match stdin.write_all(input.as_bytes()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => panic!("Failed to write to stdin: {}", e),
        }
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run logbatch on a temporary file holding `file_content`
pub fn run_logbatch_with_file(args: &[&str], file_content: &str) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content.as_bytes())
        .expect("Failed to write to temp file");

    let path = temp_file.path().to_str().expect("temp path is UTF-8");
    let mut full_args = args.to_vec();
    full_args.push(path);

    run_logbatch_raw(&full_args)
}

/// Run logbatch without forcing --ignore-config
pub fn run_logbatch_raw(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute logbatch");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// A JSON log line with the common fields
pub fn log_line(
    ts: &str,
    level: &str,
    message: &str,
    duration_ms: Option<f64>,
    status: Option<i64>,
) -> String {
    let mut value = serde_json::json!({
        "timestamp": ts,
        "level": level,
        "message": message,
    });
    if let Some(ms) = duration_ms {
        value["duration_ms"] = serde_json::json!(ms);
    }
    if let Some(code) = status {
        value["status_code"] = serde_json::json!(code);
    }
    value.to_string()
}

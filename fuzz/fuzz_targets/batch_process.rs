#![no_main]

use logbatch::Engine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let lines: Vec<&str> = input.lines().collect();
    let Ok(engine) = Engine::with_workers(2) else {
        return;
    };
    match engine.batch_process(&lines) {
        Ok((stats, errors)) => assert_eq!(stats.total_count + errors.len(), lines.len()),
        Err(e) => assert_eq!(e.line_errors().len(), lines.len()),
    }
});

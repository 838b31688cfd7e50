#![no_main]

use logbatch::parsers::{JsonlParser, RecordParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Rejections are fine; we only care about panics or UB.
        let parser = JsonlParser::new();
        if let Ok(entry) = parser.parse_record(input) {
            assert!(!entry.timestamp.is_empty());
            assert!(entry.duration_ms.map_or(true, |ms| ms.is_finite() && ms >= 0.0));
        }
    }
});

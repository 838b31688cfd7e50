use serde_json::{Map, Value};

use super::RecordParser;
use crate::entry::{is_valid_duration, Level, LogEntry};
use crate::error_handling::ErrorKind;

/// Parses one JSON object per line into a `LogEntry`.
///
/// Field types are checked first (a wrong type is a malformed record), then
/// the field rules run in order: level, duration, timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlParser;

impl JsonlParser {
    pub fn new() -> Self {
        Self
    }
}

/// Absent and `null` both mean "not there"; any non-string is malformed
fn take_string(map: &mut Map<String, Value>, key: &str) -> Result<Option<String>, ErrorKind> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ErrorKind::MalformedRecord),
    }
}

fn take_status_code(map: &mut Map<String, Value>) -> Result<Option<i64>, ErrorKind> {
    match map.remove("status_code") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or(ErrorKind::MalformedRecord),
    }
}

fn take_duration(map: &mut Map<String, Value>) -> Result<Option<f64>, ErrorKind> {
    match map.remove("duration_ms") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_f64() {
            Some(ms) if is_valid_duration(ms) => Ok(Some(ms)),
            _ => Err(ErrorKind::InvalidDuration),
        },
    }
}

impl RecordParser for JsonlParser {
    fn parse_record(&self, line: &str) -> Result<LogEntry, ErrorKind> {
        let value: Value = serde_json::from_str(line).map_err(|_| ErrorKind::MalformedRecord)?;
        let Value::Object(mut map) = value else {
            return Err(ErrorKind::MalformedRecord);
        };

        let level = take_string(&mut map, "level")?;
        let timestamp = take_string(&mut map, "timestamp")?;
        let message = take_string(&mut map, "message")?.unwrap_or_default();
        let status_code = take_status_code(&mut map)?;
        let user_id = take_string(&mut map, "user_id")?;

        let level = match level {
            Some(text) if !text.is_empty() => Level::from(text),
            _ => return Err(ErrorKind::MissingLevel),
        };
        let duration_ms = take_duration(&mut map)?;
        let timestamp = match timestamp {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ErrorKind::MissingTimestamp),
        };

        Ok(LogEntry {
            timestamp,
            level,
            message,
            duration_ms,
            status_code,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<LogEntry, ErrorKind> {
        JsonlParser::new().parse_record(line)
    }

    #[test]
    fn test_jsonl_parser_full_record() {
        let entry = parse(
            r#"{"timestamp":"2024-01-15T10:00:00Z","level":"WARN","message":"slow query","duration_ms":812.5,"status_code":200,"user_id":"u-17","host":"db1"}"#,
        )
        .unwrap();

        assert_eq!(entry.timestamp, "2024-01-15T10:00:00Z");
        assert_eq!(entry.level, Level::Warn);
        assert_eq!(entry.message, "slow query");
        assert_eq!(entry.duration_ms, Some(812.5));
        assert_eq!(entry.status_code, Some(200));
        assert_eq!(entry.user_id.as_deref(), Some("u-17"));
    }

    #[test]
    fn test_jsonl_parser_optional_fields() {
        let entry = parse(
            r#"{"timestamp":"2024-01-15T10:00:00Z","level":"INFO","duration_ms":null,"status_code":null}"#,
        )
        .unwrap();
        assert_eq!(entry.message, "");
        assert_eq!(entry.duration_ms, None);
        assert_eq!(entry.status_code, None);

        let zero = parse(r#"{"timestamp":"t","level":"INFO","duration_ms":0}"#).unwrap();
        assert_eq!(zero.duration_ms, Some(0.0));
    }

    #[test]
    fn test_jsonl_parser_unknown_level_is_kept() {
        let entry = parse(r#"{"timestamp":"t","level":"notice","message":"m"}"#).unwrap();
        assert_eq!(entry.level, Level::Unknown("notice".to_string()));
    }

    #[test]
    fn test_jsonl_parser_malformed() {
        assert_eq!(parse("{not json"), Err(ErrorKind::MalformedRecord));
        assert_eq!(parse(""), Err(ErrorKind::MalformedRecord));
        assert_eq!(parse("[1,2,3]"), Err(ErrorKind::MalformedRecord));
        assert_eq!(parse(r#""just a string""#), Err(ErrorKind::MalformedRecord));
        assert_eq!(
            parse(r#"{"timestamp":"t","level":42}"#),
            Err(ErrorKind::MalformedRecord)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","status_code":"200"}"#),
            Err(ErrorKind::MalformedRecord)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","status_code":200.5}"#),
            Err(ErrorKind::MalformedRecord)
        );
    }

    #[test]
    fn test_jsonl_parser_field_rules() {
        assert_eq!(
            parse(r#"{"timestamp":"t","message":"m"}"#),
            Err(ErrorKind::MissingLevel)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":""}"#),
            Err(ErrorKind::MissingLevel)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","duration_ms":-1}"#),
            Err(ErrorKind::InvalidDuration)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","duration_ms":"fast"}"#),
            Err(ErrorKind::InvalidDuration)
        );
        assert_eq!(
            parse(r#"{"level":"INFO","message":"m"}"#),
            Err(ErrorKind::MissingTimestamp)
        );
        assert_eq!(
            parse(r#"{"timestamp":"","level":"INFO"}"#),
            Err(ErrorKind::MissingTimestamp)
        );
    }

    #[test]
    fn test_jsonl_parser_out_of_range_duration_is_malformed() {
        // serde_json refuses numbers outside f64 range before any field rule runs
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","duration_ms":1e400}"#),
            Err(ErrorKind::MalformedRecord)
        );
        assert_eq!(
            parse(r#"{"timestamp":"t","level":"INFO","duration_ms":1e300}"#)
                .map(|entry| entry.duration_ms),
            Ok(Some(1e300))
        );
    }

    #[test]
    fn test_jsonl_parser_rule_order() {
        // level is checked before duration, duration before timestamp
        assert_eq!(parse(r#"{"duration_ms":-5}"#), Err(ErrorKind::MissingLevel));
        assert_eq!(
            parse(r#"{"level":"INFO","duration_ms":-5}"#),
            Err(ErrorKind::InvalidDuration)
        );
        // type errors win over every field rule
        assert_eq!(
            parse(r#"{"timestamp":7,"duration_ms":-5}"#),
            Err(ErrorKind::MalformedRecord)
        );
    }
}

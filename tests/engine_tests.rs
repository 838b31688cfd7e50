use logbatch::{Engine, ErrorKind, FailureKind, FilterCriteria, Level, LogEntry, ParallelConfig};

fn lines() -> Vec<String> {
    vec![
        r#"{"timestamp":"t0","level":"INFO","message":"a","duration_ms":10,"status_code":200}"#,
        r#"{"timestamp":"t1","level":"ERROR","message":"b","duration_ms":30,"status_code":500}"#,
        r#"{"timestamp":"t2","level":"WARN","message":"c","duration_ms":-1}"#,
        r#"{"timestamp":"t3","level":"DEBUG","message":"d","user_id":"u-7"}"#,
        r#"["not","an","object"]"#,
        r#"{"timestamp":"t5","level":"TRACE","message":"e","duration_ms":20,"status_code":404}"#,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[test]
fn test_default_engine_uses_every_cpu() {
    let engine = Engine::new(ParallelConfig::default()).unwrap();
    assert_eq!(engine.workers(), num_cpus::get().max(1));
}

#[test]
fn test_batch_process_reports_stats_and_line_errors() {
    let engine = Engine::with_workers(4).unwrap();
    let (stats, errors) = engine.batch_process(&lines()).unwrap();

    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.error_count, 1);
    assert_eq!(stats.level_count(&Level::Debug), 1);
    assert_eq!(stats.level_count(&Level::Unknown("TRACE".into())), 1);
    assert_eq!(stats.count_by_level.get("unknown"), Some(&1));
    assert_eq!(stats.min_duration_ms, Some(10.0));
    assert_eq!(stats.max_duration_ms, Some(30.0));
    assert_eq!(stats.avg_duration_ms, Some(20.0));
    assert_eq!(stats.p50_duration_ms, Some(20.0));
    assert_eq!(stats.status_code_distribution.get(&200), Some(&1));
    assert_eq!(stats.error_count_by_code.len(), 2);
    assert!(stats.error_count_by_code.get(&200).is_none());

    let indices: Vec<(usize, ErrorKind)> = errors.iter().map(|e| (e.line_index, e.kind)).collect();
    assert_eq!(
        indices,
        vec![(2, ErrorKind::InvalidDuration), (4, ErrorKind::MalformedRecord)]
    );
}

#[test]
fn test_parse_preserves_order_and_optional_fields() {
    let engine = Engine::with_workers(3).unwrap();
    let outcome = engine.parse(&lines());

    let messages: Vec<&str> = outcome.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b", "d", "e"]);
    assert_eq!(outcome.entries[2].user_id.as_deref(), Some("u-7"));
    assert_eq!(outcome.entries[2].duration_ms, None);
    assert_eq!(outcome.total_lines(), 6);
}

#[test]
fn test_validate_messages_name_line_and_reason() {
    let engine = Engine::sequential().unwrap();
    let (valid, messages) = engine.validate(&lines());
    assert_eq!(valid, 4);
    assert_eq!(
        messages,
        vec!["line 2: invalid duration", "line 4: malformed record"]
    );
}

#[test]
fn test_validate_empty_batch() {
    let engine = Engine::sequential().unwrap();
    let empty: Vec<String> = Vec::new();
    assert_eq!(engine.validate(&empty), (0, Vec::new()));
}

#[test]
fn test_compute_stats_on_empty_entries_fails() {
    let engine = Engine::with_workers(2).unwrap();
    let err = engine.compute_stats(&[]).unwrap_err();
    assert_eq!(err.kind(), FailureKind::EmptyInput);
}

#[test]
fn test_compute_stats_from_lines_carries_rejections() {
    let engine = Engine::with_workers(2).unwrap();
    let bad = vec!["{", r#"{"level":"INFO","message":"x"}"#];
    let err = engine.compute_stats_from_lines(&bad).unwrap_err();
    assert_eq!(err.kind(), FailureKind::EmptyInput);
    let kinds: Vec<ErrorKind> = err.line_errors().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::MalformedRecord, ErrorKind::MissingTimestamp]);
}

#[test]
fn test_stats_without_durations_are_absent() {
    let engine = Engine::sequential().unwrap();
    let stats = engine
        .compute_stats(&[LogEntry::new("t", Level::Info, "m").with_status(200)])
        .unwrap();
    assert!(!stats.has_durations());
    assert_eq!(stats.avg_duration_ms, None);
    assert_eq!(stats.p99_duration_ms, None);
    assert!(stats.summary().contains("p50 n/a"));
}

#[test]
fn test_filter_lines_combines_criteria() {
    let engine = Engine::with_workers(2).unwrap();
    let criteria = FilterCriteria::new()
        .min_level(Level::Info)
        .min_duration_ms(15.0);
    let matches = engine.filter_lines(&lines(), &criteria);
    let messages: Vec<&str> = matches.iter().map(|e| e.message.as_str()).collect();
    // "e" has an unrecognized level and never passes a level threshold
    assert_eq!(messages, vec!["b"]);
}

#[test]
fn test_filter_with_empty_criteria_keeps_everything() {
    let engine = Engine::with_workers(2).unwrap();
    let outcome = engine.parse(&lines());
    let all = engine.filter(&outcome.entries, &FilterCriteria::new());
    assert_eq!(all, outcome.entries);
}

#[test]
fn test_analyze_returns_stats_matches_and_errors() {
    let engine = Engine::with_workers(4).unwrap();
    let criteria = FilterCriteria::new().status_codes([404, 500]);
    let report = engine.analyze(&lines(), &criteria).unwrap();

    assert_eq!(report.stats.total_count, 4);
    let messages: Vec<&str> = report.matches.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["b", "e"]);
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn test_engine_is_reusable_across_calls() {
    let engine = Engine::with_workers(2).unwrap();
    let first = engine.batch_process(&lines()).unwrap();
    let second = engine.batch_process(&lines()).unwrap();
    assert_eq!(first, second);
}

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use logbatch::{Engine, FilterCriteria, Level};

const LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARN", "ERROR"];
const STATUS_CODES: [i64; 5] = [200, 200, 201, 404, 500];

/// Mostly valid lines with one malformed line in fifty
fn synthetic_batch(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            if i % 50 == 49 {
                return format!("{{\"timestamp\":\"t{}\",", i);
            }
            format!(
                r#"{{"timestamp":"2024-01-01T00:{:02}:{:02}Z","level":"{}","message":"request {}","duration_ms":{}.{},"status_code":{},"user_id":"u-{}"}}"#,
                (i / 60) % 60,
                i % 60,
                LEVELS[i % LEVELS.len()],
                i,
                (i * 37) % 2_000,
                i % 10,
                STATUS_CODES[i % STATUS_CODES.len()],
                i % 97
            )
        })
        .collect()
}

fn bench_batch_process_by_workers(c: &mut Criterion) {
    let lines = synthetic_batch(50_000);
    let mut group = c.benchmark_group("batch_process");
    group.throughput(Throughput::Elements(lines.len() as u64));

    for workers in [1usize, 2, 4, 8] {
        let engine = Engine::with_workers(workers).expect("worker pool");
        group.bench_with_input(BenchmarkId::from_parameter(workers), &lines, |b, lines| {
            b.iter(|| black_box(engine.batch_process(black_box(lines))));
        });
    }
    group.finish();
}

fn bench_parse_only(c: &mut Criterion) {
    let lines = synthetic_batch(50_000);
    let engine = Engine::with_workers(0).expect("worker pool");
    c.bench_function("parse_50k", |b| {
        b.iter(|| black_box(engine.parse(black_box(&lines))));
    });
}

fn bench_compute_stats(c: &mut Criterion) {
    let engine = Engine::with_workers(0).expect("worker pool");
    let entries = engine.parse(&synthetic_batch(100_000)).entries;
    c.bench_function("compute_stats_100k", |b| {
        b.iter(|| black_box(engine.compute_stats(black_box(&entries))));
    });
}

fn bench_filter(c: &mut Criterion) {
    let engine = Engine::with_workers(0).expect("worker pool");
    let entries = engine.parse(&synthetic_batch(100_000)).entries;
    let criteria = FilterCriteria::new()
        .min_level(Level::Warn)
        .min_duration_ms(500.0)
        .status_codes([404, 500]);
    c.bench_function("filter_100k", |b| {
        b.iter(|| black_box(engine.filter(black_box(&entries), black_box(&criteria))));
    });
}

criterion_group!(
    benches,
    bench_batch_process_by_workers,
    bench_parse_only,
    bench_compute_stats,
    bench_filter
);
criterion_main!(benches);

//! Criterion benchmarks for rust_log_facade

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_log_facade::core::message::dump_map;
use rust_log_facade::prelude::*;
use std::sync::{Arc, Weak};
use tempfile::TempDir;

// ============================================================================
// Facade Write Benchmarks
// ============================================================================

fn bench_file_writes(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = Writer::new(Logger::new("bench"));
    writer
        .use_files(temp_dir.path().join("bench.log"), "debug")
        .expect("Failed to attach file sink");

    let mut group = c.benchmark_group("file_writes");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain_message", |b| {
        b.iter(|| writer.info(black_box("Benchmark message"), LogContext::new()))
    });

    group.bench_function("with_context", |b| {
        b.iter(|| {
            let context = LogContext::new()
                .with_field("user_id", 12345)
                .with_field("request", "GET /orders");
            writer.info(black_box("Request served"), context)
        })
    });

    group.bench_function("below_threshold", |b| {
        let mut quiet = Writer::new(Logger::new("bench"));
        quiet
            .use_files(temp_dir.path().join("quiet.log"), "error")
            .expect("Failed to attach file sink");
        b.iter(|| quiet.debug(black_box("Dropped"), LogContext::new()))
    });

    group.finish();
}

fn bench_daily_writes(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = Writer::new(Logger::new("bench"));
    writer
        .use_daily_files(temp_dir.path().join("app.log"), 3, "debug")
        .expect("Failed to attach daily sink");

    let mut group = c.benchmark_group("daily_writes");
    group.throughput(Throughput::Elements(1));
    group.bench_function("plain_message", |b| {
        b.iter(|| writer.warning(black_box("Benchmark message"), LogContext::new()))
    });
    group.finish();
}

// ============================================================================
// Event and Formatting Benchmarks
// ============================================================================

fn bench_event_publish(c: &mut Criterion) {
    let bus = Arc::new(EventBus::new());
    let mut writer = Writer::new(Logger::new("bench"));
    writer.set_event_dispatcher(Arc::downgrade(&bus) as Weak<dyn EventDispatcher>);
    writer.listen(|event| {
        black_box(event);
    });

    c.bench_function("event_publish_no_sinks", |b| {
        b.iter(|| writer.notice(black_box("Event only"), LogContext::new()))
    });
}

fn bench_message_format(c: &mut Criterion) {
    let mut map = FieldMap::new();
    map.insert("order_id".to_string(), FieldValue::Int(42));
    map.insert("customer".to_string(), FieldValue::from("ada"));
    map.insert(
        "items".to_string(),
        FieldValue::from(vec!["tea", "scones", "jam"]),
    );

    let mut group = c.benchmark_group("message_format");
    group.bench_function("string", |b| {
        let message = Message::from("Simple message");
        b.iter(|| black_box(message.format()))
    });
    group.bench_function("mapping_dump", |b| b.iter(|| black_box(dump_map(&map))));
    group.finish();
}

criterion_group!(
    benches,
    bench_file_writes,
    bench_daily_writes,
    bench_event_publish,
    bench_message_format
);
criterion_main!(benches);

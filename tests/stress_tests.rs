//! Stress tests for concurrent use of one writer
//!
//! These tests verify:
//! - Records from many threads land on intact, separate lines
//! - Every record is written exactly once
//! - Event listeners see every record under contention

use rust_log_facade::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 250;

#[test]
fn test_concurrent_file_writes_stay_whole() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");

    let mut writer = Writer::new(Logger::new("stress"));
    writer.use_files(&log_file, "debug").unwrap();
    let writer = Arc::new(writer);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..RECORDS_PER_THREAD {
                    writer
                        .info(
                            format!("thread {} record {}", t, i),
                            LogContext::new().with_field("thread", t as i64),
                        )
                        .expect("write failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    writer.flush().unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * RECORDS_PER_THREAD);

    let mut seen = HashSet::new();
    for line in &lines {
        assert!(line.contains("stress.INFO: thread "), "mangled line: {}", line);
        let message = line
            .split("stress.INFO: ")
            .nth(1)
            .and_then(|rest| rest.split(" {").next())
            .expect("line without message");
        assert!(seen.insert(message.to_string()), "duplicate record: {}", message);
    }
}

#[test]
fn test_concurrent_events_all_delivered() {
    let bus = Arc::new(EventBus::new());
    let mut writer = Writer::new(Logger::new("stress"));
    writer.set_event_dispatcher(Arc::downgrade(&bus) as Weak<dyn EventDispatcher>);

    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);
    assert!(writer.listen(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    }));

    let writer = Arc::new(writer);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                let level = LogLevel::ALL[t % LogLevel::ALL.len()];
                for i in 0..RECORDS_PER_THREAD {
                    writer
                        .log(level.name(), format!("{}-{}", t, i), LogContext::new())
                        .expect("write failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(delivered.load(Ordering::Relaxed), THREADS * RECORDS_PER_THREAD);
}

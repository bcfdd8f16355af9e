//! Benchmarks for raw-events payload serialisation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use seqlog::{LogEntry, dispatcher::serialise_payload};
use serde_json::json;

fn bench_serialise(c: &mut Criterion) {
    let bare = LogEntry::new("Information", "Application started", None);
    let detailed = LogEntry::new(
        "Error",
        "An error occurred",
        json!({
            "error": "example error message",
            "userID": "12345",
            "operation": "data processing",
            "duration": "120ms",
            "severity": "high",
            "details": {"module": "user-service", "method": "POST"},
        })
        .as_object()
        .cloned(),
    );

    c.bench_function("serialise_bare_entry", |b| {
        b.iter(|| serialise_payload(black_box(&bare)))
    });
    c.bench_function("serialise_entry_with_properties", |b| {
        b.iter(|| serialise_payload(black_box(&detailed)))
    });
}

criterion_group!(benches, bench_serialise);
criterion_main!(benches);

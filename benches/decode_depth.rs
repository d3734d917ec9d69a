//! Envelope decode benchmark.
//!
//! Measures decode latency across nesting depths, for both text input (the
//! common case) and already-parsed values, using Criterion.

use agro_advisor::envelope::export::wrap;
use agro_advisor::envelope::{decode, MAX_UNWRAP_DEPTH};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn payload(recommendations: usize) -> Value {
    let recs: Vec<String> = (0..recommendations)
        .map(|i| format!("Recommendation {i}: inspect lower leaves weekly and remove infected tissue"))
        .collect();
    json!({
        "disease_name": "Black Sigatoka",
        "crop_type": "banana",
        "recommendations": recs,
    })
}

fn bench_decode_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_text");
    for depth in 0..=MAX_UNWRAP_DEPTH {
        let wire = wrap(payload(8), depth).to_string();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &wire, |b, w| {
            b.iter(|| decode(black_box(w.as_str())).unwrap());
        });
    }
    group.finish();
}

fn bench_decode_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_value");
    for depth in 0..=MAX_UNWRAP_DEPTH {
        let value = wrap(payload(8), depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &value, |b, v| {
            b.iter(|| decode(black_box(v)).unwrap());
        });
    }
    group.finish();
}

fn bench_recommendation_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_recommendations");
    for count in [0usize, 8, 64, 512] {
        let wire = wrap(payload(count), 2).to_string();
        group.bench_with_input(BenchmarkId::from_parameter(count), &wire, |b, w| {
            b.iter(|| decode(black_box(w.as_str())).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_decode_text,
    bench_decode_value,
    bench_recommendation_count
);
criterion_main!(benches);

//! Benchmarks for classifier label reconciliation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ser_rs::emotion::{canonicalize, reconcile};
use ser_rs::LabelScore;

fn canonical_pairs() -> Vec<LabelScore> {
    vec![
        LabelScore::new("anger", 0.05),
        LabelScore::new("disgust", 0.03),
        LabelScore::new("fear", 0.07),
        LabelScore::new("happiness", 0.55),
        LabelScore::new("neutral", 0.20),
        LabelScore::new("sadness", 0.08),
        LabelScore::new("surprise", 0.02),
    ]
}

fn synonym_pairs() -> Vec<LabelScore> {
    vec![
        LabelScore::new("Angry", 0.05),
        LabelScore::new("Disgusted", 0.03),
        LabelScore::new("Fearful", 0.07),
        LabelScore::new("Joy", 0.55),
        LabelScore::new("Neutral", 0.20),
        LabelScore::new("Sad", 0.08),
        LabelScore::new("Surprised", 0.02),
    ]
}

fn noisy_pairs() -> Vec<LabelScore> {
    let mut pairs = synonym_pairs();
    pairs.push(LabelScore::new("LABEL_7", 0.10));
    pairs.push(LabelScore::new("calm", 0.15));
    pairs.push(LabelScore::new("boredom", 0.05));
    pairs
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    let cases = [
        ("canonical", canonical_pairs()),
        ("synonyms", synonym_pairs()),
        ("with_unknown", noisy_pairs()),
    ];

    for (name, pairs) in &cases {
        group.bench_with_input(BenchmarkId::new("labels", name), pairs, |b, pairs| {
            b.iter(|| black_box(reconcile(pairs)))
        });
    }

    group.finish();
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    // First, last, and missing entries of the synonym table
    for label in ["anger", "surprised", "LABEL_7"] {
        group.bench_with_input(BenchmarkId::new("label", label), &label, |b, label| {
            b.iter(|| black_box(canonicalize(label)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_canonicalize);
criterion_main!(benches);

//! Pipeline benchmark: raw observation → mapped features → aligned vector.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcos_risk::features::mapper::MAPPED_FEATURES;
use pcos_risk::features::{FeatureMapper, FeatureSchema, SchemaAligner};
use pcos_risk::observation::RawObservation;
use serde_json::json;

fn observation() -> RawObservation {
    RawObservation::from_value(json!({
        "age": 25,
        "weight": 60,
        "height": 160,
        "bmi": "",
        "waist_hip_ratio": 0.8,
        "cycle": "I",
        "cycle_length": 30,
        "hair_growth": "yes",
        "weight_gain": "no",
        "pimples": "no",
        "hair_loss": "no",
        "skin_darkening": "no",
        "fast_food": 1,
        "exercise": "yes"
    }))
    .unwrap()
}

/// Mapped features plus training-only columns, as a full dataset schema has.
fn wide_schema(extra: usize) -> FeatureSchema {
    FeatureSchema::new(
        MAPPED_FEATURES
            .iter()
            .map(|s| s.to_string())
            .chain((0..extra).map(|i| format!("lab_{}", i))),
    )
    .unwrap()
}

fn bench_map(c: &mut Criterion) {
    let obs = observation();
    c.bench_function("map_observation", |b| {
        b.iter(|| FeatureMapper.map(black_box(&obs)).unwrap())
    });
}

fn bench_align(c: &mut Criterion) {
    let mapped = FeatureMapper.map(&observation()).unwrap();
    let schema = wide_schema(27);
    c.bench_function("align_41_columns", |b| {
        b.iter(|| SchemaAligner.align(black_box(&schema), black_box(&mapped)))
    });
}

fn bench_parse_map_align(c: &mut Criterion) {
    let schema = wide_schema(27);
    let body = serde_json::to_string(&observation()).unwrap();
    c.bench_function("parse_map_align", |b| {
        b.iter(|| {
            let obs = RawObservation::from_json(black_box(&body)).unwrap();
            let mapped = FeatureMapper.map(&obs).unwrap();
            black_box(schema.align(&mapped))
        })
    });
}

criterion_group!(benches, bench_map, bench_align, bench_parse_map_align);
criterion_main!(benches);

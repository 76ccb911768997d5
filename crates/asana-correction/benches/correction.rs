//! Benchmarks for the per-frame correction pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use asana_core::{LandmarkIndex, LandmarkVector};
use asana_correction::{
    calculate_angles, calculate_correction_metrics, normalize_keypoints, FeedbackGenerator,
    KeypointRecord,
};

fn create_test_records(phase: f64) -> Vec<KeypointRecord> {
    (0..LandmarkIndex::COUNT)
        .map(|i| {
            let t = i as f64 * 0.1 + phase;
            KeypointRecord::new(0.5 + 0.3 * t.sin(), 0.5 + 0.3 * t.cos(), 0.05 * t, 0.9)
        })
        .collect()
}

fn create_test_vector(phase: f64) -> LandmarkVector {
    LandmarkVector::from_flat(&normalize_keypoints(&create_test_records(phase)))
        .expect("33 landmarks")
}

fn benchmark_normalize(c: &mut Criterion) {
    let records = create_test_records(0.0);

    c.bench_function("normalize_33_keypoints", |b| {
        b.iter(|| normalize_keypoints(black_box(&records)))
    });
}

fn benchmark_angles(c: &mut Criterion) {
    let vector = create_test_vector(0.0);

    c.bench_function("joint_angles", |b| {
        b.iter(|| calculate_angles(black_box(&vector)))
    });
}

fn benchmark_full_frame(c: &mut Criterion) {
    let detected = create_test_vector(0.3);
    let reference = create_test_vector(0.0);
    let generator = FeedbackGenerator::default();

    c.bench_function("correction_and_feedback", |b| {
        b.iter(|| {
            let result = calculate_correction_metrics(black_box(&detected), black_box(&reference));
            generator.generate(&result).to_text()
        })
    });
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_angles,
    benchmark_full_frame
);
criterion_main!(benches);

//! Criterion benchmarks for full crowd ticks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use throng_bench::{build_crowd, reference_profile, stress_profile};

const DT: f64 = 0.05;

fn bench_tick_300(c: &mut Criterion) {
    let (mut engine, world) = build_crowd(reference_profile(42), 10).unwrap();

    // Warm up: first tick seeds every path buffer.
    engine.execute_tick();

    c.bench_function("tick_300", |b| {
        b.iter(|| {
            world.advance(DT);
            let result = engine.execute_tick();
            black_box(&result);
        });
    });
}

fn bench_tick_3000(c: &mut Criterion) {
    let (mut engine, world) = build_crowd(stress_profile(42), 30).unwrap();
    engine.execute_tick();

    c.bench_function("tick_3000", |b| {
        b.iter(|| {
            world.advance(DT);
            let result = engine.execute_tick();
            black_box(&result);
        });
    });
}

fn bench_fill_pool_300(c: &mut Criterion) {
    c.bench_function("fill_pool_300", |b| {
        b.iter(|| {
            let (engine, _world) = build_crowd(reference_profile(42), 10).unwrap();
            black_box(engine.live_count());
        });
    });
}

criterion_group!(benches, bench_tick_300, bench_tick_3000, bench_fill_pool_300);
criterion_main!(benches);

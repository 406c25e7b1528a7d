//! Benchmarks for the per-frame field render.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metafield::{Command, Engine, EngineConfig, Hsva};

fn engine_at(width: u32, height: u32, scale: f64) -> Engine {
    let mut engine =
        Engine::new(EngineConfig::new(width, height).with_resolution_scale(scale)).unwrap();
    engine.set_fixed_delta(Some(1.0 / 60.0));
    engine
}

fn bench_tick_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for &(w, h) in &[(320u32, 240u32), (640, 480), (1280, 720)] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &(w, h), |b, _| {
            let mut engine = engine_at(w, h, 1.0);
            b.iter(|| black_box(engine.tick()))
        });
    }

    group.finish();
}

fn bench_resolution_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution_scale");

    for &scale in &[1.0, 0.75, 0.5, 0.25] {
        group.bench_with_input(BenchmarkId::from_parameter(scale), &scale, |b, &scale| {
            let mut engine = engine_at(960, 600, scale);
            b.iter(|| black_box(engine.tick()))
        });
    }

    group.finish();
}

fn bench_source_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_count");

    for &extra in &[0usize, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(extra + 3), &extra, |b, &extra| {
            let mut engine = engine_at(640, 480, 1.0);
            for i in 0..extra {
                let hue = (i as f64 * 31.0) % 360.0;
                engine
                    .apply(Command::AddSource {
                        x: 40.0 + (i as f64 * 53.0) % 560.0,
                        y: 40.0 + (i as f64 * 37.0) % 400.0,
                        radius: 60.0,
                        color: Hsva::new(hue, 100.0, 100.0, 1.0),
                    })
                    .unwrap();
            }
            b.iter(|| black_box(engine.tick()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick_sizes, bench_resolution_scale, bench_source_count);
criterion_main!(benches);

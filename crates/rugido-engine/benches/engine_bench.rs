//! Criterion benchmarks for the engine render path
//!
//! Run with: cargo bench -p rugido-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rugido_engine::{EngineKind, EngineSound, ExhaustKind};

const SAMPLE_RATE: f32 = 48000.0;

fn running_engine(kind: EngineKind) -> EngineSound {
    let mut engine = EngineSound::new(SAMPLE_RATE);
    engine.start(kind);
    engine.update(8_000.0, 0.7, kind, 120.0, ExhaustKind::FullRace);
    // Skip past the fade-in so we measure steady state.
    let mut warmup = vec![0.0f32; SAMPLE_RATE as usize];
    engine.render(&mut warmup);
    engine
}

fn bench_render_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render_Block");

    for kind in [EngineKind::Inline4, EngineKind::VTwin, EngineKind::Single] {
        let mut engine = running_engine(kind);
        let mut block = vec![0.0f32; 512];

        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut block));
                black_box(block[0])
            })
        });
    }

    group.finish();
}

fn bench_render_with_transients(c: &mut Criterion) {
    let mut engine = running_engine(EngineKind::VTwin);
    let mut block = vec![0.0f32; 512];

    c.bench_function("Render_WithTransients", |b| {
        b.iter(|| {
            engine.trigger_backfire();
            engine.render(black_box(&mut block));
            black_box(block[0])
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let mut engine = running_engine(EngineKind::Inline4);
    let mut rpm = 1_000.0f32;

    c.bench_function("Update_Tuning", |b| {
        b.iter(|| {
            rpm = if rpm > 13_000.0 { 1_000.0 } else { rpm + 37.0 };
            engine.update(
                black_box(rpm),
                0.5,
                EngineKind::Inline4,
                120.0,
                ExhaustKind::ScProject,
            );
        })
    });
}

criterion_group!(
    benches,
    bench_render_block,
    bench_render_with_transients,
    bench_update
);
criterion_main!(benches);

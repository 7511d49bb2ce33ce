use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;
use std::time::Duration;
use territory_sim::{RegionMerger, SimConfig, SimulationEngine, TerritoryGrid};

/// Default-size world after `ticks` of fighting, so ownership is fragmented.
fn contested_engine(ticks: usize) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig { fire_interval: 0.05, ..Default::default() })
        .expect("default config is valid");
    for _ in 0..ticks {
        engine.tick();
    }
    engine
}

fn bench_region_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_merge");
    let samples: usize = std::env::var("TS_BENCH_SAMPLES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(20);
    group.sample_size(samples);
    group.measurement_time(Duration::from_secs(10));

    let fresh = TerritoryGrid::from_config(&SimConfig::default());
    let mut merger = RegionMerger::new();
    group.bench_function("fresh_grid", |b| b.iter(|| black_box(merger.merge(&fresh))));

    let engine = contested_engine(600);
    let contested = engine.grid().clone();
    group.bench_function("contested_grid", |b| b.iter(|| black_box(merger.merge(&contested))));
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    group.sample_size(20);

    group.bench_function("busy_tick", |b| {
        b.iter_batched(
            || contested_engine(120),
            |mut engine| {
                engine.tick();
                black_box(engine.last_tally())
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("snapshot", |b| {
        let mut engine = contested_engine(120);
        b.iter(|| {
            engine.tick();
            black_box(engine.snapshot())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_region_merge, bench_tick);
criterion_main!(benches);

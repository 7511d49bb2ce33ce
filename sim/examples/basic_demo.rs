//! Basic demonstration of the territory simulation.
//!
//! Runs the default world on the background runner for a few seconds of wall
//! time, sampling snapshots the way a renderer would, then prints the
//! leaderboard.
//!
//! Run with: cargo run --release --example basic_demo
//! Profiling: cargo run --release --example basic_demo --features profile

use std::thread;
use std::time::Duration;
use territory_sim::render_bridge::{parse_count, regions_to_flatbuffer};
use territory_sim::{Owner, SimConfig, SimulationRunner, TerritoryStats};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = SimConfig::default();
    println!("=== Territory Simulation Demo ===\n");
    println!(
        "{} turrets, {:.0}x{:.0} world, {:.0}-unit cells, {:.0} Hz",
        config.turret_count,
        config.world_size,
        config.world_size,
        config.cell_size,
        1.0 / config.fixed_timestep
    );

    let mut runner = SimulationRunner::new(config)?;
    if cfg!(feature = "profile") {
        if let Some(engine) = runner.engine_mut() {
            engine.enable_profiling();
        }
    }

    let initial = runner.latest_snapshot();
    println!(
        "Initial: {} cells in {} regions\n",
        initial.constants.existing_cells,
        initial.regions.len()
    );

    runner.start()?;
    for _ in 0..5 {
        thread::sleep(Duration::from_secs(1));
        let snapshot = runner.latest_snapshot();
        let stats = TerritoryStats::from_cells(&snapshot.cells);
        let buffer = regions_to_flatbuffer(&snapshot);
        println!(
            "t={:5.2}s tick={:4} projectiles={:4} explosions={:3} regions={:5} neutral={:5.1}%",
            snapshot.time,
            snapshot.tick,
            snapshot.projectiles.len(),
            snapshot.explosions.len(),
            parse_count(&buffer).unwrap_or_default(),
            stats.percent_of(Owner::Neutral),
        );
    }
    runner.stop()?;

    let Some(engine) = runner.engine_mut() else {
        return Ok(());
    };
    println!("\n=== Leaderboard ===\n");
    let stats = engine.territory_stats();
    let scores = engine.scores();
    for (rank, (id, cells)) in stats.top(10).into_iter().enumerate() {
        let score = scores
            .iter()
            .find(|(turret, _)| *turret == id)
            .map(|(_, score)| *score)
            .unwrap_or_default();
        println!("{:2}. turret {:3}: {:6} cells, score {:6}", rank + 1, id.0, cells, score);
    }

    if let Some(profiler) = engine.profiler() {
        profiler.log_summary();
    }
    Ok(())
}

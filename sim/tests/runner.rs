//! Runner thread lifecycle driven by a manual clock.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use territory_sim::{
    ManualClock, Playfield, RunnerConfig, RunnerError, SimConfig, SimulationEngine, SimulationRunner,
    SimulationSnapshot, SnapshotHandle,
};

fn config() -> SimConfig {
    SimConfig {
        world_size: 200.0,
        cell_size: 10.0,
        playfield: Playfield::Full,
        turret_count: 4,
        turret_ring_radius: 80.0,
        fire_interval: 0.05,
        ..Default::default()
    }
    .with_tick_rate(64.0)
}

fn runner() -> (SimulationRunner<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let engine = SimulationEngine::new(config()).unwrap();
    let runner = SimulationRunner::with_clock(engine, clock.clone(), RunnerConfig::default());
    (runner, clock)
}

fn wait_for_tick(handle: &SnapshotHandle, tick: u64) -> Arc<SimulationSnapshot> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let latest = handle.latest();
        if latest.tick >= tick {
            return latest;
        }
        assert!(Instant::now() < deadline, "runner stuck at tick {}", latest.tick);
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn initial_snapshot_is_published_before_start() {
    let (runner, _clock) = runner();
    let snapshot = runner.latest_snapshot();

    assert!(!runner.is_running());
    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.turrets.len(), 4);
    assert_eq!(snapshot.cells.len(), 400);
    assert!(!snapshot.regions.is_empty());
}

#[test]
fn runs_whole_ticks_for_elapsed_time() {
    let (mut runner, clock) = runner();
    let handle = runner.snapshot_handle();
    runner.start().unwrap();

    // 125 ms at 64 Hz is exactly 8 ticks
    clock.advance(Duration::from_millis(125));
    let snapshot = wait_for_tick(&handle, 8);
    assert_eq!(snapshot.tick, 8);
    assert_eq!(snapshot.time, 0.125);

    runner.stop().unwrap();
    assert!(!runner.is_running());
    let engine = runner.engine().unwrap();
    assert_eq!(engine.current_tick(), 8);
}

#[test]
fn restart_continues_from_stopped_state() {
    let (mut runner, clock) = runner();
    let handle = runner.snapshot_handle();

    runner.start().unwrap();
    clock.advance(Duration::from_millis(125));
    wait_for_tick(&handle, 8);
    runner.stop().unwrap();

    // time passing while stopped is not simulated
    clock.advance(Duration::from_secs(3));
    runner.start().unwrap();
    clock.advance(Duration::from_millis(125));
    let snapshot = wait_for_tick(&handle, 16);
    runner.stop().unwrap();

    assert_eq!(snapshot.tick, 16);
    assert_eq!(runner.engine().unwrap().current_tick(), 16);
}

#[test]
fn lifecycle_errors() {
    let (mut runner, _clock) = runner();

    assert!(matches!(runner.stop(), Err(RunnerError::NotRunning)));
    runner.start().unwrap();
    assert!(matches!(runner.start(), Err(RunnerError::AlreadyRunning)));
    assert!(runner.engine().is_none());
    runner.stop().unwrap();
    assert!(runner.engine().is_some());
}

#[test]
fn readers_see_monotonic_ticks() {
    let (mut runner, clock) = runner();
    let handle = runner.snapshot_handle();
    runner.start().unwrap();

    let reader = {
        let handle = handle.clone();
        thread::spawn(move || {
            let mut last = 0;
            let deadline = Instant::now() + Duration::from_secs(10);
            while last < 64 && Instant::now() < deadline {
                let tick = handle.latest().tick;
                assert!(tick >= last);
                last = tick;
                thread::yield_now();
            }
            last
        })
    };

    for batch in 1..=8 {
        clock.advance(Duration::from_millis(125));
        wait_for_tick(&handle, batch * 8);
    }

    assert_eq!(reader.join().unwrap(), 64);
    runner.stop().unwrap();
    assert_eq!(runner.engine().unwrap().current_tick(), 64);
}

#[test]
fn dropping_a_running_runner_joins_the_thread() {
    let (mut runner, clock) = runner();
    let handle = runner.snapshot_handle();
    runner.start().unwrap();
    clock.advance(Duration::from_millis(125));
    wait_for_tick(&handle, 8);

    drop(runner);
    assert_eq!(handle.latest().tick, 8);
}

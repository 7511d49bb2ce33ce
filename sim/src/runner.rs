//! Threaded fixed-timestep runner.
//!
//! The runner moves a `SimulationEngine` onto a dedicated thread that feeds
//! real elapsed time into the engine's accumulator and publishes a fresh
//! snapshot after every batch of ticks. Readers on other threads only ever
//! clone an `Arc` under a short lock, so they never wait for a tick.
//!
//! Time comes from a [`Clock`] so tests can drive the loop with synthetic
//! time instead of wall time.

use crate::api::SimulationEngine;
use crate::config::SimConfig;
use crate::error::{RunnerError, SimError};
use crate::world::{SimulationSnapshot, WorldConstants};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Source of monotonic time in seconds.
pub trait Clock: Send + 'static {
    fn now(&self) -> f64;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Synthetic time advanced by hand. Clones share the same time source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.nanos.load(Ordering::Acquire) as f64 / 1e9
    }
}

/// Loop settings of the runner thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    /// Sleep between loop iterations, only to yield the CPU.
    pub idle_sleep: Duration,
    /// Longest real frame fed into the accumulator; longer stalls are dropped.
    pub max_frame_time: f64,
    /// Leaderboard length logged when the runner stops.
    pub leaderboard_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            idle_sleep: Duration::from_millis(1),
            max_frame_time: 0.25,
            leaderboard_size: 5,
        }
    }
}

/// Shared slot holding the most recently published snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    latest: Arc<Mutex<Arc<SimulationSnapshot>>>,
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new(SimulationSnapshot::default())
    }
}

impl SnapshotHandle {
    pub fn new(initial: SimulationSnapshot) -> Self {
        Self { latest: Arc::new(Mutex::new(Arc::new(initial))) }
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Arc<SimulationSnapshot> {
        match self.latest.lock() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: SimulationSnapshot) {
        let next = Arc::new(snapshot);
        match self.latest.lock() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

/// Owns the engine and, while running, the thread stepping it.
pub struct SimulationRunner<C: Clock = MonotonicClock> {
    /// Present while stopped; moved into the thread while running.
    parked: Option<(SimulationEngine, C)>,
    thread: Option<JoinHandle<(SimulationEngine, C)>>,
    stop: Arc<AtomicBool>,
    handle: SnapshotHandle,
    constants: WorldConstants,
    fixed_timestep: f32,
    config: RunnerConfig,
}

impl SimulationRunner<MonotonicClock> {
    /// Runner over a fresh engine, driven by wall-clock time.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let engine = SimulationEngine::new(config)?;
        Ok(Self::with_clock(engine, MonotonicClock::default(), RunnerConfig::default()))
    }
}

impl<C: Clock> SimulationRunner<C> {
    pub fn with_clock(mut engine: SimulationEngine, clock: C, config: RunnerConfig) -> Self {
        let handle = SnapshotHandle::new(engine.snapshot());
        let constants = engine.constants();
        let fixed_timestep = engine.fixed_timestep();
        Self {
            parked: Some((engine, clock)),
            thread: None,
            stop: Arc::new(AtomicBool::new(false)),
            handle,
            constants,
            fixed_timestep,
            config,
        }
    }

    /// Start the simulation thread.
    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.thread.is_some() {
            return Err(RunnerError::AlreadyRunning);
        }
        let (engine, clock) = self.parked.take().ok_or(RunnerError::Panicked)?;

        self.stop.store(false, Ordering::Release);
        let stop = Arc::clone(&self.stop);
        let handle = self.handle.clone();
        let config = self.config;
        let started_at = clock.now();

        let thread = thread::Builder::new()
            .name("territory-sim".to_string())
            .spawn(move || run_loop(engine, clock, started_at, stop, handle, config))?;
        self.thread = Some(thread);

        info!(
            tick_rate = 1.0 / self.fixed_timestep,
            turrets = self.constants.turret_count,
            "simulation thread started"
        );
        Ok(())
    }

    /// Signal the thread to stop and wait for it to finish its current tick.
    pub fn stop(&mut self) -> Result<(), RunnerError> {
        let thread = self.thread.take().ok_or(RunnerError::NotRunning)?;
        self.stop.store(true, Ordering::Release);

        let (engine, clock) = thread.join().map_err(|_| RunnerError::Panicked)?;
        info!(
            ticks = engine.current_tick(),
            time = engine.current_time(),
            "simulation thread stopped"
        );
        engine.territory_stats().log_leaderboard(self.config.leaderboard_size);
        self.parked = Some((engine, clock));
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// The most recent snapshot; the initial state before the first tick.
    pub fn latest_snapshot(&self) -> Arc<SimulationSnapshot> {
        self.handle.latest()
    }

    /// A cloneable reader for other threads.
    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.handle.clone()
    }

    pub fn constants(&self) -> WorldConstants {
        self.constants
    }

    /// The engine, available only while stopped.
    pub fn engine(&self) -> Option<&SimulationEngine> {
        self.parked.as_ref().map(|(engine, _)| engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut SimulationEngine> {
        self.parked.as_mut().map(|(engine, _)| engine)
    }
}

impl<C: Clock> Drop for SimulationRunner<C> {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.stop.store(true, Ordering::Release);
            if thread.join().is_err() {
                warn!("simulation thread panicked during shutdown");
            }
        }
    }
}

fn run_loop<C: Clock>(
    mut engine: SimulationEngine,
    clock: C,
    mut last: f64,
    stop: Arc<AtomicBool>,
    handle: SnapshotHandle,
    config: RunnerConfig,
) -> (SimulationEngine, C) {
    while !stop.load(Ordering::Acquire) {
        let now = clock.now();
        let mut frame = now - last;
        last = now;

        if frame > config.max_frame_time {
            warn!(frame, max = config.max_frame_time, "frame time clamped");
            frame = config.max_frame_time;
        }

        if frame > 0.0 && engine.step(frame as f32) > 0 {
            handle.publish(engine.snapshot());
        }

        thread::sleep(config.idle_sleep);
    }

    debug!(tick = engine.current_tick(), "simulation loop exited");
    (engine, clock)
}

//! Territory Simulation Core
//!
//! A deterministic, fixed-timestep ECS simulation of turrets fighting over a
//! grid of territory cells. Uses `bevy_ecs` for the entity-component-system
//! architecture.
//!
//! `SimulationEngine` owns and steps the world; `SimulationRunner` moves it
//! onto a dedicated thread and publishes immutable `SimulationSnapshot`s that
//! any number of readers can hold.

pub mod api;
pub mod cell;
pub mod collision;
pub mod components;
pub mod config;
pub mod effects;
pub mod error;
pub mod grid;
pub mod palette;
pub mod profiler;
pub mod projectile;
pub mod regions;
pub mod render_bridge;
pub mod runner;
pub mod spatial;
pub mod stats;
pub mod systems;
pub mod turret;
pub mod world;

pub use api::SimulationEngine;
pub use cell::{DamageOutcome, TerritoryCell};
pub use components::*;
pub use config::SimConfig;
pub use error::{ConfigError, RunnerError, SimError};
pub use grid::{GridCoord, GridGeometry, Playfield, TerritoryGrid};
pub use regions::{merge_regions, MergedRegion, RegionMerger, RegionSet};
pub use runner::{Clock, ManualClock, MonotonicClock, RunnerConfig, SimulationRunner, SnapshotHandle};
pub use stats::TerritoryStats;
pub use systems::*;
pub use world::{ProjectileSnapshot, SimulationSnapshot, TurretSnapshot, WorldConstants};

//! Public API for the simulation.
//!
//! `SimulationEngine` owns the ECS world and the per-tick schedule and is the
//! only thing that mutates simulation state. It is deliberately single
//! threaded; `runner::SimulationRunner` moves it onto a dedicated thread and
//! publishes snapshots for other threads.
//!
//! ## Fixed Timestep
//!
//! Every tick advances simulation time by exactly `fixed_timestep`. `step(dt)`
//! accumulates arbitrary frame time and runs as many whole ticks as fit, so
//! results do not depend on how time is fed in.
//!
//! ## Tick Order
//!
//! 1. clock advance (engine)
//! 2. `turret_aim_system`
//! 3. `turret_fire_system`
//! 4. `projectile_movement_system`
//! 5. `projectile_collision_system`
//! 6. `region_rebuild_system`
//! 7. `explosion_system`

use crate::cell::TerritoryCell;
use crate::components::*;
use crate::config::SimConfig;
use crate::effects::Explosions;
use crate::error::SimError;
use crate::grid::{GridCoord, TerritoryGrid};
use crate::profiler::Profiler;
use crate::projectile::{Projectile, ProjectileBundle, ProjectileCounter};
use crate::regions::{MergedRegion, RegionSet};
use crate::stats::TerritoryStats;
use crate::systems::*;
use crate::turret::{ring_layout, Launch};
use crate::world::{copy_cells, SimulationSnapshot, WorldConstants};
use bevy_ecs::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// The main simulation container.
pub struct SimulationEngine {
    world: World,
    schedule: Schedule,
    constants: WorldConstants,
    fixed_timestep: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f64,
    /// Cell array of the last snapshot, keyed by grid revision.
    cell_cache: Option<(u64, Arc<Vec<Option<TerritoryCell>>>)>,
    profiler: Option<Profiler>,
}

impl SimulationEngine {
    /// Create a simulation from a configuration, rejecting invalid values.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let grid = TerritoryGrid::from_config(&config);
        let regions = RegionSet::new(&grid, config.region_index_bucket as usize);
        let constants = WorldConstants::new(&config, &grid);

        let mut world = World::new();
        world.insert_resource(DeltaTime(config.fixed_timestep));
        world.insert_resource(SimClock::default());
        world.insert_resource(ProjectileCounter::default());
        world.insert_resource(CombatTally::default());
        world.insert_resource(Explosions::default());

        for bundle in ring_layout(&config) {
            world.spawn(bundle);
        }

        info!(
            grid_width = grid.width(),
            grid_height = grid.height(),
            existing_cells = grid.existing_cells(),
            turrets = config.turret_count,
            regions = regions.regions().len(),
            "simulation initialised"
        );

        let fixed_timestep = config.fixed_timestep;
        world.insert_resource(grid);
        world.insert_resource(regions);
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                turret_aim_system,
                turret_fire_system,
                projectile_movement_system,
                projectile_collision_system,
                region_rebuild_system,
                explosion_system,
            )
                .chain(),
        );

        Ok(Self {
            world,
            schedule,
            constants,
            fixed_timestep,
            time_accumulator: 0.0,
            cell_cache: None,
            profiler: None,
        })
    }

    /// Create a simulation with the default configuration.
    pub fn with_defaults() -> Result<Self, SimError> {
        Self::new(SimConfig::default())
    }

    /// Step the simulation forward by `dt` seconds of real time.
    ///
    /// Runs zero or more fixed ticks and returns how many ran. Leftover time
    /// carries into the next call. Non-positive or non-finite `dt` is ignored.
    pub fn step(&mut self, dt: f32) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }
        let fixed_dt = self.fixed_timestep as f64;
        self.time_accumulator += dt as f64;

        let mut ticks = 0;
        while self.time_accumulator >= fixed_dt {
            self.fixed_update();
            self.time_accumulator -= fixed_dt;
            ticks += 1;
        }
        ticks
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self) {
        self.fixed_update();
    }

    fn fixed_update(&mut self) {
        let start = self.profiler.is_some().then(Instant::now);

        let dt = self.fixed_timestep;
        self.world.insert_resource(DeltaTime(dt));
        self.world.insert_resource(CombatTally::default());
        self.world.resource_mut::<SimClock>().advance(dt);

        self.schedule.run(&mut self.world);

        if let (Some(profiler), Some(start)) = (self.profiler.as_mut(), start) {
            profiler.record("tick", start.elapsed());
            profiler.tick();
        }
    }

    /// Take an immutable snapshot of the current state.
    pub fn snapshot(&mut self) -> SimulationSnapshot {
        let start = self.profiler.is_some().then(Instant::now);

        let grid = self.world.resource::<TerritoryGrid>();
        let revision = grid.revision();
        let cached = self
            .cell_cache
            .as_ref()
            .filter(|(cached, _)| *cached == revision)
            .map(|(_, cells)| Arc::clone(cells));
        let cells = match cached {
            Some(cells) => cells,
            None => {
                let cells = Arc::new(copy_cells(grid));
                self.cell_cache = Some((revision, Arc::clone(&cells)));
                cells
            }
        };
        let snapshot = SimulationSnapshot::from_world(&mut self.world, self.constants, cells);

        if let (Some(profiler), Some(start)) = (self.profiler.as_mut(), start) {
            profiler.record("snapshot", start.elapsed());
        }
        snapshot
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> Result<String, serde_json::Error> {
        self.snapshot().to_json()
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f64 {
        self.world.resource::<SimClock>().time
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    pub fn constants(&self) -> WorldConstants {
        self.constants
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn grid(&self) -> &TerritoryGrid {
        self.world.resource::<TerritoryGrid>()
    }

    pub fn regions(&self) -> &[MergedRegion] {
        self.world.resource::<RegionSet>().regions()
    }

    /// Number of merged-region rebuilds so far, including the initial one.
    pub fn region_rebuilds(&self) -> u64 {
        self.world.resource::<RegionSet>().rebuild_count()
    }

    /// Counters of the most recent tick.
    pub fn last_tally(&self) -> CombatTally {
        *self.world.resource::<CombatTally>()
    }

    pub fn territory_stats(&self) -> TerritoryStats {
        TerritoryStats::from_cells(self.grid().cells())
    }

    /// Scores of all turrets in ascending id order.
    pub fn scores(&mut self) -> Vec<(TurretId, u64)> {
        let mut query = self.world.query::<(&TurretId, &Score)>();
        let mut scores: Vec<_> = query.iter(&self.world).map(|(id, s)| (*id, s.0)).collect();
        scores.sort_unstable_by_key(|(id, _)| *id);
        scores
    }

    /// Number of projectiles still in flight.
    pub fn projectile_count(&mut self) -> usize {
        let mut query = self.world.query::<&Projectile>();
        query.iter(&self.world).filter(|p| p.active).count()
    }

    /// Launch a projectile on behalf of `owner` outside the turret cadence.
    pub fn fire_projectile(
        &mut self,
        owner: TurretId,
        position: Position,
        velocity: Velocity,
    ) -> Result<ProjectileId, SimError> {
        if owner.0 >= self.constants.turret_count {
            return Err(SimError::UnknownTurret(owner.0));
        }
        let id = self.world.resource_mut::<ProjectileCounter>().issue();
        let bundle = ProjectileBundle::new(id, owner, Launch { position, velocity }, self.config());
        self.world.spawn(bundle);
        Ok(id)
    }

    /// Set a cell's owner directly and refresh the merged regions.
    pub fn assign_cell(&mut self, coord: GridCoord, owner: Owner) -> Result<(), SimError> {
        if let Owner::Turret(id) = owner {
            if id.0 >= self.constants.turret_count {
                return Err(SimError::UnknownTurret(id.0));
            }
        }
        self.world.resource_mut::<TerritoryGrid>().assign(coord, owner)?;
        self.world.resource_scope(|world, mut regions: Mut<RegionSet>| {
            regions.mark_dirty();
            regions.rebuild_if_dirty(world.resource::<TerritoryGrid>());
        });
        Ok(())
    }

    /// Start recording tick and snapshot timings.
    pub fn enable_profiling(&mut self) {
        self.profiler.get_or_insert_with(Profiler::new);
    }

    pub fn profiler(&self) -> Option<&Profiler> {
        self.profiler.as_ref()
    }

    /// Direct access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the ECS world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

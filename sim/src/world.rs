//! Snapshot types.
//!
//! A `SimulationSnapshot` is an immutable value copy of the simulation at the
//! end of one tick. Consumers on other threads read it without touching the
//! live ECS world. The large cell and region arrays sit behind `Arc` so
//! consecutive snapshots share them while they are unchanged.

use crate::cell::TerritoryCell;
use crate::components::*;
use crate::config::SimConfig;
use crate::effects::{Explosion, Explosions};
use crate::grid::{GridGeometry, TerritoryGrid};
use crate::palette::Rgb;
use crate::projectile::Projectile;
use crate::regions::{MergedRegion, RegionSet};
use crate::systems::clock::SimClock;
use crate::turret::Turret;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fixed facts about the world, exposed to renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldConstants {
    pub world_size: f32,
    pub cell_size: f32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub turret_count: u32,
    pub existing_cells: usize,
    pub explosion_duration: f32,
    pub explosion_max_radius: f32,
    pub transition_duration: f32,
    pub flip_duration: f32,
}

impl WorldConstants {
    pub fn new(config: &SimConfig, grid: &TerritoryGrid) -> Self {
        Self {
            world_size: config.world_size,
            cell_size: grid.cell_size(),
            grid_width: grid.width(),
            grid_height: grid.height(),
            turret_count: config.turret_count,
            existing_cells: grid.existing_cells(),
            explosion_duration: config.explosion_duration,
            explosion_max_radius: config.explosion_max_radius,
            transition_duration: config.transition_duration,
            flip_duration: config.flip_duration,
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.grid_width, self.grid_height, self.cell_size)
    }
}

/// Snapshot of a single turret.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub fire_dir_x: f32,
    pub fire_dir_y: f32,
    pub score: u64,
    pub color: Rgb,
}

/// Snapshot of a single in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

/// Complete simulation state at the end of one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Ticks completed when the snapshot was taken.
    pub tick: u64,
    /// Simulation time in seconds.
    pub time: f64,
    pub constants: WorldConstants,
    /// Turrets in ascending id order.
    pub turrets: Vec<TurretSnapshot>,
    /// Projectiles in firing order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Active explosion markers, oldest first.
    pub explosions: Vec<Explosion>,
    /// Row-major cells, `None` where no cell exists.
    pub cells: Arc<Vec<Option<TerritoryCell>>>,
    /// Merged regions in emission order.
    pub regions: Arc<Vec<MergedRegion>>,
}

impl SimulationSnapshot {
    /// Create a snapshot from the ECS world.
    ///
    /// `cells` is the cell array to publish; callers pass a cached copy when
    /// the grid has not changed since the previous snapshot.
    pub fn from_world(world: &mut World, constants: WorldConstants, cells: Arc<Vec<Option<TerritoryCell>>>) -> Self {
        let clock = world.get_resource::<SimClock>().copied().unwrap_or_default();

        let mut turret_query = world.query::<(&TurretId, &Turret, &Score)>();
        let mut turrets: Vec<TurretSnapshot> = turret_query
            .iter(world)
            .map(|(id, turret, score)| {
                let (fire_dir_x, fire_dir_y) = turret.fire_direction();
                TurretSnapshot {
                    id: id.0,
                    x: turret.position.x,
                    y: turret.position.y,
                    angle: turret.angle,
                    fire_dir_x,
                    fire_dir_y,
                    score: score.0,
                    color: turret.color,
                }
            })
            .collect();
        turrets.sort_unstable_by_key(|t| t.id);

        let mut projectile_query = world.query::<(&ProjectileId, &Projectile, &Position, &Velocity)>();
        let mut projectiles: Vec<ProjectileSnapshot> = projectile_query
            .iter(world)
            .filter(|(_, projectile, _, _)| projectile.active)
            .map(|(id, projectile, pos, vel)| ProjectileSnapshot {
                id: id.0,
                owner: projectile.owner.0,
                x: pos.x,
                y: pos.y,
                vx: vel.vx,
                vy: vel.vy,
                radius: projectile.radius,
            })
            .collect();
        projectiles.sort_unstable_by_key(|p| p.id);

        let explosions = world
            .get_resource::<Explosions>()
            .map(|e| e.0.clone())
            .unwrap_or_default();
        let regions = world
            .get_resource::<RegionSet>()
            .map(RegionSet::shared)
            .unwrap_or_default();

        Self {
            tick: clock.tick,
            time: clock.time,
            constants,
            turrets,
            projectiles,
            explosions,
            cells,
            regions,
        }
    }

    /// Look up a cell; `None` when out of range or absent.
    pub fn cell(&self, x: i64, y: i64) -> Option<&TerritoryCell> {
        let geometry = self.constants.geometry();
        let coord = geometry.coord(x, y)?;
        let index = geometry.index(coord)?;
        self.cells.get(index)?.as_ref()
    }

    pub fn turret(&self, id: TurretId) -> Option<&TurretSnapshot> {
        self.turrets
            .binary_search_by_key(&id.0, |t| t.id)
            .ok()
            .map(|i| &self.turrets[i])
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Copy the grid's cells into a fresh array for publication.
pub fn copy_cells(grid: &TerritoryGrid) -> Vec<Option<TerritoryCell>> {
    #[cfg(feature = "parallel")]
    {
        grid.cells().par_iter().copied().collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        grid.cells().to_vec()
    }
}

//! Projectiles: constant-velocity circles that damage territory on impact.

use crate::components::{Position, ProjectileId, TurretId, Velocity};
use crate::config::SimConfig;
use crate::turret::Launch;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Combat properties of a projectile.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: TurretId,
    pub damage: f32,
    pub radius: f32,
    /// Cleared when the projectile hits or leaves the world; it is despawned
    /// at the end of the tick.
    pub active: bool,
}

/// Launch point and ticks in flight. Position is always derived from these,
/// so rounding error does not accumulate over ticks.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Flight {
    pub origin: Position,
    pub ticks: u64,
}

impl Flight {
    pub fn new(origin: Position) -> Self {
        Self { origin, ticks: 0 }
    }

    /// Seconds in flight at a fixed step of `dt`.
    pub fn elapsed(&self, dt: f32) -> f64 {
        self.ticks as f64 * dt as f64
    }

    /// Advance by one tick of `dt` and return the new position.
    pub fn advance(&mut self, velocity: &Velocity, dt: f32) -> Position {
        self.ticks += 1;
        self.origin.offset_by(velocity, self.elapsed(dt))
    }

    pub fn distance_travelled(&self, velocity: &Velocity, dt: f32) -> f32 {
        (velocity.magnitude() as f64 * self.elapsed(dt)) as f32
    }
}

/// Whether a position lies inside the closed square `[0, world_size]`.
pub fn in_world(position: &Position, world_size: f32) -> bool {
    (0.0..=world_size).contains(&position.x) && (0.0..=world_size).contains(&position.y)
}

/// Monotonic source of projectile ids.
#[derive(Resource, Debug, Default)]
pub struct ProjectileCounter {
    next: u64,
}

impl ProjectileCounter {
    pub fn issue(&mut self) -> ProjectileId {
        let id = ProjectileId(self.next);
        self.next += 1;
        id
    }

    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Bundle for spawning a projectile entity.
#[derive(Bundle, Debug, Clone)]
pub struct ProjectileBundle {
    pub id: ProjectileId,
    pub projectile: Projectile,
    pub position: Position,
    pub velocity: Velocity,
    pub flight: Flight,
}

impl ProjectileBundle {
    pub fn new(id: ProjectileId, owner: TurretId, launch: Launch, config: &SimConfig) -> Self {
        Self {
            id,
            projectile: Projectile {
                owner,
                damage: config.projectile_damage,
                radius: config.projectile_radius,
                active: true,
            },
            position: launch.position,
            velocity: launch.velocity,
            flight: Flight::new(launch.position),
        }
    }
}

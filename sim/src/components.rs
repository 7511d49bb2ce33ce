//! ECS components shared by turrets, projectiles and territory.
//!
//! Components are plain data. Behaviour that belongs to one kind of entity
//! lives next to it (`turret`, `projectile`); systems stitch them together.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position in world units. The world spans `[0, world_size]` on both axes.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point reached after moving along `velocity` for `t` seconds.
    /// Computed in `f64` so long flights stay exact to `f32` precision.
    pub fn offset_by(&self, velocity: &Velocity, t: f64) -> Self {
        Self {
            x: (self.x as f64 + velocity.vx as f64 * t) as f32,
            y: (self.y as f64 + velocity.vy as f64 * t) as f32,
        }
    }
}

/// 2D velocity vector in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    pub fn magnitude(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Identifier of a turret; doubles as its territory owner id.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TurretId(pub u32);

/// Identifier of a projectile, assigned in firing order.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProjectileId(pub u64);

/// Owner of a territory cell or merged region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Neutral,
    Turret(TurretId),
}

impl Owner {
    /// Flat integer form: `-1` for neutral, the turret id otherwise.
    pub fn as_raw(&self) -> i64 {
        match self {
            Owner::Neutral => -1,
            Owner::Turret(id) => id.0 as i64,
        }
    }

    pub fn turret(&self) -> Option<TurretId> {
        match self {
            Owner::Neutral => None,
            Owner::Turret(id) => Some(*id),
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Owner::Neutral)
    }
}

impl From<TurretId> for Owner {
    fn from(id: TurretId) -> Self {
        Owner::Turret(id)
    }
}

// ============================================================================
// SCORING COMPONENTS
// ============================================================================

/// Cumulative capture score of a turret.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score(pub u64);

impl Score {
    /// Points for capturing a neutral cell.
    pub const NEUTRAL_CAPTURE: u64 = 1;
    /// Points for capturing a cell owned by another turret.
    pub const ENEMY_CAPTURE: u64 = 2;

    /// Award points for a capture whose cell previously belonged to `previous`.
    pub fn award_capture(&mut self, previous: Owner) -> u64 {
        let points = if previous.is_neutral() {
            Self::NEUTRAL_CAPTURE
        } else {
            Self::ENEMY_CAPTURE
        };
        self.0 += points;
        points
    }
}

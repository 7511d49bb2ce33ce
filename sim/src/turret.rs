//! Turrets: fixed emitters on a ring around the world centre.
//!
//! Each turret sweeps its aim back and forth within +/- `MAX_SWEEP` of the
//! direction pointing at the world centre, and fires on a fixed cadence.

use crate::components::{Position, Score, TurretId, Velocity};
use crate::config::SimConfig;
use crate::palette::{self, Rgb};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Maximum aim deviation from the centre direction, in radians.
pub const MAX_SWEEP: f32 = FRAC_PI_2;

/// Spawn parameters of a projectile produced by a successful shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Position,
    pub velocity: Velocity,
}

/// Aim and fire state of one turret.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub position: Position,
    /// Unit vector from the turret toward the world centre.
    pub center_direction: (f32, f32),
    /// Current aim offset from `center_direction`, in radians.
    pub angle: f32,
    /// +1 while sweeping counter-clockwise, -1 otherwise.
    pub sweep: f32,
    pub angular_speed: f32,
    pub fire_interval: f32,
    /// Simulation time of the last shot.
    pub last_fire_time: f64,
    pub projectile_speed: f32,
    pub barrel_length: f32,
    pub color: Rgb,
}

impl Turret {
    pub fn new(position: Position, center_direction: (f32, f32), config: &SimConfig, color: Rgb) -> Self {
        Self {
            position,
            center_direction,
            angle: 0.0,
            sweep: 1.0,
            angular_speed: config.angular_speed,
            fire_interval: config.fire_interval,
            last_fire_time: 0.0,
            projectile_speed: config.projectile_speed,
            barrel_length: config.barrel_length,
            color,
        }
    }

    /// Advance the aim oscillation by `dt`, reversing at either bound.
    pub fn update_angle(&mut self, dt: f32) {
        self.angle += self.sweep * self.angular_speed * dt;
        if self.angle >= MAX_SWEEP {
            self.angle = MAX_SWEEP;
            self.sweep = -1.0;
        } else if self.angle <= -MAX_SWEEP {
            self.angle = -MAX_SWEEP;
            self.sweep = 1.0;
        }
    }

    /// Unit fire direction: the centre direction rotated by the aim angle.
    pub fn fire_direction(&self) -> (f32, f32) {
        let (sin, cos) = self.angle.sin_cos();
        let (cx, cy) = self.center_direction;
        (cx * cos - cy * sin, cx * sin + cy * cos)
    }

    pub fn can_fire(&self, now: f64) -> bool {
        now - self.last_fire_time >= self.fire_interval as f64
    }

    /// Fire if the cadence allows it, recording `now` as the shot time.
    pub fn try_fire(&mut self, now: f64) -> Option<Launch> {
        if !self.can_fire(now) {
            return None;
        }
        self.last_fire_time = now;

        let (dx, dy) = self.fire_direction();
        Some(Launch {
            position: Position::new(
                self.position.x + dx * self.barrel_length,
                self.position.y + dy * self.barrel_length,
            ),
            velocity: Velocity::new(dx * self.projectile_speed, dy * self.projectile_speed),
        })
    }
}

/// Bundle for spawning a turret entity.
#[derive(Bundle, Debug, Clone)]
pub struct TurretBundle {
    pub id: TurretId,
    pub turret: Turret,
    pub score: Score,
}

/// Lay `config.turret_count` turrets evenly on a ring around the world centre.
pub fn ring_layout(config: &SimConfig) -> Vec<TurretBundle> {
    let count = config.turret_count as usize;
    let colors = palette::generate(count, config.palette_seed);
    let centre = config.world_centre();

    colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| {
            let theta = i as f32 * TAU / count as f32;
            let (sin, cos) = theta.sin_cos();
            let position = Position::new(
                centre.x + cos * config.turret_ring_radius,
                centre.y + sin * config.turret_ring_radius,
            );
            TurretBundle {
                id: TurretId(i as u32),
                turret: Turret::new(position, (-cos, -sin), config, color),
                score: Score::default(),
            }
        })
        .collect()
}

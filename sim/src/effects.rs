//! Short-lived explosion markers left where projectiles hit territory.

use crate::components::{Position, TurretId};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// One explosion marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub position: Position,
    /// Turret whose projectile caused the explosion.
    pub owner: TurretId,
    pub start_time: f64,
}

impl Explosion {
    /// Fade progress in `0..=1`.
    pub fn progress(&self, now: f64, duration: f32) -> f32 {
        (((now - self.start_time) / duration as f64) as f32).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64, duration: f32) -> bool {
        now - self.start_time >= duration as f64
    }

    /// Display radius, growing linearly to `max_radius` over the lifetime.
    pub fn radius(&self, now: f64, duration: f32, max_radius: f32) -> f32 {
        max_radius * self.progress(now, duration)
    }

    /// Display opacity: fades linearly to zero.
    pub fn alpha(&self, now: f64, duration: f32) -> f32 {
        1.0 - self.progress(now, duration)
    }
}

/// Active explosion markers, oldest first.
#[derive(Resource, Debug, Default, Clone)]
pub struct Explosions(pub Vec<Explosion>);

impl Explosions {
    pub fn push(&mut self, explosion: Explosion) {
        self.0.push(explosion);
    }

    /// Drop every marker whose duration has elapsed.
    pub fn expire(&mut self, now: f64, duration: f32) -> usize {
        let before = self.0.len();
        self.0.retain(|e| !e.is_finished(now, duration));
        before - self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

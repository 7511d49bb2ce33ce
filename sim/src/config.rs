//! Simulation configuration.
//!
//! `SimConfig` is both an ECS resource (systems read it every tick) and a
//! serde struct, so a whole configuration can be loaded from JSON. Missing
//! fields fall back to the defaults below.

use crate::components::Position;
use crate::error::ConfigError;
use crate::grid::Playfield;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Global simulation configuration.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (1/60 = 60 Hz).
    pub fixed_timestep: f32,
    /// Side length of the square world; positions live in `[0, world_size]`.
    pub world_size: f32,
    /// Edge length of one territory cell.
    pub cell_size: f32,
    /// Which cells of the square grid exist.
    pub playfield: Playfield,
    /// Number of turrets placed on the ring.
    pub turret_count: u32,
    /// Radius of the ring the turrets sit on, centred on the world centre.
    pub turret_ring_radius: f32,
    /// Durability a cell is reset to after every capture.
    pub max_durability: f32,
    /// Seconds between two shots of one turret.
    pub fire_interval: f32,
    /// Aim sweep speed in radians per second.
    pub angular_speed: f32,
    /// Distance from the turret centre at which projectiles spawn.
    pub barrel_length: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_radius: f32,
    /// Distance after which a projectile is discarded even inside the world.
    pub projectile_max_range: f32,
    pub explosion_duration: f32,
    pub explosion_max_radius: f32,
    /// Colour transition time used by renderers after a capture.
    pub transition_duration: f32,
    /// Flip animation time used by renderers after a capture.
    pub flip_duration: f32,
    /// Edge length, in cells, of one broad-phase index bucket.
    pub region_index_bucket: u32,
    /// Seed of the turret colour table.
    pub palette_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            world_size: 10_000.0,
            cell_size: 10.0,
            playfield: Playfield::Circle { radius: 4_500.0 },
            turret_count: 100,
            turret_ring_radius: 4_500.0,
            max_durability: 1.0,
            fire_interval: 0.5,
            angular_speed: std::f32::consts::FRAC_PI_2,
            barrel_length: 25.0,
            projectile_speed: 500.0,
            projectile_damage: 1.0,
            projectile_radius: 10.0,
            projectile_max_range: 20_000.0,
            explosion_duration: 0.3,
            explosion_max_radius: 75.0,
            transition_duration: 0.4,
            flip_duration: 0.3,
            region_index_bucket: 32,
            palette_seed: 42,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Set the fixed timestep from a tick rate in Hz.
    pub fn with_tick_rate(mut self, hz: f32) -> Self {
        self.fixed_timestep = 1.0 / hz;
        self
    }

    /// Centre of the world square. The circular playfield and the turret ring
    /// share it even when the grid does not cover the whole world.
    pub fn world_centre(&self) -> Position {
        Position::new(self.world_size / 2.0, self.world_size / 2.0)
    }

    /// Number of cells along each axis of the square grid.
    pub fn grid_dimension(&self) -> usize {
        (self.world_size / self.cell_size).floor() as usize
    }

    /// Check every field that would make the simulation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("fixed_timestep", self.fixed_timestep),
            ("world_size", self.world_size),
            ("cell_size", self.cell_size),
            ("max_durability", self.max_durability),
            ("fire_interval", self.fire_interval),
            ("projectile_speed", self.projectile_speed),
            ("projectile_damage", self.projectile_damage),
            ("explosion_duration", self.explosion_duration),
        ];
        let non_negative = [
            ("turret_ring_radius", self.turret_ring_radius),
            ("angular_speed", self.angular_speed),
            ("barrel_length", self.barrel_length),
            ("projectile_radius", self.projectile_radius),
            ("projectile_max_range", self.projectile_max_range),
            ("explosion_max_radius", self.explosion_max_radius),
            ("transition_duration", self.transition_duration),
            ("flip_duration", self.flip_duration),
        ];

        for &(field, value) in positive.iter().chain(non_negative.iter()) {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        for &(field, value) in &positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value: value as f64 });
            }
        }
        for &(field, value) in &non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value: value as f64 });
            }
        }
        if let Playfield::Circle { radius } = self.playfield {
            if !radius.is_finite() {
                return Err(ConfigError::NotFinite { field: "playfield.radius" });
            }
            if radius < 0.0 {
                return Err(ConfigError::Negative { field: "playfield.radius", value: radius as f64 });
            }
        }
        if self.region_index_bucket == 0 {
            return Err(ConfigError::ZeroBucket);
        }
        if self.grid_dimension() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(())
    }
}

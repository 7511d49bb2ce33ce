//! Movement systems - turret aim sweep and projectile flight.

use crate::components::*;
use crate::config::SimConfig;
use crate::projectile::{in_world, Flight, Projectile};
use crate::systems::clock::DeltaTime;
use crate::turret::Turret;
use bevy_ecs::prelude::*;
use tracing::trace;

/// System that sweeps every turret's aim back and forth.
pub fn turret_aim_system(dt: Res<DeltaTime>, mut turrets: Query<&mut Turret>) {
    let delta = dt.0;
    for mut turret in turrets.iter_mut() {
        turret.update_angle(delta);
    }
}

/// System that moves projectiles and retires the ones that left the world or
/// exceeded their range.
pub fn projectile_movement_system(
    dt: Res<DeltaTime>,
    config: Res<SimConfig>,
    mut commands: Commands,
    mut query: Query<(Entity, &ProjectileId, &mut Projectile, &mut Position, &Velocity, &mut Flight)>,
) {
    let delta = dt.0;
    for (entity, id, mut projectile, mut pos, vel, mut flight) in query.iter_mut() {
        if !projectile.active {
            continue;
        }

        *pos = flight.advance(vel, delta);

        let out_of_world = !in_world(&pos, config.world_size);
        if out_of_world || flight.distance_travelled(vel, delta) > config.projectile_max_range {
            trace!(projectile = id.0, out_of_world, "projectile retired");
            projectile.active = false;
            commands.entity(entity).despawn();
        }
    }
}

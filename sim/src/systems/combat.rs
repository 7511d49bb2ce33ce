//! Combat systems - turret firing and projectile impacts on territory.
//!
//! Both systems are order sensitive. Turrets fire in ascending id order so
//! projectile ids follow a stable order, and projectiles resolve impacts in
//! ascending id order because an earlier capture changes what a later
//! projectile's narrow phase sees within the same tick.

use crate::cell::DamageOutcome;
use crate::collision::{self, CollisionQuery};
use crate::components::*;
use crate::config::SimConfig;
use crate::effects::{Explosion, Explosions};
use crate::grid::TerritoryGrid;
use crate::projectile::{Projectile, ProjectileBundle, ProjectileCounter};
use crate::regions::RegionSet;
use crate::systems::clock::SimClock;
use crate::turret::Turret;
use bevy_ecs::prelude::*;
use tracing::trace;

/// Per-tick counters, reset by the engine before each tick.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CombatTally {
    pub shots: u32,
    pub hits: u32,
    pub captures: u32,
}

/// System that lets every turret whose cadence elapsed fire one projectile.
pub fn turret_fire_system(
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut counter: ResMut<ProjectileCounter>,
    mut tally: ResMut<CombatTally>,
    mut commands: Commands,
    mut turrets: Query<(&TurretId, &mut Turret)>,
) {
    let mut ordered: Vec<_> = turrets.iter_mut().collect();
    ordered.sort_unstable_by_key(|(id, _)| **id);

    for (id, mut turret) in ordered {
        if let Some(launch) = turret.try_fire(clock.time) {
            let projectile_id = counter.issue();
            commands.spawn(ProjectileBundle::new(projectile_id, *id, launch, &config));
            tally.shots += 1;
        }
    }
}

/// System that resolves projectile impacts: damage, capture, scoring and
/// explosion markers. Captures mark the merged regions dirty; the rebuild
/// happens once, after every projectile has been processed.
#[allow(clippy::too_many_arguments)]
pub fn projectile_collision_system(
    clock: Res<SimClock>,
    mut grid: ResMut<TerritoryGrid>,
    mut regions: ResMut<RegionSet>,
    mut explosions: ResMut<Explosions>,
    mut tally: ResMut<CombatTally>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &ProjectileId, &mut Projectile, &Position)>,
    mut scores: Query<(&TurretId, &mut Score)>,
) {
    let mut ordered: Vec<(ProjectileId, Entity)> =
        projectiles.iter().map(|(entity, id, _, _)| (*id, entity)).collect();
    ordered.sort_unstable_by_key(|(id, _)| *id);

    for (id, entity) in ordered {
        let Ok((_, _, mut projectile, pos)) = projectiles.get_mut(entity) else {
            continue;
        };
        if !projectile.active {
            continue;
        }

        let query = CollisionQuery {
            owner: projectile.owner,
            x: pos.x,
            y: pos.y,
            radius: projectile.radius,
        };
        let Some(coord) = collision::resolve(&grid, &regions, &query) else {
            continue;
        };

        tally.hits += 1;
        let outcome = grid.apply_damage(coord, projectile.damage, projectile.owner, clock.time);
        if let Some(DamageOutcome::Captured { previous }) = outcome {
            tally.captures += 1;
            regions.mark_dirty();
            if let Some((_, mut score)) = scores.iter_mut().find(|(owner, _)| **owner == projectile.owner) {
                score.award_capture(previous);
            }
            trace!(
                projectile = id.0,
                turret = projectile.owner.0,
                x = coord.x,
                y = coord.y,
                previous = previous.as_raw(),
                "cell captured"
            );
        }

        explosions.push(Explosion {
            position: *pos,
            owner: projectile.owner,
            start_time: clock.time,
        });
        projectile.active = false;
        commands.entity(entity).despawn();
    }
}

//! Territory bookkeeping systems - merged region rebuild and effect expiry.

use crate::config::SimConfig;
use crate::effects::Explosions;
use crate::grid::TerritoryGrid;
use crate::regions::RegionSet;
use crate::systems::clock::SimClock;
use crate::systems::combat::CombatTally;
use bevy_ecs::prelude::*;
use tracing::debug;

/// System that rebuilds merged regions once if any capture happened this tick.
pub fn region_rebuild_system(
    clock: Res<SimClock>,
    grid: Res<TerritoryGrid>,
    tally: Res<CombatTally>,
    mut regions: ResMut<RegionSet>,
) {
    if regions.rebuild_if_dirty(&grid) {
        debug!(
            tick = clock.tick,
            captures = tally.captures,
            regions = regions.regions().len(),
            "merged regions rebuilt"
        );
    }
}

/// System that drops explosion markers whose fade finished.
pub fn explosion_system(clock: Res<SimClock>, config: Res<SimConfig>, mut explosions: ResMut<Explosions>) {
    explosions.expire(clock.time, config.explosion_duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Owner, Position, TurretId};
    use crate::effects::Explosion;
    use crate::grid::{GridCoord, GridGeometry, Playfield};

    #[test]
    fn test_rebuild_runs_only_when_dirty() {
        let mut world = World::new();
        let grid = TerritoryGrid::new(GridGeometry::new(6, 6, 1.0), Playfield::Full, 1.0);
        world.insert_resource(RegionSet::new(&grid, 2));
        world.insert_resource(grid);
        world.insert_resource(SimClock::default());
        world.insert_resource(CombatTally::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(region_rebuild_system);
        schedule.run(&mut world);
        assert_eq!(world.resource::<RegionSet>().rebuild_count(), 1);

        world
            .resource_mut::<TerritoryGrid>()
            .assign(GridCoord::new(2, 2), Owner::Turret(TurretId(0)))
            .unwrap();
        world.resource_mut::<RegionSet>().mark_dirty();
        schedule.run(&mut world);

        let regions = world.resource::<RegionSet>();
        assert_eq!(regions.rebuild_count(), 2);
        assert!(!regions.is_dirty());
        assert_eq!(regions.regions().iter().filter(|r| !r.owner.is_neutral()).count(), 1);
    }

    #[test]
    fn test_explosions_expire() {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());
        world.insert_resource(SimClock { tick: 60, time: 1.0 });
        let mut explosions = Explosions::default();
        for start_time in [0.5, 0.9] {
            explosions.push(Explosion { position: Position::default(), owner: TurretId(0), start_time });
        }
        world.insert_resource(explosions);

        let mut schedule = Schedule::default();
        schedule.add_systems(explosion_system);
        schedule.run(&mut world);

        let remaining = world.resource::<Explosions>();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.0[0].start_time, 0.9);
    }
}

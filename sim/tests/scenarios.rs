//! End-to-end scenarios driven through `SimulationEngine`.

use territory_sim::{
    GridCoord, MergedRegion, Owner, Playfield, Position, SimConfig, SimulationEngine, TurretId, Velocity,
};

/// 10x10 existing cells, two turrets that never fire on their own.
fn small_config() -> SimConfig {
    SimConfig {
        world_size: 100.0,
        cell_size: 10.0,
        playfield: Playfield::Full,
        turret_count: 2,
        turret_ring_radius: 40.0,
        fire_interval: 1000.0,
        projectile_radius: 1.0,
        ..Default::default()
    }
    .with_tick_rate(64.0)
}

fn engine(config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config).expect("valid config")
}

/// Park a motionless projectile on the centre of `(x, y)`.
fn drop_on(sim: &mut SimulationEngine, owner: u32, x: usize, y: usize) {
    let centre = sim.grid().geometry().cell_center(GridCoord::new(x, y));
    sim.fire_projectile(TurretId(owner), centre, Velocity::default())
        .expect("known turret");
}

fn score_of(sim: &mut SimulationEngine, id: u32) -> u64 {
    sim.scores()
        .into_iter()
        .find(|(turret, _)| turret.0 == id)
        .map(|(_, score)| score)
        .unwrap_or_default()
}

fn rects(regions: &[MergedRegion]) -> Vec<(Owner, usize, usize, usize, usize)> {
    regions
        .iter()
        .map(|r| (r.owner, r.start_x, r.start_y, r.width, r.height))
        .collect()
}

#[test]
fn neutral_capture_splits_region_and_scores_one() {
    let mut sim = engine(small_config());
    assert_eq!(rects(sim.regions()), vec![(Owner::Neutral, 0, 0, 10, 10)]);

    drop_on(&mut sim, 0, 3, 3);
    sim.tick();

    let turret0 = Owner::Turret(TurretId(0));
    assert_eq!(sim.grid().owner_at(GridCoord::new(3, 3)), Some(turret0));
    assert_eq!(score_of(&mut sim, 0), 1);
    assert_eq!(score_of(&mut sim, 1), 0);
    assert_eq!(sim.projectile_count(), 0);

    let regions = rects(sim.regions());
    assert_eq!(
        regions,
        vec![
            (Owner::Neutral, 0, 0, 10, 3),
            (Owner::Neutral, 0, 3, 3, 7),
            (turret0, 3, 3, 1, 1),
            (Owner::Neutral, 4, 3, 6, 7),
            (Owner::Neutral, 3, 4, 1, 6),
        ]
    );
    let owned: Vec<_> = regions.iter().filter(|r| r.0 == turret0).collect();
    assert_eq!(owned.len(), 1);
}

#[test]
fn enemy_capture_scores_two_and_records_previous_owner() {
    let mut sim = engine(small_config());
    let coord = GridCoord::new(3, 3);
    sim.assign_cell(coord, Owner::Turret(TurretId(1))).unwrap();

    drop_on(&mut sim, 0, 3, 3);
    sim.tick();

    let cell = sim.grid().get(coord).copied().unwrap();
    assert_eq!(cell.owner, Owner::Turret(TurretId(0)));
    assert_eq!(cell.previous_owner, Owner::Turret(TurretId(1)));
    assert_eq!(cell.durability, sim.config().max_durability);
    assert_eq!(score_of(&mut sim, 0), 2);
}

#[test]
fn capture_takes_ceil_durability_over_damage_hits() {
    let config = SimConfig { max_durability: 3.0, ..small_config() };
    let mut sim = engine(config);
    let coord = GridCoord::new(6, 2);

    for hit in 1..=3 {
        drop_on(&mut sim, 1, 6, 2);
        sim.tick();
        let cell = sim.grid().get(coord).copied().unwrap();
        if hit < 3 {
            assert_eq!(cell.owner, Owner::Neutral);
            assert_eq!(cell.durability, 3.0 - hit as f32);
            assert_eq!(sim.last_tally().captures, 0);
        } else {
            assert_eq!(cell.owner, Owner::Turret(TurretId(1)));
            assert_eq!(cell.durability, 3.0);
            assert_eq!(sim.last_tally().captures, 1);
        }
    }
    assert_eq!(score_of(&mut sim, 1), 1);
}

#[test]
fn projectile_over_own_territory_keeps_flying() {
    let mut sim = engine(small_config());
    let coord = GridCoord::new(3, 3);
    sim.assign_cell(coord, Owner::Turret(TurretId(0))).unwrap();

    drop_on(&mut sim, 0, 3, 3);
    for _ in 0..10 {
        sim.tick();
        assert_eq!(sim.last_tally().hits, 0);
    }

    assert_eq!(sim.projectile_count(), 1);
    assert_eq!(sim.grid().owner_at(coord), Some(Owner::Turret(TurretId(0))));
    assert_eq!(score_of(&mut sim, 0), 0);
}

#[test]
fn captures_in_one_tick_share_one_rebuild() {
    let mut sim = engine(small_config());
    let before = sim.region_rebuilds();

    drop_on(&mut sim, 0, 1, 1);
    drop_on(&mut sim, 1, 8, 8);
    drop_on(&mut sim, 0, 5, 5);
    sim.tick();

    assert_eq!(sim.last_tally().captures, 3);
    assert_eq!(sim.region_rebuilds(), before + 1);

    sim.tick();
    assert_eq!(sim.region_rebuilds(), before + 1);
}

#[test]
fn projectile_leaving_the_world_is_removed_that_tick() {
    let config = SimConfig { projectile_radius: 10.0, ..small_config() };
    let mut sim = engine(config);

    // 600 u/s for 1/64 s carries it from x=95 to x=104.375
    sim.fire_projectile(TurretId(0), Position::new(95.0, 5.0), Velocity::new(600.0, 0.0))
        .unwrap();
    sim.tick();

    assert_eq!(sim.projectile_count(), 0);
    assert_eq!(sim.last_tally().hits, 0);
    assert!(sim.grid().iter().all(|(_, cell)| cell.owner == Owner::Neutral));
    assert!(sim.snapshot().projectiles.is_empty());
}

#[test]
fn long_flight_at_sixty_hertz_does_not_drift() {
    // default 60 Hz step; a few cells in the middle, far from the flight path
    let config = SimConfig {
        world_size: 20_000.0,
        cell_size: 100.0,
        playfield: Playfield::Circle { radius: 100.0 },
        turret_count: 1,
        turret_ring_radius: 0.0,
        fire_interval: 1000.0,
        ..Default::default()
    };
    let mut sim = engine(config);
    let id = sim
        .fire_projectile(TurretId(0), Position::new(10.0, 50.0), Velocity::new(500.0, 0.0))
        .unwrap();

    for _ in 0..1200 {
        sim.tick();
    }

    let t = 1200.0 * sim.fixed_timestep() as f64;
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.time, t);

    let projectile = snapshot.projectiles.iter().find(|p| p.id == id.0).copied().unwrap();
    assert_eq!(projectile.x, (10.0 + 500.0 * t) as f32);
    assert_eq!(projectile.y, 50.0);
    assert!((projectile.x - 10_010.0).abs() < 1e-3);
}

#[test]
fn turret_projectile_follows_straight_line_exactly() {
    // only the four cells around the centre exist, well away from both paths
    let config = SimConfig {
        playfield: Playfield::Circle { radius: 10.0 },
        fire_interval: 0.5,
        projectile_speed: 50.0,
        ..small_config()
    };
    let barrel = config.barrel_length;
    let mut sim = engine(config);

    for _ in 0..32 {
        sim.tick();
    }
    assert_eq!(sim.last_tally().shots, 2);

    let fired = sim.snapshot();
    let turret = *fired.turret(TurretId(0)).unwrap();
    let projectile = fired.projectiles.iter().find(|p| p.owner == 0).copied().unwrap();
    let start = Position::new(
        turret.x + turret.fire_dir_x * barrel,
        turret.y + turret.fire_dir_y * barrel,
    );
    let velocity = Velocity::new(projectile.vx, projectile.vy);
    assert!((velocity.magnitude() - 50.0).abs() < 1e-3);

    for _ in 0..16 {
        sim.tick();
    }
    let later = sim.snapshot();
    let moved = later.projectiles.iter().find(|p| p.id == projectile.id).copied().unwrap();

    // spawned and moved once during the firing tick, then 16 more ticks
    let expected = start.offset_by(&velocity, 17.0 / 64.0);
    assert_eq!((moved.x, moved.y), (expected.x, expected.y));
    assert_eq!(later.projectiles.len(), 2);
}

#[test]
fn snapshot_is_valid_before_the_first_tick() {
    let mut sim = engine(small_config());
    let snapshot = sim.snapshot();

    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.time, 0.0);
    assert_eq!(snapshot.turrets.len(), 2);
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(snapshot.regions.len(), 1);
    assert_eq!(snapshot.constants.existing_cells, 100);
    assert_eq!(snapshot.cell(3, 3).map(|c| c.owner), Some(Owner::Neutral));
    assert!(snapshot.cell(-1, 0).is_none());
    assert!(snapshot.cell(10, 0).is_none());
}

#[test]
fn identical_configs_produce_identical_runs() {
    let config = SimConfig {
        world_size: 1_000.0,
        playfield: Playfield::Circle { radius: 450.0 },
        turret_count: 8,
        turret_ring_radius: 450.0,
        fire_interval: 0.1,
        ..Default::default()
    };
    let mut a = engine(config.clone());
    let mut b = engine(config);

    for _ in 0..300 {
        a.tick();
        b.tick();
    }

    let (sa, sb) = (a.snapshot(), b.snapshot());
    assert_eq!(sa.cells, sb.cells);
    assert_eq!(sa.regions, sb.regions);
    assert_eq!(sa.turrets, sb.turrets);
    assert_eq!(sa.projectiles, sb.projectiles);
    assert_eq!(a.scores(), b.scores());

    let total: u64 = a.scores().iter().map(|(_, s)| s).sum();
    assert!(total > 0, "turrets should have captured something");
}

#[test]
fn scores_match_territory_changes() {
    let mut sim = engine(small_config());
    sim.assign_cell(GridCoord::new(0, 0), Owner::Turret(TurretId(1))).unwrap();

    drop_on(&mut sim, 0, 0, 0);
    drop_on(&mut sim, 0, 9, 9);
    sim.tick();
    drop_on(&mut sim, 1, 9, 9);
    sim.tick();

    assert_eq!(score_of(&mut sim, 0), 3);
    assert_eq!(score_of(&mut sim, 1), 2);

    let stats = sim.territory_stats();
    assert_eq!(stats.cells_of(Owner::Turret(TurretId(0))), 1);
    assert_eq!(stats.cells_of(Owner::Turret(TurretId(1))), 1);
    assert_eq!(stats.neutral, 98);
    assert_eq!(stats.total(), 100);
}

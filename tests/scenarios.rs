//! End-to-end match scenarios driven tick by tick

use exploding_cubes::sim::{
    AnchorId, BodyRef, Contact, CubeState, Detonation, EntityId, GameEvent, GamePhase, GameState,
    SurfaceEvent, SurfaceMeasurement, Tap, TickInput, tick,
};
use exploding_cubes::{secs_to_ticks, ticks_to_secs};
use glam::{Vec2, Vec3};

fn surface(anchor: u64, extent: Vec2) -> SurfaceMeasurement {
    SurfaceMeasurement {
        anchor: AnchorId(anchor),
        origin: Vec3::new(0.5, -0.8, -1.0),
        center: Vec3::new(0.1, 0.0, 0.2),
        extent,
    }
}

/// Detect a (2.0, 1.5) surface and select it at t = 0
fn select_at_zero(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    let input = TickInput {
        surfaces: vec![SurfaceEvent::Added(surface(1, Vec2::new(2.0, 1.5)))],
        taps: vec![Tap {
            surface_hit: Some(AnchorId(1)),
            ..Default::default()
        }],
        ..Default::default()
    };
    tick(&mut state, &input);
    assert_eq!(state.phase, GamePhase::PlayActive);
    state
}

/// Tick with no input until the clock reads `at`
fn run_until(state: &mut GameState, at: u64) {
    let input = TickInput::default();
    while state.time_ticks < at {
        tick(state, &input);
    }
}

fn contact(state: &mut GameState, a: BodyRef, b: BodyRef) {
    tick(
        state,
        &TickInput {
            contacts: vec![Contact { a, b }],
            ..Default::default()
        },
    );
}

fn fire(state: &mut GameState) {
    tick(
        state,
        &TickInput {
            taps: vec![Tap::default()],
            ..Default::default()
        },
    );
}

#[test]
fn cube_spawns_lands_and_blows_on_its_own() {
    let mut state = select_at_zero(2024);

    run_until(&mut state, secs_to_ticks(2.0) - 1);
    assert!(state.cubes.is_empty());

    run_until(&mut state, secs_to_ticks(2.0));
    assert_eq!(state.cubes.len(), 1);
    let cube = state.cubes[0].clone();
    assert_eq!(cube.state, CubeState::Spawned);

    let center = state.selected_surface().unwrap().world_center();
    assert!((cube.pos.x - center.x).abs() <= 1.0 + 1e-5);
    assert!((cube.pos.z - center.z).abs() <= 0.75 + 1e-5);

    // Lands at t = 2.1
    run_until(&mut state, secs_to_ticks(2.1));
    contact(&mut state, BodyRef::Surface(AnchorId(1)), BodyRef::Cube(cube.id));
    assert_eq!(state.cube(cube.id).unwrap().state, CubeState::Ticking);

    let fuse_out = secs_to_ticks(5.1);
    run_until(&mut state, fuse_out - 1);
    let burning = state.cube(cube.id).unwrap();
    assert_eq!(burning.state, CubeState::Ticking);
    assert!(burning.hue() < 0.05);

    run_until(&mut state, fuse_out);
    let exploding = state.cube(cube.id).unwrap();
    assert_eq!(exploding.state, CubeState::Exploding);
    assert_eq!(exploding.detonation, Some(Detonation::FuseExpired));
    assert!((ticks_to_secs(state.time_ticks) - 5.1).abs() < 1e-4);

    run_until(&mut state, secs_to_ticks(5.3) - 1);
    assert!(state.cube(cube.id).is_some());
    run_until(&mut state, secs_to_ticks(5.3));
    assert!(state.cube(cube.id).is_none());

    // Blowing up on its own scores nothing
    assert_eq!(state.hud().unwrap().score, 0);
}

#[test]
fn projectile_hit_beats_the_fuse() {
    let mut state = select_at_zero(7);
    run_until(&mut state, secs_to_ticks(2.0));
    let cube = state.cubes[0].id;
    contact(&mut state, BodyRef::Cube(cube), BodyRef::Surface(AnchorId(1)));
    state.drain_events();

    // Fire at t0, hit at t0 + 1.0
    let t0 = state.time_ticks;
    fire(&mut state);
    assert_eq!(state.projectiles.len(), 1);
    let shot = state.projectiles[0].id;

    run_until(&mut state, t0 + secs_to_ticks(1.0));
    contact(&mut state, BodyRef::Projectile(shot), BodyRef::Cube(cube));

    let hit = state.cube(cube).unwrap();
    assert_eq!(hit.state, CubeState::Exploding);
    assert_eq!(hit.detonation, Some(Detonation::ProjectileHit));
    assert!(state.projectile(shot).is_none());
    assert!(state.projectiles.is_empty());
    assert_eq!(state.hud().unwrap().score, 1);

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::ProjectileRemoved { id: shot }));
    assert!(events.contains(&GameEvent::ScoreChanged { score: 1 }));

    // The fuse that was still running must not fire again
    run_until(&mut state, t0 + secs_to_ticks(10.0));
    let late = state.drain_events();
    assert!(!late.iter().any(|e| matches!(
        e,
        GameEvent::CubeDetonated { id, .. } if *id == cube
    )));
    assert!(late.contains(&GameEvent::CubeRemoved { id: cube }) || state.cube(cube).is_none());
    assert_eq!(state.hud().unwrap().score, 1);
}

#[test]
fn hit_on_the_fuse_tick_explodes_once() {
    let mut state = select_at_zero(21);
    run_until(&mut state, secs_to_ticks(2.0));
    let cube = state.cubes[0].id;
    let landed_at = state.time_ticks;
    contact(&mut state, BodyRef::Surface(AnchorId(1)), BodyRef::Cube(cube));
    fire(&mut state);
    let shot = state.projectiles[0].id;
    state.drain_events();

    // The fuse comes due at the end of the tick that delivers the hit
    let fuse_due = landed_at + secs_to_ticks(3.0);
    run_until(&mut state, fuse_due - 1);
    assert_eq!(state.cube(cube).unwrap().state, CubeState::Ticking);
    contact(&mut state, BodyRef::Projectile(shot), BodyRef::Cube(cube));
    assert_eq!(state.time_ticks, fuse_due);

    let hit = state.cube(cube).unwrap();
    assert_eq!(hit.state, CubeState::Exploding);
    assert_eq!(hit.detonation, Some(Detonation::ProjectileHit));
    assert_eq!(state.hud().unwrap().score, 1);

    run_until(&mut state, fuse_due + secs_to_ticks(1.0));
    let detonations = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::CubeDetonated { id, .. } if *id == cube))
        .count();
    assert_eq!(detonations, 1);
    assert!(state.cube(cube).is_none());
    assert_eq!(state.hud().unwrap().score, 1);
}

#[test]
fn missed_projectile_times_out() {
    let mut state = select_at_zero(3);
    let t0 = state.time_ticks;
    fire(&mut state);
    let shot = state.projectiles[0].id;

    run_until(&mut state, t0 + secs_to_ticks(3.0) - 1);
    assert!(state.projectile(shot).is_some());
    run_until(&mut state, t0 + secs_to_ticks(3.0));
    assert!(state.projectile(shot).is_none());
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::ProjectileRemoved { id: shot })
    );
}

#[test]
fn contact_with_removed_cube_is_harmless() {
    let mut state = select_at_zero(11);
    run_until(&mut state, secs_to_ticks(2.0));
    let cube = state.cubes[0].id;
    contact(&mut state, BodyRef::Surface(AnchorId(1)), BodyRef::Cube(cube));
    run_until(&mut state, secs_to_ticks(6.0));
    assert!(state.cube(cube).is_none());

    let t0 = state.time_ticks;
    fire(&mut state);
    let shot = state.projectiles[0].id;
    contact(&mut state, BodyRef::Projectile(shot), BodyRef::Cube(cube));
    contact(&mut state, BodyRef::Surface(AnchorId(1)), BodyRef::Cube(cube));

    // Shot keeps flying, no score
    assert!(state.projectile(shot).is_some());
    assert_eq!(state.hud().unwrap().score, 0);
    run_until(&mut state, t0 + secs_to_ticks(3.0));
    assert!(state.projectile(shot).is_none());
}

#[test]
fn contact_with_discarded_candidate_does_not_light_fuse() {
    let mut state = GameState::new(5);
    tick(
        &mut state,
        &TickInput {
            surfaces: vec![
                SurfaceEvent::Added(surface(1, Vec2::ONE)),
                SurfaceEvent::Added(surface(2, Vec2::ONE)),
            ],
            ..Default::default()
        },
    );
    tick(
        &mut state,
        &TickInput {
            taps: vec![Tap {
                surface_hit: Some(AnchorId(2)),
                ..Default::default()
            }],
            ..Default::default()
        },
    );
    run_until(&mut state, secs_to_ticks(2.0) + 1);
    let cube = state.cubes[0].id;
    contact(&mut state, BodyRef::Surface(AnchorId(1)), BodyRef::Cube(cube));
    assert_eq!(state.cube(cube).unwrap().state, CubeState::Spawned);
    contact(&mut state, BodyRef::Surface(AnchorId(2)), BodyRef::Cube(cube));
    assert_eq!(state.cube(cube).unwrap().state, CubeState::Ticking);
}

#[test]
fn stale_entity_ids_never_alias() {
    let mut state = select_at_zero(1);
    run_until(&mut state, secs_to_ticks(4.0));
    let ids: Vec<EntityId> = state.cubes.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
}

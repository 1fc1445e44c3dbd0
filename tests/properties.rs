//! Property tests for the gameplay invariants

use exploding_cubes::sim::{
    AnchorId, Cube, CubeState, CubeTiming, EntityId, GameEvent, GameRules, GameState, Scheduler,
    SurfaceEvent, SurfaceMeasurement, Tap, TickInput, random_point_in_extent, tick,
};
use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[derive(Debug, Clone, Copy)]
enum CubeOp {
    Land,
    ColorTick,
    FuseOut,
    Hit,
    RemovalDue,
}

fn cube_op() -> impl Strategy<Value = CubeOp> {
    prop_oneof![
        Just(CubeOp::Land),
        Just(CubeOp::ColorTick),
        Just(CubeOp::FuseOut),
        Just(CubeOp::Hit),
        Just(CubeOp::RemovalDue),
    ]
}

fn started(seed: u64, rules: GameRules) -> GameState {
    let mut state = GameState::with_rules(seed, rules);
    let input = TickInput {
        surfaces: vec![SurfaceEvent::Added(SurfaceMeasurement {
            anchor: AnchorId(1),
            origin: Vec3::ZERO,
            center: Vec3::ZERO,
            extent: Vec2::new(2.0, 1.5),
        })],
        taps: vec![Tap {
            surface_hit: Some(AnchorId(1)),
            ..Default::default()
        }],
        ..Default::default()
    };
    tick(&mut state, &input);
    state
}

fn fired(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::ProjectileFired { .. }))
        .count()
}

proptest! {
    #[test]
    fn spawn_points_stay_inside_extent(
        w in 0.0f32..50.0,
        d in 0.0f32..50.0,
        seed in any::<u64>(),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        for _ in 0..16 {
            let p = random_point_in_extent(&mut rng, Vec2::new(w, d));
            prop_assert!(p.x.abs() <= w / 2.0 + 1e-4);
            prop_assert!(p.y.abs() <= d / 2.0 + 1e-4);
        }
    }

    #[test]
    fn cube_only_moves_forward(ops in prop::collection::vec(cube_op(), 1..40)) {
        let mut timers = Scheduler::new();
        let mut cube = Cube::new(EntityId(1), Vec3::ZERO, 0.1, CubeTiming::default());
        let mut now = 0;
        let mut explosions = 0;
        let mut landed = false;

        for op in ops {
            now += 1;
            let before = cube.state;
            let detonation = cube.detonation;
            let exploded = match op {
                CubeOp::Land => {
                    landed = true;
                    cube.on_surface_contact(&mut timers, now);
                    false
                }
                CubeOp::ColorTick => {
                    let hue = cube.tick();
                    prop_assert_eq!(hue.is_some(), before == CubeState::Ticking);
                    false
                }
                CubeOp::FuseOut => cube.on_expired(&mut timers, now),
                CubeOp::Hit => cube.on_hit_by_projectile(&mut timers, now),
                CubeOp::RemovalDue => {
                    cube.on_removal_due(&mut timers);
                    false
                }
            };
            if exploded {
                explosions += 1;
            }

            prop_assert!(cube.state >= before);
            if cube.state == CubeState::Ticking {
                prop_assert!(landed);
            }
            if before == CubeState::Spawned && cube.state == CubeState::Ticking {
                prop_assert!(matches!(op, CubeOp::Land));
            }
            if detonation.is_some() {
                prop_assert_eq!(cube.detonation, detonation);
            }
            let hue = cube.hue();
            prop_assert!((0.0..=1.0 / 3.0 + 1e-6).contains(&hue));
        }

        prop_assert!(explosions <= 1);
        prop_assert_eq!(cube.detonation.is_some(), cube.state >= CubeState::Exploding);
    }

    #[test]
    fn unhit_projectile_lives_exactly_its_lifetime(
        lifetime in 2u64..600,
        seed in any::<u64>(),
    ) {
        let rules = GameRules {
            projectile_lifetime_ticks: lifetime,
            match_ticks: None,
            ..GameRules::default()
        };
        let mut state = started(seed, rules);
        let fire = TickInput {
            taps: vec![Tap::default()],
            ..Default::default()
        };
        tick(&mut state, &fire);
        let shot = state.projectiles[0].id;

        // The firing tick already counts against the lifetime
        let idle = TickInput::default();
        for _ in 2..lifetime {
            tick(&mut state, &idle);
        }
        prop_assert!(state.projectile(shot).is_some());
        tick(&mut state, &idle);
        prop_assert!(state.projectile(shot).is_none());
        prop_assert!(state.projectiles.is_empty());
    }

    #[test]
    fn tap_burst_fires_once_per_cooldown(
        taps_per_tick in 1usize..6,
        windows in 1u64..6,
        seed in any::<u64>(),
    ) {
        let mut state = started(seed, GameRules::default());
        state.drain_events();
        let cooldown = state.rules.shot_cooldown_ticks;
        let burst = TickInput {
            taps: vec![Tap::default(); taps_per_tick],
            ..Default::default()
        };

        let mut shots = 0;
        for _ in 0..windows * cooldown {
            tick(&mut state, &burst);
            shots += fired(&state.drain_events());
        }
        prop_assert_eq!(shots as u64, windows);
    }

    #[test]
    fn same_seed_same_match(seed in any::<u64>()) {
        let mut a = started(seed, GameRules::default());
        let mut b = started(seed, GameRules::default());
        let idle = TickInput::default();
        for _ in 0..600 {
            tick(&mut a, &idle);
            tick(&mut b, &idle);
        }
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }
}

//! Fixed timestep simulation tick
//!
//! Applies queued host callbacks (surfaces, taps, contacts), then advances
//! the clock and fires due timers. Every dispatch re-checks that the entity it
//! names is still alive.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cube::{Cube, CubeState, Detonation};
use super::plane::{AmbientFire, AnchorId, PlaneCandidate, SurfaceMeasurement};
use super::projectile::{Projectile, TapRay, shot_impulse};
use super::state::{BodyRef, EntityId, GameEvent, GamePhase, GameState};
use super::timer::TimerEvent;
use crate::error::{Error, Result};

/// Surface callback from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    Added(SurfaceMeasurement),
    Updated(SurfaceMeasurement),
}

/// A tap, already hit-tested and unprojected by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tap {
    /// Surface candidate under the finger, if any
    pub surface_hit: Option<AnchorId>,
    /// Tap location unprojected at near/far planes
    pub ray: Option<TapRay>,
    /// Camera position in world space
    pub viewpoint: Vec3,
}

/// Contact-begin callback from the host physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
}

/// Host callbacks queued for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub surfaces: Vec<SurfaceEvent>,
    pub taps: Vec<Tap>,
    pub contacts: Vec<Contact>,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty() && self.taps.is_empty() && self.contacts.is_empty()
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Once the clock runs out input is dropped; entity timers still finish
    if state.phase != GamePhase::MatchOver {
        for surface in &input.surfaces {
            handle_surface(state, surface);
        }
        for tap in &input.taps {
            handle_tap(state, tap);
        }
        for contact in &input.contacts {
            handle_contact(state, contact);
        }
    }

    state.time_ticks += 1;

    for event in state.timers.advance(state.time_ticks) {
        handle_timer(state, event);
    }

    if state.phase == GamePhase::PlayActive {
        run_clock(state);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn handle_surface(state: &mut GameState, surface: &SurfaceEvent) {
    match surface {
        SurfaceEvent::Added(m) => {
            if state.match_state.started {
                log::debug!("surface {:?} detected after match start, ignored", m.anchor);
                return;
            }
            if let Some(plane) = state.planes.get_mut(&m.anchor) {
                let body = plane.update(m);
                state.events.push(GameEvent::CandidateUpdated {
                    anchor: m.anchor,
                    body,
                });
                return;
            }
            let plane = PlaneCandidate::new(m);
            state.events.push(GameEvent::CandidateAdded {
                anchor: m.anchor,
                body: plane.body(),
            });
            state.planes.insert(m.anchor, plane);
            if state.phase == GamePhase::SearchingForSurface {
                state.phase = GamePhase::SurfaceCandidatesVisible;
                log::info!("first surface candidate detected");
            }
        }
        SurfaceEvent::Updated(m) => match state.planes.get_mut(&m.anchor) {
            Some(plane) => {
                let body = plane.update(m);
                state.events.push(GameEvent::CandidateUpdated {
                    anchor: m.anchor,
                    body,
                });
            }
            None => log::debug!("update for unknown surface {:?} ignored", m.anchor),
        },
    }
}

/// Fire first, then try selection: the selecting tap never shoots
pub fn handle_tap(state: &mut GameState, tap: &Tap) {
    if state.phase == GamePhase::PlayActive {
        try_fire(state, tap);
    }
    if !state.match_state.started {
        if let Err(err) = select_surface(state, tap.surface_hit) {
            log::debug!("tap ignored: {err}");
        }
    }
}

/// Spawn a projectile unless the cooldown is still running
pub fn try_fire(state: &mut GameState, tap: &Tap) -> Option<EntityId> {
    if !state.can_fire {
        log::trace!("shot rejected, cooldown running");
        return None;
    }
    let now = state.time_ticks;
    let id = state.next_entity_id();
    let impulse = shot_impulse(tap.ray, state.rules.impulse_scale);
    let projectile = Projectile::fire(
        id,
        tap.viewpoint,
        impulse,
        state.rules.projectile_lifetime_ticks,
        &mut state.timers,
        now,
    );
    state.events.push(GameEvent::ProjectileFired {
        id,
        origin: projectile.origin,
        body: projectile.body(),
    });
    state.projectiles.push(projectile);

    state.can_fire = false;
    state
        .timers
        .schedule(now, state.rules.shot_cooldown_ticks, TimerEvent::ShotCooldown);
    Some(id)
}

/// Promote the tapped candidate to play area and start the match
pub fn select_surface(state: &mut GameState, hit: Option<AnchorId>) -> Result<()> {
    if state.match_state.started {
        return Ok(());
    }
    let anchor = hit
        .filter(|anchor| state.planes.contains_key(anchor))
        .ok_or(Error::InvalidSurfaceSelection)?;

    let discarded: Vec<AnchorId> = state
        .planes
        .keys()
        .copied()
        .filter(|other| *other != anchor)
        .collect();
    for other in discarded {
        state.planes.remove(&other);
        state
            .events
            .push(GameEvent::CandidateDiscarded { anchor: other });
    }

    let now = state.time_ticks;
    let rules = state.rules;
    if let Some(plane) = state.planes.get_mut(&anchor) {
        plane.select_as_play_area(
            &mut state.timers,
            now,
            rules.cube_spawn_interval_ticks,
            rules.fire_spawn_interval_ticks,
        );
    }

    state.play_area = Some(anchor);
    state.match_state.started = true;
    state.match_state.time_left_ticks = rules.match_ticks;
    state.phase = GamePhase::PlayActive;
    state.events.push(GameEvent::PlayAreaSelected { anchor });
    log::info!("play area {:?} selected, match started", anchor);
    Ok(())
}

pub fn handle_contact(state: &mut GameState, contact: &Contact) {
    if !contact.a.layer().reports_contact(contact.b.layer()) {
        return;
    }
    match (contact.a, contact.b) {
        (BodyRef::Projectile(shot), BodyRef::Cube(cube))
        | (BodyRef::Cube(cube), BodyRef::Projectile(shot)) => projectile_hit(state, shot, cube),
        (BodyRef::Surface(anchor), BodyRef::Cube(cube))
        | (BodyRef::Cube(cube), BodyRef::Surface(anchor)) => {
            if state.play_area == Some(anchor) {
                surface_contact(state, cube);
            }
        }
        _ => {}
    }
}

fn surface_contact(state: &mut GameState, id: EntityId) {
    let now = state.time_ticks;
    let Some(cube) = state
        .cubes
        .iter_mut()
        .find(|c| c.id == id && !c.is_removed())
    else {
        log_stale("surface contact", id);
        return;
    };
    if cube.on_surface_contact(&mut state.timers, now) {
        state.events.push(GameEvent::CubeTicking { id });
    }
}

/// First contact wins: the projectile is gone after touching any cube
fn projectile_hit(state: &mut GameState, shot: EntityId, cube_id: EntityId) {
    let now = state.time_ticks;
    let Some(projectile) = state
        .projectiles
        .iter_mut()
        .find(|p| p.id == shot && p.is_active())
    else {
        log_stale("projectile contact", shot);
        return;
    };
    let Some(cube) = state
        .cubes
        .iter_mut()
        .find(|c| c.id == cube_id && !c.is_removed())
    else {
        log_stale("projectile contact", cube_id);
        return;
    };

    projectile.expire(&mut state.timers);
    state.events.push(GameEvent::ProjectileRemoved { id: shot });

    if cube.on_hit_by_projectile(&mut state.timers, now) {
        state.match_state.score += 1;
        state.events.push(GameEvent::ProjectileHit {
            id: shot,
            cube: cube_id,
        });
        state.events.push(GameEvent::CubeDetonated {
            id: cube_id,
            cause: Detonation::ProjectileHit,
        });
        state.events.push(GameEvent::ScoreChanged {
            score: state.match_state.score,
        });
    }
}

fn handle_timer(state: &mut GameState, event: TimerEvent) {
    let now = state.time_ticks;
    match event {
        TimerEvent::CubeColor(id) | TimerEvent::CubeFuse(id) | TimerEvent::CubeRemove(id) => {
            let Some(cube) = state
                .cubes
                .iter_mut()
                .find(|c| c.id == id && !c.is_removed())
            else {
                log_stale(event.name(), id);
                return;
            };
            match event {
                TimerEvent::CubeColor(_) => {
                    if let Some(hue) = cube.tick() {
                        state.events.push(GameEvent::CubeRecolored { id, hue });
                    }
                }
                TimerEvent::CubeFuse(_) => {
                    if cube.on_expired(&mut state.timers, now) {
                        state.events.push(GameEvent::CubeDetonated {
                            id,
                            cause: Detonation::FuseExpired,
                        });
                    }
                }
                _ => {
                    if cube.on_removal_due(&mut state.timers) {
                        state.events.push(GameEvent::CubeRemoved { id });
                    }
                }
            }
        }
        TimerEvent::ProjectileExpire(id) => {
            let Some(projectile) = state
                .projectiles
                .iter_mut()
                .find(|p| p.id == id && p.is_active())
            else {
                log_stale(event.name(), id);
                return;
            };
            if projectile.expire(&mut state.timers) {
                state.events.push(GameEvent::ProjectileRemoved { id });
            }
        }
        TimerEvent::FireExpire(id) => {
            let before = state.fires.len();
            state.fires.retain(|f| f.id != id);
            if state.fires.len() == before {
                log_stale(event.name(), id);
                return;
            }
            state.events.push(GameEvent::FireRemoved { id });
        }
        TimerEvent::ShotCooldown => state.can_fire = true,
        TimerEvent::CubeSpawner => spawn_cube(state),
        TimerEvent::FireSpawner => spawn_fire(state),
    }
}

/// Drop a cube at a random point above the play area
pub fn spawn_cube(state: &mut GameState) {
    let Some(anchor) = state.play_area else {
        log::debug!("cube spawner fired without a play area");
        return;
    };
    let id = state.next_entity_id();
    let Some(plane) = state.planes.get(&anchor) else {
        return;
    };
    let pos = plane.random_world_point(&mut state.rng, state.rules.cube_spawn_height);
    let cube = Cube::new(id, pos, state.rules.cube_size, state.rules.cube);
    state.events.push(GameEvent::CubeSpawned {
        id,
        pos,
        body: cube.body(),
    });
    state.cubes.push(cube);
}

/// Light a cosmetic fire that burns out after a random lifetime
pub fn spawn_fire(state: &mut GameState) {
    if state.fires.len() >= state.rules.max_fires {
        log::trace!("fire cap reached ({})", state.rules.max_fires);
        return;
    }
    let Some(anchor) = state.play_area else {
        log::debug!("fire spawner fired without a play area");
        return;
    };
    let id = state.next_entity_id();
    let Some(plane) = state.planes.get(&anchor) else {
        return;
    };
    let pos = plane.random_world_point(&mut state.rng, 0.0);
    let (min, max) = state.rules.fire_lifetime_ticks;
    let lifetime_ticks = state.rng.random_range(min.min(max)..=max.max(min));

    let now = state.time_ticks;
    state
        .timers
        .schedule(now, lifetime_ticks, TimerEvent::FireExpire(id));
    state.fires.push(AmbientFire {
        id,
        pos,
        lifetime_ticks,
    });
    state.events.push(GameEvent::FireSpawned { id, pos });
}

fn run_clock(state: &mut GameState) {
    let Some(left) = state.match_state.time_left_ticks.as_mut() else {
        return;
    };
    *left = left.saturating_sub(1);
    if *left == 0 {
        end_match(state);
    }
}

/// Stop the spawners and freeze score and input.
/// Cubes still falling can no longer light, so they go now; lit ones burn out.
pub fn end_match(state: &mut GameState) {
    state.phase = GamePhase::MatchOver;
    state.timers.cancel_event(TimerEvent::CubeSpawner);
    state.timers.cancel_event(TimerEvent::FireSpawner);
    for cube in state
        .cubes
        .iter_mut()
        .filter(|c| c.state == CubeState::Spawned)
    {
        cube.remove(&mut state.timers);
        state.events.push(GameEvent::CubeRemoved { id: cube.id });
    }
    state.events.push(GameEvent::MatchEnded {
        score: state.match_state.score,
    });
    log::info!("match over, final score {}", state.match_state.score);
}

fn log_stale(callback: &'static str, entity: EntityId) {
    log::debug!(
        "{}",
        Error::StaleEntityCallback {
            callback,
            entity: entity.0,
        }
    );
}

//! Exploding cube lifecycle
//!
//! spawned → ticking → exploding → removed, never backwards. The fuse only
//! starts once the cube lands on the play area.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layer::{BodyConfig, BodyKind, CollisionLayer, Shape};
use super::state::EntityId;
use super::timer::{Scheduler, TimerEvent};
use crate::consts::*;
use crate::secs_to_ticks;

/// Lifecycle state (ordered: a cube only ever moves forward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CubeState {
    /// Falling, fuse not lit
    Spawned,
    /// Touched the play area, fuse burning
    Ticking,
    /// Detonated, waiting for removal
    Exploding,
    /// Gone from the scene
    Removed,
}

/// Why a cube exploded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detonation {
    FuseExpired,
    ProjectileHit,
}

/// Fuse and removal timing in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeTiming {
    pub fuse_ticks: u64,
    pub color_interval_ticks: u64,
    pub removal_delay_ticks: u64,
}

impl Default for CubeTiming {
    fn default() -> Self {
        Self {
            fuse_ticks: secs_to_ticks(CUBE_FUSE_SECS),
            color_interval_ticks: secs_to_ticks(CUBE_COLOR_INTERVAL_SECS),
            removal_delay_ticks: secs_to_ticks(CUBE_REMOVAL_DELAY_SECS),
        }
    }
}

/// An explosive target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cube {
    pub id: EntityId,
    /// Spawn position in world space
    pub pos: Vec3,
    pub size: f32,
    pub state: CubeState,
    /// Fuse time burnt so far
    pub elapsed_ticks: u64,
    /// Set once the cube explodes
    pub detonation: Option<Detonation>,
    pub timing: CubeTiming,
}

impl Cube {
    pub fn new(id: EntityId, pos: Vec3, size: f32, timing: CubeTiming) -> Self {
        Self {
            id,
            pos,
            size,
            state: CubeState::Spawned,
            elapsed_ticks: 0,
            detonation: None,
            timing,
        }
    }

    /// Light the fuse. Returns true only on the first contact.
    pub fn on_surface_contact(&mut self, timers: &mut Scheduler, now: u64) -> bool {
        if self.state != CubeState::Spawned {
            return false;
        }
        self.state = CubeState::Ticking;
        timers.schedule_repeating(
            now,
            self.timing.color_interval_ticks,
            TimerEvent::CubeColor(self.id),
        );
        timers.schedule(now, self.timing.fuse_ticks, TimerEvent::CubeFuse(self.id));
        true
    }

    /// Color update. Returns the new hue while the fuse burns.
    pub fn tick(&mut self) -> Option<f32> {
        if self.state != CubeState::Ticking {
            return None;
        }
        self.elapsed_ticks =
            (self.elapsed_ticks + self.timing.color_interval_ticks).min(self.timing.fuse_ticks);
        Some(self.hue())
    }

    /// Fuse ran out
    pub fn on_expired(&mut self, timers: &mut Scheduler, now: u64) -> bool {
        if self.state != CubeState::Ticking {
            return false;
        }
        self.elapsed_ticks = self.timing.fuse_ticks;
        self.explode(Detonation::FuseExpired, timers, now)
    }

    /// Struck by a projectile, fuse lit or not
    pub fn on_hit_by_projectile(&mut self, timers: &mut Scheduler, now: u64) -> bool {
        self.explode(Detonation::ProjectileHit, timers, now)
    }

    fn explode(&mut self, cause: Detonation, timers: &mut Scheduler, now: u64) -> bool {
        if self.state >= CubeState::Exploding {
            return false;
        }
        self.state = CubeState::Exploding;
        self.detonation = Some(cause);
        timers.cancel_event(TimerEvent::CubeColor(self.id));
        timers.cancel_event(TimerEvent::CubeFuse(self.id));
        timers.schedule(
            now,
            self.timing.removal_delay_ticks,
            TimerEvent::CubeRemove(self.id),
        );
        true
    }

    /// Removal delay elapsed
    pub fn on_removal_due(&mut self, timers: &mut Scheduler) -> bool {
        if self.state != CubeState::Exploding {
            return false;
        }
        self.remove(timers);
        true
    }

    /// Take the cube out of play immediately, dropping any pending timers
    pub fn remove(&mut self, timers: &mut Scheduler) {
        self.state = CubeState::Removed;
        timers.cancel_owner(self.id);
    }

    pub fn is_removed(&self) -> bool {
        self.state == CubeState::Removed
    }

    /// Fraction of the fuse left, 1.0 before it is lit
    pub fn remaining_fraction(&self) -> f32 {
        let fuse = self.timing.fuse_ticks.max(1) as f32;
        ((fuse - self.elapsed_ticks as f32) / fuse).clamp(0.0, 1.0)
    }

    /// Hue in [0, 1/3]: green when fresh, red about to blow
    pub fn hue(&self) -> f32 {
        self.remaining_fraction() / 3.0
    }

    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            layer: CollisionLayer::Cube,
            kind: BodyKind::Dynamic,
            shape: Shape::Box { size: self.size },
            affected_by_gravity: true,
            impulse: Vec3::ZERO,
        }
    }
}

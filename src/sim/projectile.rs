//! Player projectiles

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layer::{BodyConfig, BodyKind, CollisionLayer, Shape};
use super::state::EntityId;
use super::timer::{Scheduler, TimerEvent};

/// Projectile radius (meters)
pub const PROJECTILE_RADIUS: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Active,
    Expired,
}

/// Tap ray from the host: the tap location unprojected at the near and far
/// clip planes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapRay {
    pub near: Vec3,
    pub far: Vec3,
}

/// Shot impulse for a tap. Straight ahead when the host has no ray.
pub fn shot_impulse(ray: Option<TapRay>, scale: f32) -> Vec3 {
    match ray {
        Some(ray) => (ray.far - ray.near) / scale,
        None => Vec3::Z,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    /// Launch position (player viewpoint)
    pub origin: Vec3,
    pub impulse: Vec3,
    pub state: ProjectileState,
}

impl Projectile {
    /// Fire from `origin`; the lifetime timer starts now
    pub fn fire(
        id: EntityId,
        origin: Vec3,
        impulse: Vec3,
        lifetime_ticks: u64,
        timers: &mut Scheduler,
        now: u64,
    ) -> Self {
        timers.schedule(now, lifetime_ticks, TimerEvent::ProjectileExpire(id));
        Self {
            id,
            origin,
            impulse,
            state: ProjectileState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == ProjectileState::Active
    }

    /// Retire the projectile (timeout or cube contact). Returns false if it
    /// was already gone.
    pub fn expire(&mut self, timers: &mut Scheduler) -> bool {
        if self.state == ProjectileState::Expired {
            return false;
        }
        self.state = ProjectileState::Expired;
        timers.cancel_owner(self.id);
        true
    }

    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            layer: CollisionLayer::Projectile,
            kind: BodyKind::Dynamic,
            shape: Shape::Sphere {
                radius: PROJECTILE_RADIUS,
            },
            affected_by_gravity: false,
            impulse: self.impulse,
        }
    }
}

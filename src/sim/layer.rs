//! Collision layers and physics body descriptions
//!
//! The host physics engine owns collision resolution. This module only
//! tells it which layers collide, which pairs report contacts back to us,
//! and what body each entity needs.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Collision category of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionLayer {
    Projectile,
    Plane,
    Cube,
    Wall,
}

impl CollisionLayer {
    pub const ALL: [CollisionLayer; 4] = [
        CollisionLayer::Projectile,
        CollisionLayer::Plane,
        CollisionLayer::Cube,
        CollisionLayer::Wall,
    ];

    /// Layers this body is physically pushed by
    pub const fn collision_targets(self) -> &'static [CollisionLayer] {
        match self {
            CollisionLayer::Cube => &[
                CollisionLayer::Projectile,
                CollisionLayer::Plane,
                CollisionLayer::Cube,
                CollisionLayer::Wall,
            ],
            CollisionLayer::Plane | CollisionLayer::Projectile | CollisionLayer::Wall => {
                &[CollisionLayer::Cube]
            }
        }
    }

    /// Layers whose contacts with this body are reported to the game
    pub const fn contact_targets(self) -> &'static [CollisionLayer] {
        match self {
            CollisionLayer::Cube => &[CollisionLayer::Projectile, CollisionLayer::Plane],
            CollisionLayer::Plane | CollisionLayer::Projectile => &[CollisionLayer::Cube],
            CollisionLayer::Wall => &[],
        }
    }

    pub fn collides_with(self, other: CollisionLayer) -> bool {
        self.collision_targets().contains(&other)
    }

    /// Contact reporting is on when either side asks for it
    pub fn reports_contact(self, other: CollisionLayer) -> bool {
        self.contact_targets().contains(&other) || other.contact_targets().contains(&self)
    }
}

/// Physics body kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned cube with edge length
    Box { size: f32 },
    /// Horizontal rectangle (x = width, y = depth)
    Plane { extent: Vec2 },
    Sphere { radius: f32 },
}

/// Everything the host needs to build a physics body for an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub layer: CollisionLayer,
    pub kind: BodyKind,
    pub shape: Shape,
    pub affected_by_gravity: bool,
    /// Initial impulse applied when the body enters the world
    pub impulse: Vec3,
}

impl BodyConfig {
    pub fn collision_targets(&self) -> &'static [CollisionLayer] {
        self.layer.collision_targets()
    }

    pub fn contact_targets(&self) -> &'static [CollisionLayer] {
        self.layer.contact_targets()
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (durations counted in ticks)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, physics or audio dependencies

pub mod cube;
pub mod layer;
pub mod plane;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timer;

pub use cube::{Cube, CubeState, CubeTiming, Detonation};
pub use layer::{BodyConfig, BodyKind, CollisionLayer, Shape};
pub use plane::{
    AmbientFire, AnchorId, PlaneCandidate, SurfaceMaterial, SurfaceMeasurement,
    random_point_in_extent,
};
pub use projectile::{Projectile, ProjectileState, TapRay, shot_impulse};
pub use state::{
    BodyRef, EntityId, FIND_SURFACE_PROMPT, GameEvent, GamePhase, GameRules, GameState,
    HudSnapshot, MatchState,
};
pub use tick::{Contact, SurfaceEvent, Tap, TickInput, select_surface, tick, try_fire};
pub use timer::{Scheduler, TimerEvent, TimerId};

//! Exploding Cubes - an augmented-reality shooting game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cubes, projectiles, surfaces, game state)
//! - `session`: Host adapter (fixed timestep, callback queue)
//! - `audio`, `effects`: Sound and visual cues for simulation events
//! - `assets`: Asset catalog with placeholder fallback
//! - `settings`: Tuning and preferences

pub mod assets;
pub mod audio;
pub mod effects;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use session::Session;
pub use settings::{QualityPreset, Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Cube fuse (seconds from first surface contact to detonation)
    pub const CUBE_FUSE_SECS: f32 = 3.0;
    /// Interval of the cube color update
    pub const CUBE_COLOR_INTERVAL_SECS: f32 = 0.1;
    /// Delay between detonation and removal
    pub const CUBE_REMOVAL_DELAY_SECS: f32 = 0.2;
    /// Cube edge length (meters)
    pub const CUBE_SIZE: f32 = 0.1;
    /// Height above the surface where new cubes appear
    pub const CUBE_SPAWN_HEIGHT: f32 = 0.8;

    /// Projectile lifetime
    pub const PROJECTILE_LIFETIME_SECS: f32 = 3.0;
    /// Minimum time between two shots
    pub const SHOT_COOLDOWN_SECS: f32 = 0.5;
    /// Divisor applied to the unprojected tap ray to get the shot impulse
    pub const IMPULSE_SCALE: f32 = 300.0;

    /// Cube spawner interval
    pub const CUBE_SPAWN_INTERVAL_SECS: f32 = 2.0;
    /// Ambient fire spawner interval
    pub const FIRE_SPAWN_INTERVAL_SECS: f32 = 2.0;
    /// Ambient fire lifetime range
    pub const FIRE_LIFETIME_MIN_SECS: f32 = 0.5;
    pub const FIRE_LIFETIME_MAX_SECS: f32 = 3.0;

    /// Match length shown on the HUD
    pub const MATCH_DURATION_SECS: f32 = 30.0;

    /// World gravity for the host physics engine (slow fall)
    pub const WORLD_GRAVITY: f32 = -0.25;
}

/// Convert seconds to whole simulation ticks (rounded, at least one tick)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    ((secs * consts::SIM_HZ as f32).round() as u64).max(1)
}

/// Convert simulation ticks to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / consts::SIM_HZ as f32
}

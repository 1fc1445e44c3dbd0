//! Game state and core simulation types
//!
//! The controller side of the game: detected surfaces, the play area, live
//! entities, score and clock. Everything here is driven by [`super::tick`].

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cube::{Cube, CubeTiming, Detonation};
use super::layer::{BodyConfig, CollisionLayer};
use super::plane::{AmbientFire, AnchorId, PlaneCandidate};
use super::projectile::Projectile;
use super::timer::Scheduler;
use crate::consts::*;
use crate::{secs_to_ticks, ticks_to_secs};

/// Text of the prompt shown until a surface is picked
pub const FIND_SURFACE_PROMPT: &str = "Find a flat surface and press the 🔥";

/// Simulation entity id. Allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing detected yet
    SearchingForSurface,
    /// At least one candidate visible, waiting for a tap on one
    SurfaceCandidatesVisible,
    /// Play area chosen, cubes spawning
    PlayActive,
    /// Clock ran out
    MatchOver,
}

/// A physics body as reported by the host in contact callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRef {
    Surface(AnchorId),
    Cube(EntityId),
    Projectile(EntityId),
    Wall,
}

impl BodyRef {
    pub fn layer(&self) -> CollisionLayer {
        match self {
            BodyRef::Surface(_) => CollisionLayer::Plane,
            BodyRef::Cube(_) => CollisionLayer::Cube,
            BodyRef::Projectile(_) => CollisionLayer::Projectile,
            BodyRef::Wall => CollisionLayer::Wall,
        }
    }
}

/// Things the host should present (nodes to add/remove, sounds, particles)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CandidateAdded { anchor: AnchorId, body: BodyConfig },
    CandidateUpdated { anchor: AnchorId, body: BodyConfig },
    CandidateDiscarded { anchor: AnchorId },
    PlayAreaSelected { anchor: AnchorId },
    CubeSpawned { id: EntityId, pos: Vec3, body: BodyConfig },
    CubeTicking { id: EntityId },
    CubeRecolored { id: EntityId, hue: f32 },
    CubeDetonated { id: EntityId, cause: Detonation },
    CubeRemoved { id: EntityId },
    ProjectileFired { id: EntityId, origin: Vec3, body: BodyConfig },
    ProjectileHit { id: EntityId, cube: EntityId },
    ProjectileRemoved { id: EntityId },
    FireSpawned { id: EntityId, pos: Vec3 },
    FireRemoved { id: EntityId },
    ScoreChanged { score: u64 },
    MatchEnded { score: u64 },
}

/// Gameplay timings in ticks, derived from [`crate::Tuning`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub cube: CubeTiming,
    pub cube_size: f32,
    pub cube_spawn_height: f32,
    pub cube_spawn_interval_ticks: u64,
    pub projectile_lifetime_ticks: u64,
    pub shot_cooldown_ticks: u64,
    pub impulse_scale: f32,
    pub fire_spawn_interval_ticks: u64,
    pub fire_lifetime_ticks: (u64, u64),
    /// Concurrent ambient fires allowed
    pub max_fires: usize,
    /// None = endless match
    pub match_ticks: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            cube: CubeTiming::default(),
            cube_size: CUBE_SIZE,
            cube_spawn_height: CUBE_SPAWN_HEIGHT,
            cube_spawn_interval_ticks: secs_to_ticks(CUBE_SPAWN_INTERVAL_SECS),
            projectile_lifetime_ticks: secs_to_ticks(PROJECTILE_LIFETIME_SECS),
            shot_cooldown_ticks: secs_to_ticks(SHOT_COOLDOWN_SECS),
            impulse_scale: IMPULSE_SCALE,
            fire_spawn_interval_ticks: secs_to_ticks(FIRE_SPAWN_INTERVAL_SECS),
            fire_lifetime_ticks: (
                secs_to_ticks(FIRE_LIFETIME_MIN_SECS),
                secs_to_ticks(FIRE_LIFETIME_MAX_SECS),
            ),
            max_fires: 8,
            match_ticks: Some(secs_to_ticks(MATCH_DURATION_SECS)),
        }
    }
}

/// Score and clock. Untouched until a play area is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchState {
    pub started: bool,
    pub score: u64,
    /// Ticks left on the clock (None = endless)
    pub time_left_ticks: Option<u64>,
}

/// What the HUD shows once the match is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    /// Whole seconds left, rounded up
    pub time_left_secs: Option<u32>,
}

impl HudSnapshot {
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn time_label(&self) -> Option<String> {
        self.time_left_secs
            .map(|secs| format!("Time left: {secs} sec."))
    }
}

/// Complete controller state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub rules: GameRules,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Detected surfaces, keyed by anchor
    pub planes: BTreeMap<AnchorId, PlaneCandidate>,
    /// The selected surface, once chosen
    pub play_area: Option<AnchorId>,
    /// Live cubes (sorted by id)
    pub cubes: Vec<Cube>,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Ambient fires (sorted by id)
    pub fires: Vec<AmbientFire>,
    pub match_state: MatchState,
    /// Shot cooldown elapsed
    pub can_fire: bool,
    pub timers: Scheduler,
    /// Pending presentation events
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default rules
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, GameRules::default())
    }

    pub fn with_rules(seed: u64, rules: GameRules) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            time_ticks: 0,
            phase: GamePhase::SearchingForSurface,
            planes: BTreeMap::new(),
            play_area: None,
            cubes: Vec::new(),
            projectiles: Vec::new(),
            fires: Vec::new(),
            match_state: MatchState::default(),
            can_fire: true,
            timers: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Seconds since the session started
    pub fn time_secs(&self) -> f32 {
        ticks_to_secs(self.time_ticks)
    }

    pub fn selected_surface(&self) -> Option<&PlaneCandidate> {
        self.play_area.and_then(|anchor| self.planes.get(&anchor))
    }

    pub fn cube(&self, id: EntityId) -> Option<&Cube> {
        self.cubes.iter().find(|c| c.id == id && !c.is_removed())
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id && p.is_active())
    }

    /// Score and clock, only once the match has started
    pub fn hud(&self) -> Option<HudSnapshot> {
        if !self.match_state.started {
            return None;
        }
        Some(HudSnapshot {
            score: self.match_state.score,
            time_left_secs: self
                .match_state
                .time_left_ticks
                .map(|ticks| {
                    u32::try_from(ticks.div_ceil(SIM_HZ as u64)).unwrap_or(u32::MAX)
                }),
        })
    }

    /// Whether the "find a surface" prompt is showing
    pub fn prompt_visible(&self) -> bool {
        !self.match_state.started
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop removed entities and keep id order for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.cubes.retain(|c| !c.is_removed());
        self.projectiles.retain(|p| p.is_active());
        self.cubes.sort_by_key(|c| c.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.fires.sort_by_key(|f| f.id);
    }
}

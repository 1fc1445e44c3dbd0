//! Host adapter
//!
//! The host AR framework calls in with surface, tap and contact callbacks as
//! they happen, and once per rendered frame with the frame time. Callbacks are
//! queued and applied on the next simulation tick; each frame runs as many
//! fixed ticks as the elapsed time covers.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use serde::Serialize;

use crate::assets::AssetCatalog;
use crate::audio::{AudioCue, AudioManager};
use crate::consts::*;
use crate::effects::{VisualCue, visuals_for_event};
use crate::settings::Settings;
use crate::sim::{
    BodyConfig, BodyRef, Contact, GameEvent, GameState, HudSnapshot, SurfaceEvent,
    SurfaceMeasurement, Tap, TickInput, tick,
};

/// Everything produced by one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    /// Simulation ticks run this frame
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    pub sounds: Vec<AudioCue>,
    pub visuals: Vec<VisualCue>,
}

/// Game session holding the simulation and presentation state
pub struct Session {
    state: GameState,
    audio: AudioManager,
    assets: AssetCatalog,
    accumulator: f32,
    /// Callbacks waiting for the next tick
    input: TickInput,
}

impl Session {
    pub fn new(settings: &Settings, assets: AssetCatalog, seed: u64) -> Self {
        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        log::info!("Session started with seed {seed}");
        Self {
            state: GameState::with_rules(seed, settings.rules()),
            audio,
            assets,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Use the configured seed, or the wall clock when none is set
    pub fn from_settings(settings: &Settings, assets: AssetCatalog) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        Self::new(settings, assets, seed)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> Option<HudSnapshot> {
        self.state.hud()
    }

    /// Start a fresh match on the same rules
    pub fn restart(&mut self, seed: u64) {
        let rules = self.state.rules;
        self.state = GameState::with_rules(seed, rules);
        self.accumulator = 0.0;
        self.input = TickInput::default();
        log::info!("Game restarted with seed: {seed}");
    }

    // === Host callbacks ===

    pub fn surface_added(&mut self, measurement: SurfaceMeasurement) {
        self.input.surfaces.push(SurfaceEvent::Added(measurement));
    }

    pub fn surface_updated(&mut self, measurement: SurfaceMeasurement) {
        self.input.surfaces.push(SurfaceEvent::Updated(measurement));
    }

    pub fn tapped(&mut self, tap: Tap) {
        self.input.taps.push(tap);
    }

    pub fn contact_began(&mut self, a: BodyRef, b: BodyRef) {
        self.input.contacts.push(Contact { a, b });
    }

    /// Gravity the host physics world should run with
    pub fn world_gravity(&self) -> Vec3 {
        Vec3::new(0.0, WORLD_GRAVITY, 0.0)
    }

    /// Physics body the host should attach to a node, if the entity is live
    pub fn body_for(&self, body: BodyRef) -> Option<BodyConfig> {
        match body {
            BodyRef::Surface(anchor) => self.state.planes.get(&anchor).map(|p| p.body()),
            BodyRef::Cube(id) => self.state.cube(id).map(|c| c.body()),
            BodyRef::Projectile(id) => self.state.projectile(id).map(|p| p.body()),
            BodyRef::Wall => None,
        }
    }

    /// Run simulation ticks for `dt` seconds of frame time
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        let dt = if dt.is_nan() {
            log::warn!("NaN frame time, skipping frame");
            0.0
        } else {
            dt.clamp(0.0, 0.1)
        };
        self.accumulator += dt;

        let mut output = FrameOutput::default();
        while self.accumulator >= SIM_DT && output.ticks < MAX_SUBSTEPS {
            // Queued callbacks go into the first substep only
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input);
            self.accumulator -= SIM_DT;
            output.ticks += 1;
        }
        if output.ticks == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in self.state.drain_events() {
            if let Some(cue) = self.audio.cue(&event, &self.assets) {
                output.sounds.push(cue);
            }
            output.visuals.extend(visuals_for_event(&event, &self.assets));
            output.events.push(event);
        }
        output
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

//! Sound cues
//!
//! Mixing and playback belong to the host. This module decides which sound
//! goes with which game event, where it is attached, and how loud it is.

use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetCatalog, AssetHandle};
use crate::sim::{AnchorId, Detonation, EntityId, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Fuse burning (loops on the cube)
    TickingBomb,
    /// Cube blew up on its own
    Explosion,
    /// Shot fired
    Pew,
    /// Lava floor ambience (loops on the play area)
    Lava,
    /// Cube shot down
    Extinguish,
}

impl SoundEffect {
    pub fn asset(&self) -> Asset {
        match self {
            SoundEffect::TickingBomb => Asset::TickingBombSound,
            SoundEffect::Explosion => Asset::ExplosionSound,
            SoundEffect::Pew => Asset::PewSound,
            SoundEffect::Lava => Asset::LavaSound,
            SoundEffect::Extinguish => Asset::ExtinguishSound,
        }
    }

    /// Per-effect volume before settings are applied
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::TickingBomb => 0.3,
            _ => 1.0,
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, SoundEffect::TickingBomb | SoundEffect::Lava)
    }
}

/// Scene node a sound is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueTarget {
    Scene,
    Surface(AnchorId),
    Cube(EntityId),
    Projectile(EntityId),
}

/// Sound for a game event, if it has one
pub fn sound_for_event(event: &GameEvent) -> Option<(SoundEffect, CueTarget)> {
    match *event {
        GameEvent::PlayAreaSelected { anchor } => {
            Some((SoundEffect::Lava, CueTarget::Surface(anchor)))
        }
        GameEvent::CubeTicking { id } => Some((SoundEffect::TickingBomb, CueTarget::Cube(id))),
        GameEvent::CubeDetonated {
            cause: Detonation::FuseExpired,
            ..
        } => Some((SoundEffect::Explosion, CueTarget::Scene)),
        GameEvent::ProjectileHit { .. } => Some((SoundEffect::Extinguish, CueTarget::Scene)),
        GameEvent::ProjectileFired { id, .. } => {
            Some((SoundEffect::Pew, CueTarget::Projectile(id)))
        }
        _ => None,
    }
}

/// A sound the host should start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    pub effect: SoundEffect,
    pub source: AssetHandle,
    pub target: CueTarget,
    pub volume: f32,
    pub looping: bool,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cue for an event. None when the event is silent, audio is muted, or
    /// the sound file is a placeholder.
    pub fn cue(&self, event: &GameEvent, assets: &AssetCatalog) -> Option<AudioCue> {
        let (effect, target) = sound_for_event(event)?;
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return None;
        }
        let source = assets.get(effect.asset());
        if source.is_placeholder() {
            log::trace!("{:?} skipped, no sound file", effect);
            return None;
        }
        Some(AudioCue {
            effect,
            source: source.clone(),
            target,
            volume: vol,
            looping: effect.looping(),
        })
    }
}

//! Visual cues: textures, colors and particle bursts for game events

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetCatalog, AssetHandle};
use crate::sim::{AnchorId, EntityId, GameEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualCue {
    /// Put a texture on a surface or cube
    SurfaceTexture { anchor: AnchorId, texture: AssetHandle },
    CubeTexture { id: EntityId, texture: AssetHandle },
    /// Tint a ticking cube (hue in [0, 1], full saturation and brightness)
    CubeColor { id: EntityId, hue: f32 },
    /// Hide the fire marker above a surface
    RemoveMarker { anchor: AnchorId },
    /// One-shot particle burst at the entity's current position
    Particles { at: ParticleAnchor, system: AssetHandle },
    /// Fire emoji billboard on the play area
    FireBillboard { id: EntityId, pos: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleAnchor {
    Cube(EntityId),
    Projectile(EntityId),
}

/// Visual cues for one event
pub fn visuals_for_event(event: &GameEvent, assets: &AssetCatalog) -> Vec<VisualCue> {
    let handle = |asset: Asset| assets.get(asset).clone();
    match *event {
        GameEvent::CandidateAdded { anchor, .. } => vec![VisualCue::SurfaceTexture {
            anchor,
            texture: handle(Asset::StartTexture),
        }],
        GameEvent::PlayAreaSelected { anchor } => vec![
            VisualCue::SurfaceTexture {
                anchor,
                texture: handle(Asset::FloorTexture),
            },
            VisualCue::RemoveMarker { anchor },
        ],
        GameEvent::CubeSpawned { id, .. } => vec![VisualCue::CubeTexture {
            id,
            texture: handle(Asset::DynamiteTexture),
        }],
        GameEvent::CubeRecolored { id, hue } => vec![VisualCue::CubeColor { id, hue }],
        GameEvent::CubeDetonated { id, .. } => vec![VisualCue::Particles {
            at: ParticleAnchor::Cube(id),
            system: handle(Asset::ExplosionParticles),
        }],
        GameEvent::ProjectileHit { id, .. } => vec![VisualCue::Particles {
            at: ParticleAnchor::Projectile(id),
            system: handle(Asset::ScoreParticles),
        }],
        GameEvent::FireSpawned { id, pos } => vec![VisualCue::FireBillboard { id, pos }],
        _ => Vec::new(),
    }
}

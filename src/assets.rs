//! Asset catalog
//!
//! Resolves the textures, sounds and particle systems the host loads. A
//! missing file is not fatal: it is logged and replaced with a placeholder.
//! Only a missing asset directory aborts startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Texture,
    Sound,
    Particles,
}

/// Every asset the game references
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// Candidate surface grid
    StartTexture,
    /// Lava floor of the play area
    FloorTexture,
    /// Cube skin
    DynamiteTexture,
    TickingBombSound,
    ExplosionSound,
    PewSound,
    LavaSound,
    ExtinguishSound,
    ExplosionParticles,
    ScoreParticles,
}

impl Asset {
    pub const ALL: [Asset; 10] = [
        Asset::StartTexture,
        Asset::FloorTexture,
        Asset::DynamiteTexture,
        Asset::TickingBombSound,
        Asset::ExplosionSound,
        Asset::PewSound,
        Asset::LavaSound,
        Asset::ExtinguishSound,
        Asset::ExplosionParticles,
        Asset::ScoreParticles,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Asset::StartTexture => "starttexture.png",
            Asset::FloorTexture => "floortexture.jpg",
            Asset::DynamiteTexture => "dynamite.jpg",
            Asset::TickingBombSound => "tickingbomb.wav",
            Asset::ExplosionSound => "explosion.wav",
            Asset::PewSound => "pew.wav",
            Asset::LavaSound => "lava.wav",
            Asset::ExtinguishSound => "extinguish.wav",
            Asset::ExplosionParticles => "explosion.scnp",
            Asset::ScoreParticles => "score.scnp",
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::StartTexture | Asset::FloorTexture | Asset::DynamiteTexture => {
                AssetKind::Texture
            }
            Asset::TickingBombSound
            | Asset::ExplosionSound
            | Asset::PewSound
            | Asset::LavaSound
            | Asset::ExtinguishSound => AssetKind::Sound,
            Asset::ExplosionParticles | Asset::ScoreParticles => AssetKind::Particles,
        }
    }
}

/// Where the host should load an asset from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetHandle {
    File(PathBuf),
    /// Asset missing: flat color texture, silence, or no particles
    Placeholder,
}

impl AssetHandle {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, AssetHandle::Placeholder)
    }
}

/// Resolved assets, one handle per [`Asset`]
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: Option<PathBuf>,
    handles: BTreeMap<Asset, AssetHandle>,
}

impl AssetCatalog {
    /// Resolve every asset under `root`
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::AssetRootMissing(root.to_path_buf()));
        }

        let mut handles = BTreeMap::new();
        let mut missing = 0;
        for asset in Asset::ALL {
            let handle = match resolve(root, asset) {
                Ok(path) => AssetHandle::File(path),
                Err(err) => {
                    log::warn!("{err}, using placeholder");
                    missing += 1;
                    AssetHandle::Placeholder
                }
            };
            handles.insert(asset, handle);
        }

        log::info!(
            "Loaded {} assets from {} ({} placeholders)",
            Asset::ALL.len() - missing,
            root.display(),
            missing
        );
        Ok(Self {
            root: Some(root.to_path_buf()),
            handles,
        })
    }

    /// Catalog with every asset replaced by a placeholder (headless runs)
    pub fn placeholders() -> Self {
        Self {
            root: None,
            handles: Asset::ALL
                .into_iter()
                .map(|asset| (asset, AssetHandle::Placeholder))
                .collect(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn get(&self, asset: Asset) -> &AssetHandle {
        self.handles.get(&asset).unwrap_or(&AssetHandle::Placeholder)
    }

    /// Assets that fell back to placeholders
    pub fn missing(&self) -> Vec<Asset> {
        self.handles
            .iter()
            .filter(|(_, handle)| handle.is_placeholder())
            .map(|(asset, _)| *asset)
            .collect()
    }
}

/// Locate a single asset file under `root`
pub fn resolve(root: &Path, asset: Asset) -> Result<PathBuf> {
    let path = root.join(asset.file_name());
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(Error::AssetLoad {
            name: asset.file_name().to_string(),
            reason: "not a regular file".to_string(),
        }),
        Err(err) => Err(Error::AssetLoad {
            name: asset.file_name().to_string(),
            reason: err.to_string(),
        }),
    }
}

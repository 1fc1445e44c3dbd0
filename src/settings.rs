//! Game settings and tuning
//!
//! Loaded from a JSON file at startup. Missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::secs_to_ticks;
use crate::sim::{CubeTiming, GameRules};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Concurrent ambient fires for this preset
    pub fn max_ambient_fires(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 8,
            QualityPreset::High => 16,
        }
    }
}

/// Gameplay durations and sizes, in seconds and meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub cube_fuse_secs: f32,
    pub cube_color_interval_secs: f32,
    pub cube_removal_delay_secs: f32,
    pub cube_size: f32,
    pub cube_spawn_height: f32,
    pub cube_spawn_interval_secs: f32,
    pub projectile_lifetime_secs: f32,
    pub shot_cooldown_secs: f32,
    pub impulse_scale: f32,
    pub fire_spawn_interval_secs: f32,
    pub fire_lifetime_min_secs: f32,
    pub fire_lifetime_max_secs: f32,
    /// None = endless match
    pub match_duration_secs: Option<f32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cube_fuse_secs: CUBE_FUSE_SECS,
            cube_color_interval_secs: CUBE_COLOR_INTERVAL_SECS,
            cube_removal_delay_secs: CUBE_REMOVAL_DELAY_SECS,
            cube_size: CUBE_SIZE,
            cube_spawn_height: CUBE_SPAWN_HEIGHT,
            cube_spawn_interval_secs: CUBE_SPAWN_INTERVAL_SECS,
            projectile_lifetime_secs: PROJECTILE_LIFETIME_SECS,
            shot_cooldown_secs: SHOT_COOLDOWN_SECS,
            impulse_scale: IMPULSE_SCALE,
            fire_spawn_interval_secs: FIRE_SPAWN_INTERVAL_SECS,
            fire_lifetime_min_secs: FIRE_LIFETIME_MIN_SECS,
            fire_lifetime_max_secs: FIRE_LIFETIME_MAX_SECS,
            match_duration_secs: Some(MATCH_DURATION_SECS),
        }
    }
}

impl Tuning {
    /// Reject non-positive durations and inverted ranges
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("cube_fuse_secs", self.cube_fuse_secs),
            ("cube_color_interval_secs", self.cube_color_interval_secs),
            ("cube_removal_delay_secs", self.cube_removal_delay_secs),
            ("cube_size", self.cube_size),
            ("cube_spawn_interval_secs", self.cube_spawn_interval_secs),
            ("projectile_lifetime_secs", self.projectile_lifetime_secs),
            ("shot_cooldown_secs", self.shot_cooldown_secs),
            ("impulse_scale", self.impulse_scale),
            ("fire_spawn_interval_secs", self.fire_spawn_interval_secs),
            ("fire_lifetime_min_secs", self.fire_lifetime_min_secs),
            ("fire_lifetime_max_secs", self.fire_lifetime_max_secs),
            (
                "match_duration_secs",
                self.match_duration_secs.unwrap_or(1.0),
            ),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.cube_spawn_height.is_finite() {
            return Err(Error::Config("cube_spawn_height must be finite".into()));
        }
        if self.fire_lifetime_min_secs > self.fire_lifetime_max_secs {
            return Err(Error::Config(format!(
                "fire lifetime range is inverted ({} > {})",
                self.fire_lifetime_min_secs, self.fire_lifetime_max_secs
            )));
        }
        Ok(())
    }

    /// Convert to tick-based rules for the simulation
    pub fn rules(&self, quality: QualityPreset) -> GameRules {
        GameRules {
            cube: CubeTiming {
                fuse_ticks: secs_to_ticks(self.cube_fuse_secs),
                color_interval_ticks: secs_to_ticks(self.cube_color_interval_secs),
                removal_delay_ticks: secs_to_ticks(self.cube_removal_delay_secs),
            },
            cube_size: self.cube_size,
            cube_spawn_height: self.cube_spawn_height,
            cube_spawn_interval_ticks: secs_to_ticks(self.cube_spawn_interval_secs),
            projectile_lifetime_ticks: secs_to_ticks(self.projectile_lifetime_secs),
            shot_cooldown_ticks: secs_to_ticks(self.shot_cooldown_secs),
            impulse_scale: self.impulse_scale,
            fire_spawn_interval_ticks: secs_to_ticks(self.fire_spawn_interval_secs),
            fire_lifetime_ticks: (
                secs_to_ticks(self.fire_lifetime_min_secs),
                secs_to_ticks(self.fire_lifetime_max_secs),
            ),
            max_fires: quality.max_ambient_fires(),
            match_ticks: self.match_duration_secs.map(secs_to_ticks),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    pub tuning: Tuning,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Fixed RNG seed for reproducible runs (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            tuning: Tuning::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Load settings from a JSON file. A missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn rules(&self) -> GameRules {
        self.tuning.rules(self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rules() {
        let rules = Settings::default().rules();
        assert_eq!(rules, GameRules::default());
        assert_eq!(rules.cube.fuse_ticks, 360);
        assert_eq!(rules.shot_cooldown_ticks, 60);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(
            r#"{ "quality": "Low", "tuning": { "cube_fuse_secs": 5.0 }, "seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.tuning.cube_fuse_secs, 5.0);
        assert_eq!(settings.tuning.shot_cooldown_secs, SHOT_COOLDOWN_SECS);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.rules().max_fires, 2);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let err = Settings::from_json(r#"{ "tuning": { "shot_cooldown_secs": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Settings::from_json(
            r#"{ "tuning": { "fire_lifetime_min_secs": 4.0, "fire_lifetime_max_secs": 1.0 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("inverted"));

        assert!(matches!(
            Settings::from_json("{ not json").unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_endless_match() {
        let settings =
            Settings::from_json(r#"{ "tuning": { "match_duration_secs": null } }"#).unwrap();
        assert_eq!(settings.rules().match_ticks, None);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("exploding-cubes-no-such-settings.json");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "exploding-cubes-settings-{}.json",
            std::process::id()
        ));
        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.seed = Some(11);
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }
}

//! Game settings and preferences
//!
//! Loaded from JSON; any missing field falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

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

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle count multiplier (1.0 = full)
    pub fn particle_scale(&self) -> f64 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to run the background starfield
    pub fn starfield_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Settings that failed to load
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Simulation ===
    /// Fixed simulation steps per second
    pub update_rate: u32,
    /// Catch-up steps allowed per scheduler pass
    pub max_catch_up_steps: u32,
    /// Play area size
    pub arena_width: f64,
    pub arena_height: f64,
    /// Population cap for asteroid recycling
    pub max_asteroids: usize,
    /// Asteroids seeded whenever none are alive
    pub initial_asteroids: usize,

    // === Visual Effects ===
    /// Particle effects (explosions, smoke, trails, starfield)
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            update_rate: UPDATE_RATE,
            max_catch_up_steps: MAX_CATCH_UP_STEPS,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            max_asteroids: MAX_ASTEROIDS,
            initial_asteroids: INITIAL_ASTEROIDS,

            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings (quality {})", settings.quality.as_str());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.update_rate == 0 {
            return Err(SettingsError::Invalid {
                field: "update_rate",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_catch_up_steps == 0 {
            return Err(SettingsError::Invalid {
                field: "max_catch_up_steps",
                reason: "must be at least 1".into(),
            });
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(SettingsError::Invalid {
                field: "arena",
                reason: format!("{}x{} is not a usable size", self.arena_width, self.arena_height),
            });
        }
        if self.initial_asteroids > self.max_asteroids {
            return Err(SettingsError::Invalid {
                field: "initial_asteroids",
                reason: format!("exceeds max_asteroids ({})", self.max_asteroids),
            });
        }
        Ok(())
    }

    /// Effective particle multiplier (0 when particles are off)
    pub fn particle_scale(&self) -> f64 {
        if !self.particles {
            0.0
        } else {
            self.quality.particle_scale()
        }
    }

    /// Scale a nominal particle count by the quality settings
    pub fn particle_count(&self, nominal: usize) -> usize {
        (nominal as f64 * self.particle_scale()).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{ "quality": "High", "muted": true }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.muted);
        assert_eq!(settings.update_rate, UPDATE_RATE);
        assert_eq!(settings.max_asteroids, MAX_ASTEROIDS);
    }

    #[test]
    fn test_round_trip_json() {
        let settings = Settings::from_preset(QualityPreset::Low);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "update_rate": 0 }"#),
            Err(SettingsError::Invalid { field: "update_rate", .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_particle_count_scaling() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.particle_count(50), 50);
        settings.quality = QualityPreset::Low;
        assert_eq!(settings.particle_count(100), 25);
        settings.particles = false;
        assert_eq!(settings.particle_count(100), 0);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}

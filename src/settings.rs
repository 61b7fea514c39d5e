//! Cosmetic preferences
//!
//! Nothing here changes how a run plays out; these only bound the cosmetic
//! state the simulation keeps for presentation. Persisted separately from
//! the high-score table in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

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

    /// Particle arena ceiling for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 1000,
            QualityPreset::High => 2000,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to keep the parallax starfield
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Screen shake on impacts and kills
    pub screen_shake: bool,
    /// Player trail history
    pub trails: bool,
    /// Particle effects (explosions, sparks, beams)
    pub particles: bool,
    /// Minimize shake
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            trails: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "void_drift_settings";

    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle ceiling
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.max_particles()
        } else {
            0
        }
    }

    /// Trail samples to keep given the full-quality length
    pub fn trail_length(&self, full: usize) -> usize {
        if self.trails {
            ((full as f32 * self.quality.trail_quality()).round() as usize).max(1)
        } else {
            0
        }
    }

    /// Stored settings, or defaults
    pub fn load() -> Self {
        storage::load_json(Self::STORAGE_KEY).unwrap_or_else(|| {
            log::info!("Using default settings");
            Self::default()
        })
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
        log::debug!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_particles_toggle_zeroes_ceiling() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_trail_length_scales_with_quality() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.trail_length(20), 5);
        assert_eq!(Settings::from_preset(QualityPreset::High).trail_length(20), 20);
        let off = Settings {
            trails: false,
            ..Settings::default()
        };
        assert_eq!(off.trail_length(20), 0);
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{ "quality": "Low" }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.trails);
        assert!(!settings.quality.starfield_enabled());
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
    }
}

//! Game settings and preferences
//!
//! Persisted separately from profiles, under their own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};
use crate::sim::TimestepMode;

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

    /// Cycle Low -> Medium -> High -> Low
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 512,
        }
    }

    /// Whether to draw the star field on night themes
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle budget and background detail
    pub quality: QualityPreset,
    /// Particle effects (jump dust, crash, pickups)
    pub particles: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Audio ===
    /// Off until the player opts in (browsers block audio before a gesture)
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Freeze background scrolling and star twinkle
    pub reduced_motion: bool,

    // === Timing ===
    /// Fixed 60 Hz steps instead of one tick per display frame
    pub fixed_timestep: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            show_fps: false,
            audio_enabled: false,
            master_volume: 0.5,
            reduced_motion: false,
            fixed_timestep: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "nexus_runner_settings";

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Volume after the enable toggle
    pub fn effective_volume(&self) -> f32 {
        if self.audio_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective background parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        !self.reduced_motion
    }

    pub fn timestep_mode(&self) -> TimestepMode {
        if self.fixed_timestep {
            TimestepMode::Fixed
        } else {
            TimestepMode::Lockstep
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match load_json(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.audio_enabled);
        assert_eq!(settings.master_volume, 0.5);
        assert_eq!(settings.max_particles(), 256);
        assert_eq!(settings.timestep_mode(), TimestepMode::Lockstep);
    }

    #[test]
    fn test_particles_off_means_zero_budget() {
        let settings = Settings {
            particles: false,
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_volume_follows_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.0);
        settings.audio_enabled = true;
        settings.master_volume = 1.7;
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_preset_cycle() {
        let mut preset = QualityPreset::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            preset = preset.next();
            seen.push(preset.as_str());
        }
        assert_eq!(seen, ["High", "Low", "Medium"]);
        assert!(!QualityPreset::Low.starfield_enabled());
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            audio_enabled: true,
            fixed_timestep: true,
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let storage =
            MemoryStorage::new().with_entry(Settings::STORAGE_KEY, r#"{"show_fps":true}"#);
        let settings = Settings::load(&storage);
        assert!(settings.show_fps);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_corrupt_or_missing_storage_gives_defaults() {
        let storage = MemoryStorage::new().with_entry(Settings::STORAGE_KEY, "nope");
        assert_eq!(Settings::load(&storage), Settings::default());
        assert_eq!(Settings::load(&MemoryStorage::unavailable()), Settings::default());
    }
}

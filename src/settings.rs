//! Player preferences
//!
//! Persisted separately from high scores. Only affects the fire-and-forget
//! effect hints; gameplay never reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::sim::Feedback;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on hits, misses and explosions
    pub sound_effects: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Haptics ===
    pub haptics: bool,

    // === Accessibility ===
    /// Suppress the screen flash that goes with explosions and ship hits
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_effects: true,
            sfx_volume: 1.0,
            haptics: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn plays_sound(&self, _feedback: Feedback) -> bool {
        self.sound_effects && self.sfx_volume > 0.0
    }

    /// Correct hits are sound-only; everything else buzzes
    pub fn plays_haptic(&self, feedback: Feedback) -> bool {
        self.haptics && feedback != Feedback::Correct
    }

    /// Screen flash for impacts (respects reduced_motion)
    pub fn flashes(&self, feedback: Feedback) -> bool {
        !self.reduced_motion && matches!(feedback, Feedback::Explosion | Feedback::PlayerHit)
    }

    /// Clamp the volume into range after loading hand-edited files
    pub fn sanitized(mut self) -> Self {
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings.sanitized())
    }

    /// Load from `path`, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::info!("Using default settings ({err})");
            Self::default()
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_everything() {
        let settings = Settings::default();
        for fb in [
            Feedback::Correct,
            Feedback::Wrong,
            Feedback::Explosion,
            Feedback::PlayerHit,
        ] {
            assert!(settings.plays_sound(fb));
        }
    }

    #[test]
    fn test_muted_and_no_haptics_blocks_hints() {
        let settings = Settings {
            sound_effects: false,
            haptics: false,
            ..Default::default()
        };
        assert!(!settings.plays_sound(Feedback::Explosion));
        assert!(!settings.plays_haptic(Feedback::Explosion));

        let haptics_only = Settings {
            sound_effects: false,
            ..Default::default()
        };
        assert!(!haptics_only.plays_sound(Feedback::Wrong));
        assert!(!haptics_only.plays_haptic(Feedback::Correct));
        assert!(haptics_only.plays_haptic(Feedback::Wrong));
    }

    #[test]
    fn test_reduced_motion_stops_flashes() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.flashes(Feedback::Explosion));
        assert!(Settings::default().flashes(Feedback::PlayerHit));
        assert!(!Settings::default().flashes(Feedback::Correct));
    }

    #[test]
    fn test_zero_volume_mutes_sound() {
        let settings = Settings {
            sfx_volume: 0.0,
            ..Default::default()
        };
        assert!(!settings.plays_sound(Feedback::Correct));
        assert!(settings.plays_haptic(Feedback::Explosion));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"haptics": false, "sfx_volume": 3.0}"#)
            .unwrap();
        let settings = settings.sanitized();
        assert!(!settings.haptics);
        assert!(settings.sound_effects);
        assert_eq!(settings.sfx_volume, 1.0);
    }
}

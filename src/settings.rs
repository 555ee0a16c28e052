//! Game settings and preferences
//!
//! Read-only at runtime: the web build picks them up from an inline JSON
//! block in the page, nothing is ever written back.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Rules ===
    /// Reset ball/paddle speed, wave multiplier and destroyed count when a
    /// new session starts. Off keeps difficulty for the life of the process.
    pub reset_difficulty_on_restart: bool,
    /// Clamp the paddle hit position to the paddle face before computing the
    /// bounce angle. Off lets edge overlaps produce angles past the fan.
    pub clamp_paddle_hit: bool,

    /// Serve RNG seed (None = derive from the clock)
    pub seed: Option<u64>,

    /// Balance overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,

            reset_difficulty_on_restart: false,
            clamp_paddle_hit: false,

            seed: None,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Element id of the inline settings block
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "brickwave-settings";

    /// Parse settings from JSON; missing fields take their defaults and
    /// unusable balance values are reset to theirs
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        let defaults = Self::default();
        settings.music_volume = clamp_volume(settings.music_volume, defaults.music_volume);
        settings.sfx_volume = clamp_volume(settings.sfx_volume, defaults.sfx_volume);
        settings.tuning.sanitize();
        Ok(settings)
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// Effective effects volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: defaults only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn clamp_volume(volume: f32, default: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_carry_over() {
        let settings = Settings::default();
        assert!(!settings.reset_difficulty_on_restart);
        assert!(!settings.clamp_paddle_hit);
        assert_eq!(settings.music_volume, 0.5);
    }

    #[test]
    fn test_from_json_partial() {
        let settings =
            Settings::from_json(r#"{"muted": true, "seed": 7, "tuning": {"brick_cols": 4}}"#)
                .unwrap();
        assert!(settings.muted);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.tuning.brick_cols, 4);
        assert_eq!(settings.tuning.brick_rows, 5);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_from_json_clamps_volume() {
        let settings = Settings::from_json(r#"{"music_volume": 3.0, "sfx_volume": -1.0}"#).unwrap();
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_from_json_resets_bad_tuning() {
        let json = r#"{
            "seed": 3,
            "tuning": {"max_frame_dt": -1.0, "brick_rows": 0, "paddle_width": 0.0}
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.seed, Some(3));
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_non_finite_volume_uses_default() {
        assert_eq!(clamp_volume(f32::NAN, 0.5), 0.5);
        assert_eq!(clamp_volume(f32::INFINITY, 1.0), 1.0);
        assert_eq!(clamp_volume(0.25, 1.0), 0.25);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }
}

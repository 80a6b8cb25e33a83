//! # Effect Configuration
//!
//! One record per donation tier: the amount threshold, the action it
//! triggers and every action-specific parameter. All parameters are always
//! present; an action simply ignores the ones that do not concern it.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// =============================================================================
// ACTION KIND
// =============================================================================

/// What a configured tier does. Persisted as its integer code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(u8)]
pub enum ActionKind {
    /// A uniformly chosen timed effect
    #[default]
    Random = 0,
    /// Rotation with explicit mode, speed and direction
    Rotation = 1,
    /// Visibility square wave
    Blink = 2,
    /// Colour filter hue sweep
    HueShift = 3,
    /// Position jitter
    Shake = 4,
    /// Text overlay counting up to 100%
    ProgressBar = 5,
    /// Two-axis pseudo-3D squash
    Rotation3D = 6,
    /// Rotation plus scale pulse
    Kaleidoscope = 7,
    /// One image overlay
    ImageOverlay = 8,
    /// One looping video overlay
    VideoOverlay = 9,
    /// Shrink the main source
    ShrinkScreen = 10,
    /// Particle system with explicit count and kind
    Particle = 11,
    /// Bouncing shapes
    RandomShapes = 12,
}

impl ActionKind {
    /// Every action, in code order.
    pub const ALL: [Self; 13] = [
        Self::Random,
        Self::Rotation,
        Self::Blink,
        Self::HueShift,
        Self::Shake,
        Self::ProgressBar,
        Self::Rotation3D,
        Self::Kaleidoscope,
        Self::ImageOverlay,
        Self::VideoOverlay,
        Self::ShrinkScreen,
        Self::Particle,
        Self::RandomShapes,
    ];

    /// Persisted integer code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Action for a persisted code.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn from_code(code: i64) -> Option<Self> {
        if code < 0 || code >= Self::ALL.len() as i64 {
            return None;
        }
        Some(Self::ALL[code as usize])
    }

    /// Stable display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Rotation => "Rotation",
            Self::Blink => "Blink",
            Self::HueShift => "HueShift",
            Self::Shake => "Shake",
            Self::ProgressBar => "ProgressBar",
            Self::Rotation3D => "Rotation3D",
            Self::Kaleidoscope => "Kaleidoscope",
            Self::ImageOverlay => "ImageOverlay",
            Self::VideoOverlay => "VideoOverlay",
            Self::ShrinkScreen => "ShrinkScreen",
            Self::Particle => "Particle",
            Self::RandomShapes => "RandomShapes",
        }
    }

    /// Reverse of [`Self::name`], ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Does this action insert a media overlay?
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::ImageOverlay | Self::VideoOverlay)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for ActionKind {
    type Error = ConfigError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ConfigError::UnknownAction(code))
    }
}

impl From<ActionKind> for i64 {
    fn from(action: ActionKind) -> Self {
        action.code()
    }
}

// =============================================================================
// EFFECT CONFIGURATION
// =============================================================================

/// One donation tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectConfiguration {
    /// Threshold in reference currency units
    pub amount: f64,
    /// What the tier triggers
    pub action: ActionKind,
    /// Seconds the effect lasts
    pub duration: f64,

    /// Fixed media file for overlay actions
    pub media_path: String,
    /// Folder to draw a random media file from
    pub media_folder: String,
    /// Overlay scale in percent (100 = natural size)
    pub image_scale: f64,

    /// Hue sweep style code
    pub hue_type: i64,
    /// Hue sweep speed
    pub hue_speed: f64,

    /// Blink interval in seconds
    pub blink_interval: f64,
    /// Blink style code
    pub blink_type: i64,
    /// Blink frequency in Hz
    pub blink_frequency: f64,

    /// Shake style code
    pub shake_type: i64,
    /// Shake amplitude
    pub shake_intensity: f64,

    /// Progress display style code
    pub progress_bar_type: i64,
    /// Progress display position code
    pub progress_bar_position: i64,

    /// Rotation mode code (0 planar, 1 X, 2 Y, 3 all)
    pub rotation_type: i64,
    /// Revolutions per second
    pub rotation_speed: f64,
    /// Spin the other way
    pub rotation_reverse: bool,

    /// Shrink step in percent
    pub shrink_percentage: f64,
    /// Animate the shrink
    pub shrink_smooth: bool,

    /// Number of particles
    pub particle_count: u32,
    /// Particle kind code (0 explosion, 1 rain, 2 snow, 3+ star)
    pub particle_type: i64,
}

impl Default for EffectConfiguration {
    fn default() -> Self {
        Self {
            amount: 1000.0,
            action: ActionKind::Random,
            duration: 5.0,
            media_path: String::new(),
            media_folder: String::new(),
            image_scale: 100.0,
            hue_type: 0,
            hue_speed: 180.0,
            blink_interval: 0.5,
            blink_type: 0,
            blink_frequency: 3.0,
            shake_type: 0,
            shake_intensity: 10.0,
            progress_bar_type: 0,
            progress_bar_position: 0,
            rotation_type: 0,
            rotation_speed: 0.5,
            rotation_reverse: false,
            shrink_percentage: 20.0,
            shrink_smooth: true,
            particle_count: 50,
            particle_type: 0,
        }
    }
}

impl EffectConfiguration {
    /// A default record for `amount` triggering `action`.
    #[must_use]
    pub fn new(amount: f64, action: ActionKind) -> Self {
        Self {
            amount,
            action,
            ..Self::default()
        }
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Checks the fields every action relies on.
    ///
    /// # Errors
    ///
    /// A human-readable reason when the amount is negative or not finite,
    /// or the duration is not strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(format!("amount must be a non-negative number, got {}", self.amount));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(format!("duration must be positive, got {}", self.duration));
        }
        Ok(())
    }

    /// The media file, if one is configured.
    #[must_use]
    pub fn media_file(&self) -> Option<&Path> {
        non_empty_path(&self.media_path)
    }

    /// The media folder, if one is configured.
    #[must_use]
    pub fn media_dir(&self) -> Option<&Path> {
        non_empty_path(&self.media_folder)
    }
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Path::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes_round_trip() {
        for (i, action) in ActionKind::ALL.into_iter().enumerate() {
            assert_eq!(action.code(), i as i64);
            assert_eq!(ActionKind::from_code(i as i64), Some(action));
            assert_eq!(ActionKind::from_name(action.name()), Some(action));
        }
        assert_eq!(ActionKind::from_code(13), None);
        assert_eq!(ActionKind::from_code(-1), None);
        assert_eq!(ActionKind::try_from(99), Err(ConfigError::UnknownAction(99)));
    }

    #[test]
    fn test_name_lookup_is_lenient() {
        assert_eq!(ActionKind::from_name(" hueshift "), Some(ActionKind::HueShift));
        assert_eq!(ActionKind::from_name("Teleport"), None);
        assert_eq!(ActionKind::Rotation3D.to_string(), "Rotation3D");
    }

    #[test]
    fn test_defaults() {
        let config = EffectConfiguration::default();
        assert_eq!(config.amount, 1000.0);
        assert_eq!(config.action, ActionKind::Random);
        assert_eq!(config.duration, 5.0);
        assert_eq!(config.particle_count, 50);
        assert!(config.shrink_smooth);
        assert!(config.media_file().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(EffectConfiguration::new(-1.0, ActionKind::Blink).validate().is_err());
        assert!(EffectConfiguration::new(f64::NAN, ActionKind::Blink).validate().is_err());
        assert!(EffectConfiguration::new(0.0, ActionKind::Blink)
            .with_duration(0.0)
            .validate()
            .is_err());
        assert!(EffectConfiguration::new(0.0, ActionKind::Blink).validate().is_ok());
    }

    #[test]
    fn test_media_paths_ignore_blank() {
        let mut config = EffectConfiguration::new(100.0, ActionKind::ImageOverlay);
        config.media_path = "   ".to_string();
        config.media_folder = "/srv/media".to_string();
        assert!(config.media_file().is_none());
        assert_eq!(config.media_dir(), Some(Path::new("/srv/media")));
    }
}

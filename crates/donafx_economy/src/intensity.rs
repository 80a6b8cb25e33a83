//! Intensity derived from a configured tier.
//!
//! Timed effects take a 0-1 style intensity. A configured tier carries its
//! own parameters instead, which map onto that intensity per action.

use crate::config::{ActionKind, EffectConfiguration};

/// Intensity used when a tier asks for a random effect.
pub const RANDOM_ACTION_INTENSITY: f64 = 0.5;

/// Scale of a configured video overlay.
pub const VIDEO_OVERLAY_SCALE: f64 = 1.0;

/// Intensity to start the tier's timed effect with. `None` for actions
/// that are not intensity-driven.
#[must_use]
pub fn configured_intensity(config: &EffectConfiguration) -> Option<f64> {
    match config.action {
        ActionKind::Random => Some(RANDOM_ACTION_INTENSITY),
        ActionKind::Blink => Some(config.blink_frequency),
        ActionKind::HueShift => Some(config.hue_speed / 180.0),
        ActionKind::Shake => Some(config.shake_intensity / 10.0),
        ActionKind::Rotation3D => Some(0.5),
        ActionKind::ProgressBar | ActionKind::Kaleidoscope | ActionKind::RandomShapes => Some(1.0),
        ActionKind::Rotation
        | ActionKind::ImageOverlay
        | ActionKind::VideoOverlay
        | ActionKind::ShrinkScreen
        | ActionKind::Particle => None,
    }
}

/// Overlay scale for the tier: `imageScale` percent for images, natural
/// size for videos.
#[must_use]
pub fn overlay_scale(config: &EffectConfiguration) -> f64 {
    match config.action {
        ActionKind::VideoOverlay => VIDEO_OVERLAY_SCALE,
        _ => config.image_scale / 100.0,
    }
}

//! Progress bar: a text label counting up to 100%.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::{EffectContext, EffectType};
use crate::error::{EffectError, EffectResult};
use donafx_core::{ObjectDescriptor, ObjectRef, SettingValue, SourceKind};
use donafx_shared::{Vec2, CANVAS_WIDTH};

/// Label position: top centre, shifted left by half a label width.
pub const PROGRESS_POSITION: Vec2 = Vec2::new(CANVAS_WIDTH / 2.0 - 100.0, 50.0);

/// Shows `"Progress: N%"` where N tracks `elapsed / duration`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ProgressBarEffect {
    percent: u32,
    label: Option<ObjectRef>,
}

impl ProgressBarEffect {
    /// Creates a progress bar effect.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            percent: 0,
            label: None,
        }
    }

    /// Percent currently shown.
    #[must_use]
    pub const fn percent(&self) -> u32 {
        self.percent
    }

    /// Label text for a percentage.
    #[must_use]
    pub fn text(percent: u32) -> String {
        format!("Progress: {percent}%")
    }

    /// Rounded percentage for `elapsed` out of `duration`, clamped to 100.
    #[must_use]
    pub fn percent_at(elapsed: f64, duration: f64) -> u32 {
        if duration <= 0.0 {
            return 100;
        }
        (elapsed / duration * 100.0).clamp(0.0, 100.0).round() as u32
    }

    pub(crate) fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        let desc = ObjectDescriptor::new(ctx.temp_name(EffectType::ProgressBar), SourceKind::Text)
            .with_setting("text", Self::text(0))
            .with_setting("color", 0xFFFF_FFFF_u32)
            .with_setting("outline", true)
            .with_setting("outline_color", 0xFF00_0000_u32)
            .at(PROGRESS_POSITION);
        let label = ctx
            .scene
            .add_object(desc)
            .map_err(|e| EffectError::creation(EffectType::ProgressBar.label(), &e))?;
        self.label = Some(label);
        self.percent = 0;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(label) = &self.label else {
            return;
        };
        self.percent = Self::percent_at(ctx.elapsed, ctx.duration);
        ctx.scene
            .update_setting(label, "text", SettingValue::Text(Self::text(self.percent)));
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        if let Some(label) = self.label.take() {
            ctx.scene.remove_object(&label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding_and_clamp() {
        assert_eq!(ProgressBarEffect::percent_at(0.0, 5.0), 0);
        assert_eq!(ProgressBarEffect::percent_at(2.52, 5.0), 50);
        assert_eq!(ProgressBarEffect::percent_at(2.53, 5.0), 51);
        assert_eq!(ProgressBarEffect::percent_at(5.2, 5.0), 100);
        assert_eq!(ProgressBarEffect::text(42), "Progress: 42%");
    }
}

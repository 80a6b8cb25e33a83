//! Hue shift: one colour-correction filter swept over the hue circle.

use super::{EffectContext, EffectType};
use crate::error::{EffectError, EffectResult};
use donafx_core::{FilterDescriptor, FilterKind, FilterRef, SettingValue};

/// Filter setting written every tick.
pub const HUE_SETTING: &str = "hue_shift";

/// Sweeps the hue at `speed` degrees per second, centred on zero.
#[derive(Clone, Debug, PartialEq)]
pub struct HueShiftEffect {
    /// Degrees per second
    pub speed: f64,
    hue: f64,
    filter: Option<FilterRef>,
}

impl HueShiftEffect {
    /// Creates a hue shift effect.
    #[must_use]
    pub const fn new(speed: f64) -> Self {
        Self {
            speed,
            hue: 0.0,
            filter: None,
        }
    }

    /// Hue currently written to the filter, in `[-180, 180)`.
    #[must_use]
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    /// Hue for `elapsed` seconds at `speed`.
    #[must_use]
    pub fn hue_at(speed: f64, elapsed: f64) -> f64 {
        (elapsed * speed).rem_euclid(360.0) - 180.0
    }

    pub(crate) fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        let name = ctx.temp_name(EffectType::HueShift);
        let desc =
            FilterDescriptor::new(name, FilterKind::ColorCorrection).with_setting(HUE_SETTING, 0.0);
        let filter = ctx
            .scene
            .add_filter(ctx.target, desc)
            .map_err(|e| EffectError::creation(EffectType::HueShift.label(), &e))?;
        self.filter = Some(filter);
        self.hue = 0.0;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(filter) = &self.filter else {
            return;
        };
        self.hue = Self::hue_at(self.speed, ctx.elapsed);
        ctx.scene
            .update_filter_setting(ctx.target, filter, HUE_SETTING, SettingValue::Float(self.hue));
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        if let Some(filter) = self.filter.take() {
            ctx.scene.remove_filter(ctx.target, &filter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_is_centred() {
        assert!((HueShiftEffect::hue_at(180.0, 0.0) + 180.0).abs() < 1e-9);
        assert!((HueShiftEffect::hue_at(180.0, 1.0) - 0.0).abs() < 1e-9);
        assert!((HueShiftEffect::hue_at(180.0, 2.5) - (-90.0)).abs() < 1e-9);
        assert!(HueShiftEffect::hue_at(-90.0, 1.0) >= -180.0);
    }
}

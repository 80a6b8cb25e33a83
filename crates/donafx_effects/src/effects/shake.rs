//! Shake: random jitter around the snapshot position.

use super::EffectContext;
use crate::error::{EffectError, EffectResult};
use donafx_shared::Vec2;
use rand::Rng;

/// Each tick places the target at the snapshot position plus an independent
/// offset in `[-intensity, intensity]` per axis. Offsets never accumulate.
#[derive(Clone, Debug, PartialEq)]
pub struct ShakeEffect {
    /// Maximum offset in pixels
    pub intensity: f32,
    offset: Vec2,
}

impl ShakeEffect {
    /// Creates a shake effect.
    #[must_use]
    pub const fn new(intensity: f32) -> Self {
        Self {
            intensity,
            offset: Vec2::ZERO,
        }
    }

    /// Offset applied on the last tick.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn start(&mut self, _ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        if !(self.intensity.is_finite() && self.intensity >= 0.0) {
            return Err(EffectError::invalid("shake_intensity", self.intensity));
        }
        self.offset = Vec2::ZERO;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let i = self.intensity;
        self.offset = Vec2::new(ctx.rng.gen_range(-i..=i), ctx.rng.gen_range(-i..=i));
        ctx.scene
            .set_position(ctx.target, ctx.snapshot.transform.position + self.offset);
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.restore_position();
        self.offset = Vec2::ZERO;
    }
}

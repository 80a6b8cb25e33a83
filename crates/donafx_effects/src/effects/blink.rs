//! Blink: square-wave visibility toggle.

use super::EffectContext;
use crate::error::{EffectError, EffectResult};

/// Visible for the first half of each `1 / frequency` period, hidden for the
/// second half. Visibility is only written when the wave changes state.
#[derive(Clone, Debug, PartialEq)]
pub struct BlinkEffect {
    /// Blinks per second
    pub frequency: f64,
    visible: bool,
}

impl BlinkEffect {
    /// Creates a blink effect.
    #[must_use]
    pub const fn new(frequency: f64) -> Self {
        Self {
            frequency,
            visible: true,
        }
    }

    /// Visibility currently applied by the wave.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// Wave state at `elapsed` seconds.
    #[must_use]
    pub fn wave(&self, elapsed: f64) -> bool {
        let period = 1.0 / self.frequency;
        elapsed % period < period / 2.0
    }

    pub(crate) fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(EffectError::invalid("blink_frequency", self.frequency));
        }
        self.visible = ctx.snapshot.visible;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let visible = self.wave(ctx.elapsed);
        if visible != self.visible {
            self.visible = visible;
            ctx.scene.set_visible(ctx.target, visible);
        }
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.restore_visibility();
        self.visible = ctx.snapshot.visible;
    }
}

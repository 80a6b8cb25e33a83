//! Rotation family: planar and pseudo-3D rotation, Rotation3D, Kaleidoscope.
//!
//! Out-of-plane rotation is faked by squashing one scale axis with
//! `0.2 + 0.8 * |cos(angle)|`. Scales are always derived from the snapshot,
//! never from the current (already squashed) scale.

#![allow(clippy::cast_possible_truncation)]

use super::{squash, EffectContext};
use crate::error::EffectResult;
use donafx_shared::Vec2;

/// Axis configuration of a [`RotationEffect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Continuous 2D rotation (Z axis)
    #[default]
    Planar,
    /// Flip around the horizontal axis (vertical squash)
    XAxis,
    /// Flip around the vertical axis (horizontal squash)
    YAxis,
    /// Both squashes plus planar rotation
    AllAxes,
}

impl RotationMode {
    /// Mode for a configuration code. Unknown codes fall back to planar.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::XAxis,
            2 => Self::YAxis,
            3 => Self::AllAxes,
            _ => Self::Planar,
        }
    }

    /// Does this mode write the rotation channel?
    #[must_use]
    pub const fn rotates(self) -> bool {
        matches!(self, Self::Planar | Self::AllAxes)
    }

    /// Does this mode write the scale channel?
    #[must_use]
    pub const fn squashes(self) -> bool {
        !matches!(self, Self::Planar)
    }
}

/// Continuous rotation at `speed` revolutions per second.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationEffect {
    /// Axis configuration
    pub mode: RotationMode,
    /// Revolutions per second
    pub speed: f64,
    /// Spin the other way
    pub reverse: bool,
    angle: f64,
}

impl RotationEffect {
    /// Creates a rotation effect.
    #[must_use]
    pub const fn new(mode: RotationMode, speed: f64, reverse: bool) -> Self {
        Self {
            mode,
            speed,
            reverse,
            angle: 0.0,
        }
    }

    /// Current synthetic angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    pub(crate) fn start(&mut self, _ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        self.angle = 0.0;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let angle = (ctx.elapsed * self.speed * 360.0) % 360.0;
        self.angle = if self.reverse { -angle } else { angle };

        let base = ctx.snapshot.transform;
        if self.mode.rotates() {
            ctx.scene
                .set_rotation(ctx.target, base.rotation + self.angle as f32);
        }
        if self.mode.squashes() {
            let factor = squash(self.angle) as f32;
            let scale = match self.mode {
                RotationMode::XAxis => Vec2::new(base.scale.x, base.scale.y * factor),
                RotationMode::YAxis => Vec2::new(base.scale.x * factor, base.scale.y),
                _ => base.scale * factor,
            };
            ctx.scene.set_scale(ctx.target, scale);
        }
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        if self.mode.rotates() {
            ctx.restore_rotation();
        }
        if self.mode.squashes() {
            ctx.restore_scale();
        }
    }
}

/// Degrees per second around X.
const ROTATION_3D_X_SPEED: f64 = 90.0;
/// Degrees per second around Y.
const ROTATION_3D_Y_SPEED: f64 = 120.0;

/// Pseudo-3D spin: X angle squashes height, Y angle squashes width.
#[derive(Clone, Debug, PartialEq)]
pub struct Rotation3DEffect {
    /// Spin around X
    pub rotate_x: bool,
    /// Spin around Y
    pub rotate_y: bool,
    angle_x: f64,
    angle_y: f64,
}

impl Rotation3DEffect {
    /// Creates a pseudo-3D spin.
    #[must_use]
    pub const fn new(rotate_x: bool, rotate_y: bool) -> Self {
        Self {
            rotate_x,
            rotate_y,
            angle_x: 0.0,
            angle_y: 0.0,
        }
    }

    /// Current (X, Y) angles in degrees.
    #[must_use]
    pub const fn angles(&self) -> (f64, f64) {
        (self.angle_x, self.angle_y)
    }

    pub(crate) fn start(&mut self, _ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        self.angle_x = 0.0;
        self.angle_y = 0.0;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        if self.rotate_x {
            self.angle_x = (ctx.elapsed * ROTATION_3D_X_SPEED) % 360.0;
        }
        if self.rotate_y {
            self.angle_y = (ctx.elapsed * ROTATION_3D_Y_SPEED) % 360.0;
        }
        let base = ctx.snapshot.transform.scale;
        let scale = Vec2::new(
            base.x * squash(self.angle_y) as f32,
            base.y * squash(self.angle_x) as f32,
        );
        ctx.scene.set_scale(ctx.target, scale);
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.restore_scale();
    }
}

/// Full-speed spin (one revolution per second) with a sinusoidal scale pulse.
#[derive(Clone, Debug, PartialEq)]
pub struct KaleidoscopeEffect {
    /// Mirror segment count (carried for reporting)
    pub segments: u32,
    angle: f64,
}

impl KaleidoscopeEffect {
    /// Creates a kaleidoscope effect.
    #[must_use]
    pub const fn new(segments: u32) -> Self {
        Self {
            segments,
            angle: 0.0,
        }
    }

    /// Current rotation offset in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    pub(crate) fn start(&mut self, _ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        self.angle = 0.0;
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        self.angle = (ctx.elapsed * 360.0) % 360.0;
        let pulse = 0.9 + 0.1 * (std::f64::consts::TAU * ctx.elapsed).sin();

        let base = ctx.snapshot.transform;
        ctx.scene
            .set_rotation(ctx.target, base.rotation + self.angle as f32);
        ctx.scene.set_scale(ctx.target, base.scale * pulse as f32);
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.restore_rotation();
        ctx.restore_scale();
    }
}

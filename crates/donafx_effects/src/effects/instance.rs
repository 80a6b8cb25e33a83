//! The effect instance and its closed variant set.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::{
    BlinkEffect, EffectContext, EffectId, EffectPhase, EffectType, HueShiftEffect,
    KaleidoscopeEffect, ParticleKind, ParticleSystemEffect, ProgressBarEffect,
    RandomShapesEffect, Rotation3DEffect, RotationEffect, RotationMode, ShakeEffect, Snapshot,
};
use crate::error::{EffectError, EffectResult};
use donafx_core::{ObjectRef, SceneGateway};
use donafx_shared::Transform;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Variant state of an effect. One arm per [`EffectType`].
#[derive(Debug)]
pub enum EffectKind {
    /// Continuous rotation
    Rotation(RotationEffect),
    /// Visibility square wave
    Blink(BlinkEffect),
    /// Positional jitter
    Shake(ShakeEffect),
    /// Hue sweep filter
    HueShift(HueShiftEffect),
    /// Pseudo-3D spin
    Rotation3D(Rotation3DEffect),
    /// Bouncing shapes
    RandomShapes(RandomShapesEffect),
    /// Particle system
    ParticleSystem(ParticleSystemEffect),
    /// Progress label
    ProgressBar(ProgressBarEffect),
    /// Spin plus pulse
    Kaleidoscope(KaleidoscopeEffect),
}

impl EffectKind {
    /// Builds a variant from a 0-1 intensity, mapped into the variant's
    /// natural parameter range.
    #[must_use]
    pub fn from_intensity(effect: EffectType, intensity: f64) -> Self {
        match effect {
            EffectType::Rotation => {
                Self::Rotation(RotationEffect::new(RotationMode::Planar, 0.5 * intensity, false))
            }
            EffectType::Blink => Self::Blink(BlinkEffect::new(3.0 + 2.0 * intensity)),
            EffectType::Shake => Self::Shake(ShakeEffect::new((5.0 + 15.0 * intensity) as f32)),
            EffectType::HueShift => Self::HueShift(HueShiftEffect::new(90.0 + 90.0 * intensity)),
            EffectType::Rotation3D => Self::Rotation3D(Rotation3DEffect::new(true, true)),
            EffectType::RandomShapes => {
                Self::RandomShapes(RandomShapesEffect::new((5.0 + 10.0 * intensity) as usize))
            }
            EffectType::ParticleSystem => Self::ParticleSystem(ParticleSystemEffect::new(
                ParticleKind::Fountain,
                (20.0 + 50.0 * intensity) as usize,
            )),
            EffectType::ProgressBar => Self::ProgressBar(ProgressBarEffect::new()),
            EffectType::Kaleidoscope => {
                Self::Kaleidoscope(KaleidoscopeEffect::new((4.0 + 4.0 * intensity) as u32))
            }
        }
    }

    /// Tag of this variant.
    #[must_use]
    pub const fn effect_type(&self) -> EffectType {
        match self {
            Self::Rotation(_) => EffectType::Rotation,
            Self::Blink(_) => EffectType::Blink,
            Self::Shake(_) => EffectType::Shake,
            Self::HueShift(_) => EffectType::HueShift,
            Self::Rotation3D(_) => EffectType::Rotation3D,
            Self::RandomShapes(_) => EffectType::RandomShapes,
            Self::ParticleSystem(_) => EffectType::ParticleSystem,
            Self::ProgressBar(_) => EffectType::ProgressBar,
            Self::Kaleidoscope(_) => EffectType::Kaleidoscope,
        }
    }

    fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        match self {
            Self::Rotation(e) => e.start(ctx),
            Self::Blink(e) => e.start(ctx),
            Self::Shake(e) => e.start(ctx),
            Self::HueShift(e) => e.start(ctx),
            Self::Rotation3D(e) => e.start(ctx),
            Self::RandomShapes(e) => e.start(ctx),
            Self::ParticleSystem(e) => e.start(ctx),
            Self::ProgressBar(e) => e.start(ctx),
            Self::Kaleidoscope(e) => e.start(ctx),
        }
    }

    fn update(&mut self, ctx: &mut EffectContext<'_>) {
        match self {
            Self::Rotation(e) => e.update(ctx),
            Self::Blink(e) => e.update(ctx),
            Self::Shake(e) => e.update(ctx),
            Self::HueShift(e) => e.update(ctx),
            Self::Rotation3D(e) => e.update(ctx),
            Self::RandomShapes(e) => e.update(ctx),
            Self::ParticleSystem(e) => e.update(ctx),
            Self::ProgressBar(e) => e.update(ctx),
            Self::Kaleidoscope(e) => e.update(ctx),
        }
    }

    fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        match self {
            Self::Rotation(e) => e.stop(ctx),
            Self::Blink(e) => e.stop(ctx),
            Self::Shake(e) => e.stop(ctx),
            Self::HueShift(e) => e.stop(ctx),
            Self::Rotation3D(e) => e.stop(ctx),
            Self::RandomShapes(e) => e.stop(ctx),
            Self::ParticleSystem(e) => e.stop(ctx),
            Self::ProgressBar(e) => e.stop(ctx),
            Self::Kaleidoscope(e) => e.stop(ctx),
        }
    }
}

/// One running, time-bounded effect on one target.
#[derive(Debug)]
pub struct EffectInstance {
    id: EffectId,
    target: ObjectRef,
    duration: f64,
    elapsed: f64,
    phase: EffectPhase,
    snapshot: Option<Snapshot>,
    rng: ChaCha8Rng,
    kind: EffectKind,
}

impl EffectInstance {
    /// Creates an instance in the `Created` phase.
    #[must_use]
    pub fn new(id: EffectId, target: ObjectRef, kind: EffectKind, duration: f64, seed: u64) -> Self {
        Self {
            id,
            target,
            duration,
            elapsed: 0.0,
            phase: EffectPhase::Created,
            snapshot: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            kind,
        }
    }

    /// Instance id
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EffectId {
        self.id
    }

    /// Target object
    #[inline]
    #[must_use]
    pub const fn target(&self) -> &ObjectRef {
        &self.target
    }

    /// Variant tag
    #[inline]
    #[must_use]
    pub const fn effect_type(&self) -> EffectType {
        self.kind.effect_type()
    }

    /// Variant state
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Lifetime in seconds
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Seconds advanced so far
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Lifecycle phase
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> EffectPhase {
        self.phase
    }

    /// Pre-start state of the target, once started
    #[inline]
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Is the instance running?
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == EffectPhase::Running
    }

    /// `Created -> Running`: captures the snapshot and creates the
    /// variant's objects.
    ///
    /// # Errors
    ///
    /// On failure the instance goes straight to `Completed` without having
    /// touched the scene, and the cause is returned.
    pub fn start(&mut self, scene: &mut dyn SceneGateway) -> EffectResult<()> {
        if self.phase != EffectPhase::Created {
            return Ok(());
        }
        let effect = self.effect_type();

        let result = self.try_start(scene);
        match &result {
            Ok(()) => {
                self.phase = EffectPhase::Running;
                tracing::info!(
                    "effect {} started: {} on '{}' ({:.1}s)",
                    self.id,
                    effect.label(),
                    self.target,
                    self.duration
                );
            }
            Err(e) => {
                self.phase = EffectPhase::Completed;
                tracing::warn!("effect {} ({}) not started: {}", self.id, effect.label(), e);
            }
        }
        result
    }

    fn try_start(&mut self, scene: &mut dyn SceneGateway) -> EffectResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(EffectError::invalid("duration", self.duration));
        }
        let snapshot = match Snapshot::capture(scene, &self.target) {
            Some(snapshot) => snapshot,
            None if self.effect_type().mutates_target() => {
                return Err(EffectError::TargetMissing(self.target.name().to_owned()));
            }
            None => Snapshot {
                transform: Transform::IDENTITY,
                visible: true,
            },
        };
        self.snapshot = Some(snapshot);
        self.with_context(scene, 0.0, |kind, ctx| kind.start(ctx))
    }

    /// Advances by `dt` seconds and applies the variant. Stops the instance
    /// once `elapsed >= duration`. No-op unless `Running`.
    pub fn update(&mut self, scene: &mut dyn SceneGateway, dt: f64) {
        if self.phase != EffectPhase::Running {
            return;
        }
        self.elapsed += dt;
        self.with_context(scene, dt, |kind, ctx| kind.update(ctx));

        if self.elapsed >= self.duration {
            self.stop(scene);
        }
    }

    /// `Running -> Completed`: removes everything the variant created and
    /// restores the channels it mutated. Runs at most once.
    pub fn stop(&mut self, scene: &mut dyn SceneGateway) {
        match self.phase {
            EffectPhase::Running => {
                self.with_context(scene, 0.0, |kind, ctx| kind.stop(ctx));
                self.phase = EffectPhase::Completed;
                tracing::info!(
                    "effect {} stopped: {} after {:.2}s",
                    self.id,
                    self.effect_type().label(),
                    self.elapsed
                );
            }
            EffectPhase::Created => self.phase = EffectPhase::Completed,
            EffectPhase::Completed => {}
        }
    }

    fn with_context<R>(
        &mut self,
        scene: &mut dyn SceneGateway,
        dt: f64,
        f: impl FnOnce(&mut EffectKind, &mut EffectContext<'_>) -> R,
    ) -> R {
        let Self {
            id,
            target,
            duration,
            elapsed,
            snapshot,
            rng,
            kind,
            ..
        } = self;
        let mut ctx = EffectContext {
            scene,
            target,
            id: *id,
            snapshot: snapshot.unwrap_or(Snapshot {
                transform: Transform::IDENTITY,
                visible: true,
            }),
            rng,
            elapsed: *elapsed,
            duration: *duration,
            dt,
        };
        f(kind, &mut ctx)
    }
}

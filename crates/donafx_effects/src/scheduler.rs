//! # Effect Scheduler
//!
//! Owns every running [`EffectInstance`] and drives them on a fixed step.
//!
//! ## Timing
//!
//! ```text
//! tick(dt) ──> step accumulator ──every 16 ms──> update every instance
//!         └──> reap accumulator ──every 100 ms─> drop completed instances
//! ```
//!
//! The host calls `tick` with whatever wall-clock delta it has; the
//! scheduler converts that into whole fixed steps, so effect timing does
//! not depend on the host's frame rate.

use crate::effects::{
    EffectId, EffectInstance, EffectKind, EffectType, ParticleKind, ParticleSystemEffect,
    RotationEffect, RotationMode,
};
use crate::error::{EffectError, EffectResult};
use donafx_core::{ObjectRef, SceneGateway};
use donafx_shared::{REAP_INTERVAL_SECS, TICK_STEP_SECS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Most fixed steps run by one `tick`. Excess time is dropped so a stalled
/// host does not trigger a burst of catch-up steps.
pub const MAX_STEPS_PER_TICK: u32 = 8;

/// Counters for scheduler activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Instances started successfully
    pub started: u64,
    /// Instances whose start failed
    pub failed: u64,
    /// Instances dropped by the sweep
    pub reaped: u64,
    /// Fixed steps executed
    pub steps: u64,
    /// Instances stopped by `clear_all`
    pub cancelled: u64,
}

/// Runs timed effects on a fixed step and sweeps completed ones.
#[derive(Debug)]
pub struct EffectScheduler {
    active: Vec<EffectInstance>,
    next_id: u64,
    rng: ChaCha8Rng,
    step_accumulator: f64,
    reap_accumulator: f64,
    stats: SchedulerStats,
}

impl EffectScheduler {
    /// Creates a scheduler seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates a scheduler with a fixed seed (reproducible runs).
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            active: Vec::new(),
            next_id: 1,
            rng,
            step_accumulator: 0.0,
            reap_accumulator: 0.0,
            stats: SchedulerStats::default(),
        }
    }

    // =========================================================================
    // APPLY
    // =========================================================================

    /// Starts `effect` on `target` with parameters derived from a 0-1
    /// `intensity`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `intensity` is not finite (nothing is added).
    /// Otherwise any start failure is returned after the failed instance
    /// has been added inactive; the next sweep drops it.
    pub fn apply_effect(
        &mut self,
        scene: &mut dyn SceneGateway,
        target: &ObjectRef,
        effect: EffectType,
        intensity: f64,
        duration: f64,
    ) -> EffectResult<EffectId> {
        if !intensity.is_finite() {
            return Err(EffectError::invalid("intensity", intensity));
        }
        self.spawn(scene, target, EffectKind::from_intensity(effect, intensity), duration)
    }

    /// Starts one of the nine effect kinds, chosen uniformly.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_effect`].
    pub fn apply_random_effect(
        &mut self,
        scene: &mut dyn SceneGateway,
        target: &ObjectRef,
        intensity: f64,
        duration: f64,
    ) -> EffectResult<EffectId> {
        let index = self.rng.gen_range(0..EffectType::ALL.len());
        let effect = EffectType::ALL[index];
        tracing::debug!("random effect pick: {}", effect.label());
        self.apply_effect(scene, target, effect, intensity, duration)
    }

    /// Starts a rotation with explicit parameters.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_effect`].
    pub fn apply_rotation_effect(
        &mut self,
        scene: &mut dyn SceneGateway,
        target: &ObjectRef,
        duration: f64,
        speed: f64,
        mode: RotationMode,
        reverse: bool,
    ) -> EffectResult<EffectId> {
        if !speed.is_finite() {
            return Err(EffectError::invalid("rotation_speed", speed));
        }
        let kind = EffectKind::Rotation(RotationEffect::new(mode, speed, reverse));
        self.spawn(scene, target, kind, duration)
    }

    /// Starts a particle system with an explicit count and kind.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_effect`].
    pub fn apply_particle_effect(
        &mut self,
        scene: &mut dyn SceneGateway,
        target: &ObjectRef,
        duration: f64,
        count: usize,
        kind: ParticleKind,
    ) -> EffectResult<EffectId> {
        let kind = EffectKind::ParticleSystem(ParticleSystemEffect::new(kind, count));
        self.spawn(scene, target, kind, duration)
    }

    /// Starts an arbitrary variant.
    ///
    /// # Errors
    ///
    /// The start failure, if any. The instance is added either way.
    pub fn spawn(
        &mut self,
        scene: &mut dyn SceneGateway,
        target: &ObjectRef,
        kind: EffectKind,
        duration: f64,
    ) -> EffectResult<EffectId> {
        let id = EffectId(self.next_id);
        self.next_id += 1;

        let seed = self.rng.gen::<u64>();
        let mut instance = EffectInstance::new(id, target.clone(), kind, duration, seed);
        let result = instance.start(scene);
        self.active.push(instance);

        match result {
            Ok(()) => {
                self.stats.started += 1;
                tracing::info!("scheduler: effect {} applied, total active: {}", id, self.active.len());
                Ok(id)
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advances wall-clock time by `dt` seconds: runs the fixed steps that
    /// became due and the completed-instance sweep when its interval elapsed.
    ///
    /// Returns the number of fixed steps executed.
    pub fn tick(&mut self, scene: &mut dyn SceneGateway, dt: f64) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }

        self.step_accumulator += dt;
        let mut steps = 0;
        while steps < MAX_STEPS_PER_TICK && self.step_accumulator >= TICK_STEP_SECS {
            self.step_accumulator -= TICK_STEP_SECS;
            self.step(scene);
            steps += 1;
        }
        // Backlog past the step cap is dropped, keeping only the partial step.
        if self.step_accumulator >= TICK_STEP_SECS {
            self.step_accumulator %= TICK_STEP_SECS;
        }

        self.reap_accumulator += dt;
        if self.reap_accumulator >= REAP_INTERVAL_SECS {
            self.reap_accumulator = 0.0;
            self.reap();
        }
        steps
    }

    /// Runs one fixed step on every running instance.
    pub fn step(&mut self, scene: &mut dyn SceneGateway) {
        for instance in &mut self.active {
            instance.update(scene, TICK_STEP_SECS);
        }
        self.stats.steps += 1;
    }

    /// Drops every instance that is no longer running.
    /// Returns how many were dropped.
    pub fn reap(&mut self) -> usize {
        let before = self.active.len();
        self.active.retain(EffectInstance::is_active);
        let reaped = before - self.active.len();
        self.stats.reaped += reaped as u64;
        reaped
    }

    /// Stops every instance (restoring the scene) and empties the set.
    /// Safe with zero instances and idempotent.
    pub fn clear_all(&mut self, scene: &mut dyn SceneGateway) -> usize {
        let mut stopped = 0;
        for instance in &mut self.active {
            if instance.is_active() {
                stopped += 1;
            }
            instance.stop(scene);
        }
        self.active.clear();
        self.stats.cancelled += stopped as u64;
        if stopped > 0 {
            tracing::info!("scheduler: all effects cleared ({} stopped)", stopped);
        }
        stopped
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Instances in the set, running or awaiting the sweep.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Is the set empty?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Instances still running.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.active.iter().filter(|i| i.is_active()).count()
    }

    /// Looks an instance up by id.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&EffectInstance> {
        self.active.iter().find(|i| i.id() == id)
    }

    /// Iterates the set in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.active.iter()
    }

    /// Activity counters.
    #[must_use]
    pub const fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donafx_core::{FilterKind, SceneArena};
    use donafx_shared::{Transform, Vec2};

    fn setup() -> (SceneArena, ObjectRef, EffectScheduler) {
        let scene = SceneArena::with_main_source("Camera", Transform::at(Vec2::new(10.0, 20.0)))
            .unwrap();
        let cam = scene.find_by_name("Camera").unwrap();
        (scene, cam, EffectScheduler::with_seed(42))
    }

    #[test]
    fn test_apply_and_expire() {
        let (mut scene, cam, mut sched) = setup();
        sched
            .apply_effect(&mut scene, &cam, EffectType::Rotation, 1.0, 0.5)
            .unwrap();
        assert_eq!(sched.running_count(), 1);

        for _ in 0..40 {
            sched.tick(&mut scene, 0.016);
        }
        assert_eq!(sched.running_count(), 0);
        assert!(sched.is_empty(), "sweep should have dropped the instance");
        assert_eq!(scene.transform(&cam).unwrap().rotation, 0.0);
    }

    #[test]
    fn test_fixed_step_accumulation() {
        let (mut scene, cam, mut sched) = setup();
        let id = sched
            .apply_effect(&mut scene, &cam, EffectType::Shake, 0.5, 10.0)
            .unwrap();

        assert_eq!(sched.tick(&mut scene, 0.010), 0);
        assert_eq!(sched.tick(&mut scene, 0.010), 1);
        assert_eq!(sched.tick(&mut scene, 0.050), 3);
        assert_eq!(sched.tick(&mut scene, 5.0), MAX_STEPS_PER_TICK);

        let elapsed = sched.get(id).unwrap().elapsed();
        let expected = f64::from(4 + MAX_STEPS_PER_TICK) * TICK_STEP_SECS;
        assert!((elapsed - expected).abs() < 1e-9);
    }

    #[test]
    fn test_huge_dt_is_bounded() {
        let (mut scene, cam, mut sched) = setup();
        let id = sched
            .apply_effect(&mut scene, &cam, EffectType::Shake, 0.5, 10.0)
            .unwrap();

        assert_eq!(sched.tick(&mut scene, 1e20), MAX_STEPS_PER_TICK);
        assert!(sched.tick(&mut scene, 0.016) <= 1, "backlog must not carry over");
        assert_eq!(sched.tick(&mut scene, f64::MAX), MAX_STEPS_PER_TICK);

        let elapsed = sched.get(id).unwrap().elapsed();
        assert!(elapsed <= f64::from(2 * MAX_STEPS_PER_TICK + 1) * TICK_STEP_SECS + 1e-9);
    }

    #[test]
    fn test_reap_bound() {
        let (mut scene, cam, mut sched) = setup();
        sched
            .apply_effect(&mut scene, &cam, EffectType::Blink, 0.5, 0.016)
            .unwrap();
        sched.tick(&mut scene, 0.016);
        assert_eq!(sched.running_count(), 0);
        assert_eq!(sched.len(), 1, "completed but not yet swept");
        for _ in 0..6 {
            sched.tick(&mut scene, 0.016);
        }
        assert_eq!(sched.len(), 0);
        assert_eq!(sched.stats().reaped, 1);
    }

    #[test]
    fn test_failed_start_is_swept() {
        let (mut scene, cam, mut sched) = setup();
        scene.refuse_filters(FilterKind::ColorCorrection, true);
        let err = sched.apply_effect(&mut scene, &cam, EffectType::HueShift, 0.5, 3.0);
        assert!(err.is_err());
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.running_count(), 0);
        assert_eq!(sched.reap(), 1);
        assert_eq!(sched.stats().failed, 1);
    }

    #[test]
    fn test_clear_all_restores_and_is_idempotent() {
        let (mut scene, cam, mut sched) = setup();
        for effect in EffectType::ALL {
            sched.apply_effect(&mut scene, &cam, effect, 1.0, 30.0).unwrap();
        }
        for _ in 0..30 {
            sched.tick(&mut scene, 0.016);
        }
        assert!(scene.len() > 1);

        assert_eq!(sched.clear_all(&mut scene), 9);
        assert_eq!(sched.clear_all(&mut scene), 0);
        assert!(sched.is_empty());
        assert_eq!(scene.len(), 1);
        assert_eq!(
            scene.transform(&cam).unwrap(),
            Transform::at(Vec2::new(10.0, 20.0))
        );
        assert!(scene.filters(&cam).is_empty());
        assert_eq!(scene.is_visible(&cam), Some(true));
    }

    #[test]
    fn test_random_pick_covers_all_kinds() {
        let (mut scene, cam, mut sched) = setup();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let id = sched.apply_random_effect(&mut scene, &cam, 0.2, 1.0).unwrap();
            seen.insert(sched.get(id).unwrap().effect_type());
            sched.clear_all(&mut scene);
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_explicit_overloads() {
        let (mut scene, cam, mut sched) = setup();
        let rot = sched
            .apply_rotation_effect(&mut scene, &cam, 5.0, 2.0, RotationMode::YAxis, true)
            .unwrap();
        match sched.get(rot).unwrap().kind() {
            EffectKind::Rotation(r) => {
                assert!((r.speed - 2.0).abs() < 1e-9);
                assert_eq!(r.mode, RotationMode::YAxis);
                assert!(r.reverse);
            }
            other => panic!("unexpected {other:?}"),
        }

        let particles = sched
            .apply_particle_effect(&mut scene, &cam, 5.0, 30, ParticleKind::Snow)
            .unwrap();
        assert_eq!(scene.count_prefixed("temp_particle_"), 30);
        assert_eq!(
            sched.get(particles).unwrap().effect_type(),
            EffectType::ParticleSystem
        );
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let (mut scene, cam, mut sched) = setup();
        assert!(matches!(
            sched.apply_effect(&mut scene, &cam, EffectType::Blink, f64::NAN, 1.0),
            Err(EffectError::InvalidParameter { .. })
        ));
        assert!(sched.is_empty());
        assert!(sched
            .apply_effect(&mut scene, &cam, EffectType::Blink, 0.5, 0.0)
            .is_err());
        assert_eq!(sched.running_count(), 0);
    }
}

//! # Restoration Tests
//!
//! Whatever runs on the main source, the scene ends up as it started:
//!
//! 1. **Expiry**: every variant restores its target once its duration ends
//! 2. **Cancellation**: clearing mid-flight restores just the same
//! 3. **No leaks**: no temporary object or filter survives
//! 4. **Clear-all**: idempotent, bounded shrink, orphan sweep
//!
//! Run with: cargo test --package donafx_effects --test restoration_test

use donafx_core::{ObjectRef, SceneArena, SceneGateway};
use donafx_effects::{EffectScheduler, EffectType, ObstructionLedger};
use donafx_shared::constants::TEMP_PREFIX;
use donafx_shared::{Transform, Vec2};

const START: Transform = Transform::new(Vec2::new(320.0, 180.0), Vec2::new(0.8, 0.8), 15.0);

fn scene() -> (SceneArena, ObjectRef) {
    let scene = SceneArena::with_main_source("Camera", START).unwrap();
    let cam = scene.find_by_name("Camera").unwrap();
    (scene, cam)
}

fn assert_pristine(scene: &SceneArena, cam: &ObjectRef) {
    assert_eq!(scene.transform(cam), Some(START));
    assert_eq!(scene.is_visible(cam), Some(true));
    assert!(scene.filters(cam).is_empty());
    assert_eq!(scene.count_prefixed(TEMP_PREFIX), 0);
    assert_eq!(scene.len(), 1);
}

// ============================================================================
// EXPIRY
// ============================================================================

#[test]
fn every_variant_restores_on_expiry() {
    for (i, effect) in EffectType::ALL.into_iter().enumerate() {
        let (mut scene, cam) = scene();
        let mut sched = EffectScheduler::with_seed(i as u64);
        sched.apply_effect(&mut scene, &cam, effect, 0.7, 0.5).unwrap();

        for _ in 0..60 {
            sched.tick(&mut scene, 0.016);
        }

        assert!(sched.is_empty(), "{} not swept", effect.label());
        assert_pristine(&scene, &cam);
    }
}

#[test]
fn stacked_effects_restore_on_expiry() {
    let (mut scene, cam) = scene();
    let mut sched = EffectScheduler::with_seed(7);
    for (i, effect) in EffectType::ALL.into_iter().enumerate() {
        let duration = 0.2 + 0.1 * i as f64;
        sched.apply_effect(&mut scene, &cam, effect, 1.0, duration).unwrap();
    }
    assert_eq!(sched.running_count(), EffectType::ALL.len());

    for _ in 0..120 {
        sched.tick(&mut scene, 0.016);
    }
    assert!(sched.is_empty());
    assert_eq!(scene.count_prefixed(TEMP_PREFIX), 0);
    assert!(scene.filters(&cam).is_empty());
    assert_eq!(scene.is_visible(&cam), Some(true));
}

// ============================================================================
// CANCELLATION
// ============================================================================

#[test]
fn clear_mid_flight_restores_target() {
    for seed in 0..16 {
        let (mut scene, cam) = scene();
        let mut sched = EffectScheduler::with_seed(seed);
        for _ in 0..4 {
            sched.apply_random_effect(&mut scene, &cam, 0.9, 10.0).unwrap();
        }
        for _ in 0..(seed * 3 + 1) {
            sched.tick(&mut scene, 0.016);
        }

        let stopped = sched.clear_all(&mut scene);
        assert_eq!(stopped, 4);
        assert_pristine(&scene, &cam);
        assert_eq!(sched.clear_all(&mut scene), 0);
    }
}

#[test]
fn vanished_target_does_not_break_ticking() {
    let (mut scene, cam) = scene();
    let mut sched = EffectScheduler::with_seed(3);
    sched.apply_effect(&mut scene, &cam, EffectType::Shake, 1.0, 0.3).unwrap();
    sched.apply_effect(&mut scene, &cam, EffectType::ParticleSystem, 1.0, 0.3).unwrap();

    assert!(scene.remove_object(&cam));
    for _ in 0..40 {
        sched.tick(&mut scene, 0.016);
    }
    assert!(sched.is_empty());
    assert_eq!(scene.count_prefixed(TEMP_PREFIX), 0);
}

// ============================================================================
// CLEAR-ALL
// ============================================================================

#[test]
fn donation_storm_then_clear() {
    let (mut scene, cam) = scene();
    let mut sched = EffectScheduler::with_seed(21);
    let mut ledger = ObstructionLedger::with_seed(22);
    ledger.set_main_source(&scene, "Camera");

    for amount in [500.0, 2_000.0, 10_000.0, 50_000.0, 80.0, 9_999.0] {
        let report = ledger.apply_obstruction(&mut scene, &mut sched, amount).unwrap();
        assert!(report.shrink_percent <= 80.0);
        for _ in 0..5 {
            sched.tick(&mut scene, 0.016);
        }
    }
    assert_eq!(ledger.shrink_percent(), 80.0);
    let scale = scene.transform(&cam).unwrap().scale;
    assert!(scale.x > 0.0 && scale.x <= START.scale.x);

    ledger.clear_all(&mut scene, &mut sched);
    assert_pristine(&scene, &cam);
    assert_eq!(ledger.active_count(), 0);

    ledger.clear_all(&mut scene, &mut sched);
    assert_pristine(&scene, &cam);
}

#[test]
fn recovery_without_obstructions_is_harmless() {
    let (mut scene, cam) = scene();
    let mut ledger = ObstructionLedger::with_seed(5);
    ledger.set_main_source(&scene, "Camera");

    let report = ledger.apply_recovery(&mut scene, 10_000.0).unwrap();
    assert_eq!(report.overlays_removed, 0);
    assert_eq!(report.shrink_percent, 0.0);
    assert_eq!(scene.transform(&cam).unwrap().scale, START.scale);
}

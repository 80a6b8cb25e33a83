//! # Donation Pipeline Tests
//!
//! End to end from a chat event to the scene:
//!
//! 1. **Tier lookup**: the richest qualifying tier runs, below all tiers the default obstruction
//! 2. **Recovery**: stickers always recover, whatever the tier table says
//! 3. **Switches**: disabled routing and multipliers
//! 4. **Ingestion**: events queued on the bus are routed in order, in reference currency
//! 5. **Manual trigger**: same outcome as a live event
//!
//! Run with: cargo test --package donafx --test donation_pipeline_test

use donafx::{
    ActionOutcome, ChatIntake, DonationBus, EffectEngine, EngineSettings, IgnoreReason,
    RouteOutcome, SettingsHandle,
};
use donafx_core::{SceneArena, SceneGateway};
use donafx_economy::{ActionKind, EffectConfigTable, EffectConfiguration};
use donafx_effects::{EffectKind, EffectType};
use donafx_shared::{DonationEvent, DonationTier, Transform, Vec2};

fn two_tier_table() -> EffectConfigTable {
    let mut rotation = EffectConfiguration::new(5000.0, ActionKind::Rotation);
    rotation.rotation_speed = 2.0;
    EffectConfigTable::from_configs(vec![
        EffectConfiguration::new(1000.0, ActionKind::Blink),
        rotation,
    ])
}

fn engine_with(table: EffectConfigTable, seed: u64) -> EffectEngine<SceneArena> {
    let scene = SceneArena::with_main_source("Camera", Transform::at(Vec2::new(200.0, 120.0))).unwrap();
    let mut settings = EngineSettings::for_main_source("Camera");
    settings.seed = Some(seed);
    EffectEngine::new(scene, table, SettingsHandle::new(settings))
}

fn main_scale(engine: &EffectEngine<SceneArena>) -> f32 {
    let main = engine.scene().find_by_name("Camera").unwrap();
    engine.scene().transform(&main).unwrap().scale.x
}

// ============================================================================
// TIER LOOKUP
// ============================================================================

#[test]
fn richest_qualifying_tier_runs() {
    let mut engine = engine_with(two_tier_table(), 1);

    let outcome = engine.route(&DonationEvent::super_chat(5000.0));
    let RouteOutcome::Configured { tier_amount, action, outcome } = outcome else {
        panic!("expected a configured tier");
    };
    assert_eq!(tier_amount, 5000.0);
    assert_eq!(action, ActionKind::Rotation);
    let ActionOutcome::EffectStarted(id) = outcome else {
        panic!("expected a started effect");
    };

    let instance = engine.scheduler().get(id).unwrap();
    assert_eq!(instance.effect_type(), EffectType::Rotation);
    assert!(matches!(instance.kind(), EffectKind::Rotation(r) if r.speed == 2.0));
    assert_eq!(engine.scheduler().len(), 1);
    assert_eq!(engine.ledger().active_count(), 0);
}

#[test]
fn amount_between_tiers_takes_the_lower() {
    let mut engine = engine_with(two_tier_table(), 2);
    let outcome = engine.route(&DonationEvent::super_chat(4999.0));
    assert!(matches!(
        outcome,
        RouteOutcome::Configured { action: ActionKind::Blink, .. }
    ));
}

#[test]
fn below_every_tier_falls_back_to_obstruction() {
    let mut engine = engine_with(two_tier_table(), 3);

    let RouteOutcome::Obstruction(report) = engine.route(&DonationEvent::super_chat(500.0)) else {
        panic!("expected the default obstruction");
    };
    assert!((report.intensity - 0.05).abs() < 1e-12);
    assert_eq!(report.overlays_added, 1);
    assert_eq!(report.effects_started, 1);
    assert!((report.shrink_percent - 6.25).abs() < 1e-9);

    assert_eq!(engine.ledger().active_count(), 1);
    assert!((main_scale(&engine) - 0.9375).abs() < 1e-5);
}

// ============================================================================
// RECOVERY
// ============================================================================

#[test]
fn sticker_recovers_regardless_of_table() {
    let mut every_amount = EffectConfigTable::new();
    every_amount.add(EffectConfiguration::new(0.0, ActionKind::Shake));
    let mut engine = engine_with(every_amount, 4);

    engine.test_obstruction(10_000.0).unwrap();
    assert_eq!(engine.ledger().active_count(), 4);
    assert_eq!(engine.ledger().shrink_percent(), 30.0);

    let RouteOutcome::Recovery(report) = engine.route(&DonationEvent::super_sticker(10_000.0)) else {
        panic!("expected a recovery");
    };
    assert_eq!(report.overlays_removed, 3);
    assert_eq!(report.shrink_percent, 0.0);
    assert_eq!(engine.ledger().active_count(), 1);
    assert_eq!(main_scale(&engine), 1.0);
}

#[test]
fn recovery_on_clean_scene_is_harmless() {
    let mut engine = engine_with(EffectConfigTable::new(), 5);
    let RouteOutcome::Recovery(report) = engine.route(&DonationEvent::super_sticker(2000.0)) else {
        panic!("expected a recovery");
    };
    assert_eq!(report.overlays_removed, 0);
    assert_eq!(engine.ledger().shrink_percent(), 0.0);
    assert_eq!(engine.scene().len(), 1);
}

// ============================================================================
// SWITCHES
// ============================================================================

#[test]
fn disabled_routing_ignores_events() {
    let mut engine = engine_with(two_tier_table(), 6);
    engine.settings().update(|s| {
        s.enable_obstructions = false;
        s.enable_recovery = false;
    });

    assert_eq!(
        engine.route(&DonationEvent::super_chat(5000.0)),
        RouteOutcome::Ignored(IgnoreReason::ObstructionsDisabled)
    );
    assert_eq!(
        engine.route(&DonationEvent::super_sticker(5000.0)),
        RouteOutcome::Ignored(IgnoreReason::RecoveryDisabled)
    );
    assert!(engine.scheduler().is_empty());
    assert_eq!(engine.stats().ignored, 2);
}

#[test]
fn multipliers_scale_fallback_and_recovery_only() {
    let mut engine = engine_with(two_tier_table(), 7);
    engine.settings().update(|s| {
        s.obstruction_intensity = 10.0;
        s.recovery_intensity = 0.5;
    });

    // 500 stays below every tier even though the fallback sees 5000.
    let RouteOutcome::Obstruction(report) = engine.route(&DonationEvent::super_chat(500.0)) else {
        panic!("expected the default obstruction");
    };
    assert!((report.intensity - 0.5).abs() < 1e-12);

    let RouteOutcome::Recovery(report) = engine.route(&DonationEvent::super_sticker(10_000.0)) else {
        panic!("expected a recovery");
    };
    assert!((report.intensity - 0.5).abs() < 1e-12);
}

// ============================================================================
// INGESTION
// ============================================================================

#[test]
fn queued_events_route_in_order_in_reference_currency() {
    let mut engine = engine_with(two_tier_table(), 8);
    let (tx, rx) = DonationBus::create_pair(16);
    let intake = ChatIntake::new(tx, engine.settings().clone());

    // 10 USD is 1500 reference units: the Blink tier.
    assert!(intake.paid(DonationTier::SuperChat, 10.0, "USD", "viewer", "hi"));
    assert!(intake.paid(DonationTier::SuperChat, 5000.0, "JPY", "viewer", "spin"));
    assert!(!intake.comment("viewer", "ignored while comments are off"));

    assert_eq!(engine.pump(&rx), 2);
    let kinds: Vec<EffectType> = engine.scheduler().iter().map(|i| i.effect_type()).collect();
    assert_eq!(kinds, vec![EffectType::Blink, EffectType::Rotation]);
    assert_eq!(engine.pump(&rx), 0);
}

#[test]
fn comments_trigger_when_enabled() {
    let mut engine = engine_with(EffectConfigTable::new(), 9);
    engine.settings().update(|s| s.trigger_on_regular_comment = true);
    let (tx, rx) = DonationBus::create_pair(4);
    let intake = ChatIntake::new(tx, engine.settings().clone());

    assert!(intake.comment("viewer", "hello"));
    assert_eq!(engine.pump(&rx), 1);
    assert_eq!(engine.ledger().active_count(), 1);
}

// ============================================================================
// MANUAL TRIGGER
// ============================================================================

#[test]
fn test_trigger_matches_live_route() {
    let mut live = engine_with(two_tier_table(), 10);
    let mut manual = engine_with(two_tier_table(), 10);

    for amount in [300.0, 1000.0, 7000.0] {
        let a = live.route(&DonationEvent::super_chat(amount));
        let b = manual.test_trigger(amount, DonationTier::SuperChat);
        assert_eq!(a, b);
    }
    assert_eq!(live.scene().len(), manual.scene().len());
    assert_eq!(live.scheduler().len(), manual.scheduler().len());
}

#[test]
fn ticking_to_expiry_then_clear_leaves_clean_scene() {
    let mut engine = engine_with(two_tier_table(), 11);
    engine.route(&DonationEvent::super_chat(5000.0));
    engine.route(&DonationEvent::super_chat(800.0));

    for _ in 0..1000 {
        engine.tick(0.016);
    }
    assert_eq!(engine.scheduler().running_count(), 0);

    engine.clear_all();
    let main = engine.scene().find_by_name("Camera").unwrap();
    assert_eq!(
        engine.scene().transform(&main),
        Some(Transform::at(Vec2::new(200.0, 120.0)))
    );
    assert_eq!(engine.scene().len(), 1);
}

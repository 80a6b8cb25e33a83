//! # Donation Effect Router
//!
//! Turns one donation into one action.
//!
//! ```text
//! SuperSticker ─────────────────────────────────────────> ApplyRecovery
//! SuperChat ──> tier lookup ──found──> configured action (by ActionKind)
//!                    └────none──> ApplyObstruction (fallback)
//! ```
//!
//! Nothing here returns an error: a donation that cannot produce an effect
//! is logged and reported through [`RouteOutcome`].

use crate::settings::EngineSettings;
use donafx_core::{ObjectRef, SceneGateway};
use donafx_economy::{configured_intensity, overlay_scale, ActionKind, EffectConfigTable, EffectConfiguration};
use donafx_effects::obstruction::assets::{
    pick_from_dir, OVERLAY_IMAGE_EXTENSIONS, OVERLAY_VIDEO_EXTENSIONS,
};
use donafx_effects::{
    EffectError, EffectId, EffectResult, EffectScheduler, EffectType, ObstructionLedger,
    ObstructionReport, ParticleKind, RecoveryReport, RotationMode,
};
use donafx_shared::DonationTier;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Why a donation produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// SuperChat routing is switched off
    ObstructionsDisabled,
    /// SuperSticker routing is switched off
    RecoveryDisabled,
    /// The obstruction ledger is disabled
    LedgerDisabled,
    /// Amount is negative or not a number
    InvalidAmount,
}

/// What a configured tier did.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// A timed effect was started
    EffectStarted(EffectId),
    /// A media overlay was inserted
    OverlayCreated(ObjectRef),
    /// The main source was shrunk to this scale factor
    Shrunk(f64),
    /// Random tier without a main source: fell back to an obstruction
    Obstruction(ObstructionReport),
    /// The tier needs the main source and it does not exist
    NoMainSource,
    /// Overlay tier with no usable media
    NoMedia,
    /// The effect failed to start
    Failed(EffectError),
}

/// Result of routing one donation.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    /// A configured tier matched
    Configured {
        /// Threshold of the matched tier
        tier_amount: f64,
        /// Action of the matched tier
        action: ActionKind,
        /// What the action did
        outcome: ActionOutcome,
    },
    /// No tier matched: default obstruction
    Obstruction(ObstructionReport),
    /// SuperSticker recovery
    Recovery(RecoveryReport),
    /// Nothing happened
    Ignored(IgnoreReason),
}

impl RouteOutcome {
    /// Did the donation change the scene (or start something that will)?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        match self {
            Self::Configured { outcome, .. } => matches!(
                outcome,
                ActionOutcome::EffectStarted(_)
                    | ActionOutcome::OverlayCreated(_)
                    | ActionOutcome::Shrunk(_)
                    | ActionOutcome::Obstruction(_)
            ),
            Self::Obstruction(_) | Self::Recovery(_) => true,
            Self::Ignored(_) => false,
        }
    }
}

/// Everything a route mutates, borrowed for one call.
pub struct RouteContext<'a> {
    /// The host scene
    pub scene: &'a mut dyn SceneGateway,
    /// Timed effects
    pub scheduler: &'a mut EffectScheduler,
    /// Overlays and shrink
    pub ledger: &'a mut ObstructionLedger,
    /// Current engine settings
    pub settings: &'a EngineSettings,
}

/// Maps donations onto configured tiers, scheduler and ledger calls.
#[derive(Debug)]
pub struct DonationEffectRouter {
    table: EffectConfigTable,
    rng: ChaCha8Rng,
}

impl DonationEffectRouter {
    /// Creates a router over `table`, seeded from OS entropy.
    #[must_use]
    pub fn new(table: EffectConfigTable) -> Self {
        Self {
            table,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a router with a fixed seed.
    #[must_use]
    pub fn with_seed(table: EffectConfigTable, seed: u64) -> Self {
        Self {
            table,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The tier table.
    #[must_use]
    pub const fn table(&self) -> &EffectConfigTable {
        &self.table
    }

    /// Mutable tier table (kept sorted by its own methods).
    pub fn table_mut(&mut self) -> &mut EffectConfigTable {
        &mut self.table
    }

    /// Replaces the tier table.
    pub fn set_table(&mut self, table: EffectConfigTable) {
        tracing::info!("router: {} effect tiers installed", table.len());
        self.table = table;
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    /// Routes one donation of `amount` reference units.
    pub fn route(&mut self, ctx: &mut RouteContext<'_>, amount: f64, tier: DonationTier) -> RouteOutcome {
        if !amount.is_finite() || amount < 0.0 {
            tracing::warn!("router: ignoring {} with invalid amount {}", tier.label(), amount);
            return RouteOutcome::Ignored(IgnoreReason::InvalidAmount);
        }

        match tier {
            DonationTier::SuperSticker => {
                if !ctx.settings.enable_recovery {
                    return RouteOutcome::Ignored(IgnoreReason::RecoveryDisabled);
                }
                let scaled = amount * ctx.settings.recovery_multiplier();
                ctx.ledger
                    .apply_recovery(ctx.scene, scaled)
                    .map_or(RouteOutcome::Ignored(IgnoreReason::LedgerDisabled), RouteOutcome::Recovery)
            }
            DonationTier::SuperChat => {
                if !ctx.settings.enable_obstructions {
                    return RouteOutcome::Ignored(IgnoreReason::ObstructionsDisabled);
                }
                if let Some(config) = self.table.find_config_for_amount(amount).cloned() {
                    return self.apply_configured(ctx, &config);
                }
                tracing::info!("router: no tier for {:.2}, applying default obstruction", amount);
                let scaled = amount * ctx.settings.obstruction_multiplier();
                ctx.ledger
                    .apply_obstruction(ctx.scene, ctx.scheduler, scaled)
                    .map_or(RouteOutcome::Ignored(IgnoreReason::LedgerDisabled), RouteOutcome::Obstruction)
            }
        }
    }

    /// Runs one configured tier.
    pub fn apply_configured(
        &mut self,
        ctx: &mut RouteContext<'_>,
        config: &EffectConfiguration,
    ) -> RouteOutcome {
        if !ctx.ledger.is_enabled() {
            return RouteOutcome::Ignored(IgnoreReason::LedgerDisabled);
        }
        tracing::info!(
            "router: tier {:.2} -> {} for {:.1}s",
            config.amount,
            config.action,
            config.duration
        );

        let outcome = match config.action {
            ActionKind::ImageOverlay | ActionKind::VideoOverlay => self.insert_overlay(ctx, config),
            ActionKind::ShrinkScreen => ctx
                .ledger
                .shrink_main_source(ctx.scene, config.shrink_percentage)
                .map_or(ActionOutcome::NoMainSource, ActionOutcome::Shrunk),
            _ => match ctx.ledger.main_source_ref(ctx.scene) {
                Some(main) => timed_action(ctx, &main, config),
                None if config.action == ActionKind::Random => ctx
                    .ledger
                    .apply_obstruction(ctx.scene, ctx.scheduler, config.amount)
                    .map_or(ActionOutcome::NoMainSource, ActionOutcome::Obstruction),
                None => {
                    tracing::warn!("router: {} needs the main source, which is missing", config.action);
                    ActionOutcome::NoMainSource
                }
            },
        };

        RouteOutcome::Configured {
            tier_amount: config.amount,
            action: config.action,
            outcome,
        }
    }

    fn insert_overlay(&mut self, ctx: &mut RouteContext<'_>, config: &EffectConfiguration) -> ActionOutcome {
        let Some(path) = self.overlay_media(config) else {
            tracing::warn!("router: {} tier has no media configured", config.action);
            return ActionOutcome::NoMedia;
        };
        ctx.ledger
            .add_overlay(ctx.scene, &path, overlay_scale(config))
            .map_or(ActionOutcome::NoMedia, ActionOutcome::OverlayCreated)
    }

    /// A random file from the tier's folder, else its fixed media path.
    fn overlay_media(&mut self, config: &EffectConfiguration) -> Option<PathBuf> {
        let extensions: &[&str] = match config.action {
            ActionKind::VideoOverlay => &OVERLAY_VIDEO_EXTENSIONS,
            _ => &OVERLAY_IMAGE_EXTENSIONS,
        };
        config
            .media_dir()
            .filter(|dir| dir.is_dir())
            .and_then(|dir| pick_from_dir(dir, extensions, &mut self.rng))
            .or_else(|| config.media_file().map(PathBuf::from))
    }
}

fn timed_action(ctx: &mut RouteContext<'_>, main: &ObjectRef, config: &EffectConfiguration) -> ActionOutcome {
    let result: EffectResult<EffectId> = match config.action {
        ActionKind::Rotation => ctx.scheduler.apply_rotation_effect(
            ctx.scene,
            main,
            config.duration,
            config.rotation_speed,
            RotationMode::from_code(config.rotation_type),
            config.rotation_reverse,
        ),
        ActionKind::Particle => ctx.scheduler.apply_particle_effect(
            ctx.scene,
            main,
            config.duration,
            config.particle_count as usize,
            ParticleKind::from_code(config.particle_type),
        ),
        ActionKind::Random => ctx.scheduler.apply_random_effect(
            ctx.scene,
            main,
            configured_intensity(config).unwrap_or_default(),
            config.duration,
        ),
        action => match (effect_type_for(action), configured_intensity(config)) {
            (Some(effect), Some(intensity)) => {
                ctx.scheduler
                    .apply_effect(ctx.scene, main, effect, intensity, config.duration)
            }
            _ => Err(EffectError::invalid("action", action)),
        },
    };
    match result {
        Ok(id) => ActionOutcome::EffectStarted(id),
        Err(e) => {
            tracing::warn!("router: {} failed to start: {}", config.action, e);
            ActionOutcome::Failed(e)
        }
    }
}

/// Timed effect behind an intensity-driven action.
const fn effect_type_for(action: ActionKind) -> Option<EffectType> {
    match action {
        ActionKind::Blink => Some(EffectType::Blink),
        ActionKind::HueShift => Some(EffectType::HueShift),
        ActionKind::Shake => Some(EffectType::Shake),
        ActionKind::ProgressBar => Some(EffectType::ProgressBar),
        ActionKind::Rotation3D => Some(EffectType::Rotation3D),
        ActionKind::Kaleidoscope => Some(EffectType::Kaleidoscope),
        ActionKind::RandomShapes => Some(EffectType::RandomShapes),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donafx_core::SceneArena;
    use donafx_effects::effects::EffectKind;
    use donafx_shared::{Transform, Vec2};

    struct Rig {
        scene: SceneArena,
        scheduler: EffectScheduler,
        ledger: ObstructionLedger,
        settings: EngineSettings,
    }

    impl Rig {
        fn new() -> Self {
            let scene = SceneArena::with_main_source("Camera", Transform::at(Vec2::ZERO)).unwrap();
            let mut ledger = ObstructionLedger::with_seed(1);
            ledger.set_main_source(&scene, "Camera");
            Self {
                scene,
                scheduler: EffectScheduler::with_seed(2),
                ledger,
                settings: EngineSettings::for_main_source("Camera"),
            }
        }

        fn route(&mut self, router: &mut DonationEffectRouter, amount: f64, tier: DonationTier) -> RouteOutcome {
            let mut ctx = RouteContext {
                scene: &mut self.scene,
                scheduler: &mut self.scheduler,
                ledger: &mut self.ledger,
                settings: &self.settings,
            };
            router.route(&mut ctx, amount, tier)
        }
    }

    fn router_with(configs: Vec<EffectConfiguration>) -> DonationEffectRouter {
        DonationEffectRouter::with_seed(EffectConfigTable::from_configs(configs), 3)
    }

    #[test]
    fn test_configured_intensity_actions() {
        let mut rig = Rig::new();
        let mut hue = EffectConfiguration::new(100.0, ActionKind::HueShift);
        hue.hue_speed = 360.0;
        let mut router = router_with(vec![hue]);

        let outcome = rig.route(&mut router, 150.0, DonationTier::SuperChat);
        assert!(matches!(
            outcome,
            RouteOutcome::Configured {
                action: ActionKind::HueShift,
                outcome: ActionOutcome::EffectStarted(_),
                ..
            }
        ));
        let instance = rig.scheduler.iter().next().unwrap();
        assert_eq!(instance.effect_type(), EffectType::HueShift);
        assert!(matches!(instance.kind(), EffectKind::HueShift(h) if (h.speed - 270.0).abs() < 1e-9));
    }

    #[test]
    fn test_untimed_action_fails_as_invalid() {
        let mut rig = Rig::new();
        let main = rig.scene.find_by_name("Camera").unwrap();
        let mut ctx = RouteContext {
            scene: &mut rig.scene,
            scheduler: &mut rig.scheduler,
            ledger: &mut rig.ledger,
            settings: &rig.settings,
        };
        let config = EffectConfiguration::new(100.0, ActionKind::ShrinkScreen);

        let outcome = timed_action(&mut ctx, &main, &config);
        assert_eq!(
            outcome,
            ActionOutcome::Failed(EffectError::invalid("action", ActionKind::ShrinkScreen))
        );
        assert!(rig.scheduler.is_empty());
    }

    #[test]
    fn test_particle_tier_uses_explicit_kind() {
        let mut rig = Rig::new();
        let mut snow = EffectConfiguration::new(100.0, ActionKind::Particle);
        snow.particle_type = 2;
        snow.particle_count = 12;
        let mut router = router_with(vec![snow]);

        assert!(rig.route(&mut router, 100.0, DonationTier::SuperChat).is_applied());
        let instance = rig.scheduler.iter().next().unwrap();
        assert!(matches!(
            instance.kind(),
            EffectKind::ParticleSystem(p) if p.kind == ParticleKind::Snow && p.count == 12
        ));
    }

    #[test]
    fn test_shrink_tier() {
        let mut rig = Rig::new();
        let mut shrink = EffectConfiguration::new(100.0, ActionKind::ShrinkScreen);
        shrink.shrink_percentage = 25.0;
        let mut router = router_with(vec![shrink]);

        let outcome = rig.route(&mut router, 100.0, DonationTier::SuperChat);
        assert!(matches!(
            outcome,
            RouteOutcome::Configured { outcome: ActionOutcome::Shrunk(f), .. } if (f - 0.75).abs() < 1e-9
        ));
        assert_eq!(rig.ledger.shrink_percent(), 25.0);
    }

    #[test]
    fn test_overlay_tier_without_media() {
        let mut rig = Rig::new();
        let mut router = router_with(vec![EffectConfiguration::new(100.0, ActionKind::ImageOverlay)]);
        let outcome = rig.route(&mut router, 100.0, DonationTier::SuperChat);
        assert!(matches!(
            outcome,
            RouteOutcome::Configured { outcome: ActionOutcome::NoMedia, .. }
        ));
        assert_eq!(rig.ledger.active_count(), 0);
    }

    #[test]
    fn test_overlay_tier_with_fixed_path() {
        let mut rig = Rig::new();
        let mut tier = EffectConfiguration::new(100.0, ActionKind::ImageOverlay);
        tier.media_path = "/srv/media/cat.png".to_string();
        tier.media_folder = "/definitely/not/here".to_string();
        tier.image_scale = 50.0;
        let mut router = router_with(vec![tier]);

        let outcome = rig.route(&mut router, 100.0, DonationTier::SuperChat);
        let RouteOutcome::Configured { outcome: ActionOutcome::OverlayCreated(obj), .. } = outcome else {
            panic!("expected an overlay");
        };
        assert!((rig.scene.transform(&obj).unwrap().scale.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_timed_tier_without_main_source() {
        let mut rig = Rig::new();
        rig.ledger.set_main_source(&rig.scene, "Nobody");
        let mut router = router_with(vec![EffectConfiguration::new(100.0, ActionKind::Blink)]);
        let outcome = rig.route(&mut router, 100.0, DonationTier::SuperChat);
        assert!(matches!(
            outcome,
            RouteOutcome::Configured { outcome: ActionOutcome::NoMainSource, .. }
        ));
        assert!(!outcome.is_applied());
        assert!(rig.scheduler.is_empty());
    }

    #[test]
    fn test_random_tier_without_main_falls_back() {
        let mut rig = Rig::new();
        rig.ledger.set_main_source(&rig.scene, "Nobody");
        let mut router = router_with(vec![EffectConfiguration::new(2000.0, ActionKind::Random)]);
        let outcome = rig.route(&mut router, 3000.0, DonationTier::SuperChat);
        let RouteOutcome::Configured { outcome: ActionOutcome::Obstruction(report), .. } = outcome else {
            panic!("expected a fallback obstruction");
        };
        assert!((report.intensity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_switches_and_bad_amounts() {
        let mut rig = Rig::new();
        let mut router = router_with(Vec::new());

        rig.settings.enable_obstructions = false;
        assert_eq!(
            rig.route(&mut router, 500.0, DonationTier::SuperChat),
            RouteOutcome::Ignored(IgnoreReason::ObstructionsDisabled)
        );
        rig.settings.enable_recovery = false;
        assert_eq!(
            rig.route(&mut router, 500.0, DonationTier::SuperSticker),
            RouteOutcome::Ignored(IgnoreReason::RecoveryDisabled)
        );
        assert_eq!(
            rig.route(&mut router, f64::NAN, DonationTier::SuperChat),
            RouteOutcome::Ignored(IgnoreReason::InvalidAmount)
        );

        rig.settings = EngineSettings::default();
        rig.ledger.set_enabled(false);
        assert_eq!(
            rig.route(&mut router, 500.0, DonationTier::SuperChat),
            RouteOutcome::Ignored(IgnoreReason::LedgerDisabled)
        );
    }

    #[test]
    fn test_fallback_amount_multiplier() {
        let mut rig = Rig::new();
        rig.settings.obstruction_intensity = 4.0;
        let mut router = router_with(Vec::new());
        let RouteOutcome::Obstruction(report) = rig.route(&mut router, 1000.0, DonationTier::SuperChat) else {
            panic!("expected the default obstruction");
        };
        assert!((report.intensity - 0.4).abs() < 1e-12);
    }
}

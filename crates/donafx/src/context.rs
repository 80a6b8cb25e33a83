//! # Effect Engine
//!
//! The one application context. Owns the scene gateway, the scheduler, the
//! obstruction ledger and the router, and is driven from a single thread.
//!
//! ```text
//!            route(event) / test_trigger(amount, tier)
//!                               │
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │ DonationEffectRouter│
//!                    └──────────┬──────────┘
//!                 ┌─────────────┴────────────┐
//!                 ▼                          ▼
//!        ┌─────────────────┐       ┌───────────────────┐
//!        │ EffectScheduler │       │ ObstructionLedger │
//!        └────────┬────────┘       └─────────┬─────────┘
//!                 └────────────┬─────────────┘
//!                              ▼
//!                      SceneGateway (G)
//! ```
//!
//! Settings are re-read before every donation, so a change made on the
//! chat side applies to the next event.

use crate::events::DonationReceiver;
use crate::router::{DonationEffectRouter, RouteContext, RouteOutcome};
use crate::settings::{EngineSettings, SettingsHandle};
use donafx_core::SceneGateway;
use donafx_economy::EffectConfigTable;
use donafx_effects::{
    ClearReport, EffectScheduler, ObstructionLedger, ObstructionReport, RecoveryReport,
};
use donafx_shared::{DonationEvent, DonationTier};

/// Running totals kept by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Donations routed (live and manual)
    pub routed: u64,
    /// Donations that changed the scene
    pub applied: u64,
    /// Donations that produced nothing
    pub ignored: u64,
    /// Calls to [`EffectEngine::tick`]
    pub ticks: u64,
    /// Fixed scheduler steps executed
    pub steps: u64,
    /// Full clears
    pub clears: u64,
}

/// Scene, scheduler, ledger and router wired together.
pub struct EffectEngine<G: SceneGateway> {
    scene: G,
    scheduler: EffectScheduler,
    ledger: ObstructionLedger,
    router: DonationEffectRouter,
    settings: SettingsHandle,
    applied_settings: Option<EngineSettings>,
    stats: EngineStats,
}

impl<G: SceneGateway> EffectEngine<G> {
    /// Builds the engine over `scene`. With a `seed` in the settings every
    /// component gets its own stream derived from it.
    #[must_use]
    pub fn new(scene: G, table: EffectConfigTable, settings: SettingsHandle) -> Self {
        let (scheduler, ledger, router) = match settings.read(|s| s.seed) {
            Some(seed) => (
                EffectScheduler::with_seed(seed),
                ObstructionLedger::with_seed(seed.wrapping_add(1)),
                DonationEffectRouter::with_seed(table, seed.wrapping_add(2)),
            ),
            None => (
                EffectScheduler::new(),
                ObstructionLedger::new(),
                DonationEffectRouter::new(table),
            ),
        };

        let mut engine = Self {
            scene,
            scheduler,
            ledger,
            router,
            settings,
            applied_settings: None,
            stats: EngineStats::default(),
        };
        engine.apply_settings();
        engine
    }

    /// Pushes the current settings into the ledger. The main source is only
    /// re-targeted (and its snapshot re-captured) when its name changed; an
    /// empty name leaves the engine without a main source.
    pub fn apply_settings(&mut self) -> EngineSettings {
        let current = self.settings.snapshot();
        let previous = self.applied_settings.as_ref();

        if previous.map(|p| p.main_source.as_str()) != Some(current.main_source.as_str()) {
            if current.main_source.is_empty() {
                tracing::warn!("engine: no main source configured");
            }
            self.ledger.set_main_source(&self.scene, &current.main_source);
        }
        if previous.map(|p| &p.asset_dir) != Some(&current.asset_dir) {
            self.ledger.set_asset_dir(current.asset_dir.clone());
        }

        self.applied_settings = Some(current.clone());
        current
    }

    // =========================================================================
    // DONATIONS
    // =========================================================================

    /// Routes one donation event.
    pub fn route(&mut self, event: &DonationEvent) -> RouteOutcome {
        tracing::info!(
            "engine: {} from '{}' ({:.2} {})",
            event.tier.label(),
            event.display_name,
            event.amount,
            event.currency
        );
        self.route_amount(event.amount, event.tier)
    }

    /// Manual trigger: routes `amount` as a `tier` donation through the
    /// same path as a live event.
    pub fn test_trigger(&mut self, amount: f64, tier: DonationTier) -> RouteOutcome {
        tracing::info!("engine: test trigger {} {:.2}", tier.label(), amount);
        self.route_amount(amount, tier)
    }

    /// Manual trigger: default obstruction for `amount`, bypassing the
    /// tier table and the routing switches.
    pub fn test_obstruction(&mut self, amount: f64) -> Option<ObstructionReport> {
        self.apply_settings();
        self.ledger
            .apply_obstruction(&mut self.scene, &mut self.scheduler, amount)
    }

    /// Manual trigger: recovery for `amount`.
    pub fn test_recovery(&mut self, amount: f64) -> Option<RecoveryReport> {
        self.apply_settings();
        self.ledger.apply_recovery(&mut self.scene, amount)
    }

    fn route_amount(&mut self, amount: f64, tier: DonationTier) -> RouteOutcome {
        let settings = self.apply_settings();
        let mut ctx = RouteContext {
            scene: &mut self.scene,
            scheduler: &mut self.scheduler,
            ledger: &mut self.ledger,
            settings: &settings,
        };
        let outcome = self.router.route(&mut ctx, amount, tier);

        self.stats.routed += 1;
        if outcome.is_applied() {
            self.stats.applied += 1;
        } else {
            self.stats.ignored += 1;
            tracing::debug!("engine: donation produced no effect: {:?}", outcome);
        }
        outcome
    }

    /// Routes every event waiting on `receiver`, in arrival order.
    /// Returns how many were routed.
    pub fn pump(&mut self, receiver: &DonationReceiver) -> usize {
        let events = receiver.drain();
        for event in &events {
            self.route(event);
        }
        events.len()
    }

    // =========================================================================
    // TIME
    // =========================================================================

    /// Advances the scheduler by `dt` wall-clock seconds.
    /// Returns the number of fixed steps executed.
    pub fn tick(&mut self, dt: f64) -> u32 {
        let steps = self.scheduler.tick(&mut self.scene, dt);
        self.stats.ticks += 1;
        self.stats.steps += u64::from(steps);
        steps
    }

    /// Stops every effect and removes every obstruction; the main source
    /// returns to its snapshot.
    pub fn clear_all(&mut self) -> ClearReport {
        self.stats.clears += 1;
        self.ledger.clear_all(&mut self.scene, &mut self.scheduler)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The scene.
    #[must_use]
    pub const fn scene(&self) -> &G {
        &self.scene
    }

    /// The scene, mutably (host-side edits between ticks).
    pub fn scene_mut(&mut self) -> &mut G {
        &mut self.scene
    }

    /// The scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &EffectScheduler {
        &self.scheduler
    }

    /// The obstruction ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ObstructionLedger {
        &self.ledger
    }

    /// The obstruction ledger, mutably.
    pub fn ledger_mut(&mut self) -> &mut ObstructionLedger {
        &mut self.ledger
    }

    /// The router.
    #[must_use]
    pub const fn router(&self) -> &DonationEffectRouter {
        &self.router
    }

    /// The router, mutably (tier table edits).
    pub fn router_mut(&mut self) -> &mut DonationEffectRouter {
        &mut self.router
    }

    /// Shared settings handle.
    #[must_use]
    pub const fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Consumes the engine, returning the scene.
    pub fn into_scene(self) -> G {
        self.scene
    }
}

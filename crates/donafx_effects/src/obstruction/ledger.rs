//! The obstruction ledger.
//!
//! Tracks the overlays spawned as visual clutter and the accumulated shrink
//! of the main source. Independent of the timed effects, except that a full
//! clear also cancels every scheduled effect.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::assets::{self, AssetChoice};
use crate::scheduler::EffectScheduler;
use donafx_core::{ObjectDescriptor, ObjectRef, SceneGateway, SourceKind};
use donafx_shared::constants::{
    MAX_SHRINK_PERCENT, OBSTRUCTION_IMAGE_NAME, OBSTRUCTION_MARKERS, OBSTRUCTION_NAME,
    OBSTRUCTION_VIDEO_NAME, OVERLAY_FOOTPRINT,
};
use donafx_shared::{intensity_for_amount, Transform, Vec2, CANVAS_HEIGHT, CANVAS_WIDTH};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// ABGR colour of the built-in overlay (opaque red), the byte order hosts
/// read colour settings in.
pub const BUILTIN_COLOR: u32 = 0xFF00_00FF;

/// Edge length of the built-in overlay.
pub const BUILTIN_SIZE: i64 = 200;

/// What an overlay shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstructionKind {
    /// Still image
    Image,
    /// Looping video or animated GIF
    Video,
    /// Built-in solid colour
    Color,
}

impl ObstructionKind {
    /// Short name used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Color => "color",
        }
    }

    const fn base_name(self) -> &'static str {
        match self {
            Self::Image => OBSTRUCTION_IMAGE_NAME,
            Self::Video => OBSTRUCTION_VIDEO_NAME,
            Self::Color => OBSTRUCTION_NAME,
        }
    }
}

/// One tracked overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstructionSource {
    /// Scene object, cleared on removal
    pub object: Option<ObjectRef>,
    /// What the overlay shows
    pub kind: ObstructionKind,
    /// Scale factor it was created with
    pub intensity: f64,
    /// Still in the scene?
    pub active: bool,
}

impl ObstructionSource {
    /// Removes the overlay from the scene. Never removes twice.
    fn remove(&mut self, scene: &mut dyn SceneGateway) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.object
            .take()
            .is_some_and(|object| scene.remove_object(&object))
    }
}

/// Outcome of [`ObstructionLedger::apply_obstruction`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObstructionReport {
    /// Normalised intensity of the amount
    pub intensity: f64,
    /// Accumulated shrink after the call, in percent
    pub shrink_percent: f64,
    /// Overlays created
    pub overlays_added: usize,
    /// Random effects started on the main source
    pub effects_started: usize,
}

/// Outcome of [`ObstructionLedger::apply_recovery`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecoveryReport {
    /// Normalised intensity of the amount
    pub intensity: f64,
    /// Accumulated shrink after the call, in percent
    pub shrink_percent: f64,
    /// Overlays removed
    pub overlays_removed: usize,
}

/// Outcome of [`ObstructionLedger::clear_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Tracked overlays removed
    pub tracked_removed: usize,
    /// Untracked obstruction-named objects removed
    pub orphans_removed: usize,
    /// Scheduled effects stopped
    pub effects_stopped: usize,
    /// Filters stripped from the main source
    pub filters_removed: usize,
}

/// Tracks obstruction overlays and the main-source shrink.
#[derive(Debug)]
pub struct ObstructionLedger {
    main_source: Option<String>,
    asset_dir: Option<PathBuf>,
    snapshot: Option<Transform>,
    shrink_percent: f64,
    obstructions: Vec<ObstructionSource>,
    enabled: bool,
    next_serial: u64,
    rng: ChaCha8Rng,
}

impl ObstructionLedger {
    /// Creates an empty ledger seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates an empty ledger with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            main_source: None,
            asset_dir: None,
            snapshot: None,
            shrink_percent: 0.0,
            obstructions: Vec::new(),
            enabled: true,
            next_serial: 1,
            rng,
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Designates the main source. Resets the snapshot and captures a new
    /// one right away if the object exists.
    pub fn set_main_source(&mut self, scene: &dyn SceneGateway, name: &str) {
        self.snapshot = None;
        if name.is_empty() {
            self.main_source = None;
            return;
        }
        self.main_source = Some(name.to_owned());
        if let Some(obj) = scene.find_by_name(name) {
            self.capture_snapshot(scene, &obj);
        }
        tracing::info!("obstruction: main source set to '{}'", name);
    }

    /// Name of the main source, if set.
    #[must_use]
    pub fn main_source(&self) -> Option<&str> {
        self.main_source.as_deref()
    }

    /// Resolves the main source in the scene.
    #[must_use]
    pub fn main_source_ref(&self, scene: &dyn SceneGateway) -> Option<ObjectRef> {
        scene.find_by_name(self.main_source.as_deref()?)
    }

    /// Sets (or unsets) the directory random assets are drawn from.
    pub fn set_asset_dir(&mut self, dir: Option<PathBuf>) {
        if let Some(d) = &dir {
            tracing::info!("obstruction: asset directory set to '{}'", d.display());
        }
        self.asset_dir = dir;
    }

    /// Asset directory, if set.
    #[must_use]
    pub fn asset_dir(&self) -> Option<&Path> {
        self.asset_dir.as_deref()
    }

    /// Enables or disables obstruction and recovery.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Are obstruction and recovery enabled?
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    // =========================================================================
    // DONATION RESPONSES
    // =========================================================================

    /// Shrinks the main source, spawns `int(1 + 3i)` overlays and starts
    /// `int(1 + 2i)` random effects lasting `3 + 12i` seconds, where `i` is
    /// the amount's intensity. `None` when disabled.
    pub fn apply_obstruction(
        &mut self,
        scene: &mut dyn SceneGateway,
        scheduler: &mut EffectScheduler,
        amount: f64,
    ) -> Option<ObstructionReport> {
        if !self.enabled {
            return None;
        }
        let intensity = intensity_for_amount(amount);
        tracing::info!("obstruction: applying for amount {:.2} (intensity {:.2})", amount, intensity);

        self.shrink_main_source(scene, 5.0 + 25.0 * intensity);

        let overlays = (1.0 + 3.0 * intensity) as usize;
        let overlays_added = (0..overlays)
            .filter(|_| self.add_random_obstruction(scene, intensity).is_some())
            .count();

        let mut effects_started = 0;
        if let Some(main) = self.main_source_ref(scene) {
            let duration = 3.0 + 12.0 * intensity;
            let effects = (1.0 + 2.0 * intensity) as usize;
            for _ in 0..effects {
                if scheduler
                    .apply_random_effect(scene, &main, intensity, duration)
                    .is_ok()
                {
                    effects_started += 1;
                }
            }
            tracing::info!(
                "obstruction: {} visual effects on '{}' ({:.1}s)",
                effects_started,
                main,
                duration
            );
        }

        Some(ObstructionReport {
            intensity,
            shrink_percent: self.shrink_percent,
            overlays_added,
            effects_started,
        })
    }

    /// Expands the main source by `10 + 30i` percent and removes
    /// `int(1 + 2i)` random overlays. `None` when disabled.
    pub fn apply_recovery(
        &mut self,
        scene: &mut dyn SceneGateway,
        amount: f64,
    ) -> Option<RecoveryReport> {
        if !self.enabled {
            return None;
        }
        let intensity = intensity_for_amount(amount);
        tracing::info!("recovery: applying for amount {:.2} (intensity {:.2})", amount, intensity);

        self.expand_main_source(scene, 10.0 + 30.0 * intensity);

        let removals = (1.0 + 2.0 * intensity) as usize;
        let overlays_removed = (0..removals)
            .filter(|_| self.remove_random_obstruction(scene))
            .count();

        Some(RecoveryReport {
            intensity,
            shrink_percent: self.shrink_percent,
            overlays_removed,
        })
    }

    // =========================================================================
    // SHRINK / EXPAND
    // =========================================================================

    /// Adds `percent` to the accumulated shrink (capped at 80) and rescales
    /// the main source. Nothing accumulates when the main source is missing.
    /// Returns the applied scale factor.
    pub fn shrink_main_source(&mut self, scene: &mut dyn SceneGateway, percent: f64) -> Option<f64> {
        let Some(main) = self.main_source_ref(scene) else {
            tracing::warn!("obstruction: main source not found, shrink skipped");
            return None;
        };
        self.shrink_percent = (self.shrink_percent + percent.max(0.0)).min(MAX_SHRINK_PERCENT);
        let factor = self.apply_shrink(scene, &main);
        tracing::info!(
            "obstruction: shrunk main source to {:.1}% (total shrink {:.1}%)",
            factor * 100.0,
            self.shrink_percent
        );
        Some(factor)
    }

    /// Removes `percent` from the accumulated shrink (floored at 0) and
    /// rescales the main source if it exists. Returns the applied scale
    /// factor.
    pub fn expand_main_source(&mut self, scene: &mut dyn SceneGateway, percent: f64) -> Option<f64> {
        self.main_source.as_ref()?;
        self.shrink_percent = (self.shrink_percent - percent.max(0.0)).max(0.0);

        let main = self.main_source_ref(scene)?;
        let factor = self.apply_shrink(scene, &main);
        tracing::info!(
            "recovery: expanded main source to {:.1}% (remaining shrink {:.1}%)",
            factor * 100.0,
            self.shrink_percent
        );
        Some(factor)
    }

    /// Accumulated shrink in percent.
    #[must_use]
    pub const fn shrink_percent(&self) -> f64 {
        self.shrink_percent
    }

    /// Saved pre-mutation transform of the main source.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Transform> {
        self.snapshot.as_ref()
    }

    /// Scales the main source to `(1 - shrink) * snapshot scale`.
    fn apply_shrink(&mut self, scene: &mut dyn SceneGateway, main: &ObjectRef) -> f64 {
        if self.snapshot.is_none() {
            self.capture_snapshot(scene, main);
        }
        let base = self.snapshot.map_or(Vec2::ONE, |t| t.scale);
        let factor = 1.0 - self.shrink_percent / 100.0;
        scene.set_scale(main, base * factor as f32);
        factor
    }

    fn capture_snapshot(&mut self, scene: &dyn SceneGateway, main: &ObjectRef) {
        if let Some(t) = scene.transform(main) {
            tracing::info!(
                "obstruction: saved original transform scale=({:.2}, {:.2}) pos=({:.1}, {:.1}) rot={:.1}",
                t.scale.x,
                t.scale.y,
                t.position.x,
                t.position.y,
                t.rotation
            );
            self.snapshot = Some(t);
        }
    }

    // =========================================================================
    // OVERLAYS
    // =========================================================================

    /// Spawns one overlay from a random asset (or the built-in colour).
    pub fn add_random_obstruction(
        &mut self,
        scene: &mut dyn SceneGateway,
        intensity: f64,
    ) -> Option<ObjectRef> {
        match assets::select_obstruction_asset(self.asset_dir.as_deref(), &mut self.rng) {
            AssetChoice::BuiltinColor => self.create_overlay(scene, None, intensity),
            AssetChoice::File(path) => self.create_overlay(scene, Some(&path), intensity),
        }
    }

    /// Spawns one overlay showing `path` at `scale`. Videos and animated
    /// GIFs loop. The overlay is tracked like any obstruction and has no
    /// expiry of its own.
    pub fn add_overlay(
        &mut self,
        scene: &mut dyn SceneGateway,
        path: &Path,
        scale: f64,
    ) -> Option<ObjectRef> {
        self.create_overlay(scene, Some(path), scale)
    }

    fn create_overlay(
        &mut self,
        scene: &mut dyn SceneGateway,
        file: Option<&Path>,
        intensity: f64,
    ) -> Option<ObjectRef> {
        let kind = match file {
            None => ObstructionKind::Color,
            Some(p) if assets::is_video(p) => ObstructionKind::Video,
            Some(_) => ObstructionKind::Image,
        };
        let name = format!("{} #{}", kind.base_name(), self.next_serial);
        self.next_serial += 1;

        let mut desc = match (kind, file) {
            (ObstructionKind::Color, _) | (_, None) => ObjectDescriptor::new(name, SourceKind::Color)
                .with_setting("color", BUILTIN_COLOR)
                .with_setting("width", BUILTIN_SIZE)
                .with_setting("height", BUILTIN_SIZE),
            (ObstructionKind::Video, Some(p)) => ObjectDescriptor::new(name, SourceKind::Video)
                .with_setting("file", p.to_string_lossy().into_owned())
                .with_setting("looping", true)
                .with_setting("is_local_file", true),
            (ObstructionKind::Image, Some(p)) => ObjectDescriptor::new(name, SourceKind::Image)
                .with_setting("file", p.to_string_lossy().into_owned()),
        };

        let x = self.rng.gen_range(0..=(CANVAS_WIDTH - OVERLAY_FOOTPRINT) as u32);
        let y = self.rng.gen_range(0..=(CANVAS_HEIGHT - OVERLAY_FOOTPRINT) as u32);
        let scale = overlay_scale(intensity);
        desc = desc
            .at(Vec2::new(x as f32, y as f32))
            .with_scale(Vec2::splat(scale as f32));

        match scene.add_object(desc) {
            Ok(object) => {
                self.obstructions.push(ObstructionSource {
                    object: Some(object.clone()),
                    kind,
                    intensity,
                    active: true,
                });
                tracing::info!(
                    "obstruction: created {} '{}' at scale {:.2} (total {})",
                    kind.label(),
                    object,
                    scale,
                    self.active_count()
                );
                Some(object)
            }
            Err(e) => {
                tracing::warn!("obstruction: failed to create {} overlay: {}", kind.label(), e);
                None
            }
        }
    }

    /// Removes one uniformly chosen active overlay. `false` if none is active.
    pub fn remove_random_obstruction(&mut self, scene: &mut dyn SceneGateway) -> bool {
        let active: Vec<usize> = self
            .obstructions
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.active.then_some(i))
            .collect();
        if active.is_empty() {
            tracing::info!("recovery: no active obstructions to remove");
            return false;
        }
        let index = active[self.rng.gen_range(0..active.len())];
        let mut removed = self.obstructions.remove(index);
        removed.remove(scene);
        tracing::info!("recovery: removed obstruction ({} remaining)", self.active_count());
        true
    }

    /// Number of active overlays.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.obstructions.iter().filter(|o| o.active).count()
    }

    /// Tracked overlays in creation order.
    #[must_use]
    pub fn obstructions(&self) -> &[ObstructionSource] {
        &self.obstructions
    }

    // =========================================================================
    // FULL CLEAR
    // =========================================================================

    /// Removes every overlay (tracked and orphaned), cancels every scheduled
    /// effect, resets the shrink and puts the main source back to its
    /// snapshot (or scale 1 / rotation 0), visible and without filters.
    ///
    /// Calling it twice leaves the same state as calling it once.
    pub fn clear_all(
        &mut self,
        scene: &mut dyn SceneGateway,
        scheduler: &mut EffectScheduler,
    ) -> ClearReport {
        let mut report = ClearReport::default();

        for obstruction in &mut self.obstructions {
            if obstruction.remove(scene) {
                report.tracked_removed += 1;
            }
        }
        self.obstructions.clear();

        let main_name = self.main_source.clone();
        let orphans = scene.enumerate(&mut |o| {
            main_name.as_deref() != Some(o.name())
                && OBSTRUCTION_MARKERS.iter().any(|m| o.name().contains(m))
        });
        for orphan in orphans {
            if scene.remove_object(&orphan) {
                tracing::info!("recovery: removed orphaned obstruction '{}'", orphan);
                report.orphans_removed += 1;
            }
        }

        report.effects_stopped = scheduler.clear_all(scene);

        self.shrink_percent = 0.0;
        if let Some(main) = self.main_source_ref(scene) {
            match self.snapshot {
                Some(t) => {
                    scene.set_scale(&main, t.scale);
                    scene.set_position(&main, t.position);
                    scene.set_rotation(&main, t.rotation);
                }
                None => {
                    scene.set_scale(&main, Vec2::ONE);
                    scene.set_rotation(&main, 0.0);
                }
            }
            scene.set_visible(&main, true);

            for filter in scene.filters(&main) {
                if scene.remove_filter(&main, &filter) {
                    tracing::info!("recovery: removed filter '{}'", filter.name());
                    report.filters_removed += 1;
                }
            }
            tracing::info!("recovery: main source '{}' fully reset", main);
        }

        tracing::info!(
            "recovery: cleared {} overlays, {} orphans, {} effects",
            report.tracked_removed,
            report.orphans_removed,
            report.effects_stopped
        );
        report
    }
}

impl Default for ObstructionLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay scale for an intensity: taken as-is, except values below 0.1
/// which map to `0.5 + 0.5 * intensity`.
#[must_use]
pub fn overlay_scale(intensity: f64) -> f64 {
    if intensity < 0.1 {
        0.5 + 0.5 * intensity
    } else {
        intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donafx_core::{FilterDescriptor, FilterKind, SceneArena};

    fn setup() -> (SceneArena, ObstructionLedger, EffectScheduler) {
        let start = Transform::new(Vec2::new(100.0, 100.0), Vec2::splat(1.0), 0.0);
        let scene = SceneArena::with_main_source("Camera", start).unwrap();
        let mut ledger = ObstructionLedger::with_seed(11);
        ledger.set_main_source(&scene, "Camera");
        (scene, ledger, EffectScheduler::with_seed(12))
    }

    fn camera_scale(scene: &SceneArena) -> Vec2 {
        let cam = scene.find_by_name("Camera").unwrap();
        scene.transform(&cam).unwrap().scale
    }

    #[test]
    fn test_builtin_color_is_opaque_red_abgr() {
        let [red, green, blue, alpha] = BUILTIN_COLOR.to_le_bytes();
        assert_eq!((red, green, blue, alpha), (0xFF, 0x00, 0x00, 0xFF));
    }

    #[test]
    fn test_overlay_scale_rule() {
        assert!((overlay_scale(0.05) - 0.525).abs() < 1e-12);
        assert!((overlay_scale(0.5) - 0.5).abs() < 1e-12);
        assert!((overlay_scale(1.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_shrink_accumulates_and_caps() {
        let (mut scene, mut ledger, _) = setup();
        assert_eq!(ledger.shrink_main_source(&mut scene, 30.0), Some(0.7));
        assert!((camera_scale(&scene).x - 0.7).abs() < 1e-6);
        for _ in 0..10 {
            ledger.shrink_main_source(&mut scene, 30.0);
        }
        assert_eq!(ledger.shrink_percent(), MAX_SHRINK_PERCENT);
        assert!((camera_scale(&scene).x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_expand_floors_at_zero() {
        let (mut scene, mut ledger, _) = setup();
        ledger.shrink_main_source(&mut scene, 20.0);
        for _ in 0..5 {
            ledger.expand_main_source(&mut scene, 15.0);
        }
        assert_eq!(ledger.shrink_percent(), 0.0);
        assert!((camera_scale(&scene).x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shrink_relative_to_snapshot() {
        let start = Transform::new(Vec2::ZERO, Vec2::splat(0.5), 0.0);
        let mut scene = SceneArena::with_main_source("Camera", start).unwrap();
        let mut ledger = ObstructionLedger::with_seed(1);
        ledger.set_main_source(&scene, "Camera");
        ledger.shrink_main_source(&mut scene, 50.0);
        assert!((camera_scale(&scene).x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_no_main_source_no_accumulation() {
        let mut scene = SceneArena::new();
        let mut ledger = ObstructionLedger::with_seed(1);
        ledger.set_main_source(&scene, "Missing");
        assert_eq!(ledger.shrink_main_source(&mut scene, 30.0), None);
        assert_eq!(ledger.shrink_percent(), 0.0);
    }

    #[test]
    fn test_obstruction_small_amount() {
        let (mut scene, mut ledger, mut sched) = setup();
        let report = ledger.apply_obstruction(&mut scene, &mut sched, 500.0).unwrap();
        assert!((report.intensity - 0.05).abs() < 1e-12);
        assert!((report.shrink_percent - 6.25).abs() < 1e-9);
        assert_eq!(report.overlays_added, 1);
        assert_eq!(report.effects_started, 1);
        assert_eq!(ledger.active_count(), 1);

        let overlay = ledger.obstructions()[0].object.clone().unwrap();
        assert!(overlay.name().starts_with("Obstruction #"));
        let t = scene.transform(&overlay).unwrap();
        assert!((0.0..=1720.0).contains(&t.position.x));
        assert!((0.0..=880.0).contains(&t.position.y));
        assert!((t.scale.x - 0.525).abs() < 1e-6);
    }

    #[test]
    fn test_obstruction_large_amount() {
        let (mut scene, mut ledger, mut sched) = setup();
        let report = ledger
            .apply_obstruction(&mut scene, &mut sched, 20_000.0)
            .unwrap();
        assert_eq!(report.overlays_added, 4);
        assert_eq!(report.effects_started, 3);
        assert!((report.shrink_percent - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovery_removes_up_to_three() {
        let (mut scene, mut ledger, mut sched) = setup();
        ledger.apply_obstruction(&mut scene, &mut sched, 10_000.0);
        assert_eq!(ledger.active_count(), 4);

        let report = ledger.apply_recovery(&mut scene, 10_000.0).unwrap();
        assert_eq!(report.overlays_removed, 3);
        assert_eq!(report.shrink_percent, 0.0);
        assert_eq!(ledger.active_count(), 1);
        assert_eq!(scene.count_prefixed("Obstruction"), 1);

        let report = ledger.apply_recovery(&mut scene, 10_000.0).unwrap();
        assert_eq!(report.overlays_removed, 1);
        assert_eq!(ledger.active_count(), 0);
    }

    #[test]
    fn test_disabled_ledger_ignores_donations() {
        let (mut scene, mut ledger, mut sched) = setup();
        ledger.set_enabled(false);
        assert!(ledger.apply_obstruction(&mut scene, &mut sched, 5000.0).is_none());
        assert!(ledger.apply_recovery(&mut scene, 5000.0).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_refused_overlay_is_not_tracked() {
        let (mut scene, mut ledger, _) = setup();
        scene.refuse_objects(SourceKind::Color, true);
        assert!(ledger.add_random_obstruction(&mut scene, 0.5).is_none());
        assert_eq!(ledger.active_count(), 0);
    }

    #[test]
    fn test_clear_all_sweeps_orphans_and_filters() {
        let (mut scene, mut ledger, mut sched) = setup();
        let cam = scene.find_by_name("Camera").unwrap();

        ledger.apply_obstruction(&mut scene, &mut sched, 8000.0);
        scene
            .add_object(ObjectDescriptor::new("Obstruction Image #99", SourceKind::Image))
            .unwrap();
        scene
            .add_object(ObjectDescriptor::new("old obstruction", SourceKind::Color))
            .unwrap();
        scene
            .add_filter(&cam, FilterDescriptor::new("user blur", FilterKind::Other))
            .unwrap();
        for _ in 0..20 {
            sched.tick(&mut scene, 0.016);
        }

        let report = ledger.clear_all(&mut scene, &mut sched);
        assert_eq!(report.orphans_removed, 2);
        assert!(report.tracked_removed >= 1);
        assert!(report.filters_removed >= 1);

        assert_eq!(scene.len(), 1);
        assert!(sched.is_empty());
        assert_eq!(ledger.shrink_percent(), 0.0);
        assert_eq!(
            scene.transform(&cam).unwrap(),
            Transform::new(Vec2::new(100.0, 100.0), Vec2::ONE, 0.0)
        );
        assert_eq!(scene.is_visible(&cam), Some(true));
        assert!(scene.filters(&cam).is_empty());
    }

    #[test]
    fn test_clear_all_twice_is_idempotent() {
        let (mut scene, mut ledger, mut sched) = setup();
        let cam = scene.find_by_name("Camera").unwrap();
        ledger.apply_obstruction(&mut scene, &mut sched, 3000.0);

        ledger.clear_all(&mut scene, &mut sched);
        let once = (scene.transform(&cam), scene.len(), ledger.active_count());
        let second = ledger.clear_all(&mut scene, &mut sched);
        let twice = (scene.transform(&cam), scene.len(), ledger.active_count());

        assert_eq!(once, twice);
        assert_eq!(second, ClearReport::default());
    }

    #[test]
    fn test_clear_without_snapshot_uses_defaults() {
        let start = Transform::new(Vec2::new(5.0, 5.0), Vec2::splat(2.0), 45.0);
        let mut scene = SceneArena::with_main_source("Late", start).unwrap();
        let mut ledger = ObstructionLedger::with_seed(1);
        let mut sched = EffectScheduler::with_seed(1);
        ledger.set_main_source(&scene, "Missing");
        ledger.clear_all(&mut scene, &mut sched);

        ledger.set_main_source(&SceneArena::new(), "Late");
        ledger.clear_all(&mut scene, &mut sched);
        let t = scene.transform(&scene.find_by_name("Late").unwrap()).unwrap();
        assert_eq!(t.scale, Vec2::ONE);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_configured_overlay_kinds() {
        let (mut scene, mut ledger, _) = setup();
        let video = ledger
            .add_overlay(&mut scene, Path::new("/media/clip.gif"), 1.0)
            .unwrap();
        assert!(video.name().starts_with("Obstruction Video #"));
        assert_eq!(scene.kind_of(&video), Some(SourceKind::Video));
        assert_eq!(
            scene.setting(&video, "looping").and_then(|v| v.as_bool()),
            Some(true)
        );

        let image = ledger
            .add_overlay(&mut scene, Path::new("/media/cat.PNG"), 1.5)
            .unwrap();
        assert!(image.name().starts_with("Obstruction Image #"));
        assert!((scene.transform(&image).unwrap().scale.x - 1.5).abs() < 1e-6);
        assert_eq!(ledger.active_count(), 2);
    }
}

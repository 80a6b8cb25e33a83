//! # Engine Loop
//!
//! Wall-clock driver for an [`EffectEngine`] at 60Hz.
//!
//! ## Design
//!
//! Each tick:
//! - Routes every queued donation first
//! - Then advances the scheduler by the elapsed wall-clock time
//!
//! The scheduler runs its own fixed steps, so the loop only has to be
//! roughly on time; late ticks are counted, not corrected.

use crate::context::EffectEngine;
use crate::events::DonationReceiver;
use donafx_core::SceneGateway;
use donafx_shared::TICK_RATE;
use std::time::{Duration, Instant};

/// Fixed-rate loop controller.
pub struct EngineLoop {
    /// Budget of one tick.
    tick_duration: Duration,
    /// When the accumulator was last fed.
    last_tick: Instant,
    /// Time owed to ticks not yet run.
    accumulator: Duration,
    /// Start of the previous tick, for the engine's `dt`.
    last_step: Option<Instant>,
    /// Ticks run so far.
    tick_count: u64,
    /// Tick timing.
    stats: TickStats,
}

/// Timing of the engine ticks, in microseconds.
#[derive(Clone, Copy, Debug)]
pub struct TickStats {
    /// Fastest tick.
    pub min_tick_us: u64,
    /// Slowest tick.
    pub max_tick_us: u64,
    /// Rolling average over roughly the last 16 ticks.
    pub avg_tick_us: u64,
    /// Ticks that overran their budget.
    pub late_ticks: u64,
    /// Ticks measured.
    pub total_ticks: u64,
}

impl TickStats {
    fn fresh(tick_duration: Duration) -> Self {
        Self {
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            avg_tick_us: duration_us(tick_duration),
            late_ticks: 0,
            total_ticks: 0,
        }
    }
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl EngineLoop {
    /// Loop running `tick_rate` ticks per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_duration = Duration::from_micros(1_000_000 / u64::from(tick_rate.max(1)));

        Self {
            tick_duration,
            last_tick: Instant::now(),
            accumulator: Duration::ZERO,
            last_step: None,
            tick_count: 0,
            stats: TickStats::fresh(tick_duration),
        }
    }

    /// Folds elapsed time into the accumulator; true while a tick is owed.
    #[must_use]
    pub fn should_tick(&mut self) -> bool {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_tick);
        self.last_tick = now;

        self.accumulator >= self.tick_duration
    }

    /// Consumes one tick from the accumulator and returns its start time.
    #[must_use]
    pub fn begin_tick(&mut self) -> Instant {
        self.accumulator = self.accumulator.saturating_sub(self.tick_duration);
        self.tick_count += 1;
        Instant::now()
    }

    /// Records how long the tick started at `start` took.
    pub fn end_tick(&mut self, start: Instant) {
        let duration = start.elapsed();
        let duration_us = duration_us(duration);

        self.stats.total_ticks += 1;
        self.stats.min_tick_us = self.stats.min_tick_us.min(duration_us);
        self.stats.max_tick_us = self.stats.max_tick_us.max(duration_us);

        // Rolling average
        self.stats.avg_tick_us = (self.stats.avg_tick_us * 15 + duration_us) / 16;

        if duration > self.tick_duration {
            self.stats.late_ticks += 1;
        }
    }

    /// Sleeps until the next tick is due, spinning for the last half
    /// millisecond.
    pub fn wait_for_next_tick(&self) {
        let elapsed = Instant::now().duration_since(self.last_tick);

        if elapsed < self.tick_duration {
            let remaining = self.tick_duration - elapsed;

            if remaining > Duration::from_micros(1000) {
                std::thread::sleep(remaining - Duration::from_micros(500));
            }

            while Instant::now().duration_since(self.last_tick) < self.tick_duration {
                std::hint::spin_loop();
            }
        }
    }

    // =========================================================================
    // DRIVING AN ENGINE
    // =========================================================================

    /// Runs one tick: routes queued donations, then advances the engine by
    /// the time since the previous tick (one tick duration on the first).
    pub fn run_tick<G: SceneGateway>(
        &mut self,
        engine: &mut EffectEngine<G>,
        receiver: &DonationReceiver,
    ) -> usize {
        let start = self.begin_tick();
        let dt = self
            .last_step
            .map_or(self.tick_duration, |prev| start.duration_since(prev));
        self.last_step = Some(start);

        let routed = engine.pump(receiver);
        engine.tick(dt.as_secs_f64());
        self.end_tick(start);
        routed
    }

    /// Drives `engine` for `duration` of wall-clock time.
    /// Returns the number of ticks executed.
    pub fn run_for<G: SceneGateway>(
        &mut self,
        engine: &mut EffectEngine<G>,
        receiver: &DonationReceiver,
        duration: Duration,
    ) -> u64 {
        let deadline = Instant::now() + duration;
        let first = self.tick_count;
        self.last_tick = Instant::now();

        while Instant::now() < deadline {
            while self.should_tick() {
                self.run_tick(engine, receiver);
            }
            self.wait_for_next_tick();
        }

        let ticks = self.tick_count - first;
        tracing::info!(
            "loop: {} ticks in {:.2}s (avg {}us, late {})",
            ticks,
            duration.as_secs_f64(),
            self.stats.avg_tick_us,
            self.stats.late_ticks
        );
        ticks
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Timing of the ticks run so far.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Budget of one tick.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Forgets the timing statistics.
    pub fn reset_stats(&mut self) {
        self.stats = TickStats::fresh(self.tick_duration);
    }
}

impl Default for EngineLoop {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DonationBus;
    use crate::settings::{EngineSettings, SettingsHandle};
    use donafx_core::SceneArena;
    use donafx_economy::EffectConfigTable;
    use donafx_shared::{DonationEvent, Transform, Vec2};

    #[test]
    fn test_loop_creation() {
        let engine_loop = EngineLoop::default();
        assert_eq!(engine_loop.tick_count(), 0);
        assert_eq!(engine_loop.tick_duration(), Duration::from_micros(16666));
    }

    #[test]
    fn test_tick_execution() {
        let mut engine_loop = EngineLoop::new(1000);
        std::thread::sleep(Duration::from_millis(5));
        assert!(engine_loop.should_tick());

        let start = engine_loop.begin_tick();
        engine_loop.end_tick(start);

        assert_eq!(engine_loop.tick_count(), 1);
        assert_eq!(engine_loop.stats().total_ticks, 1);
    }

    #[test]
    fn test_reset_stats() {
        let mut engine_loop = EngineLoop::new(100);
        let start = engine_loop.begin_tick();
        engine_loop.end_tick(start);
        engine_loop.reset_stats();
        assert_eq!(engine_loop.stats().total_ticks, 0);
        assert_eq!(engine_loop.stats().avg_tick_us, 10_000);
    }

    #[test]
    fn test_run_tick_pumps_before_ticking() {
        let scene = SceneArena::with_main_source("Camera", Transform::at(Vec2::ZERO)).unwrap();
        let mut settings = EngineSettings::for_main_source("Camera");
        settings.seed = Some(5);
        let mut engine = EffectEngine::new(scene, EffectConfigTable::new(), SettingsHandle::new(settings));
        let (tx, rx) = DonationBus::create_pair(8);
        tx.send(DonationEvent::super_chat(500.0));
        tx.send(DonationEvent::super_chat(500.0));

        let mut engine_loop = EngineLoop::new(60);
        assert_eq!(engine_loop.run_tick(&mut engine, &rx), 2);
        assert_eq!(rx.pending_count(), 0);
        assert_eq!(engine.stats().routed, 2);
        assert_eq!(engine.stats().ticks, 1);
        assert_eq!(engine.ledger().active_count(), 2);
    }

    #[test]
    fn test_run_for_drives_ticks() {
        let scene = SceneArena::with_main_source("Camera", Transform::at(Vec2::ZERO)).unwrap();
        let mut engine = EffectEngine::new(
            scene,
            EffectConfigTable::new(),
            SettingsHandle::new(EngineSettings::for_main_source("Camera")),
        );
        let (_tx, rx) = DonationBus::create_pair(8);
        let mut engine_loop = EngineLoop::new(200);
        let ticks = engine_loop.run_for(&mut engine, &rx, Duration::from_millis(100));
        assert!(ticks >= 5, "only {ticks} ticks");
        assert_eq!(engine.stats().ticks, ticks);
    }
}

//! # DONAFX Simulator
//!
//! Headless run of the engine over an in-process scene: a producer thread
//! plays a scripted donation stream while the engine loop ticks.
//!
//! ## Usage
//!
//! ```bash
//! donafx_sim [--settings donafx.toml] [--duration 4]
//! ```

use donafx::{load_settings_file, ChatIntake, DonationBus, EffectEngine, EngineLoop, EngineSettings, SettingsHandle};
use donafx_core::SceneArena;
use donafx_economy::{ActionKind, EffectConfigTable, EffectConfiguration};
use donafx_shared::constants::TEMP_PREFIX;
use donafx_shared::{DonationTier, Transform, Vec2};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const DEFAULT_MAIN_SOURCE: &str = "Camera";

/// One scripted chat event: delay before it, then what it is.
enum Scripted {
    Paid(DonationTier, f64, &'static str),
    Comment,
}

const SCRIPT: [(u64, Scripted); 8] = [
    (200, Scripted::Paid(DonationTier::SuperChat, 500.0, "JPY")),
    (300, Scripted::Paid(DonationTier::SuperChat, 1200.0, "JPY")),
    (300, Scripted::Paid(DonationTier::SuperChat, 40.0, "USD")),
    (200, Scripted::Comment),
    (400, Scripted::Paid(DonationTier::SuperChat, 3.0, "GBP")),
    (300, Scripted::Paid(DonationTier::SuperChat, 10_000.0, "JPY")),
    (500, Scripted::Paid(DonationTier::SuperSticker, 5000.0, "JPY")),
    (300, Scripted::Paid(DonationTier::SuperSticker, 80.0, "EUR")),
];

/// Tiers used when no settings file supplies any.
fn demo_table() -> EffectConfigTable {
    let mut blink = EffectConfiguration::new(1000.0, ActionKind::Blink);
    blink.duration = 2.0;
    let mut rotation = EffectConfiguration::new(5000.0, ActionKind::Rotation);
    rotation.rotation_speed = 2.0;
    let mut snow = EffectConfiguration::new(20_000.0, ActionKind::Particle);
    snow.particle_type = 2;
    snow.particle_count = 30;
    EffectConfigTable::from_configs(vec![blink, rotation, snow])
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         DONAFX SIMULATOR                                         ║");
    println!("║         DONATIONS IN, EFFECTS OUT                                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let mut settings_path: Option<PathBuf> = None;
    let mut duration_secs = 4u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" | "-s" => {
                if i + 1 < args.len() {
                    settings_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--duration" | "-d" => {
                if i + 1 < args.len() {
                    duration_secs = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: donafx_sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --settings <FILE>      TOML settings with optional [[effects]]");
                println!("  -d, --duration <SECS>      Run for N seconds (default: 4)");
                println!("  -h, --help                 Show this help");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    let (mut settings, mut table) = match settings_path.as_deref().map(load_settings_file) {
        Some(Ok(loaded)) => loaded,
        Some(Err(e)) => {
            eprintln!("failed to load settings: {e}");
            std::process::exit(1);
        }
        None => (EngineSettings::default(), EffectConfigTable::new()),
    };
    if settings.main_source.is_empty() {
        settings.main_source = DEFAULT_MAIN_SOURCE.to_string();
    }
    settings.trigger_on_regular_comment = true;
    if table.is_empty() {
        table = demo_table();
    }

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Main Source:        {}", settings.main_source);
    println!("│ Effect Tiers:       {}", table.len());
    println!("│ Queue Capacity:     {}", settings.queue_capacity);
    println!("│ Duration:           {} seconds", duration_secs);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let scene = match SceneArena::with_main_source(
        &settings.main_source,
        Transform::at(Vec2::new(640.0, 360.0)),
    ) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("failed to build scene: {e}");
            std::process::exit(1);
        }
    };

    let bus = DonationBus::new(settings.queue_capacity);
    let handle = SettingsHandle::new(settings);
    let intake = ChatIntake::new(bus.sender(), handle.clone());
    let receiver = bus.receiver();
    let mut engine = EffectEngine::new(scene, table, handle);

    let producer = thread::spawn(move || {
        let mut queued = 0usize;
        for (delay_ms, event) in &SCRIPT {
            thread::sleep(Duration::from_millis(*delay_ms));
            let accepted = match event {
                Scripted::Paid(tier, amount, currency) => intake.paid(*tier, *amount, currency, "viewer", "gg"),
                Scripted::Comment => intake.comment("viewer", "hello"),
            };
            if accepted {
                queued += 1;
            }
        }
        queued
    });

    let mut engine_loop = EngineLoop::default();
    engine_loop.run_for(&mut engine, &receiver, Duration::from_secs(duration_secs));
    let queued = producer.join().unwrap_or(0);
    engine_loop.run_tick(&mut engine, &receiver);

    let active_effects = engine.scheduler().running_count();
    let obstructions = engine.ledger().active_count();
    let shrink = engine.ledger().shrink_percent();
    let temp_objects = engine.scene().count_prefixed(TEMP_PREFIX);
    let clear = engine.clear_all();

    let engine_stats = engine.stats();
    let tick_stats = engine_loop.stats();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    SIMULATION SUMMARY                            ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║ Events Queued:      {:>10}                                   ║", queued);
    println!("║ Events Routed:      {:>10}                                   ║", engine_stats.routed);
    println!("║ Events Applied:     {:>10}                                   ║", engine_stats.applied);
    println!("║ Events Ignored:     {:>10}                                   ║", engine_stats.ignored);
    println!("║ Active Effects:     {:>10}                                   ║", active_effects);
    println!("║ Obstructions:       {:>10}                                   ║", obstructions);
    println!("║ Temp Objects:       {:>10}                                   ║", temp_objects);
    println!("║ Shrink:             {:>9.1}%                                   ║", shrink);
    println!("║ Cleared:            {:>10}                                   ║", clear.tracked_removed + clear.effects_stopped);
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║ Total Ticks:        {:>10}                                   ║", tick_stats.total_ticks);
    println!("║ Avg Tick Time:      {:>10} μs                                ║", tick_stats.avg_tick_us);
    println!("║ Max Tick Time:      {:>10} μs                                ║", tick_stats.max_tick_us);
    println!("║ Late Ticks:         {:>10}                                   ║", tick_stats.late_ticks);
    println!("╚══════════════════════════════════════════════════════════════════╝");
}

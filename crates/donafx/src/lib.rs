//! # DONAFX
//!
//! Donation-driven effect engine: turns paid chat events into timed visual
//! effects, overlay clutter and presenter shrink on a live scene.
//!
//! ## Architecture
//!
//! ```text
//!  chat thread                         engine thread (60Hz)
//! ┌────────────┐   DonationBus   ┌───────────────────────────────────┐
//! │ ChatIntake │────────────────>│ EngineLoop                        │
//! │ (currency  │  bounded queue  │   pump ─> EffectEngine::route     │
//! │  normalise)│                 │            └─ DonationEffectRouter│
//! └────────────┘                 │   tick ─> EffectScheduler::tick   │
//!        │                       └───────────────────────────────────┘
//!        └────── SettingsHandle (shared, RwLock) ──────┘
//! ```
//!
//! ## Rules
//!
//! 1. **One scene thread** - only the engine thread touches the scene
//! 2. **Never fail a donation** - a bad event is logged and ignored
//! 3. **Same path for tests** - manual triggers route exactly like live events
//!
//! ## Example
//!
//! ```rust,ignore
//! use donafx::{EffectEngine, EngineSettings, SettingsHandle};
//!
//! let settings = SettingsHandle::new(EngineSettings::for_main_source("Camera"));
//! let mut engine = EffectEngine::new(scene, table, settings);
//! engine.test_trigger(5000.0, DonationTier::SuperChat);
//! engine.tick(0.016);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod engine_loop;
pub mod error;
pub mod events;
pub mod router;
pub mod settings;

pub use context::{EffectEngine, EngineStats};
pub use engine_loop::{EngineLoop, TickStats};
pub use error::{EngineError, EngineResult};
pub use events::{ChatIntake, DonationBus, DonationReceiver, DonationSender};
pub use router::{ActionOutcome, DonationEffectRouter, IgnoreReason, RouteContext, RouteOutcome};
pub use settings::{load_settings_file, EngineSettings, SettingsHandle, DEFAULT_QUEUE_CAPACITY};

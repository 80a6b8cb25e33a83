//! # DONAFX Effects
//!
//! Reversible timed effects on scene objects, and the obstruction overlays
//! that donations pile onto the canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐  apply_*   ┌──────────────────┐
//! │  ObstructionLedger  │───────────>│  EffectScheduler │
//! │  overlays + shrink  │            │  Vec<Instance>   │
//! └─────────┬───────────┘            └────────┬─────────┘
//!           │                                 │ tick(dt)
//!           v                                 v
//!     ┌──────────────────────────────────────────────┐
//!     │               dyn SceneGateway               │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **Reversible** - a stopped effect leaves its target as it found it
//! 2. **No leaks** - every temporary object or filter is removed on stop
//! 3. **Fixed step** - instances advance in 16 ms steps, whatever the host rate
//!
//! ## Example
//!
//! ```rust,ignore
//! use donafx_effects::{EffectScheduler, EffectType};
//!
//! let mut scheduler = EffectScheduler::new();
//! scheduler.apply_effect(&mut scene, &camera, EffectType::Shake, 0.5, 5.0)?;
//! scheduler.tick(&mut scene, 0.016);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::module_name_repetitions)]

pub mod effects;
pub mod error;
pub mod obstruction;
pub mod scheduler;

pub use effects::{
    EffectId, EffectInstance, EffectKind, EffectPhase, EffectType, ParticleKind, RotationMode,
    Snapshot,
};
pub use error::{EffectError, EffectResult};
pub use obstruction::{
    ClearReport, ObstructionKind, ObstructionLedger, ObstructionReport, ObstructionSource,
    RecoveryReport,
};
pub use scheduler::{EffectScheduler, SchedulerStats, MAX_STEPS_PER_TICK};

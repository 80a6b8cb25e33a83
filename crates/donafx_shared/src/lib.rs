//! # DONAFX Shared
//!
//! Common types used by the ingestion side and the effect engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on the scene or on effect logic.
//! If you need a scene type, put it in `donafx_core`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod math;

pub use constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, INTENSITY_REFERENCE_AMOUNT, MAX_SHRINK_PERCENT,
    REAP_INTERVAL_SECS, TICK_RATE, TICK_STEP_SECS,
};
pub use events::{DonationEvent, DonationTier};
pub use math::{intensity_for_amount, Transform, Vec2};

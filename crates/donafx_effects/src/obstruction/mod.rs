//! # Obstruction
//!
//! Overlays that clutter the canvas, the shrink applied to the main source,
//! and the full reset that undoes both.
//!
//! - `assets` - picking media files for overlays
//! - `ledger` - tracked overlays, shrink accumulation, clear-all

pub mod assets;
mod ledger;

pub use assets::AssetChoice;
pub use ledger::{
    overlay_scale, ClearReport, ObstructionKind, ObstructionLedger, ObstructionReport,
    ObstructionSource, RecoveryReport, BUILTIN_COLOR, BUILTIN_SIZE,
};

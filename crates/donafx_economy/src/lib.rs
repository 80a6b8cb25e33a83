//! # DONAFX Economy
//!
//! Donation tiers: which amount triggers which action, and how those tiers
//! are stored.
//!
//! ## Design Principles
//!
//! 1. **Floor lookup** - a donation gets the richest tier it qualifies for
//! 2. **Always sorted** - every mutation re-sorts the table by amount
//! 3. **Lenient loading** - a bad entry is skipped, never the whole file
//! 4. **External configuration** - tiers live in TOML files
//!
//! ## Example
//!
//! ```rust,ignore
//! use donafx_economy::EffectConfigTable;
//!
//! let table = EffectConfigTable::load(Path::new("effects.toml"))?;
//! if let Some(tier) = table.find_config_for_amount(5000.0) {
//!     println!("{} for {}s", tier.action, tier.duration);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod codec;
pub mod config;
pub mod currency;
pub mod error;
pub mod intensity;
pub mod table;

pub use codec::DecodeReport;
pub use config::{ActionKind, EffectConfiguration};
pub use currency::to_reference_amount;
pub use error::{ConfigError, ConfigResult};
pub use intensity::{configured_intensity, overlay_scale};
pub use table::EffectConfigTable;

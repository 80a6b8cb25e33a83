//! # DONAFX Core
//!
//! The host scene, seen as an opaque arena of named mutable objects.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   set/get transform   ┌────────────────────────┐
//! │   Effects    │──────────────────────>│  SceneGateway (trait)  │
//! │   Ledger     │   add/remove object   │                        │
//! │   Router     │   add/remove filter   │  SceneArena (in-proc)  │
//! └──────────────┘                       └────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **Name-keyed** - every object is addressed by its unique name
//! 2. **Forgiving** - operations on missing objects are no-ops, never errors
//! 3. **Observable** - every object and filter can be enumerated back
//!
//! ## Example
//!
//! ```rust,ignore
//! use donafx_core::{ObjectDescriptor, SceneArena, SceneGateway, SourceKind};
//!
//! let mut scene = SceneArena::new();
//! let camera = scene.add_object(ObjectDescriptor::new("Camera", SourceKind::Video))?;
//! scene.set_rotation(&camera, 45.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod scene;

pub use error::{SceneError, SceneResult};
pub use scene::{
    ArenaStats, FilterDescriptor, FilterKind, FilterRef, ObjectDescriptor, ObjectRef,
    SceneArena, SceneGateway, SettingValue, Settings, SourceKind,
};

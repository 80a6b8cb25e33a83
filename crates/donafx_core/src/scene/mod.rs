//! # Scene Gateway
//!
//! Name-keyed access to the host scene graph.
//!
//! - `SceneGateway` - the trait every consumer mutates the scene through
//! - `SceneArena` - an in-process implementation with refusal injection
//! - Descriptors and the settings bag used to create objects and filters

mod arena;
mod gateway;
mod object;

pub use arena::{ArenaStats, SceneArena};
pub use gateway::SceneGateway;
pub use object::{
    FilterDescriptor, FilterKind, FilterRef, ObjectDescriptor, ObjectRef, SettingValue, Settings,
    SourceKind,
};

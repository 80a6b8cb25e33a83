//! # Scene Error Types
//!
//! Errors the gateway can report when the host refuses a creation.
//! Mutations of missing objects are NOT errors; they are silently skipped.

use thiserror::Error;

/// Errors that can occur while creating scene objects or filters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An object or filter with this name already exists.
    #[error("name already taken: {0}")]
    NameTaken(String),

    /// The host refused to create the object or filter.
    #[error("host refused to create {kind} '{name}'")]
    CreationRefused {
        /// Requested name.
        name: String,
        /// Requested kind.
        kind: String,
    },

    /// The object a filter was meant for does not exist.
    #[error("object not found: {0}")]
    ObjectNotFound(String),
}

/// Result type for scene creation operations.
pub type SceneResult<T> = Result<T, SceneError>;

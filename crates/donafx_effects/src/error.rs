//! # Effect Error Types
//!
//! Errors raised when an effect cannot be built or started.
//!
//! These never cross the routing boundary: the scheduler logs them and the
//! affected instance is simply dropped.

use donafx_core::SceneError;
use thiserror::Error;

/// Errors that can occur while building or starting an effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// The host refused an object or filter the effect needs.
    #[error("{effect}: resource creation failed: {reason}")]
    ResourceCreation {
        /// Effect label.
        effect: String,
        /// Underlying reason.
        reason: String,
    },

    /// The target object does not exist.
    #[error("target not found: {0}")]
    TargetMissing(String),

    /// A parameter is out of its valid range.
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Offending value.
        value: String,
    },
}

impl EffectError {
    /// Wraps a scene creation failure for the given effect.
    #[must_use]
    pub fn creation(effect: &str, err: &SceneError) -> Self {
        Self::ResourceCreation {
            effect: effect.to_owned(),
            reason: err.to_string(),
        }
    }

    /// Builds an invalid parameter error.
    #[must_use]
    pub fn invalid(name: &str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            value: value.to_string(),
        }
    }
}

/// Result type for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;

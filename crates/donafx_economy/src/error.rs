//! # Configuration Error Types
//!
//! All errors that can occur while loading or saving effect configuration.

use thiserror::Error;

/// Errors that can occur in the configuration layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid TOML.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The table could not be written out.
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),

    /// Action code outside the known set.
    #[error("unknown action code: {0}")]
    UnknownAction(i64),

    /// One `[[effects]]` entry was rejected.
    #[error("invalid effect entry #{index}: {reason}")]
    InvalidEntry {
        /// Position of the entry in the file.
        index: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading or writing the file failed.
    #[error("configuration I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

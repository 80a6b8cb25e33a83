//! # Engine Error Types

use donafx_economy::ConfigError;
use thiserror::Error;

/// Errors raised while setting the engine up.
///
/// Routing and ticking never fail; only loading does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The effect tier list could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The `[engine]` table is malformed.
    #[error("invalid engine settings: {0}")]
    Settings(String),

    /// Reading or writing the settings file failed.
    #[error("settings I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for engine setup.
pub type EngineResult<T> = Result<T, EngineError>;

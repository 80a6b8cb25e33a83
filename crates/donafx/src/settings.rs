//! # Engine Settings
//!
//! The `[engine]` table of the settings file. A settings file may also
//! carry the `[[effects]]` tier list, which is decoded separately.
//!
//! ```toml
//! [engine]
//! main_source = "Camera"
//! asset_dir = "/srv/obstructions"
//! obstruction_intensity = 1.5
//! seed = 42
//! ```
//!
//! Settings are read by the chat intake thread and the engine thread, so
//! they live behind a [`SettingsHandle`].

use crate::error::{EngineError, EngineResult};
use donafx_economy::{codec, EffectConfigTable};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default donation queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Engine-wide switches and tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Name of the presenter object effects target
    pub main_source: String,
    /// Directory random obstruction assets come from
    pub asset_dir: Option<PathBuf>,
    /// Route SuperChat events at all
    pub enable_obstructions: bool,
    /// Route SuperSticker events at all
    pub enable_recovery: bool,
    /// Multiplier on fallback obstruction amounts (0 means 1)
    pub obstruction_intensity: f64,
    /// Multiplier on recovery amounts (0 means 1)
    pub recovery_intensity: f64,
    /// Let plain chat comments trigger a small obstruction
    pub trigger_on_regular_comment: bool,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Donation queue capacity
    pub queue_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            main_source: String::new(),
            asset_dir: None,
            enable_obstructions: true,
            enable_recovery: true,
            obstruction_intensity: 1.0,
            recovery_intensity: 1.0,
            trigger_on_regular_comment: false,
            seed: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Deserialize, Serialize)]
struct SettingsDocument {
    #[serde(default)]
    engine: EngineSettings,
}

impl EngineSettings {
    /// Settings targeting `main_source`, everything else default.
    #[must_use]
    pub fn for_main_source(main_source: impl Into<String>) -> Self {
        Self {
            main_source: main_source.into(),
            ..Self::default()
        }
    }

    /// Multiplier applied to fallback obstruction amounts.
    #[must_use]
    pub fn obstruction_multiplier(&self) -> f64 {
        effective_multiplier(self.obstruction_intensity)
    }

    /// Multiplier applied to recovery amounts.
    #[must_use]
    pub fn recovery_multiplier(&self) -> f64 {
        effective_multiplier(self.recovery_intensity)
    }

    /// Parses the `[engine]` table of a TOML document. Unknown keys and
    /// other tables are ignored.
    ///
    /// # Errors
    ///
    /// `Settings` if the document or the table is malformed.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        toml::from_str::<SettingsDocument>(text)
            .map(|doc| doc.engine)
            .map_err(|e| EngineError::Settings(e.message().to_string()))
    }

    /// Serializes as an `[engine]` table.
    ///
    /// # Errors
    ///
    /// `Settings` if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string(&SettingsDocument {
            engine: self.clone(),
        })
        .map_err(|e| EngineError::Settings(e.to_string()))
    }
}

fn effective_multiplier(raw: f64) -> f64 {
    if raw == 0.0 || !raw.is_finite() {
        1.0
    } else {
        raw
    }
}

/// Loads engine settings and the effect tiers from one file.
/// Bad tier entries are skipped (and logged); the rest load.
///
/// # Errors
///
/// `Io` if the file cannot be read, `Settings` or `Config` if the document
/// is malformed as a whole.
pub fn load_settings_file(path: &Path) -> EngineResult<(EngineSettings, EffectConfigTable)> {
    let text = fs::read_to_string(path)?;
    let settings = EngineSettings::from_toml_str(&text)?;
    let report = codec::decode(&text)?;
    tracing::info!(
        "settings: loaded '{}' (main source '{}', {} tiers)",
        path.display(),
        settings.main_source,
        report.table.len()
    );
    Ok((settings, report.table))
}

// =============================================================================
// SHARED HANDLE
// =============================================================================

/// Cloneable handle to settings shared between threads.
#[derive(Clone, Debug, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<EngineSettings>>,
}

impl SettingsHandle {
    /// Wraps `settings`.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// A copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> EngineSettings {
        self.inner.read().clone()
    }

    /// Reads one value without copying the rest.
    pub fn read<R>(&self, f: impl FnOnce(&EngineSettings) -> R) -> R {
        f(&self.inner.read())
    }

    /// Changes the settings in place.
    pub fn update(&self, f: impl FnOnce(&mut EngineSettings)) {
        f(&mut self.inner.write());
    }
}

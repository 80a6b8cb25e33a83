//! # Configuration Codec
//!
//! The table persists as a TOML array of flat tables:
//!
//! ```toml
//! [[effects]]
//! amount = 5000.0
//! action = 1
//! duration = 8.0
//! rotationSpeed = 2.0
//! # ...every other key, always written
//! ```
//!
//! Loading is lenient: an entry that fails to decode or validate is
//! skipped with a warning and the rest still load. Only a document that is
//! not TOML at all fails as a whole.

use crate::config::EffectConfiguration;
use crate::error::{ConfigError, ConfigResult};
use crate::table::EffectConfigTable;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Key of the array of tiers inside a document.
pub const EFFECTS_KEY: &str = "effects";

/// A decoded table plus the entries that were rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeReport {
    /// Every entry that decoded and validated, sorted by amount
    pub table: EffectConfigTable,
    /// One error per rejected entry
    pub skipped: Vec<ConfigError>,
}

#[derive(Serialize)]
struct EffectsDocument<'a> {
    effects: &'a [EffectConfiguration],
}

/// Decodes the `[[effects]]` list of a TOML document. Other top-level keys
/// are ignored, so a settings file carrying the list decodes too.
///
/// # Errors
///
/// `Parse` if the text is not TOML or `effects` is not an array.
pub fn decode(text: &str) -> ConfigResult<DecodeReport> {
    let mut document: toml::Table = text
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;

    let entries = match document.remove(EFFECTS_KEY) {
        None => Vec::new(),
        Some(toml::Value::Array(entries)) => entries,
        Some(other) => {
            return Err(ConfigError::Parse(format!(
                "'{EFFECTS_KEY}' must be an array of tables, found {}",
                other.type_str()
            )))
        }
    };

    let mut report = DecodeReport::default();
    let mut accepted = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match decode_entry(index, entry) {
            Ok(config) => accepted.push(config),
            Err(e) => {
                tracing::warn!("config: skipping entry: {}", e);
                report.skipped.push(e);
            }
        }
    }
    report.table = EffectConfigTable::from_configs(accepted);
    tracing::info!(
        "config: loaded {} effect tiers ({} skipped)",
        report.table.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn decode_entry(index: usize, entry: toml::Value) -> ConfigResult<EffectConfiguration> {
    let config: EffectConfiguration = entry
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidEntry {
            index,
            reason: e.message().to_string(),
        })?;
    config
        .validate()
        .map_err(|reason| ConfigError::InvalidEntry { index, reason })?;
    Ok(config)
}

/// Encodes every tier, with every key, as `[[effects]]` tables.
///
/// # Errors
///
/// `Serialize` if a value cannot be represented in TOML.
pub fn encode(table: &EffectConfigTable) -> ConfigResult<String> {
    toml::to_string(&EffectsDocument {
        effects: table.configs(),
    })
    .map_err(|e| ConfigError::Serialize(e.to_string()))
}

impl EffectConfigTable {
    /// Serialized form of the table (see [`encode`]).
    ///
    /// # Errors
    ///
    /// Same as [`encode`].
    pub fn to_serialized(&self) -> ConfigResult<String> {
        encode(self)
    }

    /// Table from its serialized form, dropping rejected entries.
    ///
    /// # Errors
    ///
    /// Same as [`decode`].
    pub fn from_serialized(text: &str) -> ConfigResult<Self> {
        decode(text).map(|report| report.table)
    }

    /// Loads the table from a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`decode`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_serialized(&text)
    }

    /// Writes the table to a TOML file.
    ///
    /// # Errors
    ///
    /// `Serialize` or `Io`.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        fs::write(path, self.to_serialized()?)?;
        tracing::info!("config: saved {} effect tiers to '{}'", self.len(), path.display());
        Ok(())
    }
}

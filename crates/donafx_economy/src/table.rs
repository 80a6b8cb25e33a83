//! # Effect Configuration Table
//!
//! Donation tiers sorted ascending by amount. The lookup is a floor rule:
//! a donation gets the richest tier it still qualifies for.
//!
//! ```text
//! tiers:   [1000]        [5000]
//!   999 -> none
//!  1000 -> 1000 ──────── 4999 -> 1000
//!                        5000 -> 5000 ──> ...
//! ```

use crate::config::EffectConfiguration;

/// Amount-sorted list of donation tiers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectConfigTable {
    configs: Vec<EffectConfiguration>,
}

impl EffectConfigTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            configs: Vec::new(),
        }
    }

    /// Builds a table from records in any order.
    #[must_use]
    pub fn from_configs(configs: Vec<EffectConfiguration>) -> Self {
        let mut table = Self { configs };
        table.sort();
        table
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Adds a tier. Equal amounts keep insertion order, so the newest of
    /// several equal tiers wins the lookup.
    pub fn add(&mut self, config: EffectConfiguration) {
        self.configs.push(config);
        self.sort();
    }

    /// Replaces the tier at `index`. Returns `false` if out of range.
    pub fn update(&mut self, index: usize, config: EffectConfiguration) -> bool {
        let Some(slot) = self.configs.get_mut(index) else {
            return false;
        };
        *slot = config;
        self.sort();
        true
    }

    /// Removes the tier at `index`.
    pub fn remove(&mut self, index: usize) -> Option<EffectConfiguration> {
        (index < self.configs.len()).then(|| self.configs.remove(index))
    }

    /// Removes every tier.
    pub fn clear(&mut self) {
        self.configs.clear();
    }

    /// Re-establishes ascending amount order (stable).
    pub fn sort(&mut self) {
        self.configs.sort_by(|a, b| a.amount.total_cmp(&b.amount));
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The tier with the greatest amount `<= amount`, if any.
    #[must_use]
    pub fn find_config_for_amount(&self, amount: f64) -> Option<&EffectConfiguration> {
        if amount.is_nan() {
            return None;
        }
        let qualifying = self.configs.partition_point(|c| c.amount <= amount);
        qualifying.checked_sub(1).map(|i| &self.configs[i])
    }

    /// Tier at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EffectConfiguration> {
        self.configs.get(index)
    }

    /// Number of tiers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Is the table empty?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// All tiers, ascending by amount.
    #[must_use]
    pub fn configs(&self) -> &[EffectConfiguration] {
        &self.configs
    }
}

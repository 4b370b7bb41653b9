//! # Store Configuration
//!
//! Sizing parameters for the stores, loaded once at startup.
//!
//! ```toml
//! # data/store.toml
//! initial_capacity = 1024
//! index_bits = 20
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Widest supported key index.
pub const MAX_INDEX_BITS: u32 = 32;

/// Sizing parameters shared by [`crate::SlotMap`] and [`crate::ComponentTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Elements reserved up front in every backing array.
    pub initial_capacity: usize,
    /// Width of the slot map key index, `1..=32`.
    pub index_bits: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            index_bits: MAX_INDEX_BITS,
        }
    }
}

impl StoreConfig {
    /// Creates a config with the given index width and default capacity.
    #[must_use]
    pub fn with_index_bits(index_bits: u32) -> Self {
        Self {
            index_bits,
            ..Self::default()
        }
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the text is not valid TOML,
    /// names unknown fields, or fails [`StoreConfig::validate`].
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the file cannot be read or
    /// its contents are rejected by [`StoreConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded store config from {}: capacity={}, index_bits={}",
            path.display(),
            config.initial_capacity,
            config.index_bits
        );
        Ok(config)
    }

    /// Checks that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if `index_bits` is outside `1..=32`.
    pub fn validate(&self) -> StoreResult<()> {
        if self.index_bits == 0 || self.index_bits > MAX_INDEX_BITS {
            return Err(StoreError::InvalidConfig(format!(
                "index_bits must be in 1..={MAX_INDEX_BITS}, got {}",
                self.index_bits
            )));
        }
        Ok(())
    }

    /// Number of distinct slot indices the configured width allows.
    ///
    /// At full width the top index is withheld because it belongs to
    /// [`crate::Key::NULL`].
    #[inline]
    #[must_use]
    pub const fn max_slots(&self) -> u32 {
        if self.index_bits >= MAX_INDEX_BITS {
            u32::MAX
        } else {
            1 << self.index_bits
        }
    }
}

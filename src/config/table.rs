//! Table configuration module.
//!
//! This module defines configuration for the associative tables built by the
//! application: bucket count and the load-factor warning threshold.

use super::{ConfigResult, Validate};
use crate::data_structures::associative_table::{
    AssociativeTableConfig, DEFAULT_TABLE_LENGTH, DEFAULT_WARN_LOAD_FACTOR,
};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Associative table configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
    /// Number of buckets allocated per table. Fixed for the table's lifetime.
    pub table_length: usize,

    /// Load factor above which a table logs a single warning
    pub warn_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_length: DEFAULT_TABLE_LENGTH,
            warn_load_factor: DEFAULT_WARN_LOAD_FACTOR,
        }
    }
}

impl Validate for TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.table_length == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "table.table_length",
                message: "must be greater than 0".to_string(),
            });
        }

        if !self.warn_load_factor.is_finite() || self.warn_load_factor <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "table.warn_load_factor",
                message: format!(
                    "must be a positive finite number, got {}",
                    self.warn_load_factor
                ),
            });
        }

        Ok(())
    }
}

impl From<&TableConfig> for AssociativeTableConfig {
    fn from(config: &TableConfig) -> Self {
        AssociativeTableConfig::new()
            .with_table_length(config.table_length)
            .with_warn_load_factor(config.warn_load_factor)
    }
}

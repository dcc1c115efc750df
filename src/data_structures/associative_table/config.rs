// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the associative table.

/// Number of buckets allocated by a default table.
pub const DEFAULT_TABLE_LENGTH: usize = 5;

/// Load factor above which a default table logs a long-chain warning.
pub const DEFAULT_WARN_LOAD_FACTOR: f64 = 4.0;

/// Configuration for the associative table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociativeTableConfig {
    /// Number of buckets. Fixed for the lifetime of the table; the table never rehashes.
    pub table_length: usize,

    /// Entries-per-bucket ratio above which a single warning is logged.
    /// Crossing it has no other effect.
    pub warn_load_factor: f64,
}

impl AssociativeTableConfig {
    /// Creates a new configuration with default values.
    ///
    /// # Returns
    ///
    /// A new `AssociativeTableConfig` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of buckets.
    ///
    /// A length of zero is raised to one so that indexing is always defined.
    ///
    /// # Arguments
    ///
    /// * `table_length` - The number of buckets the table allocates.
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_table_length(mut self, table_length: usize) -> Self {
        self.table_length = table_length.max(1);
        self
    }

    /// Sets the load factor that triggers the long-chain warning.
    ///
    /// # Arguments
    ///
    /// * `warn_load_factor` - Threshold ratio of entries to buckets.
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_warn_load_factor(mut self, warn_load_factor: f64) -> Self {
        self.warn_load_factor = warn_load_factor.max(f64::MIN_POSITIVE);
        self
    }
}

impl Default for AssociativeTableConfig {
    fn default() -> Self {
        Self {
            table_length: DEFAULT_TABLE_LENGTH,
            warn_load_factor: DEFAULT_WARN_LOAD_FACTOR,
        }
    }
}

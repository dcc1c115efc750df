// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the associative table.

/// Errors that can occur in associative table operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum AssociativeTableError {
    /// The table holds no entries
    #[error("Associative table is empty")]
    EmptyTable,

    /// The key is not present in its bucket chain
    #[error("Cell not found for the given key")]
    CellNotFound,

    /// The key is already stored in the table
    #[error("Key already exists in the table")]
    DuplicateKey,

    /// The bucket contents disagree with the recorded entry count.
    ///
    /// This signals a broken table invariant and is not a recoverable condition.
    #[error("Internal inconsistency: visited {visited} entries but the table records {recorded}")]
    InternalInconsistency {
        /// Number of chain nodes actually found while scanning the buckets.
        visited: usize,
        /// Entry count recorded by the table.
        recorded: usize,
    },
}

/// Result type for associative table operations
pub type Result<T> = std::result::Result<T, AssociativeTableError>;

// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Associative table: a fixed-bucket hash table with separate chaining.
//!
//! Keys are hashed into one of a fixed number of buckets, each holding a
//! singly-linked chain of entries. The bucket count is chosen once, at
//! construction, and never changes: under heavy load the chains simply grow.
//!
//! # Features
//!
//! - Unique keys: inserting an existing key fails instead of overwriting.
//! - Explicit errors for empty tables, missing keys and duplicates.
//! - Deep copies through `Clone`, with `clone_from`/`assign` replacing capacity too.
//! - Snapshot iteration that records every entry at a point in time.
//! - Zero unsafe code.
//!
//! # Example
//!
//! ```
//! use kaula_lib::data_structures::associative_table::{AssociativeTable, AssociativeTableError};
//!
//! let mut table = AssociativeTable::<u32>::new();
//!
//! table.put("hello".to_string(), 42).unwrap();
//! assert_eq!(table.get("hello"), Ok(&42));
//!
//! // Keys are unique
//! assert_eq!(
//!     table.put("hello".to_string(), 7),
//!     Err(AssociativeTableError::DuplicateKey)
//! );
//!
//! // Missing keys are reported, not defaulted
//! assert_eq!(table.get("world"), Err(AssociativeTableError::CellNotFound));
//! ```
//!
//! # Snapshot Iteration
//!
//! A snapshot borrows the table, so the borrow checker rejects any mutation of
//! the table while the snapshot is in use:
//!
//! ```
//! use kaula_lib::data_structures::associative_table::AssociativeTable;
//!
//! let mut table = AssociativeTable::<u32>::new();
//! table.put("a".to_string(), 1).unwrap();
//! table.put("b".to_string(), 2).unwrap();
//!
//! let mut snapshot = table.begin_mut().unwrap();
//! while !snapshot.is_end() {
//!     if let Some(value) = snapshot.value_mut() {
//!         *value += 10;
//!     }
//!     snapshot.advance();
//! }
//!
//! assert_eq!(table.get("a"), Ok(&11));
//! assert_eq!(table.get("b"), Ok(&12));
//! ```

// Module declarations
mod chain;
mod config;
mod error;
mod hash;
mod iter;
mod table;

// Re-exports
pub use config::{AssociativeTableConfig, DEFAULT_TABLE_LENGTH, DEFAULT_WARN_LOAD_FACTOR};
pub use error::{AssociativeTableError, Result};
pub use hash::DefaultHashBuilder;
pub use iter::{Snapshot, SnapshotMut};
pub use table::AssociativeTable;

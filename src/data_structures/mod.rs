//! Data structures for Kaula.
//!
//! All implementations adhere to the project requirements:
//! - No unsafe code
//! - Explicit, typed errors instead of panics
//! - Iterative traversal of linked structures

pub mod associative_table;

// Re-export common data structures
pub use associative_table::{AssociativeTable, AssociativeTableConfig, AssociativeTableError};

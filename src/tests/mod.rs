//! Test modules for Kaula.
//!
//! This module contains the crate-internal test suites:
//! - Property-based tests for the associative table using proptest
//! - Configuration loading and validation tests
//! - Error reporting tests
//! - Shared fixtures and strategies

pub mod test_utils;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{distinct_pairs_strategy, key_strategy, TestFixture};

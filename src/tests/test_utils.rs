//! Test utilities and fixtures for Kaula.
//!
//! This module provides reusable strategies for property-based testing and a
//! fixture for tests that touch the filesystem or environment.

use proptest::prelude::*;
use proptest::strategy::{BoxedStrategy, Strategy};
use std::collections::HashMap;
use tempfile::TempDir;

/// Maximum number of entries in generated tables.
const MAX_ENTRIES: usize = 64;

/// Generate a strategy for short table keys.
///
/// The alphabet is small on purpose so that generated operation sequences
/// hit existing keys often.
pub fn key_strategy() -> BoxedStrategy<String> {
    "[a-h]{1,3}".boxed()
}

/// Generate a strategy for key-value pairs with distinct keys.
pub fn distinct_pairs_strategy() -> BoxedStrategy<Vec<(String, i64)>> {
    proptest::collection::hash_map(key_strategy(), any::<i64>(), 0..MAX_ENTRIES)
        .prop_map(|map: HashMap<String, i64>| map.into_iter().collect())
        .boxed()
}

/// Test fixture for tests requiring files and environment variables.
///
/// Environment variables set through the fixture are removed when it is dropped.
pub struct TestFixture {
    /// Temporary directory for test files
    pub temp_dir: TempDir,
    /// Environment variables to clean up after the test
    env_vars: Vec<String>,
}

impl TestFixture {
    /// Create a new test fixture.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
            env_vars: Vec::new(),
        })
    }

    /// Set an environment variable for this test.
    pub fn set_env<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key_str = key.into();
        std::env::set_var(&key_str, value.into());
        self.env_vars.push(key_str);
    }

    /// Write a file with the given name into the fixture directory.
    pub fn write_file<C: AsRef<[u8]>>(
        &self,
        name: &str,
        contents: C,
    ) -> std::io::Result<std::path::PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        for key in &self.env_vars {
            std::env::remove_var(key);
        }
    }
}

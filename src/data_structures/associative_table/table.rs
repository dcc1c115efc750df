// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the associative table.
//!
//! The table is a boxed slice of bucket chains whose length is chosen at
//! construction and never changes. Lookups hash the key, pick the bucket by
//! `hash % table_length` and scan that bucket's chain linearly.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace, warn};

use crate::data_structures::associative_table::chain::{self, Chain};
use crate::data_structures::associative_table::config::AssociativeTableConfig;
use crate::data_structures::associative_table::error::{AssociativeTableError, Result};
use crate::data_structures::associative_table::hash::{self as bucket_hash, DefaultHashBuilder};
use crate::data_structures::associative_table::iter::{Snapshot, SnapshotMut};

/// A fixed-capacity hash table with separate chaining.
///
/// Every key is stored at most once: [`put`](Self::put) refuses duplicates
/// rather than overwriting. The bucket count is fixed for the table's lifetime,
/// so chains simply get longer as entries are added.
///
/// # Type Parameters
///
/// * `T` - The value type.
/// * `K` - The key type. Defaults to `String`. Must implement `Eq + Hash` for lookups.
/// * `S` - The hash builder. Defaults to FNV.
pub struct AssociativeTable<T, K = String, S = DefaultHashBuilder> {
    /// Bucket chains; the length of this slice is the table length
    buckets: Box<[Chain<T, K>]>,

    /// Number of live entries across all buckets
    len: usize,

    /// Builds the hasher used to place keys into buckets
    hash_builder: S,

    /// Load factor above which a warning is logged
    warn_load_factor: f64,

    /// Whether the load factor warning has already been logged
    load_warning_emitted: bool,
}

fn allocate_buckets<T, K>(table_length: usize) -> Box<[Chain<T, K>]> {
    (0..table_length).map(|_| Chain::new()).collect()
}

impl<T, K> AssociativeTable<T, K, DefaultHashBuilder> {
    /// Creates an empty table with the default number of buckets (5).
    ///
    /// # Returns
    ///
    /// A new `AssociativeTable` instance.
    pub fn new() -> Self {
        Self::with_config(AssociativeTableConfig::default())
    }

    /// Creates an empty table with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the table.
    ///
    /// # Returns
    ///
    /// A new `AssociativeTable` instance.
    pub fn with_config(config: AssociativeTableConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<T, K, S> AssociativeTable<T, K, S> {
    /// Creates an empty table with the specified configuration and hash builder.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the table.
    /// * `hash_builder` - Builds the hasher used to place keys into buckets.
    ///
    /// # Returns
    ///
    /// A new `AssociativeTable` instance.
    pub fn with_config_and_hasher(config: AssociativeTableConfig, hash_builder: S) -> Self {
        let table_length = config.table_length.max(1);
        debug!(table_length, "Creating associative table");

        Self {
            buckets: allocate_buckets(table_length),
            len: 0,
            hash_builder,
            warn_load_factor: config.warn_load_factor,
            load_warning_emitted: false,
        }
    }

    /// Returns the number of entries in the table. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries. O(1).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets, fixed at construction.
    pub fn table_length(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of entries to buckets.
    ///
    /// There is no upper bound: the table never grows its bucket array.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Returns the number of entries in each bucket, in bucket order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Chain::len).collect()
    }

    /// Returns a reference to the table's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every entry. The bucket count is unchanged.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut().filter(|bucket| !bucket.is_empty()) {
            bucket.destroy();
        }
        self.len = 0;
        self.load_warning_emitted = false;
        debug!(
            table_length = self.buckets.len(),
            "Cleared associative table"
        );
    }

    /// Captures a read-only snapshot of every entry.
    ///
    /// Entries are recorded bucket by bucket in index order; within a bucket the
    /// most recently inserted entry comes first.
    ///
    /// # Errors
    ///
    /// * [`AssociativeTableError::EmptyTable`] if the table holds no entries.
    /// * [`AssociativeTableError::InternalInconsistency`] if the buckets hold a
    ///   different number of entries than the table records.
    pub fn begin(&self) -> Result<Snapshot<'_, T, K>> {
        Snapshot::capture(
            self.buckets.iter().flat_map(|bucket| bucket.iter()),
            self.len,
        )
    }

    /// Captures a snapshot that allows values to be updated in place.
    ///
    /// # Errors
    ///
    /// Same as [`begin`](Self::begin).
    pub fn begin_mut(&mut self) -> Result<SnapshotMut<'_, T, K>> {
        let recorded = self.len;
        SnapshotMut::capture(
            self.buckets.iter_mut().flat_map(|bucket| bucket.iter_mut()),
            recorded,
        )
    }

    /// Replaces this table's contents, capacity and hasher with a deep copy of `other`.
    ///
    /// # Returns
    ///
    /// The table itself, for chaining.
    pub fn assign(&mut self, other: &Self) -> &mut Self
    where
        T: Clone,
        K: Clone,
        S: Clone,
    {
        self.clone_from(other);
        self
    }

    fn note_load_factor(&mut self) {
        if self.load_warning_emitted {
            return;
        }
        let load_factor = self.load_factor();
        if load_factor > self.warn_load_factor {
            self.load_warning_emitted = true;
            warn!(
                len = self.len,
                table_length = self.buckets.len(),
                load_factor,
                threshold = self.warn_load_factor,
                "Load factor above threshold on fixed-size table"
            );
        }
    }
}

impl<T, K, S> AssociativeTable<T, K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates a table from key-value pairs, rejecting duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns [`AssociativeTableError::DuplicateKey`] at the first repeated key.
    pub fn try_from_pairs<I>(
        config: AssociativeTableConfig,
        hash_builder: S,
        pairs: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T)>,
    {
        let mut table = Self::with_config_and_hasher(config, hash_builder);
        for (key, value) in pairs {
            table.put(key, value)?;
        }
        Ok(table)
    }

    /// Returns the bucket a key maps to: `hash(key) mod table_length`.
    pub fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        bucket_hash::bucket_index(&self.hash_builder, key, self.buckets.len())
    }

    /// Returns `true` if the key is stored in the table. Never fails.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets[self.bucket_index(key)].search(key).is_some()
    }

    /// Gets a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// * [`AssociativeTableError::EmptyTable`] if the table holds no entries.
    /// * [`AssociativeTableError::CellNotFound`] if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.len == 0 {
            return Err(AssociativeTableError::EmptyTable);
        }

        self.buckets[self.bucket_index(key)]
            .search(key)
            .map(|node| &node.value)
            .ok_or(AssociativeTableError::CellNotFound)
    }

    /// Gets a mutable reference to the value stored under `key`, for in-place update.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.len == 0 {
            return Err(AssociativeTableError::EmptyTable);
        }

        let index = self.bucket_index(key);
        self.buckets[index]
            .search_mut(key)
            .map(|node| &mut node.value)
            .ok_or(AssociativeTableError::CellNotFound)
    }

    /// Inserts a key-value pair if the key is not already present.
    ///
    /// The new entry goes to the front of its bucket's chain.
    ///
    /// # Errors
    ///
    /// Returns [`AssociativeTableError::DuplicateKey`] if the key exists; the
    /// stored value is left untouched.
    pub fn put(&mut self, key: K, value: T) -> Result<()> {
        let index = self.bucket_index(&key);
        let bucket = &mut self.buckets[index];

        if bucket.search(&key).is_some() {
            return Err(AssociativeTableError::DuplicateKey);
        }

        bucket.insert(key, value);
        self.len += 1;
        trace!(bucket = index, len = self.len, "Inserted entry");

        self.note_load_factor();
        Ok(())
    }

    /// Removes the entry stored under `key` and returns its value.
    ///
    /// # Errors
    ///
    /// * [`AssociativeTableError::EmptyTable`] if the table holds no entries.
    /// * [`AssociativeTableError::CellNotFound`] if the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry stored under `key` and returns the stored key and value.
    ///
    /// # Errors
    ///
    /// Same as [`remove`](Self::remove).
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, T)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.len == 0 {
            return Err(AssociativeTableError::EmptyTable);
        }

        let index = self.bucket_index(key);
        let slot = self.buckets[index].search_slot(key)?;
        let entry = chain::unlink(slot).ok_or(AssociativeTableError::CellNotFound)?;

        self.len -= 1;
        trace!(bucket = index, len = self.len, "Removed entry");
        Ok(entry)
    }
}

impl<T, K> Default for AssociativeTable<T, K, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K, S> Clone for AssociativeTable<T, K, S>
where
    T: Clone,
    K: Clone,
    S: Clone,
{
    /// Deep copy: every bucket is duplicated node by node.
    fn clone(&self) -> Self {
        debug!(
            table_length = self.buckets.len(),
            len = self.len,
            "Cloning associative table"
        );
        Self {
            buckets: self.buckets.iter().map(Chain::copy).collect(),
            len: self.len,
            hash_builder: self.hash_builder.clone(),
            warn_load_factor: self.warn_load_factor,
            load_warning_emitted: self.load_warning_emitted,
        }
    }

    /// Destroys the current chains, then takes a deep copy of `source`,
    /// including its bucket count and entry count.
    fn clone_from(&mut self, source: &Self) {
        for bucket in self.buckets.iter_mut() {
            bucket.destroy();
        }

        self.buckets = source.buckets.iter().map(Chain::copy).collect();
        self.len = source.len;
        self.hash_builder = source.hash_builder.clone();
        self.warn_load_factor = source.warn_load_factor;
        self.load_warning_emitted = source.load_warning_emitted;
    }
}

impl<T, K, S> fmt::Debug for AssociativeTable<T, K, S>
where
    T: fmt::Debug,
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().flat_map(|bucket| bucket.iter()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> AssociativeTable<i32> {
        let mut table = AssociativeTable::new();
        table.put("a".to_string(), 1).expect("fresh key");
        table.put("b".to_string(), 2).expect("fresh key");
        table.put("c".to_string(), 3).expect("fresh key");
        table
    }

    /// Total entries counted directly from the buckets.
    fn counted(table: &AssociativeTable<i32>) -> usize {
        table.chain_lengths().iter().sum()
    }

    #[test]
    fn test_new_table() {
        let table: AssociativeTable<i32> = AssociativeTable::new();
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.table_length(), 5);
        assert_eq!(table.chain_lengths(), vec![0; 5]);
    }

    #[test]
    fn test_put_and_get() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), Ok(&1));
        assert_eq!(table.get("b"), Ok(&2));
        assert_eq!(table.get("c"), Ok(&3));
        assert_eq!(counted(&table), 3);
    }

    #[test]
    fn test_duplicate_put_keeps_original() {
        let mut table = sample_table();
        assert_eq!(
            table.put("a".to_string(), 99),
            Err(AssociativeTableError::DuplicateKey)
        );
        assert_eq!(table.get("a"), Ok(&1));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_empty_table_errors() {
        let mut table: AssociativeTable<i32> = AssociativeTable::new();
        assert_eq!(table.get("a"), Err(AssociativeTableError::EmptyTable));
        assert_eq!(table.get_mut("a"), Err(AssociativeTableError::EmptyTable));
        assert_eq!(table.remove("a"), Err(AssociativeTableError::EmptyTable));
        assert_eq!(table.begin().err(), Some(AssociativeTableError::EmptyTable));
        assert_eq!(
            table.begin_mut().err(),
            Some(AssociativeTableError::EmptyTable)
        );
    }

    #[test]
    fn test_missing_key_errors() {
        let mut table = sample_table();
        assert_eq!(table.get("z"), Err(AssociativeTableError::CellNotFound));
        assert_eq!(table.remove("z"), Err(AssociativeTableError::CellNotFound));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table = sample_table();
        if let Ok(value) = table.get_mut("b") {
            *value = 20;
        }
        assert_eq!(table.get("b"), Ok(&20));
    }

    #[test]
    fn test_remove() {
        let mut table = sample_table();
        assert_eq!(table.remove("a"), Ok(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Err(AssociativeTableError::CellNotFound));
        assert_eq!(table.get("b"), Ok(&2));
        assert_eq!(table.get("c"), Ok(&3));
        assert_eq!(counted(&table), 2);

        assert_eq!(table.remove_entry("b"), Ok(("b".to_string(), 2)));
        assert_eq!(table.remove("c"), Ok(3));
        assert!(table.is_empty());
        assert_eq!(table.remove("c"), Err(AssociativeTableError::EmptyTable));
    }

    #[test]
    fn test_bucket_index_matches_placement() {
        let table = sample_table();
        let lengths = table.chain_lengths();
        for key in ["a", "b", "c"] {
            let index = table.bucket_index(key);
            assert!(index < table.table_length());
            assert!(lengths[index] > 0);
        }
    }

    #[test]
    fn test_single_bucket_collisions() {
        let config = AssociativeTableConfig::new().with_table_length(1);
        let mut table: AssociativeTable<i32> = AssociativeTable::with_config(config);
        table.put("x".to_string(), 1).expect("fresh key");
        table.put("y".to_string(), 2).expect("fresh key");

        assert_eq!(table.chain_lengths(), vec![2]);
        assert_eq!(table.get("x"), Ok(&1));
        assert_eq!(table.get("y"), Ok(&2));

        assert_eq!(table.remove("x"), Ok(1));
        assert_eq!(table.get("y"), Ok(&2));
        assert_eq!(table.get("x"), Err(AssociativeTableError::CellNotFound));
    }

    #[test]
    fn test_snapshot_order_within_bucket() {
        let config = AssociativeTableConfig::new().with_table_length(1);
        let mut table: AssociativeTable<i32> = AssociativeTable::with_config(config);
        for (key, value) in [("first", 1), ("second", 2), ("third", 3)] {
            table.put(key.to_string(), value).expect("fresh key");
        }

        let keys: Vec<&str> = table
            .begin()
            .expect("non-empty")
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_snapshot_mut_updates_values() {
        let mut table = sample_table();
        {
            let mut snapshot = table.begin_mut().expect("non-empty");
            while !snapshot.is_end() {
                if let Some(value) = snapshot.value_mut() {
                    *value *= 10;
                }
                snapshot.advance();
            }
        }
        assert_eq!(table.get("a"), Ok(&10));
        assert_eq!(table.get("b"), Ok(&20));
        assert_eq!(table.get("c"), Ok(&30));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = sample_table();
        let mut copy = original.clone();

        copy.put("d".to_string(), 4).expect("fresh key");
        copy.remove("a").expect("present");
        if let Ok(value) = copy.get_mut("b") {
            *value = 200;
        }

        assert_eq!(original.len(), 3);
        assert_eq!(original.get("a"), Ok(&1));
        assert_eq!(original.get("b"), Ok(&2));
        assert!(!original.contains_key("d"));
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn test_clone_copies_every_bucket() {
        // More buckets than entries, so any bucket past index `len` must still be copied
        let config = AssociativeTableConfig::new().with_table_length(64);
        let mut table: AssociativeTable<i32> = AssociativeTable::with_config(config);
        for i in 0..3 {
            table.put(format!("key_{i}"), i).expect("fresh key");
        }

        let copy = table.clone();
        assert_eq!(copy.table_length(), 64);
        assert_eq!(copy.chain_lengths(), table.chain_lengths());
        for i in 0..3 {
            assert_eq!(copy.get(format!("key_{i}").as_str()), Ok(&i));
        }
    }

    #[test]
    fn test_assign_replaces_capacity_and_contents() {
        let source = sample_table();
        let config = AssociativeTableConfig::new().with_table_length(2);
        let mut target: AssociativeTable<i32> = AssociativeTable::with_config(config);
        target.put("old".to_string(), 0).expect("fresh key");

        target
            .assign(&source)
            .put("d".to_string(), 4)
            .expect("fresh key");

        assert_eq!(target.table_length(), 5);
        assert_eq!(target.len(), 4);
        assert!(!target.contains_key("old"));
        assert_eq!(target.get("c"), Ok(&3));
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut table = sample_table();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.table_length(), 5);
        assert_eq!(counted(&table), 0);
        table
            .put("a".to_string(), 5)
            .expect("fresh key after clear");
        assert_eq!(table.get("a"), Ok(&5));
    }

    #[test]
    fn test_load_factor_grows_without_rehash() {
        let mut table: AssociativeTable<usize, usize> = AssociativeTable::new();
        for i in 0..100 {
            table.put(i, i).expect("fresh key");
        }
        assert_eq!(table.table_length(), 5);
        assert_eq!(table.load_factor(), 20.0);
        assert_eq!(table.chain_lengths().iter().sum::<usize>(), 100);
    }

    #[test]
    fn test_try_from_pairs() {
        let table = AssociativeTable::try_from_pairs(
            AssociativeTableConfig::default(),
            DefaultHashBuilder::default(),
            vec![("a".to_string(), 1), ("b".to_string(), 2)],
        )
        .expect("distinct keys");
        assert_eq!(table.len(), 2);

        let duplicate = AssociativeTable::<i32>::try_from_pairs(
            AssociativeTableConfig::default(),
            DefaultHashBuilder::default(),
            vec![("a".to_string(), 1), ("a".to_string(), 2)],
        );
        assert_eq!(duplicate.err(), Some(AssociativeTableError::DuplicateKey));
    }

    #[test]
    fn test_debug_renders_entries() {
        let mut table: AssociativeTable<i32> = AssociativeTable::new();
        table.put("only".to_string(), 7).expect("fresh key");
        assert_eq!(format!("{table:?}"), r#"{"only": 7}"#);
    }
}

// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Snapshot iterators over the associative table.
//!
//! A snapshot records a reference to every entry of the table at the moment it
//! is created: buckets in index order, and within a bucket from the most
//! recently inserted entry to the oldest. The recorded list is owned by the
//! snapshot; the entries are borrowed from the table, so the table cannot be
//! mutated or dropped while a snapshot is alive.
//!
//! Both snapshot types expose a cursor interface (`key`, `value`, `is_end`,
//! `advance`) and also implement [`Iterator`] over the entries not yet passed.

use std::fmt;
use std::vec;

use tracing::error;

use crate::data_structures::associative_table::error::{AssociativeTableError, Result};

/// Checks the number of entries collected against the table's recorded size.
fn verify_count(visited: usize, recorded: usize) -> Result<()> {
    if visited == recorded {
        return Ok(());
    }
    error!(
        visited,
        recorded, "Bucket scan disagrees with the recorded entry count"
    );
    Err(AssociativeTableError::InternalInconsistency { visited, recorded })
}

/// Read-only snapshot of a table's entries.
///
/// Created by [`AssociativeTable::begin`](super::AssociativeTable::begin).
pub struct Snapshot<'a, T, K> {
    entries: Vec<(&'a K, &'a T)>,
    position: usize,
}

impl<'a, T, K> Snapshot<'a, T, K> {
    /// Records `entries`, failing if the table is empty or the count is off.
    pub(crate) fn capture<I>(entries: I, recorded: usize) -> Result<Self>
    where
        I: Iterator<Item = (&'a K, &'a T)>,
    {
        if recorded == 0 {
            return Err(AssociativeTableError::EmptyTable);
        }

        let mut collected = Vec::with_capacity(recorded);
        collected.extend(entries);
        verify_count(collected.len(), recorded)?;

        Ok(Self {
            entries: collected,
            position: 0,
        })
    }

    /// Returns the key at the cursor, or `None` once the end is reached.
    pub fn key(&self) -> Option<&'a K> {
        self.entries.get(self.position).map(|(key, _)| *key)
    }

    /// Returns the value at the cursor, or `None` once the end is reached.
    pub fn value(&self) -> Option<&'a T> {
        self.entries.get(self.position).map(|(_, value)| *value)
    }

    /// Returns `true` once the cursor has moved past the last recorded entry.
    pub fn is_end(&self) -> bool {
        self.position >= self.entries.len()
    }

    /// Moves the cursor forward by one entry.
    ///
    /// Advancing an iterator that is already at the end leaves it at the end.
    pub fn advance(&mut self) -> &mut Self {
        if !self.is_end() {
            self.position += 1;
        }
        self
    }

    /// Moves the cursor forward and returns the iterator as it was before the move.
    pub fn post_advance(&mut self) -> Self {
        let previous = self.clone();
        self.advance();
        previous
    }

    /// Number of recorded entries, including those already passed.
    pub fn recorded(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries from the cursor to the end.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.position
    }
}

impl<T, K> Clone for Snapshot<'_, T, K> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            position: self.position,
        }
    }
}

impl<T: fmt::Debug, K: fmt::Debug> fmt::Debug for Snapshot<'_, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("position", &self.position)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a, T, K> Iterator for Snapshot<'a, T, K> {
    type Item = (&'a K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.position).copied()?;
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T, K> ExactSizeIterator for Snapshot<'_, T, K> {}

/// Read/write snapshot of a table's entries.
///
/// Created by [`AssociativeTable::begin_mut`](super::AssociativeTable::begin_mut).
/// Keys are read-only; values can be updated in place through
/// [`SnapshotMut::value_mut`].
///
/// Only the pre-advance form ([`SnapshotMut::advance`]) is offered. A
/// post-advance would have to return a copy of the snapshot, and the recorded
/// `&mut T` references cannot be duplicated.
pub struct SnapshotMut<'a, T, K> {
    entries: Vec<(&'a K, &'a mut T)>,
    position: usize,
}

impl<'a, T, K> SnapshotMut<'a, T, K> {
    /// Records `entries`, failing if the table is empty or the count is off.
    pub(crate) fn capture<I>(entries: I, recorded: usize) -> Result<Self>
    where
        I: Iterator<Item = (&'a K, &'a mut T)>,
    {
        if recorded == 0 {
            return Err(AssociativeTableError::EmptyTable);
        }

        let mut collected = Vec::with_capacity(recorded);
        collected.extend(entries);
        verify_count(collected.len(), recorded)?;

        Ok(Self {
            entries: collected,
            position: 0,
        })
    }

    /// Returns the key at the cursor, or `None` once the end is reached.
    pub fn key(&self) -> Option<&'a K> {
        self.entries.get(self.position).map(|(key, _)| *key)
    }

    /// Returns the value at the cursor, or `None` once the end is reached.
    pub fn value(&self) -> Option<&T> {
        self.entries.get(self.position).map(|(_, value)| &**value)
    }

    /// Returns the value at the cursor for in-place update.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(self.position)
            .map(|(_, value)| &mut **value)
    }

    /// Returns `true` once the cursor has moved past the last recorded entry.
    pub fn is_end(&self) -> bool {
        self.position >= self.entries.len()
    }

    /// Moves the cursor forward by one entry.
    ///
    /// Advancing an iterator that is already at the end leaves it at the end.
    pub fn advance(&mut self) -> &mut Self {
        if !self.is_end() {
            self.position += 1;
        }
        self
    }

    /// Number of recorded entries, including those already passed.
    pub fn recorded(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries from the cursor to the end.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.position
    }
}

impl<T: fmt::Debug, K: fmt::Debug> fmt::Debug for SnapshotMut<'_, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotMut")
            .field("position", &self.position)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a, T, K> IntoIterator for SnapshotMut<'a, T, K> {
    type Item = (&'a K, &'a mut T);
    type IntoIter = vec::IntoIter<(&'a K, &'a mut T)>;

    /// Consumes the snapshot, yielding the entries from the cursor onwards.
    fn into_iter(self) -> Self::IntoIter {
        let mut entries = self.entries;
        entries.split_off(self.position).into_iter()
    }
}

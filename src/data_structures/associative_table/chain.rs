// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bucket chains for the associative table.
//!
//! Each bucket owns a singly-linked list of nodes. Links are `Option<Box<Node>>`,
//! so a node has exactly one owner and removal is a matter of moving the
//! successor into the slot that owned the removed node. Every traversal is an
//! explicit loop; chains can grow without bound because the table never rehashes.

use std::borrow::Borrow;

use crate::data_structures::associative_table::error::{AssociativeTableError, Result};

/// An owning link to the next node of a chain, or the end of the chain.
pub(crate) type Link<T, K> = Option<Box<Node<T, K>>>;

/// A node in a bucket chain.
pub(crate) struct Node<T, K> {
    /// The key stored in this node
    pub(crate) key: K,

    /// The value associated with the key
    pub(crate) value: T,

    /// The rest of the chain
    pub(crate) next: Link<T, K>,
}

impl<T, K> Node<T, K> {
    fn new(key: K, value: T, next: Link<T, K>) -> Self {
        Self { key, value, next }
    }

    fn holds<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let stored: &Q = self.key.borrow();
        stored == key
    }
}

/// A singly-linked chain of nodes belonging to one bucket.
pub(crate) struct Chain<T, K> {
    head: Link<T, K>,
}

impl<T, K> Chain<T, K> {
    /// Creates an empty chain.
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    /// Returns `true` if the chain holds no nodes.
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Counts the nodes in the chain. O(n).
    pub(crate) fn len(&self) -> usize {
        self.iter().count()
    }

    /// Finds the node holding `key`, if any.
    ///
    /// Never fails and has no side effects; an empty chain simply yields `None`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&Node<T, K>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            if node.holds(key) {
                return Some(node);
            }
            cursor = node.next.as_deref();
        }
        None
    }

    /// Mutable counterpart of [`Chain::search`].
    pub(crate) fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<T, K>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.holds(key) {
                return Some(node);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Finds the link slot that owns the node holding `key`.
    ///
    /// The returned slot can be handed to [`unlink`] to splice the node out.
    ///
    /// # Errors
    ///
    /// Returns [`AssociativeTableError::CellNotFound`] if no node matches,
    /// including when the chain is empty.
    pub(crate) fn search_slot<Q>(&mut self, key: &Q) -> Result<&mut Link<T, K>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut slot = &mut self.head;
        loop {
            let found = match slot.as_deref() {
                Some(node) => node.holds(key),
                None => return Err(AssociativeTableError::CellNotFound),
            };
            if found {
                return Ok(slot);
            }
            match slot {
                Some(node) => slot = &mut node.next,
                None => return Err(AssociativeTableError::CellNotFound),
            }
        }
    }

    /// Prepends a node holding `(key, value)`. O(1).
    ///
    /// Duplicate keys are not detected here; callers check with [`Chain::search`] first.
    pub(crate) fn insert(&mut self, key: K, value: T) {
        let next = self.head.take();
        self.head = Some(Box::new(Node::new(key, value, next)));
    }

    /// Duplicates the chain node by node, preserving order.
    pub(crate) fn copy(&self) -> Self
    where
        K: Clone,
        T: Clone,
    {
        let mut copied = Self::new();
        let mut tail = &mut copied.head;
        for (key, value) in self.iter() {
            let node = tail.insert(Box::new(Node::new(key.clone(), value.clone(), None)));
            tail = &mut node.next;
        }
        copied
    }

    /// Frees every node and leaves the chain empty.
    pub(crate) fn destroy(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }

    /// Iterates over `(key, value)` pairs from head to tail.
    pub(crate) fn iter(&self) -> ChainIter<'_, T, K> {
        ChainIter {
            cursor: self.head.as_deref(),
        }
    }

    /// Iterates over `(key, mutable value)` pairs from head to tail.
    pub(crate) fn iter_mut(&mut self) -> ChainIterMut<'_, T, K> {
        ChainIterMut {
            cursor: self.head.as_deref_mut(),
        }
    }
}

impl<T, K> Default for Chain<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> Drop for Chain<T, K> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Removes the node owned by `slot`, moving its successor into the slot.
///
/// Returns the removed `(key, value)` pair, or `None` if the slot was empty.
pub(crate) fn unlink<T, K>(slot: &mut Link<T, K>) -> Option<(K, T)> {
    let node = slot.take()?;
    let Node { key, value, next } = *node;
    *slot = next;
    Some((key, value))
}

/// Shared iterator over a chain.
pub(crate) struct ChainIter<'a, T, K> {
    cursor: Option<&'a Node<T, K>>,
}

impl<'a, T, K> Iterator for ChainIter<'a, T, K> {
    type Item = (&'a K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor.take()?;
        self.cursor = node.next.as_deref();
        Some((&node.key, &node.value))
    }
}

/// Iterator over a chain handing out mutable access to values.
pub(crate) struct ChainIterMut<'a, T, K> {
    cursor: Option<&'a mut Node<T, K>>,
}

impl<'a, T, K> Iterator for ChainIterMut<'a, T, K> {
    type Item = (&'a K, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor.take()?;
        let Node { key, value, next } = node;
        self.cursor = next.as_deref_mut();
        Some((&*key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(pairs: &[(&str, i32)]) -> Chain<i32, String> {
        let mut chain = Chain::new();
        for (key, value) in pairs {
            chain.insert((*key).to_string(), *value);
        }
        chain
    }

    fn keys(chain: &Chain<i32, String>) -> Vec<String> {
        chain.iter().map(|(key, _)| key.clone()).collect()
    }

    #[test]
    fn test_insert_prepends() {
        let chain = chain_of(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(keys(&chain), vec!["c", "b", "a"]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_search() {
        let chain = chain_of(&[("a", 1), ("b", 2)]);
        assert_eq!(chain.search("a").map(|node| node.value), Some(1));
        assert!(chain.search("z").is_none());

        let empty: Chain<i32, String> = Chain::new();
        assert!(empty.search("a").is_none());
    }

    #[test]
    fn test_search_mut_updates_in_place() {
        let mut chain = chain_of(&[("a", 1), ("b", 2)]);
        if let Some(node) = chain.search_mut("a") {
            node.value = 10;
        }
        assert_eq!(chain.search("a").map(|node| node.value), Some(10));
    }

    #[test]
    fn test_search_slot_missing() {
        let mut empty: Chain<i32, String> = Chain::new();
        assert_eq!(
            empty.search_slot("a").err(),
            Some(AssociativeTableError::CellNotFound)
        );

        let mut chain = chain_of(&[("a", 1)]);
        assert_eq!(
            chain.search_slot("b").err(),
            Some(AssociativeTableError::CellNotFound)
        );
    }

    #[test]
    fn test_unlink_head_middle_and_tail() {
        let mut chain = chain_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

        // Order is d, c, b, a
        let removed = chain.search_slot("c").ok().and_then(|slot| unlink(slot));
        assert_eq!(removed, Some(("c".to_string(), 3)));
        assert_eq!(keys(&chain), vec!["d", "b", "a"]);

        let removed = chain.search_slot("d").ok().and_then(|slot| unlink(slot));
        assert_eq!(removed, Some(("d".to_string(), 4)));
        assert_eq!(keys(&chain), vec!["b", "a"]);

        let removed = chain.search_slot("a").ok().and_then(|slot| unlink(slot));
        assert_eq!(removed, Some(("a".to_string(), 1)));
        assert_eq!(keys(&chain), vec!["b"]);
    }

    #[test]
    fn test_unlink_empty_slot() {
        let mut slot: Link<i32, String> = None;
        assert!(unlink(&mut slot).is_none());
    }

    #[test]
    fn test_copy_preserves_order_and_is_independent() {
        let original = chain_of(&[("a", 1), ("b", 2), ("c", 3)]);
        let mut copied = original.copy();
        assert_eq!(keys(&copied), keys(&original));

        if let Some(node) = copied.search_mut("b") {
            node.value = 20;
        }
        assert_eq!(original.search("b").map(|node| node.value), Some(2));
        assert_eq!(copied.search("b").map(|node| node.value), Some(20));
    }

    #[test]
    fn test_destroy_empties_chain() {
        let mut chain = chain_of(&[("a", 1), ("b", 2)]);
        chain.destroy();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_long_chain_drop_does_not_recurse() {
        let mut chain: Chain<usize, usize> = Chain::new();
        for i in 0..200_000 {
            chain.insert(i, i);
        }
        let copied = chain.copy();
        assert_eq!(copied.len(), 200_000);
        drop(copied);
        drop(chain);
    }

    #[test]
    fn test_iter_mut() {
        let mut chain = chain_of(&[("a", 1), ("b", 2)]);
        for (_, value) in chain.iter_mut() {
            *value *= 10;
        }
        let values: Vec<i32> = chain.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, vec![20, 10]);
    }
}

// Copyright (c) 2025 Kaula Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Key hashing and bucket indexing for the associative table.
//!
//! Keys are hashed with a `BuildHasher` and reduced modulo the bucket count.
//! The default builder is FNV, which is unseeded, so bucket placement is
//! reproducible from one run to the next.

use std::hash::{BuildHasher, Hash, Hasher};

/// Hash builder used when none is supplied.
pub type DefaultHashBuilder = fnv::FnvBuildHasher;

/// Computes the hash of a key with the given builder.
pub(crate) fn hash_key<Q, S>(hash_builder: &S, key: &Q) -> u64
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    let mut hasher = hash_builder.build_hasher();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Maps a key to its bucket: `hash(key) mod table_length`.
///
/// `table_length` must be non-zero.
pub(crate) fn bucket_index<Q, S>(hash_builder: &S, key: &Q, table_length: usize) -> usize
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    debug_assert!(table_length > 0, "bucket count must be non-zero");
    (hash_key(hash_builder, key) % table_length as u64) as usize
}

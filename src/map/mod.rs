// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Uniform map surface over interchangeable backends.
//!
//! Every container in this crate — six sorted trees, the skiplist, and two
//! hash tables — implements the [`Map`] trait, so callers can hold a
//! `Box<dyn Map<K, V>>` and switch implementations without touching query
//! logic:
//! - `map`: the trait, insert/remove outcomes, and the backend catalogue
//! - `cursor`: the cursor trait for stateful bidirectional iteration
//! - `factory`: boxed construction from a [`MapKind`]
//!
//! Optional capabilities (neighbour search, rank selection, cursor removal)
//! default to a structured `NotSupported` error rather than a crash, so a
//! caller can probe a backend safely.

use crate::error::{not_supported, ReedResult};
use serde::{Deserialize, Serialize};

pub mod cursor;
pub mod factory;

#[cfg(test)]
mod map_test;

pub use cursor::Cursor;
pub use factory::create;

/// Outcome of an insert: the value slot for the key, and whether the entry
/// is newly created.
///
/// The slot borrow is tied to the map, so it stays valid exactly until the
/// next structural mutation. Inserting an existing key keeps the original
/// value (the offered one is dropped) and reports `inserted = false`.
#[derive(Debug)]
pub struct InsertOutcome<'a, V> {
    /// Mutable access to the value cell bound to the key.
    pub slot: &'a mut V,
    /// True when the entry did not exist before this call.
    pub inserted: bool,
}

/// Catalogue of the available map implementations.
///
/// ## Ordering Profiles
/// - Sorted, rank-capable: `RedBlack`, `HeightBalanced`, `WeightBalanced`,
///   `PathReduction`, `Splay`, `Treap`, `SkipList`
/// - Unsorted: `ChainedHash`, `OpenHash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKind {
    /// Red-black tree.
    RedBlack,
    /// Height-balanced (AVL) tree.
    HeightBalanced,
    /// Weight-balanced tree, BB[alpha] with alpha ~ 1/3.
    WeightBalanced,
    /// Weight-balanced variant rotating only when path length shrinks.
    PathReduction,
    /// Splay tree; reads through `get_mut` restructure.
    Splay,
    /// Randomised treap.
    Treap,
    /// Skiplist.
    SkipList,
    /// Chained hash table with hash-sorted buckets.
    ChainedHash,
    /// Open-addressing hash table with linear probing.
    OpenHash,
}

impl MapKind {
    /// All nine backends, sorted variants first.
    pub fn all() -> [MapKind; 9] {
        [
            MapKind::RedBlack,
            MapKind::HeightBalanced,
            MapKind::WeightBalanced,
            MapKind::PathReduction,
            MapKind::Splay,
            MapKind::Treap,
            MapKind::SkipList,
            MapKind::ChainedHash,
            MapKind::OpenHash,
        ]
    }

    /// Stable backend identifier, matching `Map::backend`.
    pub fn name(&self) -> &'static str {
        match self {
            MapKind::RedBlack => "rb",
            MapKind::HeightBalanced => "hb",
            MapKind::WeightBalanced => "wb",
            MapKind::PathReduction => "pr",
            MapKind::Splay => "sp",
            MapKind::Treap => "tr",
            MapKind::SkipList => "skiplist",
            MapKind::ChainedHash => "hashtable",
            MapKind::OpenHash => "hashtable2",
        }
    }

    /// True for backends that keep keys in comparator order.
    pub fn is_sorted(&self) -> bool {
        !matches!(self, MapKind::ChainedHash | MapKind::OpenHash)
    }
}

/// Common interface for all map implementations.
///
/// ## Type Parameters
/// - `K`: Key type (sorted backends require `Ord`; hash backends also take
///   a hash function at construction)
/// - `V`: Value type
///
/// ## Capabilities
/// Core operations are available on every backend. Neighbour searches,
/// rank selection and `min`/`max` are overridden by sorted backends and
/// report `NotSupported` elsewhere.
///
/// ## Mutation and Cursors
/// A cursor borrows its map mutably, so the borrow checker enforces the
/// invalidation rule: any structural mutation ends every outstanding cursor
/// except the cursor's own `remove`.
pub trait Map<K, V> {
    /// Stable backend identifier ("rb", "hb", "wb", "pr", "sp", "tr",
    /// "skiplist", "hashtable", "hashtable2").
    fn backend(&self) -> &'static str;

    /// True when traversal yields keys in ascending comparator order.
    fn is_sorted(&self) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// True when the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a key, returning the value slot and whether it is new.
    ///
    /// ## Input
    /// - `key`: Key to bind
    /// - `value`: Value for a new entry; dropped when the key already exists
    ///
    /// ## Output
    /// - `InsertOutcome` with the (possibly pre-existing) slot
    ///
    /// ## Performance
    /// - Trees and skiplist: O(log n); splay amortised
    /// - Hash tables: O(1) expected
    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V>;

    /// Exact lookup.
    ///
    /// On the splay tree this is the non-restructuring variant; use
    /// `get_mut` for the classic splaying access.
    fn get(&self, key: &K) -> Option<&V>;

    /// Exact lookup returning the mutable value slot.
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Removes a key, returning ownership of the evicted pair.
    ///
    /// ## Output
    /// - `Some((key, value))` when the key was present
    /// - `None` when absent (not an error)
    fn remove(&mut self, key: &K) -> Option<(K, V)>;

    /// Removes every entry, returning how many were removed.
    fn clear(&mut self) -> usize;

    /// Visits every entry, stopping early when the visitor returns false.
    ///
    /// ## Output
    /// - Number of entries visited (the entry that stopped the walk counts)
    ///
    /// ## Ordering
    /// - Sorted backends: ascending key order
    /// - Chained hash: (bucket, chain position); open hash: slot order —
    ///   implementation-defined, do not depend on it
    fn traverse(&self, visit: &mut dyn FnMut(&K, &V) -> bool) -> usize;

    /// Lazy iterator over the same order as `traverse`.
    fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_>;

    /// Checks every structural invariant without mutating.
    ///
    /// ## Output
    /// - `Ok(())` on a sound structure
    /// - `Err(StructureCorrupted)` naming the broken invariant
    fn verify(&self) -> ReedResult<()>;

    /// Largest entry with key ≤ `key` (sorted backends only).
    fn get_le(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let _ = key;
        Err(not_supported("get_le", self.backend()))
    }

    /// Largest entry with key < `key` (sorted backends only).
    fn get_lt(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let _ = key;
        Err(not_supported("get_lt", self.backend()))
    }

    /// Smallest entry with key ≥ `key` (sorted backends only).
    fn get_ge(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let _ = key;
        Err(not_supported("get_ge", self.backend()))
    }

    /// Smallest entry with key > `key` (sorted backends only).
    fn get_gt(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let _ = key;
        Err(not_supported("get_gt", self.backend()))
    }

    /// Entry with the given rank: `select(0)` is the smallest key.
    ///
    /// ## Output
    /// - `Ok(Some(..))` for `rank < len()`
    /// - `Ok(None)` for an out-of-range rank
    /// - `Err(NotSupported)` on unsorted backends
    ///
    /// ## Performance
    /// - Weight-balanced and path-reduction trees: O(log n) via weights
    /// - Other sorted backends: linear walk from the cheaper end
    fn select(&self, rank: usize) -> ReedResult<Option<(&K, &V)>> {
        let _ = rank;
        Err(not_supported("select", self.backend()))
    }

    /// Smallest entry (sorted backends only).
    fn min(&self) -> ReedResult<Option<(&K, &V)>> {
        Err(not_supported("min", self.backend()))
    }

    /// Largest entry (sorted backends only).
    fn max(&self) -> ReedResult<Option<(&K, &V)>> {
        Err(not_supported("max", self.backend()))
    }

    /// Opens a cursor; initially invalid, positioned by `first`/`last`/seek.
    fn cursor(&mut self) -> Box<dyn Cursor<K, V> + '_>;
}

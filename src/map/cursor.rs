// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Cursor interface for stateful iteration over a map.
//!
//! A cursor is bound to exactly one map and borrows it mutably for its whole
//! lifetime, so no other operation can slide the structure out from under it.
//! It starts invalid; `first`, `last` and the seek family position it.
//! Navigation off either end leaves it invalid again.
//!
//! ## Capabilities
//! - Neighbour seeks and `compare` exist on sorted backends only
//! - `remove` exists on the skiplist, the open-addressing table, the
//!   path-reduction tree, the splay tree and the treap; it removes the
//!   current entry and leaves the cursor invalid
//! - Everything else reports `NotSupported` instead of crashing

use crate::error::{not_supported, ReedResult};
use std::cmp::Ordering;

/// Common interface for all map cursors.
pub trait Cursor<K, V> {
    /// Backend identifier of the underlying map.
    fn backend(&self) -> &'static str;

    /// True when the cursor rests on an entry.
    fn valid(&self) -> bool;

    /// Resets the cursor to the invalid state.
    fn invalidate(&mut self);

    /// Moves to the first entry; false when the map is empty.
    fn first(&mut self) -> bool;

    /// Moves to the last entry; false when the map is empty.
    fn last(&mut self) -> bool;

    /// Steps forward; false (and invalid) when past the end.
    ///
    /// On an invalid cursor this is a no-op returning false.
    fn next(&mut self) -> bool;

    /// Steps backward; false (and invalid) when past the start.
    fn prev(&mut self) -> bool;

    /// Steps forward `n` times; equivalent to `n` calls of `next`.
    fn next_n(&mut self, n: usize) -> bool {
        for _ in 0..n {
            if !self.next() {
                return false;
            }
        }
        self.valid()
    }

    /// Steps backward `n` times; equivalent to `n` calls of `prev`.
    fn prev_n(&mut self, n: usize) -> bool {
        for _ in 0..n {
            if !self.prev() {
                return false;
            }
        }
        self.valid()
    }

    /// Positions on the exact key; invalid when absent.
    ///
    /// On the splay tree this is an access and splays.
    fn seek(&mut self, key: &K) -> bool;

    /// Positions on the largest key ≤ `key` (sorted backends only).
    fn seek_le(&mut self, key: &K) -> ReedResult<bool> {
        let _ = key;
        Err(not_supported("seek_le", self.backend()))
    }

    /// Positions on the largest key < `key` (sorted backends only).
    fn seek_lt(&mut self, key: &K) -> ReedResult<bool> {
        let _ = key;
        Err(not_supported("seek_lt", self.backend()))
    }

    /// Positions on the smallest key ≥ `key` (sorted backends only).
    fn seek_ge(&mut self, key: &K) -> ReedResult<bool> {
        let _ = key;
        Err(not_supported("seek_ge", self.backend()))
    }

    /// Positions on the smallest key > `key` (sorted backends only).
    fn seek_gt(&mut self, key: &K) -> ReedResult<bool> {
        let _ = key;
        Err(not_supported("seek_gt", self.backend()))
    }

    /// Key under the cursor, when valid.
    fn key(&self) -> Option<&K>;

    /// Value under the cursor, when valid.
    fn value(&self) -> Option<&V>;

    /// Mutable value slot under the cursor, when valid.
    fn value_mut(&mut self) -> Option<&mut V>;

    /// Removes the current entry and invalidates the cursor.
    ///
    /// ## Output
    /// - `Ok(Some((key, value)))` when an entry was removed
    /// - `Ok(None)` on an invalid cursor
    /// - `Err(NotSupported)` on backends without cursor removal
    fn remove(&mut self) -> ReedResult<Option<(K, V)>> {
        Err(not_supported("remove", self.backend()))
    }

    /// Key-order comparison with another cursor over the same map
    /// (sorted backends only). The invalid cursor sorts before any valid one.
    fn compare(&self, other: &dyn Cursor<K, V>) -> ReedResult<Ordering> {
        let _ = other;
        Err(not_supported("compare", self.backend()))
    }
}

/// Key-order comparison used by sorted cursors: absent (invalid) sorts first.
pub(crate) fn compare_keys<K: Ord>(a: Option<&K>, b: Option<&K>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Treap backend.
//!
//! Binary search order on keys, min-heap order on 32-bit priorities: a
//! child's priority is never below its parent's. Priorities come from a
//! caller-supplied function over the key, or from the map's own random
//! generator — fixed before the structural insert completes, never after.
//! Insertion rotates the new node up while its parent's priority is larger;
//! removal rotates the node down toward the lower-priority child until it
//! can be spliced out. Cursor removal is offered.

use super::core::{BstInsert, SortedTree, TreeCore, NIL, NodeId};
use crate::error::{corrupted, ReedResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sorted map backed by a randomised treap.
///
/// ## Performance
/// - insert/get/remove: O(log n) expected under random priorities
/// - A priority function turns the heap layer deterministic
#[derive(Debug)]
pub struct TreapMap<K, V> {
    core: TreeCore<K, V, u32>,
    priority_fn: Option<fn(&K) -> u32>,
    rng: StdRng,
}

impl<K: Ord, V> TreapMap<K, V> {
    /// Creates a treap drawing priorities from entropy.
    pub fn new() -> Self {
        TreapMap {
            core: TreeCore::new(),
            priority_fn: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a treap with a deterministic priority source.
    pub fn with_seed(seed: u64) -> Self {
        TreapMap {
            core: TreeCore::new(),
            priority_fn: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a treap whose priorities are computed from the key.
    pub fn with_priority_fn(priority_fn: fn(&K) -> u32) -> Self {
        TreapMap {
            core: TreeCore::new(),
            priority_fn: Some(priority_fn),
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Longest root-to-leaf node count; 0 when empty.
    pub fn height(&self) -> usize {
        self.core.height()
    }

    /// Sum of node depths with the root at depth 1.
    pub fn total_path_length(&self) -> u64 {
        self.core.total_path_length()
    }

    fn prio(&self, id: NodeId) -> u32 {
        self.core.node(id).aux
    }
}

impl<K: Ord, V> Default for TreapMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> SortedTree<K, V> for TreapMap<K, V> {
    type Aux = u32;
    const BACKEND: &'static str = "tr";
    const CURSOR_REMOVE: bool = true;

    fn core(&self) -> &TreeCore<K, V, u32> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TreeCore<K, V, u32> {
        &mut self.core
    }

    fn insert_node(&mut self, key: K, value: V) -> (NodeId, bool) {
        let priority = match self.priority_fn {
            Some(f) => f(&key),
            None => self.rng.gen(),
        };
        match self.core.insert_leaf(key, value, priority) {
            BstInsert::Existing(id) => (id, false),
            BstInsert::New(id) => {
                loop {
                    let p = self.core.node(id).parent;
                    if p == NIL || self.prio(p) <= self.prio(id) {
                        break;
                    }
                    if self.core.node(p).left == id {
                        self.core.rotate_right(p);
                    } else {
                        self.core.rotate_left(p);
                    }
                }
                (id, true)
            }
        }
    }

    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        loop {
            let n = self.core.node(id);
            let (l, r) = (n.left, n.right);
            if l == NIL || r == NIL {
                break;
            }
            // The lower-priority child must come up to keep heap order.
            if self.prio(l) < self.prio(r) {
                self.core.rotate_right(id);
            } else {
                self.core.rotate_left(id);
            }
        }
        self.core.splice(id);
        self.core.release_entry(id)
    }

    fn verify_aux(&self) -> ReedResult<()> {
        let mut cur = self.core.first();
        while cur != NIL {
            let parent = self.core.node(cur).parent;
            if parent != NIL && self.prio(cur) < self.prio(parent) {
                return Err(corrupted("tr", "child priority below its parent's"));
            }
            cur = self.core.next_node(cur);
        }
        Ok(())
    }
}

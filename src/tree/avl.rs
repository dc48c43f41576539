// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Height-balanced (AVL) tree backend.
//!
//! Each node stores its balance factor `height(right) - height(left)` in
//! `{-1, 0, +1}`. Insertion walks upward and rotates at the first ancestor
//! that tips to ±2, which restores the pre-insert height — one single or
//! double rotation per insert. Removal keeps walking while subtree heights
//! shrink, so a single removal can cascade O(log n) rotations.

use super::core::{BstInsert, SortedTree, TreeCore, NIL, NodeId};
use crate::error::{corrupted, ReedResult};

/// Sorted map backed by a height-balanced tree.
///
/// ## Performance
/// - insert/get/remove: O(log n); height bound 1.44·log2(n)
/// - Flatter than the red-black tree, at the price of rotation cascades
///   on removal
#[derive(Debug)]
pub struct AvlMap<K, V> {
    core: TreeCore<K, V, i8>,
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Creates an empty height-balanced tree.
    pub fn new() -> Self {
        AvlMap {
            core: TreeCore::new(),
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

    fn bal(&self, id: NodeId) -> i8 {
        self.core.node(id).aux
    }

    fn set_bal(&mut self, id: NodeId, bal: i8) {
        self.core.node_mut(id).aux = bal;
    }

    /// Repairs a -2 node. Returns the subtree's new root and whether the
    /// subtree lost height (which decides if a removal cascade continues).
    fn fix_left_heavy(&mut self, p: NodeId) -> (NodeId, bool) {
        let l = self.core.node(p).left;
        let lb = self.bal(l);
        if lb <= 0 {
            self.core.rotate_right(p);
            if lb == 0 {
                self.set_bal(l, 1);
                self.set_bal(p, -1);
                (l, false)
            } else {
                self.set_bal(l, 0);
                self.set_bal(p, 0);
                (l, true)
            }
        } else {
            let lr = self.core.node(l).right;
            let lrb = self.bal(lr);
            self.core.rotate_left(l);
            self.core.rotate_right(p);
            self.set_bal(l, if lrb == 1 { -1 } else { 0 });
            self.set_bal(p, if lrb == -1 { 1 } else { 0 });
            self.set_bal(lr, 0);
            (lr, true)
        }
    }

    /// Repairs a +2 node; mirror of `fix_left_heavy`.
    fn fix_right_heavy(&mut self, p: NodeId) -> (NodeId, bool) {
        let r = self.core.node(p).right;
        let rb = self.bal(r);
        if rb >= 0 {
            self.core.rotate_left(p);
            if rb == 0 {
                self.set_bal(r, -1);
                self.set_bal(p, 1);
                (r, false)
            } else {
                self.set_bal(r, 0);
                self.set_bal(p, 0);
                (r, true)
            }
        } else {
            let rl = self.core.node(r).left;
            let rlb = self.bal(rl);
            self.core.rotate_right(r);
            self.core.rotate_left(p);
            self.set_bal(r, if rlb == -1 { 1 } else { 0 });
            self.set_bal(p, if rlb == 1 { -1 } else { 0 });
            self.set_bal(rl, 0);
            (rl, true)
        }
    }

    fn insert_fixup(&mut self, mut x: NodeId) {
        loop {
            let p = self.core.node(x).parent;
            if p == NIL {
                break;
            }
            let from_left = self.core.node(p).left == x;
            let b = self.bal(p) + if from_left { -1 } else { 1 };
            self.set_bal(p, b);
            match b {
                0 => break,
                -1 | 1 => x = p,
                -2 => {
                    self.fix_left_heavy(p);
                    break;
                }
                _ => {
                    self.fix_right_heavy(p);
                    break;
                }
            }
        }
    }

    /// Subtree height, checking the balance invariant and the stored factor.
    fn checked_height(&self, id: NodeId) -> ReedResult<i64> {
        if id == NIL {
            return Ok(0);
        }
        let n = self.core.node(id);
        let lh = self.checked_height(n.left)?;
        let rh = self.checked_height(n.right)?;
        let diff = rh - lh;
        if !(-1..=1).contains(&diff) {
            return Err(corrupted("hb", "subtree heights differ by more than one"));
        }
        if i64::from(n.aux) != diff {
            return Err(corrupted("hb", "stored balance factor is stale"));
        }
        Ok(1 + lh.max(rh))
    }
}

impl<K: Ord, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> SortedTree<K, V> for AvlMap<K, V> {
    type Aux = i8;
    const BACKEND: &'static str = "hb";
    const CURSOR_REMOVE: bool = false;

    fn core(&self) -> &TreeCore<K, V, i8> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TreeCore<K, V, i8> {
        &mut self.core
    }

    fn insert_node(&mut self, key: K, value: V) -> (NodeId, bool) {
        match self.core.insert_leaf(key, value, 0) {
            BstInsert::Existing(id) => (id, false),
            BstInsert::New(id) => {
                self.insert_fixup(id);
                (id, true)
            }
        }
    }

    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let target = self.core.pull_down(id);
        let (parent, _, was_left) = self.core.splice(target);
        let pair = self.core.release_entry(target);
        let mut p = parent;
        let mut from_left = was_left;
        while p != NIL {
            // Losing height on the left tips the factor rightward.
            let b = self.bal(p) + if from_left { 1 } else { -1 };
            self.set_bal(p, b);
            let (sub, shrunk) = match b {
                0 => (p, true),
                -1 | 1 => break,
                -2 => self.fix_left_heavy(p),
                _ => self.fix_right_heavy(p),
            };
            if !shrunk {
                break;
            }
            let np = self.core.node(sub).parent;
            if np == NIL {
                break;
            }
            from_left = self.core.node(np).left == sub;
            p = np;
        }
        pair
    }

    fn verify_aux(&self) -> ReedResult<()> {
        self.checked_height(self.core.root).map(|_| ())
    }
}

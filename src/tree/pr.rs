// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Path-reduction tree backend.
//!
//! Shares the weight-balanced node shape but rotates only when the rotation
//! strictly reduces the total internal path length: a single left rotation
//! when `weight(left) < weight(right.right)`, a right-left double rotation
//! when `weight(left) < weight(right.left)`, and the mirrored rules on the
//! other side. After a single rotation checking continues at the new parent;
//! after a double rotation both displaced nodes are re-checked. The
//! resulting invariant: no child's grandchild outweighs the opposite
//! sibling. Roughly 0.44·log2(n) rotations per insert and 0.42·log2(n) per
//! removal, amortised.
//!
//! Stored weights give O(log n) rank selection; cursor removal is offered.

use super::core::{BstInsert, SortedTree, TreeCore, NIL, NodeId};
use crate::error::{corrupted, ReedResult};

/// Sorted map backed by a path-reduction tree.
///
/// ## Performance
/// - insert/get/remove: O(log n) expected, fewer rotations than strict
///   weight balancing
/// - `select`: O(log n) via subtree weights
#[derive(Debug)]
pub struct PrMap<K, V> {
    core: TreeCore<K, V, u32>,
}

impl<K: Ord, V> PrMap<K, V> {
    /// Creates an empty path-reduction tree.
    pub fn new() -> Self {
        PrMap {
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

    fn wt(&self, id: NodeId) -> u32 {
        if id == NIL {
            1
        } else {
            self.core.node(id).aux
        }
    }

    fn children(&self, id: NodeId) -> (NodeId, NodeId) {
        let n = self.core.node(id);
        (n.left, n.right)
    }

    fn fix_weight(&mut self, id: NodeId) {
        let (l, r) = self.children(id);
        let w = self.wt(l) + self.wt(r);
        self.core.node_mut(id).aux = w;
    }

    /// Applies path-reducing rotations at this position until none fires,
    /// re-checking nodes a double rotation displaced. Returns the subtree
    /// root finally occupying the position. Each rotation strictly shrinks
    /// the total internal path length, so this terminates.
    fn reduce(&mut self, n: NodeId) -> NodeId {
        let mut top = n;
        loop {
            let (l, r) = self.children(top);
            let (wl, wr) = (self.wt(l), self.wt(r));
            if r != NIL && wl < self.wt(self.core.node(r).right) {
                self.core.rotate_left(top);
                self.fix_weight(top);
                self.fix_weight(r);
                self.reduce(top);
                top = r;
            } else if r != NIL && wl < self.wt(self.core.node(r).left) {
                let rl = self.core.node(r).left;
                self.core.rotate_right(r);
                self.core.rotate_left(top);
                self.fix_weight(top);
                self.fix_weight(r);
                self.fix_weight(rl);
                self.reduce(top);
                self.reduce(r);
                top = rl;
            } else if l != NIL && wr < self.wt(self.core.node(l).left) {
                self.core.rotate_right(top);
                self.fix_weight(top);
                self.fix_weight(l);
                self.reduce(top);
                top = l;
            } else if l != NIL && wr < self.wt(self.core.node(l).right) {
                let lr = self.core.node(l).right;
                self.core.rotate_left(l);
                self.core.rotate_right(top);
                self.fix_weight(top);
                self.fix_weight(l);
                self.fix_weight(lr);
                self.reduce(top);
                self.reduce(l);
                top = lr;
            } else {
                return top;
            }
        }
    }

    /// Subtree weight, checking stored weights and the reduction invariant.
    fn checked_weight(&self, id: NodeId) -> ReedResult<u32> {
        if id == NIL {
            return Ok(1);
        }
        let n = self.core.node(id);
        let wl = self.checked_weight(n.left)?;
        let wr = self.checked_weight(n.right)?;
        if n.aux != wl + wr {
            return Err(corrupted("pr", "stored weight is stale"));
        }
        if n.right != NIL {
            let r = self.core.node(n.right);
            if wl < self.wt(r.left) || wl < self.wt(r.right) {
                return Err(corrupted("pr", "right grandchild outweighs left sibling"));
            }
        }
        if n.left != NIL {
            let l = self.core.node(n.left);
            if wr < self.wt(l.left) || wr < self.wt(l.right) {
                return Err(corrupted("pr", "left grandchild outweighs right sibling"));
            }
        }
        Ok(wl + wr)
    }
}

impl<K: Ord, V> Default for PrMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> SortedTree<K, V> for PrMap<K, V> {
    type Aux = u32;
    const BACKEND: &'static str = "pr";
    const CURSOR_REMOVE: bool = true;

    fn core(&self) -> &TreeCore<K, V, u32> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TreeCore<K, V, u32> {
        &mut self.core
    }

    fn insert_node(&mut self, key: K, value: V) -> (NodeId, bool) {
        match self.core.insert_leaf(key, value, 2) {
            BstInsert::Existing(id) => (id, false),
            BstInsert::New(id) => {
                let mut x = self.core.node(id).parent;
                while x != NIL {
                    self.core.node_mut(x).aux += 1;
                    let top = self.reduce(x);
                    x = self.core.node(top).parent;
                }
                (id, true)
            }
        }
    }

    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let target = self.core.pull_down(id);
        let (parent, _, _) = self.core.splice(target);
        let pair = self.core.release_entry(target);
        let mut x = parent;
        while x != NIL {
            self.core.node_mut(x).aux -= 1;
            let top = self.reduce(x);
            x = self.core.node(top).parent;
        }
        pair
    }

    /// Weight-guided descent, identical to the weight-balanced rule.
    fn select_node(&self, rank: usize) -> NodeId {
        if rank >= self.core.len() {
            return NIL;
        }
        let mut n = self.core.root;
        let mut r = rank;
        loop {
            let wl = self.wt(self.core.node(n).left) as usize;
            if r + 1 == wl {
                return n;
            }
            if r + 1 < wl {
                n = self.core.node(n).left;
            } else {
                r -= wl;
                n = self.core.node(n).right;
            }
        }
    }

    fn verify_aux(&self) -> ReedResult<()> {
        let w = self.checked_weight(self.core.root)?;
        if self.core.root != NIL && w as usize != self.core.len() + 1 {
            return Err(corrupted("pr", "root weight does not match entry count"));
        }
        Ok(())
    }
}

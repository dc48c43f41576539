// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Splay tree backend.
//!
//! No structural invariant beyond search order: every mutating access moves
//! the touched node to the root through bottom-up zig, zig-zig and zig-zag
//! steps. The doubled steps are single combined restructurings updating all
//! six affected links in one pass, not two independent rotations. A failed
//! mutating lookup splays the last node on the walk; removal splays the
//! removed node's parent.
//!
//! Because accesses restructure, `get` is deliberately the non-splaying
//! lookup — shared references cannot reshape the tree. The amortised
//! move-to-root behaviour is reached through `get_mut` and cursor seeks.

use super::core::{BstInsert, SortedTree, TreeCore, NIL, NodeId};
use crate::error::ReedResult;

/// Sorted map backed by a splay tree.
///
/// ## Performance
/// - insert/get_mut/remove: O(log n) amortised, O(n) worst case
/// - Recently touched keys cluster near the root
#[derive(Debug)]
pub struct SplayMap<K, V> {
    core: TreeCore<K, V, ()>,
}

impl<K: Ord, V> SplayMap<K, V> {
    /// Creates an empty splay tree.
    pub fn new() -> Self {
        SplayMap {
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

    /// Reattaches `x` where the grandparent used to hang.
    fn attach(&mut self, x: NodeId, gg: NodeId, g_was_left: bool) {
        self.core.node_mut(x).parent = gg;
        if gg == NIL {
            self.core.root = x;
        } else if g_was_left {
            self.core.node_mut(gg).left = x;
        } else {
            self.core.node_mut(gg).right = x;
        }
    }

    /// Combined zig-zig: x and parent hang on the same side.
    fn zig_zig(&mut self, x: NodeId, p: NodeId, g: NodeId, left_side: bool) {
        let gg = self.core.node(g).parent;
        let g_was_left = gg != NIL && self.core.node(gg).left == g;
        if left_side {
            let b = self.core.node(x).right;
            let c = self.core.node(p).right;
            self.core.node_mut(p).left = b;
            if b != NIL {
                self.core.node_mut(b).parent = p;
            }
            self.core.node_mut(g).left = c;
            if c != NIL {
                self.core.node_mut(c).parent = g;
            }
            self.core.node_mut(x).right = p;
            self.core.node_mut(p).parent = x;
            self.core.node_mut(p).right = g;
            self.core.node_mut(g).parent = p;
        } else {
            let b = self.core.node(x).left;
            let c = self.core.node(p).left;
            self.core.node_mut(p).right = b;
            if b != NIL {
                self.core.node_mut(b).parent = p;
            }
            self.core.node_mut(g).right = c;
            if c != NIL {
                self.core.node_mut(c).parent = g;
            }
            self.core.node_mut(x).left = p;
            self.core.node_mut(p).parent = x;
            self.core.node_mut(p).left = g;
            self.core.node_mut(g).parent = p;
        }
        self.attach(x, gg, g_was_left);
    }

    /// Combined zig-zag: x and parent hang on opposite sides.
    fn zig_zag(&mut self, x: NodeId, p: NodeId, g: NodeId, p_was_left: bool) {
        let gg = self.core.node(g).parent;
        let g_was_left = gg != NIL && self.core.node(gg).left == g;
        let a = self.core.node(x).left;
        let b = self.core.node(x).right;
        if p_was_left {
            self.core.node_mut(p).right = a;
            if a != NIL {
                self.core.node_mut(a).parent = p;
            }
            self.core.node_mut(g).left = b;
            if b != NIL {
                self.core.node_mut(b).parent = g;
            }
            self.core.node_mut(x).left = p;
            self.core.node_mut(p).parent = x;
            self.core.node_mut(x).right = g;
            self.core.node_mut(g).parent = x;
        } else {
            self.core.node_mut(p).left = b;
            if b != NIL {
                self.core.node_mut(b).parent = p;
            }
            self.core.node_mut(g).right = a;
            if a != NIL {
                self.core.node_mut(a).parent = g;
            }
            self.core.node_mut(x).right = p;
            self.core.node_mut(p).parent = x;
            self.core.node_mut(x).left = g;
            self.core.node_mut(g).parent = x;
        }
        self.attach(x, gg, g_was_left);
    }

    /// Moves `x` to the root.
    fn splay(&mut self, x: NodeId) {
        loop {
            let p = self.core.node(x).parent;
            if p == NIL {
                return;
            }
            let g = self.core.node(p).parent;
            if g == NIL {
                if self.core.node(p).left == x {
                    self.core.rotate_right(p);
                } else {
                    self.core.rotate_left(p);
                }
                return;
            }
            let x_left = self.core.node(p).left == x;
            let p_left = self.core.node(g).left == p;
            if x_left == p_left {
                self.zig_zig(x, p, g, p_left);
            } else {
                self.zig_zag(x, p, g, p_left);
            }
        }
    }
}

impl<K: Ord, V> Default for SplayMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> SortedTree<K, V> for SplayMap<K, V> {
    type Aux = ();
    const BACKEND: &'static str = "sp";
    const CURSOR_REMOVE: bool = true;

    fn core(&self) -> &TreeCore<K, V, ()> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TreeCore<K, V, ()> {
        &mut self.core
    }

    fn insert_node(&mut self, key: K, value: V) -> (NodeId, bool) {
        let (id, inserted) = match self.core.insert_leaf(key, value, ()) {
            BstInsert::Existing(id) => (id, false),
            BstInsert::New(id) => (id, true),
        };
        self.splay(id);
        (id, inserted)
    }

    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let target = self.core.pull_down(id);
        let (parent, _, _) = self.core.splice(target);
        let pair = self.core.release_entry(target);
        if parent != NIL {
            self.splay(parent);
        }
        pair
    }

    fn remove_key(&mut self, key: &K) -> Option<(K, V)> {
        let (found, last) = self.core.search_path(key);
        if found == NIL {
            if last != NIL {
                self.splay(last);
            }
            None
        } else {
            Some(self.remove_node(found))
        }
    }

    fn touch(&mut self, key: &K) -> NodeId {
        let (found, last) = self.core.search_path(key);
        if found != NIL {
            self.splay(found);
        } else if last != NIL {
            self.splay(last);
        }
        found
    }

    fn verify_aux(&self) -> ReedResult<()> {
        Ok(())
    }
}

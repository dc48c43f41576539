// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Shared cursor engine for the tree backends.
//!
//! One cursor type serves all six trees: it stores the current node handle
//! and walks with the skeleton's parent-link successor/predecessor. Seeks go
//! through the variant's `touch`, so splay-tree cursor seeks restructure the
//! way direct accesses do. Removal is gated by the variant's capability flag
//! and leaves the cursor invalid.

use super::core::{SortedTree, NIL, NodeId};
use crate::error::{not_supported, ReedResult};
use crate::map::cursor::{compare_keys, Cursor};
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Cursor over a tree backend, holding the map borrow and a node handle.
pub(crate) struct TreeCursor<'a, K: Ord, V, T: SortedTree<K, V>> {
    map: &'a mut T,
    node: NodeId,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<'a, K: Ord, V, T: SortedTree<K, V>> TreeCursor<'a, K, V, T> {
    pub(crate) fn new(map: &'a mut T) -> Self {
        TreeCursor {
            map,
            node: NIL,
            _entry: PhantomData,
        }
    }

    fn settle(&mut self, id: NodeId) -> bool {
        self.node = id;
        self.node != NIL
    }
}

impl<'a, K: Ord, V, T: SortedTree<K, V>> Cursor<K, V> for TreeCursor<'a, K, V, T> {
    fn backend(&self) -> &'static str {
        T::BACKEND
    }

    fn valid(&self) -> bool {
        self.node != NIL
    }

    fn invalidate(&mut self) {
        self.node = NIL;
    }

    fn first(&mut self) -> bool {
        let id = self.map.core().first();
        self.settle(id)
    }

    fn last(&mut self) -> bool {
        let id = self.map.core().last();
        self.settle(id)
    }

    fn next(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let id = self.map.core().next_node(self.node);
        self.settle(id)
    }

    fn prev(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let id = self.map.core().prev_node(self.node);
        self.settle(id)
    }

    fn seek(&mut self, key: &K) -> bool {
        let id = self.map.touch(key);
        self.settle(id)
    }

    fn seek_le(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.core().search_le(key);
        Ok(self.settle(id))
    }

    fn seek_lt(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.core().search_lt(key);
        Ok(self.settle(id))
    }

    fn seek_ge(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.core().search_ge(key);
        Ok(self.settle(id))
    }

    fn seek_gt(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.core().search_gt(key);
        Ok(self.settle(id))
    }

    fn key(&self) -> Option<&K> {
        if self.node == NIL {
            None
        } else {
            Some(&self.map.core().node(self.node).key)
        }
    }

    fn value(&self) -> Option<&V> {
        if self.node == NIL {
            None
        } else {
            Some(&self.map.core().node(self.node).value)
        }
    }

    fn value_mut(&mut self) -> Option<&mut V> {
        if self.node == NIL {
            None
        } else {
            Some(&mut self.map.core_mut().node_mut(self.node).value)
        }
    }

    fn remove(&mut self) -> ReedResult<Option<(K, V)>> {
        if !T::CURSOR_REMOVE {
            return Err(not_supported("remove", T::BACKEND));
        }
        if self.node == NIL {
            return Ok(None);
        }
        let id = self.node;
        self.node = NIL;
        Ok(Some(self.map.remove_node(id)))
    }

    fn compare(&self, other: &dyn Cursor<K, V>) -> ReedResult<Ordering> {
        Ok(compare_keys(self.key(), other.key()))
    }
}

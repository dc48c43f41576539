// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Skiplist backend.
//!
//! Level 0 is the sorted doubly-linked list of every entry (forward links
//! plus a `prev` pointer for reverse iteration); each higher level is a
//! random sub-sequence. A node's tower height is drawn geometrically with
//! p = 1/4, bounded by the configured maximum level. The head sentinel is a
//! plain array of forward slots; `top_level` tracks the highest populated
//! level and shrinks when its last tower goes.
//!
//! Insert and remove descend the levels once, collecting the rightmost
//! predecessor per level in an update array, then splice. Closest-neighbour
//! queries fall out of the same descent. Cursor removal is offered and
//! re-searches by the stored key.

use crate::error::{corrupted, ReedResult};
use crate::map::cursor::{compare_keys, Cursor};
use crate::map::{InsertOutcome, Map};
use crate::tree::core::{Arena, NIL, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;


/// Default tower bound; enough for tens of millions of entries at p = 1/4.
pub const DEFAULT_MAX_LEVEL: usize = 16;

#[derive(Debug)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    prev: NodeId,
    links: Vec<NodeId>,
}

/// Sorted map backed by a skiplist.
///
/// ## Performance
/// - insert/get/remove: O(log n) expected
/// - Forward and backward iteration are O(1) per step
///
/// ## Example
/// ```rust
/// use reedmap::map::Map;
/// use reedmap::skiplist::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert(2, "b");
/// map.insert(1, "a");
/// assert_eq!(map.get_ge(&2).unwrap(), Some((&2, &"b")));
/// ```
#[derive(Debug)]
pub struct SkipMap<K, V> {
    arena: Arena<SkipNode<K, V>>,
    head: Vec<NodeId>,
    top: usize,
    max_level: usize,
    rng: StdRng,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Creates a skiplist with the default maximum level.
    pub fn new() -> Self {
        Self::with_max_level(DEFAULT_MAX_LEVEL)
    }

    /// Creates a skiplist with a custom tower bound (at least 1).
    pub fn with_max_level(max_level: usize) -> Self {
        let max_level = max_level.max(1);
        SkipMap {
            arena: Arena::new(),
            head: vec![NIL; max_level],
            top: 0,
            max_level,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a skiplist with a deterministic level source.
    pub fn with_seed(seed: u64) -> Self {
        let mut map = Self::new();
        map.rng = StdRng::seed_from_u64(seed);
        map
    }

    /// Highest populated level; 0 when empty.
    pub fn top_level(&self) -> usize {
        self.top
    }

    /// Configured tower bound.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    fn fwd(&self, node: NodeId, level: usize) -> NodeId {
        if node == NIL {
            self.head[level]
        } else {
            self.arena.get(node).links[level]
        }
    }

    fn set_fwd(&mut self, node: NodeId, level: usize, target: NodeId) {
        if node == NIL {
            self.head[level] = target;
        } else {
            self.arena.get_mut(node).links[level] = target;
        }
    }

    /// Geometric tower height with p = 1/4, in `1..=max_level`.
    fn random_level(&mut self) -> usize {
        let r: u32 = self.rng.gen();
        ((r.trailing_zeros() / 2) as usize + 1).min(self.max_level)
    }

    /// Level descent with `<`, collecting the rightmost strict predecessor
    /// per level. `update[level]` is `NIL` for the head sentinel.
    fn find_update(&self, key: &K) -> (Vec<NodeId>, NodeId) {
        let mut update = vec![NIL; self.max_level];
        let mut cur = NIL;
        for level in (0..self.top).rev() {
            loop {
                let next = self.fwd(cur, level);
                if next != NIL && self.arena.get(next).key < *key {
                    cur = next;
                } else {
                    break;
                }
            }
            update[level] = cur;
        }
        (update, cur)
    }

    /// Last node with key ≤ (`strict` = false) or < (`strict` = true) the
    /// target; `NIL` when none.
    fn lower_bound(&self, key: &K, strict: bool) -> NodeId {
        let mut cur = NIL;
        for level in (0..self.top).rev() {
            loop {
                let next = self.fwd(cur, level);
                if next == NIL {
                    break;
                }
                let next_key = &self.arena.get(next).key;
                let advance = if strict {
                    *next_key < *key
                } else {
                    *next_key <= *key
                };
                if advance {
                    cur = next;
                } else {
                    break;
                }
            }
        }
        cur
    }

    fn search(&self, key: &K) -> NodeId {
        let pred = self.lower_bound(key, true);
        let next = self.fwd(pred, 0);
        if next != NIL && self.arena.get(next).key == *key {
            next
        } else {
            NIL
        }
    }

    fn first_node(&self) -> NodeId {
        self.head[0]
    }

    fn last_node(&self) -> NodeId {
        let mut cur = NIL;
        for level in (0..self.top).rev() {
            loop {
                let next = self.fwd(cur, level);
                if next == NIL {
                    break;
                }
                cur = next;
            }
        }
        cur
    }

    fn entry_at(&self, id: NodeId) -> Option<(&K, &V)> {
        if id == NIL {
            None
        } else {
            let n = self.arena.get(id);
            Some((&n.key, &n.value))
        }
    }

    /// Unlinks a found node given its update array, fixes `prev` links and
    /// shrinks the populated level range.
    fn unlink(&mut self, update: &[NodeId], target: NodeId) -> (K, V) {
        let levels = self.arena.get(target).links.len();
        for level in 0..levels {
            if self.fwd(update[level], level) == target {
                let next = self.arena.get(target).links[level];
                self.set_fwd(update[level], level, next);
            }
        }
        let node = self.arena.release(target);
        if node.links[0] != NIL {
            self.arena.get_mut(node.links[0]).prev = node.prev;
        }
        while self.top > 0 && self.head[self.top - 1] == NIL {
            self.top -= 1;
        }
        (node.key, node.value)
    }

    /// Removes the entry a cursor rests on, re-searching by its stored key.
    fn remove_at(&mut self, id: NodeId) -> (K, V) {
        let (update, _) = {
            let key = &self.arena.get(id).key;
            self.find_update(key)
        };
        self.unlink(&update, id)
    }
}

impl<K: Ord, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Map<K, V> for SkipMap<K, V> {
    fn backend(&self) -> &'static str {
        "skiplist"
    }

    fn is_sorted(&self) -> bool {
        true
    }

    fn len(&self) -> usize {
        self.arena.live()
    }

    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        let (update, pred) = self.find_update(&key);
        let next = self.fwd(pred, 0);
        if next != NIL && self.arena.get(next).key == key {
            return InsertOutcome {
                slot: &mut self.arena.get_mut(next).value,
                inserted: false,
            };
        }
        let levels = self.random_level();
        let id = self.arena.alloc(SkipNode {
            key,
            value,
            prev: pred,
            links: vec![NIL; levels],
        });
        for level in 0..levels {
            let before = update[level];
            let after = self.fwd(before, level);
            self.arena.get_mut(id).links[level] = after;
            self.set_fwd(before, level, id);
        }
        let successor = self.arena.get(id).links[0];
        if successor != NIL {
            self.arena.get_mut(successor).prev = id;
        }
        if levels > self.top {
            self.top = levels;
        }
        InsertOutcome {
            slot: &mut self.arena.get_mut(id).value,
            inserted: true,
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        let id = self.search(key);
        if id == NIL {
            None
        } else {
            Some(&self.arena.get(id).value)
        }
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.search(key);
        if id == NIL {
            None
        } else {
            Some(&mut self.arena.get_mut(id).value)
        }
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let (update, pred) = self.find_update(key);
        let target = self.fwd(pred, 0);
        if target == NIL || self.arena.get(target).key != *key {
            return None;
        }
        Some(self.unlink(&update, target))
    }

    fn clear(&mut self) -> usize {
        self.head = vec![NIL; self.max_level];
        self.top = 0;
        self.arena.clear()
    }

    fn traverse(&self, visit: &mut dyn FnMut(&K, &V) -> bool) -> usize {
        let mut visited = 0;
        let mut cur = self.first_node();
        while cur != NIL {
            visited += 1;
            let n = self.arena.get(cur);
            if !visit(&n.key, &n.value) {
                break;
            }
            cur = n.links[0];
        }
        visited
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        let mut cur = self.first_node();
        Box::new(std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let n = self.arena.get(cur);
            cur = n.links[0];
            Some((&n.key, &n.value))
        }))
    }

    fn verify(&self) -> ReedResult<()> {
        if self.top > self.max_level {
            return Err(corrupted("skiplist", "top level exceeds the maximum"));
        }
        for level in self.top..self.max_level {
            if self.head[level] != NIL {
                return Err(corrupted("skiplist", "populated level above top_level"));
            }
        }
        if self.top > 0 && self.head[self.top - 1] == NIL {
            return Err(corrupted("skiplist", "top_level not shrunk to fit"));
        }
        // Level 0: strictly ascending, prev links mirror forward links.
        let mut count = 0usize;
        let mut prev = NIL;
        let mut cur = self.head[0];
        while cur != NIL {
            count += 1;
            let n = self.arena.get(cur);
            if n.links.is_empty() || n.links.len() > self.max_level {
                return Err(corrupted("skiplist", "tower height out of range"));
            }
            if n.prev != prev {
                return Err(corrupted("skiplist", "prev link does not match list order"));
            }
            if prev != NIL && self.arena.get(prev).key >= n.key {
                return Err(corrupted("skiplist", "level 0 is not strictly ascending"));
            }
            prev = cur;
            cur = n.links[0];
        }
        if count != self.arena.live() {
            return Err(corrupted("skiplist", "entry count does not match level 0"));
        }
        // Higher levels: sub-sequences landing on towers of enough height.
        for level in 1..self.top {
            let mut cur = self.head[level];
            while cur != NIL {
                let n = self.arena.get(cur);
                if n.links.len() <= level {
                    return Err(corrupted("skiplist", "link lands on a shorter tower"));
                }
                cur = n.links[level];
            }
        }
        Ok(())
    }

    fn get_le(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        Ok(self.entry_at(self.lower_bound(key, false)))
    }

    fn get_lt(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        Ok(self.entry_at(self.lower_bound(key, true)))
    }

    fn get_ge(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let pred = self.lower_bound(key, true);
        Ok(self.entry_at(self.fwd(pred, 0)))
    }

    fn get_gt(&self, key: &K) -> ReedResult<Option<(&K, &V)>> {
        let pred = self.lower_bound(key, false);
        Ok(self.entry_at(self.fwd(pred, 0)))
    }

    fn select(&self, rank: usize) -> ReedResult<Option<(&K, &V)>> {
        let len = self.len();
        if rank >= len {
            return Ok(None);
        }
        let id = if rank <= len / 2 {
            let mut cur = self.first_node();
            for _ in 0..rank {
                cur = self.arena.get(cur).links[0];
            }
            cur
        } else {
            let mut cur = self.last_node();
            for _ in 0..(len - 1 - rank) {
                cur = self.arena.get(cur).prev;
            }
            cur
        };
        Ok(self.entry_at(id))
    }

    fn min(&self) -> ReedResult<Option<(&K, &V)>> {
        Ok(self.entry_at(self.first_node()))
    }

    fn max(&self) -> ReedResult<Option<(&K, &V)>> {
        Ok(self.entry_at(self.last_node()))
    }

    fn cursor(&mut self) -> Box<dyn Cursor<K, V> + '_> {
        Box::new(SkipCursor {
            map: self,
            node: NIL,
        })
    }
}

/// Cursor over a skiplist.
struct SkipCursor<'a, K, V> {
    map: &'a mut SkipMap<K, V>,
    node: NodeId,
}

impl<'a, K: Ord, V> SkipCursor<'a, K, V> {
    fn settle(&mut self, id: NodeId) -> bool {
        self.node = id;
        self.node != NIL
    }
}

impl<'a, K: Ord, V> Cursor<K, V> for SkipCursor<'a, K, V> {
    fn backend(&self) -> &'static str {
        "skiplist"
    }

    fn valid(&self) -> bool {
        self.node != NIL
    }

    fn invalidate(&mut self) {
        self.node = NIL;
    }

    fn first(&mut self) -> bool {
        let id = self.map.first_node();
        self.settle(id)
    }

    fn last(&mut self) -> bool {
        let id = self.map.last_node();
        self.settle(id)
    }

    fn next(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let id = self.map.arena.get(self.node).links[0];
        self.settle(id)
    }

    fn prev(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let id = self.map.arena.get(self.node).prev;
        self.settle(id)
    }

    fn seek(&mut self, key: &K) -> bool {
        let id = self.map.search(key);
        self.settle(id)
    }

    fn seek_le(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.lower_bound(key, false);
        Ok(self.settle(id))
    }

    fn seek_lt(&mut self, key: &K) -> ReedResult<bool> {
        let id = self.map.lower_bound(key, true);
        Ok(self.settle(id))
    }

    fn seek_ge(&mut self, key: &K) -> ReedResult<bool> {
        let pred = self.map.lower_bound(key, true);
        let id = self.map.fwd(pred, 0);
        Ok(self.settle(id))
    }

    fn seek_gt(&mut self, key: &K) -> ReedResult<bool> {
        let pred = self.map.lower_bound(key, false);
        let id = self.map.fwd(pred, 0);
        Ok(self.settle(id))
    }

    fn key(&self) -> Option<&K> {
        if self.node == NIL {
            None
        } else {
            Some(&self.map.arena.get(self.node).key)
        }
    }

    fn value(&self) -> Option<&V> {
        if self.node == NIL {
            None
        } else {
            Some(&self.map.arena.get(self.node).value)
        }
    }

    fn value_mut(&mut self) -> Option<&mut V> {
        if self.node == NIL {
            None
        } else {
            Some(&mut self.map.arena.get_mut(self.node).value)
        }
    }

    fn remove(&mut self) -> ReedResult<Option<(K, V)>> {
        if self.node == NIL {
            return Ok(None);
        }
        let id = self.node;
        self.node = NIL;
        Ok(Some(self.map.remove_at(id)))
    }

    fn compare(&self, other: &dyn Cursor<K, V>) -> ReedResult<Ordering> {
        Ok(compare_keys(self.key(), other.key()))
    }
}

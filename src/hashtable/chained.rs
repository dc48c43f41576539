// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Chained hash table with hash-sorted buckets.
//!
//! A fixed bucket array indexed by `hash mod buckets`; within a bucket,
//! nodes form a singly-linked chain ordered by stored hash ascending, with
//! key order breaking ties. Insertion walks a chain until the first node
//! not below the new `(hash, key)` pair and either reuses the match or
//! splices in front of it, so lookups can stop as soon as the stored hash
//! overshoots. There is no automatic resize; `resize` rebuilds the bucket
//! array on request and rejects targets below the live entry count.

use super::slot_hash;
use crate::error::{corrupted, ReedError, ReedResult};
use crate::map::cursor::Cursor;
use crate::map::{InsertOutcome, Map};
use crate::tree::core::{Arena, NIL, NodeId};
use std::cmp::Ordering;

/// Default bucket count for plain construction.
pub const DEFAULT_BUCKETS: usize = 11;

#[derive(Debug)]
struct ChainNode<K, V> {
    hash: u32,
    key: K,
    value: V,
    next: NodeId,
}

/// Unsorted map backed by a chained hash table.
///
/// ## Performance
/// - insert/get/remove: O(1 + chain length); chains stay short while the
///   caller keeps the bucket count near the entry count via `resize`
///
/// ## Example
/// ```rust
/// use reedmap::hashtable::ChainHashMap;
/// use reedmap::keys::fnv1a_32;
/// use reedmap::map::Map;
///
/// fn hash(key: &&str) -> u32 {
///     fnv1a_32(key)
/// }
///
/// let mut map = ChainHashMap::new(hash);
/// map.insert("a", 1);
/// assert_eq!(map.get(&"a"), Some(&1));
/// ```
#[derive(Debug)]
pub struct ChainHashMap<K, V> {
    arena: Arena<ChainNode<K, V>>,
    buckets: Vec<NodeId>,
    hash_fn: fn(&K) -> u32,
}

impl<K: Ord, V> ChainHashMap<K, V> {
    /// Creates a table with the default bucket count.
    pub fn new(hash_fn: fn(&K) -> u32) -> Self {
        Self::with_buckets(hash_fn, DEFAULT_BUCKETS)
    }

    /// Creates a table with a custom bucket count (at least 1).
    pub fn with_buckets(hash_fn: fn(&K) -> u32, buckets: usize) -> Self {
        ChainHashMap {
            arena: Arena::new(),
            buckets: vec![NIL; buckets.max(1)],
            hash_fn,
        }
    }

    /// Current bucket count.
    pub fn buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Live entries divided by bucket count.
    pub fn load_factor(&self) -> f64 {
        self.arena.live() as f64 / self.buckets.len() as f64
    }

    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    /// Chain position for `(hash, key)`: the predecessor (or `NIL` for the
    /// bucket head) and the first node at or past the pair.
    fn chain_position(&self, hash: u32, key: &K) -> (usize, NodeId, NodeId, bool) {
        let bucket = self.bucket_of(hash);
        let mut prev = NIL;
        let mut cur = self.buckets[bucket];
        while cur != NIL {
            let n = self.arena.get(cur);
            let order = n.hash.cmp(&hash).then_with(|| n.key.cmp(key));
            match order {
                Ordering::Less => {
                    prev = cur;
                    cur = n.next;
                }
                Ordering::Equal => return (bucket, prev, cur, true),
                Ordering::Greater => break,
            }
        }
        (bucket, prev, cur, false)
    }

    fn search(&self, key: &K) -> NodeId {
        let hash = slot_hash((self.hash_fn)(key));
        let (_, _, node, matched) = self.chain_position(hash, key);
        if matched {
            node
        } else {
            NIL
        }
    }

    /// Re-splices an existing node into the rebuilt bucket array, keeping
    /// chains sorted by `(hash, key)`.
    fn replace_node(&mut self, id: NodeId) {
        let hash = self.arena.get(id).hash;
        let bucket = self.bucket_of(hash);
        let mut prev = NIL;
        let mut cur = self.buckets[bucket];
        loop {
            if cur == NIL {
                break;
            }
            let n = self.arena.get(cur);
            let before = n.hash < hash
                || (n.hash == hash && n.key < self.arena.get(id).key);
            if before {
                prev = cur;
                cur = n.next;
            } else {
                break;
            }
        }
        self.arena.get_mut(id).next = cur;
        if prev == NIL {
            self.buckets[bucket] = id;
        } else {
            self.arena.get_mut(prev).next = id;
        }
    }

    /// Rebuilds the bucket array at a new count.
    ///
    /// ## Input
    /// - `buckets`: Requested bucket count
    ///
    /// ## Output
    /// - `Ok(())` after rebuilding
    /// - `Err(InvalidResize)` when the target is below the live entry count
    ///   (or zero); the table is unchanged
    ///
    /// ## Performance
    /// - O(n + buckets) rebuild, re-splicing every node
    pub fn resize(&mut self, buckets: usize) -> ReedResult<()> {
        let minimum = self.arena.live().max(1);
        if buckets < minimum {
            return Err(ReedError::InvalidResize {
                backend: "hashtable".to_string(),
                requested: buckets,
                minimum,
            });
        }
        let mut ids = Vec::with_capacity(self.arena.live());
        for head in &self.buckets {
            let mut cur = *head;
            while cur != NIL {
                ids.push(cur);
                cur = self.arena.get(cur).next;
            }
        }
        self.buckets = vec![NIL; buckets];
        for id in ids {
            self.replace_node(id);
        }
        Ok(())
    }

    /// First occupied slot at or after `bucket`, with its head node.
    fn scan_from(&self, bucket: usize) -> (usize, NodeId) {
        for b in bucket..self.buckets.len() {
            if self.buckets[b] != NIL {
                return (b, self.buckets[b]);
            }
        }
        (self.buckets.len(), NIL)
    }

    /// Last node of the last occupied slot before `bucket`.
    fn scan_back(&self, bucket: usize) -> (usize, NodeId) {
        for b in (0..bucket).rev() {
            let mut cur = self.buckets[b];
            if cur == NIL {
                continue;
            }
            while self.arena.get(cur).next != NIL {
                cur = self.arena.get(cur).next;
            }
            return (b, cur);
        }
        (self.buckets.len(), NIL)
    }

    /// Predecessor of a node within its own chain, `NIL` when it heads it.
    fn chain_prev(&self, bucket: usize, id: NodeId) -> NodeId {
        let mut prev = NIL;
        let mut cur = self.buckets[bucket];
        while cur != id {
            prev = cur;
            cur = self.arena.get(cur).next;
        }
        prev
    }
}

impl<K: Ord, V> Map<K, V> for ChainHashMap<K, V> {
    fn backend(&self) -> &'static str {
        "hashtable"
    }

    fn is_sorted(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.arena.live()
    }

    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        let hash = slot_hash((self.hash_fn)(&key));
        let (bucket, prev, cur, matched) = self.chain_position(hash, &key);
        if matched {
            return InsertOutcome {
                slot: &mut self.arena.get_mut(cur).value,
                inserted: false,
            };
        }
        let id = self.arena.alloc(ChainNode {
            hash,
            key,
            value,
            next: cur,
        });
        if prev == NIL {
            self.buckets[bucket] = id;
        } else {
            self.arena.get_mut(prev).next = id;
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
        let hash = slot_hash((self.hash_fn)(key));
        let (bucket, prev, cur, matched) = self.chain_position(hash, key);
        if !matched {
            return None;
        }
        let next = self.arena.get(cur).next;
        if prev == NIL {
            self.buckets[bucket] = next;
        } else {
            self.arena.get_mut(prev).next = next;
        }
        let node = self.arena.release(cur);
        Some((node.key, node.value))
    }

    fn clear(&mut self) -> usize {
        for head in self.buckets.iter_mut() {
            *head = NIL;
        }
        self.arena.clear()
    }

    fn traverse(&self, visit: &mut dyn FnMut(&K, &V) -> bool) -> usize {
        let mut visited = 0;
        let (mut bucket, mut cur) = self.scan_from(0);
        while cur != NIL {
            visited += 1;
            let n = self.arena.get(cur);
            if !visit(&n.key, &n.value) {
                break;
            }
            if n.next != NIL {
                cur = n.next;
            } else {
                let scanned = self.scan_from(bucket + 1);
                bucket = scanned.0;
                cur = scanned.1;
            }
        }
        visited
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        let (mut bucket, mut cur) = self.scan_from(0);
        Box::new(std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let n = self.arena.get(cur);
            if n.next != NIL {
                cur = n.next;
            } else {
                let scanned = self.scan_from(bucket + 1);
                bucket = scanned.0;
                cur = scanned.1;
            }
            Some((&n.key, &n.value))
        }))
    }

    fn verify(&self) -> ReedResult<()> {
        let mut counted = 0usize;
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            let mut prev = NIL;
            while cur != NIL {
                counted += 1;
                let n = self.arena.get(cur);
                if n.hash == 0 {
                    return Err(corrupted("hashtable", "stored hash uses the absent sentinel"));
                }
                if n.hash != slot_hash((self.hash_fn)(&n.key)) {
                    return Err(corrupted("hashtable", "stored hash is stale"));
                }
                if self.bucket_of(n.hash) != bucket {
                    return Err(corrupted("hashtable", "node filed in the wrong bucket"));
                }
                if prev != NIL {
                    let p = self.arena.get(prev);
                    let order = p.hash.cmp(&n.hash).then_with(|| p.key.cmp(&n.key));
                    if order != Ordering::Less {
                        return Err(corrupted("hashtable", "chain not sorted by hash and key"));
                    }
                }
                prev = cur;
                cur = n.next;
            }
        }
        if counted != self.arena.live() {
            return Err(corrupted("hashtable", "entry count does not match chains"));
        }
        Ok(())
    }

    fn cursor(&mut self) -> Box<dyn Cursor<K, V> + '_> {
        Box::new(ChainCursor {
            map: self,
            bucket: 0,
            node: NIL,
        })
    }
}

/// Cursor over a chained table in `(bucket, chain position)` order.
struct ChainCursor<'a, K, V> {
    map: &'a mut ChainHashMap<K, V>,
    bucket: usize,
    node: NodeId,
}

impl<'a, K: Ord, V> Cursor<K, V> for ChainCursor<'a, K, V> {
    fn backend(&self) -> &'static str {
        "hashtable"
    }

    fn valid(&self) -> bool {
        self.node != NIL
    }

    fn invalidate(&mut self) {
        self.node = NIL;
    }

    fn first(&mut self) -> bool {
        let (bucket, node) = self.map.scan_from(0);
        self.bucket = bucket;
        self.node = node;
        self.node != NIL
    }

    fn last(&mut self) -> bool {
        let (bucket, node) = self.map.scan_back(self.map.buckets.len());
        self.bucket = bucket;
        self.node = node;
        self.node != NIL
    }

    fn next(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let next = self.map.arena.get(self.node).next;
        if next != NIL {
            self.node = next;
        } else {
            let (bucket, node) = self.map.scan_from(self.bucket + 1);
            self.bucket = bucket;
            self.node = node;
        }
        self.node != NIL
    }

    fn prev(&mut self) -> bool {
        if self.node == NIL {
            return false;
        }
        let before = self.map.chain_prev(self.bucket, self.node);
        if before != NIL {
            self.node = before;
        } else {
            let (bucket, node) = self.map.scan_back(self.bucket);
            self.bucket = bucket;
            self.node = node;
        }
        self.node != NIL
    }

    fn seek(&mut self, key: &K) -> bool {
        let hash = slot_hash((self.map.hash_fn)(key));
        let (bucket, _, node, matched) = self.map.chain_position(hash, key);
        if matched {
            self.bucket = bucket;
            self.node = node;
            true
        } else {
            self.node = NIL;
            false
        }
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
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Open-addressing hash table with linear probing.
//!
//! A flat cell array where a cell's stored hash is 0 exactly when it is
//! empty (computed hashes of 0 remap to `!0`). Insertion probes linearly
//! from `hash mod size` for either an empty cell or a matching entry, and
//! grows through the prime table whenever the load factor would reach 2/3.
//!
//! Removal is the delicate operation: after emptying the cell, every entry
//! in the following cluster — up to the first hole — is lifted out and
//! re-inserted, which keeps every probe chain unbroken without tombstones.
//! Cursor removal runs the same repair and invalidates the cursor.

use super::primes::prime_geq;
use super::slot_hash;
use crate::error::{corrupted, ReedError, ReedResult};
use crate::map::cursor::Cursor;
use crate::map::{InsertOutcome, Map};

/// Default cell count for plain construction.
pub const DEFAULT_CELLS: usize = 11;

#[derive(Debug)]
struct ProbeCell<K, V> {
    hash: u32,
    key: K,
    value: V,
}

/// Unsorted map backed by a linear-probed open-addressing table.
///
/// ## Performance
/// - insert/get/remove: O(1) expected while the load factor stays below
///   2/3, which growth enforces
/// - Removal pays O(cluster length) for the probe chain repair
#[derive(Debug)]
pub struct ProbeHashMap<K, V> {
    cells: Vec<Option<ProbeCell<K, V>>>,
    live: usize,
    hash_fn: fn(&K) -> u32,
}

impl<K: Ord, V> ProbeHashMap<K, V> {
    /// Creates a table with the default cell count.
    pub fn new(hash_fn: fn(&K) -> u32) -> Self {
        Self::with_cells(hash_fn, DEFAULT_CELLS)
    }

    /// Creates a table with a custom cell count (at least 1).
    pub fn with_cells(hash_fn: fn(&K) -> u32, cells: usize) -> Self {
        let mut table = ProbeHashMap {
            cells: Vec::new(),
            live: 0,
            hash_fn,
        };
        table.cells.resize_with(cells.max(1), || None);
        table
    }

    /// Current cell count.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Live entries divided by cell count.
    pub fn load_factor(&self) -> f64 {
        self.live as f64 / self.cells.len() as f64
    }

    /// Probes for the key; `None` on a hole or a fruitless full circle.
    fn find_index(&self, key: &K, hash: u32) -> Option<usize> {
        let size = self.cells.len();
        let mut index = hash as usize % size;
        for _ in 0..size {
            match &self.cells[index] {
                None => return None,
                Some(cell) => {
                    if cell.hash == hash && cell.key == *key {
                        return Some(index);
                    }
                }
            }
            index = (index + 1) % size;
        }
        None
    }

    /// Drops a cell into the first free slot on its probe chain.
    fn place(&mut self, cell: ProbeCell<K, V>) {
        let size = self.cells.len();
        let mut index = cell.hash as usize % size;
        while self.cells[index].is_some() {
            index = (index + 1) % size;
        }
        self.cells[index] = Some(cell);
    }

    /// Empties a cell, then lifts and re-inserts the following cluster up
    /// to the first hole so no probe chain crosses a gap.
    fn evict(&mut self, index: usize) -> (K, V) {
        let cell = self.cells[index].take().expect("occupied cell");
        self.live -= 1;
        let size = self.cells.len();
        let mut follow = (index + 1) % size;
        while let Some(shadowed) = self.cells[follow].take() {
            self.place(shadowed);
            follow = (follow + 1) % size;
        }
        (cell.key, cell.value)
    }

    fn grow(&mut self) {
        let target = prime_geq(self.cells.len() * 2);
        self.rebuild(target);
    }

    fn rebuild(&mut self, cells: usize) {
        let old = std::mem::take(&mut self.cells);
        self.cells.resize_with(cells, || None);
        for cell in old.into_iter().flatten() {
            self.place(cell);
        }
    }

    /// Rebuilds at the next table prime ≥ the requested cell count.
    ///
    /// ## Input
    /// - `cells`: Requested minimum cell count
    ///
    /// ## Output
    /// - `Ok(())` after rebuilding
    /// - `Err(InvalidResize)` when the target is below the live entry
    ///   count; the table is unchanged
    pub fn resize(&mut self, cells: usize) -> ReedResult<()> {
        if cells < self.live {
            return Err(ReedError::InvalidResize {
                backend: "hashtable2".to_string(),
                requested: cells,
                minimum: self.live,
            });
        }
        self.rebuild(prime_geq(cells.max(1)));
        Ok(())
    }

    /// First occupied slot at or after `index`.
    fn scan_from(&self, index: usize) -> Option<usize> {
        (index..self.cells.len()).find(|i| self.cells[*i].is_some())
    }

    /// Last occupied slot before `index`.
    fn scan_back(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|i| self.cells[*i].is_some())
    }
}

impl<K: Ord, V> Map<K, V> for ProbeHashMap<K, V> {
    fn backend(&self) -> &'static str {
        "hashtable2"
    }

    fn is_sorted(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.live
    }

    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        let hash = slot_hash((self.hash_fn)(&key));
        if let Some(index) = self.find_index(&key, hash) {
            let cell = self.cells[index].as_mut().expect("occupied cell");
            return InsertOutcome {
                slot: &mut cell.value,
                inserted: false,
            };
        }
        // Keep count/size strictly below 2/3 before taking the new entry.
        if (self.live + 1) * 3 >= self.cells.len() * 2 {
            self.grow();
        }
        let size = self.cells.len();
        let mut index = hash as usize % size;
        while self.cells[index].is_some() {
            index = (index + 1) % size;
        }
        self.cells[index] = Some(ProbeCell { hash, key, value });
        self.live += 1;
        let cell = self.cells[index].as_mut().expect("occupied cell");
        InsertOutcome {
            slot: &mut cell.value,
            inserted: true,
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        let hash = slot_hash((self.hash_fn)(key));
        let index = self.find_index(key, hash)?;
        self.cells[index].as_ref().map(|cell| &cell.value)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = slot_hash((self.hash_fn)(key));
        let index = self.find_index(key, hash)?;
        self.cells[index].as_mut().map(|cell| &mut cell.value)
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = slot_hash((self.hash_fn)(key));
        let index = self.find_index(key, hash)?;
        Some(self.evict(index))
    }

    fn clear(&mut self) -> usize {
        let removed = self.live;
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
        self.live = 0;
        removed
    }

    fn traverse(&self, visit: &mut dyn FnMut(&K, &V) -> bool) -> usize {
        let mut visited = 0;
        for cell in self.cells.iter().flatten() {
            visited += 1;
            if !visit(&cell.key, &cell.value) {
                break;
            }
        }
        visited
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(
            self.cells
                .iter()
                .flatten()
                .map(|cell| (&cell.key, &cell.value)),
        )
    }

    fn verify(&self) -> ReedResult<()> {
        let size = self.cells.len();
        let mut counted = 0usize;
        for (index, slot) in self.cells.iter().enumerate() {
            let cell = match slot {
                None => continue,
                Some(cell) => cell,
            };
            counted += 1;
            if cell.hash == 0 {
                return Err(corrupted("hashtable2", "stored hash uses the empty sentinel"));
            }
            if cell.hash != slot_hash((self.hash_fn)(&cell.key)) {
                return Err(corrupted("hashtable2", "stored hash is stale"));
            }
            // The probe chain from the home slot must reach the cell
            // without crossing a hole.
            let mut probe = cell.hash as usize % size;
            while probe != index {
                if self.cells[probe].is_none() {
                    return Err(corrupted("hashtable2", "probe chain crosses a hole"));
                }
                probe = (probe + 1) % size;
            }
        }
        if counted != self.live {
            return Err(corrupted("hashtable2", "entry count does not match cells"));
        }
        Ok(())
    }

    fn cursor(&mut self) -> Box<dyn Cursor<K, V> + '_> {
        Box::new(ProbeCursor {
            map: self,
            slot: None,
        })
    }
}

/// Cursor over an open-addressing table in slot order.
struct ProbeCursor<'a, K, V> {
    map: &'a mut ProbeHashMap<K, V>,
    slot: Option<usize>,
}

impl<'a, K: Ord, V> ProbeCursor<'a, K, V> {
    fn cell(&self) -> Option<&ProbeCell<K, V>> {
        self.map.cells[self.slot?].as_ref()
    }
}

impl<'a, K: Ord, V> Cursor<K, V> for ProbeCursor<'a, K, V> {
    fn backend(&self) -> &'static str {
        "hashtable2"
    }

    fn valid(&self) -> bool {
        self.slot.is_some()
    }

    fn invalidate(&mut self) {
        self.slot = None;
    }

    fn first(&mut self) -> bool {
        self.slot = self.map.scan_from(0);
        self.slot.is_some()
    }

    fn last(&mut self) -> bool {
        self.slot = self.map.scan_back(self.map.cells.len());
        self.slot.is_some()
    }

    fn next(&mut self) -> bool {
        match self.slot {
            None => false,
            Some(index) => {
                self.slot = self.map.scan_from(index + 1);
                self.slot.is_some()
            }
        }
    }

    fn prev(&mut self) -> bool {
        match self.slot {
            None => false,
            Some(index) => {
                self.slot = self.map.scan_back(index);
                self.slot.is_some()
            }
        }
    }

    fn seek(&mut self, key: &K) -> bool {
        let hash = slot_hash((self.map.hash_fn)(key));
        self.slot = self.map.find_index(key, hash);
        self.slot.is_some()
    }

    fn key(&self) -> Option<&K> {
        self.cell().map(|cell| &cell.key)
    }

    fn value(&self) -> Option<&V> {
        self.cell().map(|cell| &cell.value)
    }

    fn value_mut(&mut self) -> Option<&mut V> {
        let index = self.slot?;
        self.map.cells[index].as_mut().map(|cell| &mut cell.value)
    }

    fn remove(&mut self) -> ReedResult<Option<(K, V)>> {
        match self.slot.take() {
            None => Ok(None),
            Some(index) => Ok(Some(self.map.evict(index))),
        }
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::error::ReedError;
    use crate::hashtable::ProbeHashMap;
    use crate::keys::fnv1a_32;
    use crate::map::Map;

    fn str_hash(key: &String) -> u32 {
        fnv1a_32(key)
    }

    fn value_hash(key: &u32) -> u32 {
        *key
    }

    #[test]
    fn test_growth_from_single_cell() {
        let mut map = ProbeHashMap::with_cells(str_hash, 1);
        assert_eq!(map.capacity(), 1);
        for i in 0..38u32 {
            let key = format!("key-{:02}", i);
            assert!(map.insert(key, i).inserted);
            assert!(map.verify().is_ok(), "violation after insert {}", i);
            assert!(map.load_factor() < 2.0 / 3.0);
        }
        assert_eq!(map.len(), 38);
        assert!(map.capacity() >= 58);

        for i in 0..38u32 {
            let key = format!("key-{:02}", i);
            assert_eq!(map.get(&key), Some(&i));
        }
        for i in 0..38u32 {
            let key = format!("key-{:02}", i);
            assert_eq!(map.remove(&key), Some((key, i)));
            assert!(map.verify().is_ok(), "violation after remove {}", i);
        }
        assert_eq!(map.len(), 0);
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_cluster_repair_after_removal() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        // All three share home slot 0; they occupy slots 0, 1, 2.
        for key in [11u32, 22, 33] {
            map.insert(key, key);
        }
        assert!(map.verify().is_ok());
        assert_eq!(map.remove(&11), Some((11, 11)));
        // The probe chain must close over the hole or 22/33 become
        // unreachable.
        assert_eq!(map.get(&22), Some(&22));
        assert_eq!(map.get(&33), Some(&33));
        assert!(map.verify().is_ok());

        assert_eq!(map.remove(&22), Some((22, 22)));
        assert_eq!(map.get(&33), Some(&33));
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_zero_hash_remaps_to_full_bits() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        map.insert(0u32, 42);
        assert_eq!(map.get(&0), Some(&42));
        assert!(map.verify().is_ok());
        assert_eq!(map.remove(&0), Some((0, 42)));
        assert_eq!(map.get(&0), None);
    }

    #[test]
    fn test_wrapping_cluster_repair() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        // Home slot 10 for both: the second wraps to slot 0.
        map.insert(10u32, 10);
        map.insert(21, 21);
        assert!(map.verify().is_ok());
        assert_eq!(map.remove(&10), Some((10, 10)));
        assert_eq!(map.get(&21), Some(&21));
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_resize_rejects_below_count() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        for key in 0..6u32 {
            map.insert(key, key);
        }
        match map.resize(5) {
            Err(ReedError::InvalidResize {
                backend,
                requested,
                minimum,
            }) => {
                assert_eq!(backend, "hashtable2");
                assert_eq!(requested, 5);
                assert_eq!(minimum, 6);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(map.capacity(), 11);
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_resize_rounds_up_to_table_prime() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        for key in 0..6u32 {
            map.insert(key, key);
        }
        assert!(map.resize(40).is_ok());
        assert_eq!(map.capacity(), 53);
        assert_eq!(map.len(), 6);
        assert!(map.verify().is_ok());
        for key in 0..6u32 {
            assert_eq!(map.get(&key), Some(&key));
        }
    }

    #[test]
    fn test_duplicate_insert_returns_existing_slot() {
        let mut map = ProbeHashMap::new(str_hash);
        map.insert("key".to_string(), 1u32);
        let outcome = map.insert("key".to_string(), 2);
        assert!(!outcome.inserted);
        assert_eq!(*outcome.slot, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_cursor_remove_repairs_chain() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        for key in [11u32, 22, 33, 5] {
            map.insert(key, key);
        }
        {
            let mut cursor = map.cursor();
            assert!(cursor.seek(&22));
            assert_eq!(cursor.remove().unwrap(), Some((22, 22)));
            assert!(!cursor.valid());
        }
        assert_eq!(map.get(&33), Some(&33));
        assert_eq!(map.get(&11), Some(&11));
        assert_eq!(map.len(), 3);
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_cursor_slot_order_walk() {
        let mut map = ProbeHashMap::with_cells(value_hash, 11);
        for key in [3u32, 14, 7, 1] {
            map.insert(key, key);
        }
        // Slot order: 1, 3, 14 (3 then collision at 3+1), 7.
        let mut cursor = map.cursor();
        let mut seen = Vec::new();
        let mut alive = cursor.first();
        while alive {
            seen.push(*cursor.key().unwrap());
            alive = cursor.next();
        }
        assert_eq!(seen, vec![1, 3, 14, 7]);
    }
}

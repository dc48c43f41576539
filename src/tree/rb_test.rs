// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::map::Map;
    use crate::tree::RbMap;
    use rand::rngs::StdRng;
    use rand::{seq::SliceRandom, SeedableRng};

    #[test]
    fn test_sequential_inserts_stay_valid() {
        let mut map = RbMap::new();
        for key in 0..512u32 {
            assert!(map.insert(key, key).inserted);
            assert!(map.verify().is_ok(), "violation after inserting {}", key);
        }
        assert_eq!(map.len(), 512);
    }

    #[test]
    fn test_reverse_inserts_stay_valid() {
        let mut map = RbMap::new();
        for key in (0..512u32).rev() {
            map.insert(key, key);
            assert!(map.verify().is_ok());
        }
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..512).collect::<Vec<u32>>());
    }

    #[test]
    fn test_height_stays_logarithmic() {
        let mut map = RbMap::new();
        for key in 0..1024u32 {
            map.insert(key, key);
        }
        // Red-black bound: height <= 2*log2(n + 1).
        assert!(map.height() <= 20, "height {} too large", map.height());
        assert!(map.total_path_length() < 1024 * 20);
    }

    #[test]
    fn test_shuffled_insert_remove_cycle() {
        let mut keys: Vec<u32> = (0..400).collect();
        let mut rng = StdRng::seed_from_u64(7);
        keys.shuffle(&mut rng);

        let mut map = RbMap::new();
        for key in &keys {
            map.insert(*key, *key * 3);
        }
        assert!(map.verify().is_ok());

        keys.shuffle(&mut rng);
        for (index, key) in keys.iter().enumerate() {
            assert_eq!(map.remove(key), Some((*key, *key * 3)));
            if index % 16 == 0 {
                assert!(map.verify().is_ok(), "violation after removing {}", key);
            }
        }
        assert!(map.is_empty());
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_remove_root_repeatedly() {
        let mut map = RbMap::new();
        for key in 0..64u32 {
            map.insert(key, key);
        }
        // Removing the current minimum exercises the fixup cascade on the
        // leftmost spine.
        for expected in 0..64u32 {
            let entry = map.min().unwrap().map(|(k, _)| *k);
            assert_eq!(entry, Some(expected));
            map.remove(&expected);
            assert!(map.verify().is_ok());
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_duplicate_insert_keeps_structure() {
        let mut map = RbMap::new();
        for key in 0..32u32 {
            map.insert(key, key);
        }
        for key in 0..32u32 {
            let outcome = map.insert(key, 999);
            assert!(!outcome.inserted);
        }
        assert_eq!(map.len(), 32);
        assert!(map.verify().is_ok());
        assert_eq!(map.get(&5), Some(&5));
    }
}

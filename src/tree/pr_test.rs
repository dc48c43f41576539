// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::map::Map;
    use crate::tree::PrMap;
    use rand::rngs::StdRng;
    use rand::{seq::SliceRandom, SeedableRng};

    #[test]
    fn test_sorted_population_select_by_rank() {
        let mut map = PrMap::new();
        for key in 1..=1000u32 {
            map.insert(key, key);
        }
        assert!(map.verify().is_ok());
        for rank in 0..1000usize {
            let expected = rank as u32 + 1;
            assert_eq!(
                map.select(rank).unwrap().map(|(k, _)| *k),
                Some(expected),
                "rank {}",
                rank
            );
        }
        assert_eq!(map.select(1000).unwrap(), None);
    }

    #[test]
    fn test_path_reduction_keeps_sorted_inserts_shallow() {
        let mut map = PrMap::new();
        for key in 0..512u32 {
            map.insert(key, key);
            assert!(map.verify().is_ok(), "violation after inserting {}", key);
        }
        // A degenerate chain would give height 512 and quadratic paths.
        assert!(map.height() <= 24, "height {} too large", map.height());
        assert!(map.total_path_length() < 512 * 24);
    }

    #[test]
    fn test_removals_keep_reduction_invariant() {
        let mut map = PrMap::new();
        for key in 0..400u32 {
            map.insert(key, key);
        }
        for key in (0..400u32).rev().step_by(3) {
            assert_eq!(map.remove(&key), Some((key, key)));
            assert!(map.verify().is_ok(), "violation after removing {}", key);
        }
    }

    #[test]
    fn test_cursor_remove_drains_map() {
        let mut map = PrMap::new();
        for key in 0..50u32 {
            map.insert(key, key);
        }
        for _ in 0..50 {
            let mut cursor = map.cursor();
            assert!(cursor.first());
            assert!(cursor.remove().unwrap().is_some());
            assert!(!cursor.valid());
        }
        assert!(map.is_empty());
        assert!(map.verify().is_ok());
    }

    #[test]
    fn test_full_lifecycle_random_order() {
        let mut keys: Vec<u32> = (0..450).collect();
        let mut rng = StdRng::seed_from_u64(23);
        keys.shuffle(&mut rng);
        let mut map = PrMap::new();
        for key in &keys {
            map.insert(*key, *key);
        }
        assert!(map.verify().is_ok());
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        for (rank, key) in sorted.iter().enumerate() {
            assert_eq!(map.select(rank).unwrap().map(|(k, _)| *k), Some(*key));
        }
        keys.shuffle(&mut rng);
        for key in &keys {
            assert!(map.remove(key).is_some());
        }
        assert!(map.is_empty());
    }
}

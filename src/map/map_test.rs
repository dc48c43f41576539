// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::error::ReedError;
    use crate::map::{create, Map, MapKind};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeMap, HashMap};

    const NEIGHBOUR_KEYS: [&str; 38] = [
        "a", "aa", "b", "ba", "c", "ca", "d", "da", "f", "fa", "g", "ga", "h", "ha", "j", "ja",
        "l", "la", "m", "ma", "p", "pa", "q", "qa", "r", "ra", "s", "sa", "t", "ta", "u", "ua",
        "x", "xa", "y", "ya", "z", "za",
    ];

    fn sorted_kinds() -> Vec<MapKind> {
        MapKind::all().into_iter().filter(|k| k.is_sorted()).collect()
    }

    fn hash_kinds() -> Vec<MapKind> {
        MapKind::all()
            .into_iter()
            .filter(|k| !k.is_sorted())
            .collect()
    }

    fn populated(kind: MapKind, keys: &[&str]) -> Box<dyn Map<String, String>> {
        let mut map = create::<String, String>(kind);
        for key in keys {
            map.insert(key.to_string(), key.to_uppercase());
        }
        map
    }

    fn lookup<'a>(
        map: &'a dyn Map<String, String>,
        key: &str,
    ) -> Option<&'a String> {
        map.get(&key.to_string())
    }

    #[test]
    fn test_insert_search_traverse_basics() {
        for kind in MapKind::all() {
            let mut map = create::<String, String>(kind);
            map.insert("b".to_string(), "B".to_string());
            map.insert("a".to_string(), "A".to_string());
            map.insert("c".to_string(), "C".to_string());

            assert_eq!(map.len(), 3, "{:?}", kind);
            assert_eq!(lookup(map.as_ref(), "a"), Some(&"A".to_string()));
            assert_eq!(lookup(map.as_ref(), "d"), None);
            assert!(map.verify().is_ok(), "{:?}", kind);

            let mut seen = Vec::new();
            let visited = map.traverse(&mut |k, _| {
                seen.push(k.clone());
                true
            });
            assert_eq!(visited, 3);
            if kind.is_sorted() {
                assert_eq!(seen, vec!["a", "b", "c"]);
            } else {
                let mut unordered = seen.clone();
                unordered.sort();
                assert_eq!(unordered, vec!["a", "b", "c"]);
            }
        }
    }

    #[test]
    fn test_insert_existing_keeps_original_value() {
        for kind in MapKind::all() {
            let mut map = create::<String, String>(kind);
            assert!(map.insert("a".to_string(), "A".to_string()).inserted);
            let outcome = map.insert("a".to_string(), "ignored".to_string());
            assert!(!outcome.inserted, "{:?}", kind);
            assert_eq!(outcome.slot, &"A".to_string());
            assert_eq!(map.len(), 1);
            assert_eq!(lookup(map.as_ref(), "a"), Some(&"A".to_string()));
        }
    }

    #[test]
    fn test_insert_slot_mutation_is_observable() {
        for kind in MapKind::all() {
            let mut map = create::<String, String>(kind);
            let outcome = map.insert("a".to_string(), "old".to_string());
            *outcome.slot = "new".to_string();
            assert_eq!(lookup(map.as_ref(), "a"), Some(&"new".to_string()));

            if let Some(slot) = map.get_mut(&"a".to_string()) {
                slot.push_str("er");
            }
            assert_eq!(lookup(map.as_ref(), "a"), Some(&"newer".to_string()));
        }
    }

    #[test]
    fn test_remove_then_search_returns_none() {
        for kind in MapKind::all() {
            let mut map = populated(kind, &["a", "b", "c"]);
            let removed = map.remove(&"b".to_string());
            assert_eq!(
                removed,
                Some(("b".to_string(), "B".to_string())),
                "{:?}",
                kind
            );
            assert_eq!(lookup(map.as_ref(), "b"), None);
            assert_eq!(map.len(), 2);
            assert!(map.verify().is_ok());
            assert_eq!(map.remove(&"missing".to_string()), None);
        }
    }

    #[test]
    fn test_clear_reports_removed_count() {
        for kind in MapKind::all() {
            let mut map = create::<u64, u64>(kind);
            for i in 0..100u64 {
                map.insert(i * 7, i);
            }
            assert_eq!(map.len(), 100);
            assert_eq!(map.clear(), 100, "{:?}", kind);
            assert_eq!(map.len(), 0);
            assert!(map.is_empty());
            assert!(map.verify().is_ok());

            // The cleared map stays usable.
            map.insert(1, 1);
            assert_eq!(map.len(), 1);
            assert!(map.verify().is_ok());
        }
    }

    #[test]
    fn test_traverse_counts_the_stopping_entry() {
        for kind in MapKind::all() {
            let map = populated(kind, &["a", "b", "c", "d"]);
            let mut budget = 2;
            let visited = map.traverse(&mut |_, _| {
                budget -= 1;
                budget > 0
            });
            assert_eq!(visited, 2, "{:?}", kind);
        }
    }

    #[test]
    fn test_traverse_visits_each_entry_exactly_once() {
        for kind in MapKind::all() {
            let map = populated(kind, &NEIGHBOUR_KEYS);
            let mut counts: HashMap<String, usize> = HashMap::new();
            let visited = map.traverse(&mut |k, _| {
                *counts.entry(k.clone()).or_insert(0) += 1;
                true
            });
            assert_eq!(visited, NEIGHBOUR_KEYS.len(), "{:?}", kind);
            assert_eq!(counts.len(), NEIGHBOUR_KEYS.len());
            assert!(counts.values().all(|c| *c == 1));
        }
    }

    #[test]
    fn test_iter_matches_traverse_order() {
        for kind in MapKind::all() {
            let map = populated(kind, &["d", "a", "c", "b"]);
            let mut walked = Vec::new();
            map.traverse(&mut |k, _| {
                walked.push(k.clone());
                true
            });
            let lazy: Vec<String> = map.iter().map(|(k, _)| k.clone()).collect();
            assert_eq!(walked, lazy, "{:?}", kind);
        }
    }

    #[test]
    fn test_sorted_traverse_is_strictly_ascending() {
        for kind in sorted_kinds() {
            let map = populated(kind, &["q", "a", "z", "m", "b", "x"]);
            let keys: Vec<String> = map.iter().map(|(k, _)| k.clone()).collect();
            let mut expected = keys.clone();
            expected.sort();
            expected.dedup();
            assert_eq!(keys, expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_neighbour_battery() {
        for kind in sorted_kinds() {
            let map = populated(kind, &NEIGHBOUR_KEYS);
            let le = |k: &str| map.get_le(&k.to_string()).unwrap().map(|(_, v)| v.clone());
            let lt = |k: &str| map.get_lt(&k.to_string()).unwrap().map(|(_, v)| v.clone());
            let ge = |k: &str| map.get_ge(&k.to_string()).unwrap().map(|(_, v)| v.clone());
            let gt = |k: &str| map.get_gt(&k.to_string()).unwrap().map(|(_, v)| v.clone());

            assert_eq!(le("ab"), Some("AA".to_string()), "{:?}", kind);
            assert_eq!(lt("ab"), Some("AA".to_string()));
            assert_eq!(ge("ab"), Some("B".to_string()));
            assert_eq!(gt("ab"), Some("B".to_string()));

            assert_eq!(le("_"), None);
            assert_eq!(ge("_"), Some("A".to_string()));

            assert_eq!(ge("zb"), None);
            assert_eq!(le("zb"), Some("ZA".to_string()));

            // Present keys: le/ge land on the key itself, lt/gt skip it.
            assert_eq!(le("ba"), Some("BA".to_string()));
            assert_eq!(ge("ba"), Some("BA".to_string()));
            assert_eq!(lt("ba"), Some("B".to_string()));
            assert_eq!(gt("ba"), Some("C".to_string()));
        }
    }

    #[test]
    fn test_neighbours_match_reference_model() {
        let reference: BTreeMap<String, String> = NEIGHBOUR_KEYS
            .iter()
            .map(|k| (k.to_string(), k.to_uppercase()))
            .collect();
        let probes = ["", "_", "a", "ab", "bz", "f", "fa", "fb", "na", "z", "za", "zz"];
        for kind in sorted_kinds() {
            let map = populated(kind, &NEIGHBOUR_KEYS);
            for probe in probes {
                let probe = probe.to_string();
                let expect_le = reference.range(..=probe.clone()).next_back();
                let expect_lt = reference.range(..probe.clone()).next_back();
                let expect_ge = reference.range(probe.clone()..).next();
                let expect_gt = reference
                    .range((std::ops::Bound::Excluded(probe.clone()), std::ops::Bound::Unbounded))
                    .next();
                assert_eq!(map.get_le(&probe).unwrap(), expect_le, "{:?} le {}", kind, probe);
                assert_eq!(map.get_lt(&probe).unwrap(), expect_lt, "{:?} lt {}", kind, probe);
                assert_eq!(map.get_ge(&probe).unwrap(), expect_ge, "{:?} ge {}", kind, probe);
                assert_eq!(map.get_gt(&probe).unwrap(), expect_gt, "{:?} gt {}", kind, probe);
            }
        }
    }

    #[test]
    fn test_neighbours_unsupported_on_hash_backends() {
        for kind in hash_kinds() {
            let map = populated(kind, &["a"]);
            let err = map.get_le(&"a".to_string()).unwrap_err();
            match err {
                ReedError::NotSupported { operation, backend } => {
                    assert_eq!(operation, "get_le");
                    assert_eq!(backend, kind.name());
                }
                other => panic!("unexpected error: {:?}", other),
            }
            assert!(map.get_lt(&"a".to_string()).is_err());
            assert!(map.get_ge(&"a".to_string()).is_err());
            assert!(map.get_gt(&"a".to_string()).is_err());
            assert!(map.select(0).is_err());
            assert!(map.min().is_err());
            assert!(map.max().is_err());
        }
    }

    #[test]
    fn test_select_returns_rank_order() {
        for kind in sorted_kinds() {
            let mut map = create::<u32, u32>(kind);
            for key in (0..100u32).rev() {
                map.insert(key, key * 2);
            }
            for rank in 0..100usize {
                let entry = map.select(rank).unwrap();
                assert_eq!(entry, Some((&(rank as u32), &(rank as u32 * 2))), "{:?}", kind);
            }
            assert_eq!(map.select(100).unwrap(), None);
            assert_eq!(map.select(usize::MAX).unwrap(), None);
        }
    }

    #[test]
    fn test_min_max_entries() {
        for kind in sorted_kinds() {
            let map = populated(kind, &["m", "c", "x"]);
            assert_eq!(
                map.min().unwrap(),
                Some((&"c".to_string(), &"C".to_string())),
                "{:?}",
                kind
            );
            assert_eq!(
                map.max().unwrap(),
                Some((&"x".to_string(), &"X".to_string()))
            );
        }
        let empty = create::<String, String>(MapKind::RedBlack);
        assert_eq!(empty.min().unwrap(), None);
        assert_eq!(empty.max().unwrap(), None);
    }

    #[test]
    fn test_backend_names_match_kind() {
        for kind in MapKind::all() {
            let map = create::<String, String>(kind);
            assert_eq!(map.backend(), kind.name());
            assert_eq!(map.is_sorted(), kind.is_sorted());
        }
    }

    #[test]
    fn test_mixed_workload_holds_invariants() {
        for kind in MapKind::all() {
            let mut map = create::<u32, u32>(kind);
            let mut model: BTreeMap<u32, u32> = BTreeMap::new();
            let mut rng = StdRng::seed_from_u64(0x5eed);
            for step in 0..600u32 {
                let key = rng.gen_range(0..200);
                if rng.gen_bool(0.6) {
                    let outcome = map.insert(key, step);
                    assert_eq!(outcome.inserted, !model.contains_key(&key));
                    model.entry(key).or_insert(step);
                } else {
                    let expected = model.remove(&key).map(|v| (key, v));
                    assert_eq!(map.remove(&key), expected, "{:?}", kind);
                }
                assert_eq!(map.len(), model.len());
                if step % 25 == 0 {
                    assert!(map.verify().is_ok(), "{:?} step {}", kind, step);
                }
            }
            assert!(map.verify().is_ok(), "{:?}", kind);
            for (key, value) in &model {
                assert_eq!(map.get(key), Some(value));
            }
        }
    }

    #[test]
    fn test_not_supported_error_display() {
        let map = create::<String, String>(MapKind::OpenHash);
        let err = map.select(0).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("select"));
        assert!(text.contains("hashtable2"));
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Boxed map construction from a backend kind.
//!
//! Builds any backend behind `Box<dyn Map<K, V>>` with default parameters;
//! hash tables take their hash function from the key's `MapKey` instance.
//! Parameterised construction — custom hash function, bucket count, treap
//! priority function, skiplist level bound — goes through the concrete
//! types' own constructors.

use super::{Map, MapKind};
use crate::hashtable::{ChainHashMap, ProbeHashMap};
use crate::keys::MapKey;
use crate::skiplist::SkipMap;
use crate::tree::{AvlMap, PrMap, RbMap, SplayMap, TreapMap, WbMap};

fn hash_key<K: MapKey>(key: &K) -> u32 {
    key.key_hash()
}

/// Creates a boxed map of the given kind with default parameters.
///
/// ## Input
/// - `kind`: Which backend to build
///
/// ## Output
/// - The backend behind the uniform `Map` interface
///
/// ## Example
/// ```rust
/// use reedmap::map::{create, MapKind};
///
/// let mut map = create::<String, u32>(MapKind::SkipList);
/// map.insert("a".to_string(), 1);
/// assert_eq!(map.len(), 1);
/// assert!(map.is_sorted());
/// ```
pub fn create<K, V>(kind: MapKind) -> Box<dyn Map<K, V>>
where
    K: MapKey + 'static,
    V: 'static,
{
    match kind {
        MapKind::RedBlack => Box::new(RbMap::new()),
        MapKind::HeightBalanced => Box::new(AvlMap::new()),
        MapKind::WeightBalanced => Box::new(WbMap::new()),
        MapKind::PathReduction => Box::new(PrMap::new()),
        MapKind::Splay => Box::new(SplayMap::new()),
        MapKind::Treap => Box::new(TreapMap::new()),
        MapKind::SkipList => Box::new(SkipMap::new()),
        MapKind::ChainedHash => Box::new(ChainHashMap::new(hash_key::<K>)),
        MapKind::OpenHash => Box::new(ProbeHashMap::new(hash_key::<K>)),
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! reedmap - In-memory associative container toolbox.
//!
//! A library of interchangeable keyed map implementations behind one
//! polymorphic interface: pick a backend for its performance and ordering
//! profile, then drive it through the same insert, lookup, neighbour
//! search, removal, iteration, rank selection and verification operations.
//!
//! ## Features
//!
//! - **Six sorted trees**: red-black, height-balanced, weight-balanced,
//!   path-reduction, splay and treap, all over one arena-backed skeleton
//! - **Skiplist**: randomised towers with O(1) bidirectional stepping
//! - **Two hash tables**: hash-sorted chaining and linear-probed open
//!   addressing with prime-table growth
//! - **Uniform surface**: `Box<dyn Map<K, V>>` with structured
//!   `NotSupported` answers for capabilities a backend lacks
//! - **Cursors**: bidirectional, seekable, with removal where the backend
//!   supports it; borrow rules enforce cursor invalidation at compile time
//! - **Verification**: every backend can check its own invariants without
//!   mutating
//!
//! ## Quick Start
//!
//! ```rust
//! use reedmap::map::{create, Map, MapKind};
//!
//! let mut map = create::<String, String>(MapKind::RedBlack);
//! map.insert("b".to_string(), "B".to_string());
//! map.insert("a".to_string(), "A".to_string());
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&"a".to_string()), Some(&"A".to_string()));
//! assert!(map.verify().is_ok());
//! ```
//!
//! ## Architecture
//!
//! - **error**: `ReedError` / `ReedResult` foundation
//! - **keys**: FNV-1a hashing, `MapKey`, comparator helpers
//! - **map**: the `Map` and `Cursor` traits, outcomes, factory
//! - **tree**: the shared skeleton and the six tree backends
//! - **skiplist**: the skiplist backend
//! - **hashtable**: the two hash backends and the prime table

pub mod error;
pub mod hashtable;
pub mod keys;
pub mod map;
pub mod skiplist;
pub mod tree;

#[cfg(test)]
mod version_test;

pub use error::{ReedError, ReedResult};
pub use hashtable::{ChainHashMap, ProbeHashMap};
pub use map::{create, Cursor, InsertOutcome, Map, MapKind};
pub use skiplist::SkipMap;
pub use tree::{AvlMap, PrMap, RbMap, SplayMap, TreapMap, WbMap};

/// Major version of the library.
pub const VERSION_MAJOR: u32 = 0;

/// Minor version of the library.
pub const VERSION_MINOR: u32 = 1;

/// Patch version of the library.
pub const VERSION_PATCH: u32 = 0;

/// Version triple `(major, minor, patch)`.
pub fn version() -> (u32, u32, u32) {
    (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}

/// Version string `"<major>.<minor>.<patch>"`, matching the triple.
pub fn version_string() -> String {
    format!("{}.{}.{}", VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Binary search tree backends over a shared skeleton.
//!
//! All six sorted trees reuse one arena-backed node layout and one walk,
//! rotation and verification toolkit (`core`), plus one cursor engine
//! (`cursor`); each file adds only its variant's balancing discipline:
//! - `rb`: red-black tree
//! - `avl`: height-balanced tree
//! - `wb`: weight-balanced tree, BB[alpha] with alpha ~ 1/3
//! - `pr`: path-reduction tree, rotating only when paths shorten
//! - `splay`: move-to-root tree
//! - `treap`: randomised heap-ordered tree

pub mod avl;
pub mod pr;
pub mod rb;
pub mod splay;
pub mod treap;
pub mod wb;

pub(crate) mod core;
pub(crate) mod cursor;

#[cfg(test)]
mod pr_test;
#[cfg(test)]
mod rb_test;

pub use avl::AvlMap;
pub use pr::PrMap;
pub use rb::RbMap;
pub use splay::SplayMap;
pub use treap::TreapMap;
pub use wb::WbMap;

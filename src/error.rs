// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for reedmap operations.
//!
//! Provides structured error handling with detailed context. Absent keys are
//! not errors — lookups report them as `None`. Errors are reserved for
//! unsupported capabilities, corrupted structures, and rejected resizes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard Result type for all reedmap operations.
pub type ReedResult<T> = Result<T, ReedError>;

/// Standard Error types across all map backends.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ReedError {
    /// Operation not offered by this backend (e.g. neighbour search on a
    /// hash table, cursor removal on a red-black tree).
    #[error("operation '{operation}' is not supported by backend '{backend}'")]
    NotSupported {
        operation: String,
        backend: String,
    },

    /// Structural verification found a violated invariant.
    #[error("structure corrupted in backend '{backend}': {reason}")]
    StructureCorrupted {
        backend: String,
        reason: String,
    },

    /// Resize target rejected; the table is unchanged.
    #[error("invalid resize for backend '{backend}': requested {requested}, minimum {minimum}")]
    InvalidResize {
        backend: String,
        requested: usize,
        minimum: usize,
    },
}

/// Builds a `NotSupported` error for the given operation and backend.
///
/// ## Input
/// - `operation`: Name of the refused operation
/// - `backend`: Backend identifier (see `Map::backend`)
///
/// ## Output
/// - `ReedError::NotSupported` with both names recorded
pub fn not_supported(operation: &str, backend: &str) -> ReedError {
    ReedError::NotSupported {
        operation: operation.to_string(),
        backend: backend.to_string(),
    }
}

/// Builds a `StructureCorrupted` error for a failed verification.
///
/// ## Input
/// - `backend`: Backend identifier
/// - `reason`: Which invariant broke, in plain words
pub fn corrupted(backend: &str, reason: impl Into<String>) -> ReedError {
    ReedError::StructureCorrupted {
        backend: backend.to_string(),
        reason: reason.into(),
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::{version, version_string, VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH};

    #[test]
    fn test_version_triple_matches_constants() {
        assert_eq!(version(), (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH));
    }

    #[test]
    fn test_version_string_matches_triple() {
        let (major, minor, patch) = version();
        assert_eq!(version_string(), format!("{}.{}.{}", major, minor, patch));
    }

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version_string(), env!("CARGO_PKG_VERSION"));
    }
}

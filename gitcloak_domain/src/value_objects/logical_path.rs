// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logical Path Value Object
//!
//! The repository-relative path the host VCS hands to a filter invocation.
//! The path is cryptographically load-bearing: it seeds the per-file salt
//! and is authenticated as associated data by every cipher layer, so a blob
//! moved to a different path fails authentication.

use serde::{Deserialize, Serialize};

use crate::error::CloakError;

/// Repository-relative path of the file being cleaned or smudged.
///
/// # Invariants
///
/// - Non-empty. The host VCS always passes a path as the filter's final
///   argument; an empty path would collapse every file onto one salt.
///
/// The path is kept exactly as the VCS provided it (forward slashes,
/// no normalization): any rewrite would silently change the derived
/// subkeys and orphan existing ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Creates a logical path, rejecting the empty string.
    pub fn new(path: impl Into<String>) -> Result<Self, CloakError> {
        let path = path.into();
        if path.is_empty() {
            return Err(CloakError::invalid_parameters(
                "logical path must not be empty",
            ));
        }
        Ok(Self(path))
    }

    /// The path as UTF-8 bytes, the exact byte string used for salt
    /// derivation and associated data.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for LogicalPath {
    type Error = CloakError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

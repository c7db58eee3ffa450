// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Smudge Filter Use Case
//!
//! `stored bytes, path → plaintext`. Buffers that do not parse as a
//! current-version blob (too short, or a different leading byte) are
//! legacy plaintext from before the filter was enabled and pass through
//! unchanged, which is what lets a repository migrate incrementally. A
//! buffer that *does* parse but fails any layer's authentication is a
//! hard error: the two cases are deliberately indistinguishable only up
//! to the version byte.

use std::sync::Arc;

use tracing::debug;

use gitcloak_domain::services::key_derivation::derive_subkeys;
use gitcloak_domain::value_objects::{EncryptedBlob, LogicalPath};
use gitcloak_domain::{CascadeCipher, CloakError};

use crate::infrastructure::repositories::KeyStore;

/// Decrypts stored content for the working tree.
pub struct SmudgeFile {
    key_store: Arc<KeyStore>,
    cascade: Arc<CascadeCipher>,
}

impl SmudgeFile {
    pub fn new(key_store: Arc<KeyStore>, cascade: Arc<CascadeCipher>) -> Self {
        Self { key_store, cascade }
    }

    /// Runs the smudge transformation: parse (or pass through), derive
    /// subkeys, six-layer decrypt.
    pub fn execute(&self, stored: &[u8], path: &LogicalPath) -> Result<Vec<u8>, CloakError> {
        let blob = match EncryptedBlob::parse(stored) {
            Ok(blob) => blob,
            Err(error) if error.is_legacy_passthrough() => {
                debug!(path = %path, len = stored.len(), "legacy plaintext passed through");
                return Ok(stored.to_vec());
            }
            Err(error) => return Err(error),
        };

        let master_key = self.key_store.derive_master_key()?;
        let keys = derive_subkeys(&master_key, path)?;
        let plaintext = self.cascade.decrypt(blob, &keys, path)?;

        debug!(path = %path, output = plaintext.len(), "smudge filter decrypted content");
        Ok(plaintext)
    }
}

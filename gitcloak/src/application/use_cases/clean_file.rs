// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Clean Filter Use Case
//!
//! `plaintext, path → encrypted blob bytes`. The output is the exact byte
//! string the host VCS stores; determinism is load-bearing (identical
//! plaintext at an identical path must produce identical bytes so objects
//! deduplicate).

use std::sync::Arc;

use tracing::debug;

use gitcloak_domain::services::key_derivation::derive_subkeys;
use gitcloak_domain::value_objects::LogicalPath;
use gitcloak_domain::{CascadeCipher, CloakError};

use crate::infrastructure::repositories::KeyStore;

/// Encrypts working-tree content for storage.
pub struct CleanFile {
    key_store: Arc<KeyStore>,
    cascade: Arc<CascadeCipher>,
}

impl CleanFile {
    pub fn new(key_store: Arc<KeyStore>, cascade: Arc<CascadeCipher>) -> Self {
        Self { key_store, cascade }
    }

    /// Runs the clean transformation: load master key, derive subkeys,
    /// six-layer encrypt, pack.
    pub fn execute(&self, plaintext: &[u8], path: &LogicalPath) -> Result<Vec<u8>, CloakError> {
        let master_key = self.key_store.derive_master_key()?;
        let keys = derive_subkeys(&master_key, path)?;
        let blob = self.cascade.encrypt(plaintext, &keys, path)?;

        debug!(path = %path, input = plaintext.len(), "clean filter encrypted content");
        Ok(blob.pack())
    }
}

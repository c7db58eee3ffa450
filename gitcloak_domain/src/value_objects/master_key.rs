// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Master Key Value Object
//!
//! The 32-byte master encryption key, derived on demand from the persisted
//! keypair as `SHA3-512(classical_secret ‖ pq_secret)[0..32)`. Never
//! persisted; zeroized on drop. Zeroization is best effort and is not part
//! of the security argument.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the master encryption key in bytes.
pub const MASTER_KEY_SIZE: usize = 32;

/// The master encryption key.
///
/// All per-file subkeys are HKDF derivations of this value. It exists only
/// in memory for the duration of a filter invocation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_SIZE]);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; MASTER_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_SIZE] {
        &self.0
    }
}

// Key material never appears in logs or panics.
impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

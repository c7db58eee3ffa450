// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Derived Keys Value Object
//!
//! The six per-file subkeys produced by
//! [`derive_subkeys`](crate::services::derive_subkeys). Fully determined by
//! `(master key, logical path)`; derived per operation and never stored.
//! Buffers are zeroized on drop on a best-effort basis.

use zeroize::Zeroize;

use crate::error::CloakError;
use crate::services::layer_cipher::{LAYER_COUNT, LAYER_KEY_SIZES};

/// The six subkeys for one `(file, operation)` pair, in layer order.
///
/// Subkey sizes are fixed by the wire format: 32 bytes for every layer
/// except layer 5 (Ascon-128a), which takes 16.
pub struct DerivedKeys {
    subkeys: [Vec<u8>; LAYER_COUNT],
}

impl DerivedKeys {
    /// Wraps six subkeys, validating each against its layer's key size.
    pub fn new(subkeys: [Vec<u8>; LAYER_COUNT]) -> Result<Self, CloakError> {
        for (index, subkey) in subkeys.iter().enumerate() {
            let expected = LAYER_KEY_SIZES[index];
            if subkey.len() != expected {
                return Err(CloakError::invalid_parameters(format!(
                    "layer {} subkey must be {} bytes, got {}",
                    index + 1,
                    expected,
                    subkey.len()
                )));
            }
        }
        Ok(Self { subkeys })
    }

    /// The subkey for `layer` (1-based, matching the wire layout).
    ///
    /// # Panics
    ///
    /// Panics if `layer` is outside `1..=6`; layer indices are compile-time
    /// constants everywhere in this crate.
    pub fn subkey(&self, layer: usize) -> &[u8] {
        assert!((1..=LAYER_COUNT).contains(&layer), "layer out of range");
        &self.subkeys[layer - 1]
    }
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        for subkey in &mut self.subkeys {
            subkey.zeroize();
        }
    }
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKeys(..)")
    }
}

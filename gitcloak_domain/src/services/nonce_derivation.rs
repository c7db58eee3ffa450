// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Deterministic Nonce Derivation
//!
//! Per-layer nonces are derived from the layer subkey alone:
//!
//! ```text
//! nonceᵢ = SHA3-256(subkeyᵢ ‖ byte(i))[0..Nᵢ)
//! ```
//!
//! Content must **not** enter nonce derivation: the smudge path has no
//! plaintext to hash, and the host VCS is content-addressed, so identical
//! plaintext at an identical path must encrypt to byte-identical output.
//! Identical `(subkey, layer)` pairs therefore yield identical nonces by
//! design. This is safe because subkeys are already path- and
//! layer-specific; the accepted trade-off is that repeated identical
//! `(plaintext, path, key)` triples are observable as repeats by anyone
//! who can read the repository.

use sha3::{Digest, Sha3_256};

use crate::error::CloakError;
use crate::services::layer_cipher::{LAYER_COUNT, LAYER_NONCE_SIZES};

/// Derives the nonce for `layer` (1-based) from its subkey.
pub fn derive_nonce(subkey: &[u8], layer: usize) -> Result<Vec<u8>, CloakError> {
    if !(1..=LAYER_COUNT).contains(&layer) {
        return Err(CloakError::invalid_parameters(format!(
            "layer index {layer} outside 1..={LAYER_COUNT}"
        )));
    }

    let mut hasher = Sha3_256::new();
    hasher.update(subkey);
    hasher.update([layer as u8]);
    let digest = hasher.finalize();

    Ok(digest[..LAYER_NONCE_SIZES[layer - 1]].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_lengths_match_profile() {
        let subkey = [0x42u8; 32];
        for layer in 1..=LAYER_COUNT {
            let nonce = derive_nonce(&subkey, layer).unwrap();
            assert_eq!(nonce.len(), LAYER_NONCE_SIZES[layer - 1]);
        }
    }

    #[test]
    fn test_nonce_is_deterministic() {
        let subkey = [0x42u8; 32];
        assert_eq!(
            derive_nonce(&subkey, 3).unwrap(),
            derive_nonce(&subkey, 3).unwrap()
        );
    }

    #[test]
    fn test_nonce_depends_on_layer_index() {
        // Layers 2 and 3 share a nonce size, so the digests must differ
        // purely through the layer byte.
        let subkey = [0x42u8; 32];
        assert_ne!(
            derive_nonce(&subkey, 2).unwrap(),
            derive_nonce(&subkey, 3).unwrap()
        );
    }

    #[test]
    fn test_nonce_depends_on_subkey() {
        assert_ne!(
            derive_nonce(&[1u8; 32], 1).unwrap(),
            derive_nonce(&[2u8; 32], 1).unwrap()
        );
    }

    #[test]
    fn test_rejects_out_of_range_layer() {
        assert!(derive_nonce(&[0u8; 32], 0).is_err());
        assert!(derive_nonce(&[0u8; 32], 7).is_err());
    }
}

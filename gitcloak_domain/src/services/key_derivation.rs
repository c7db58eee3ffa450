// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Per-File Key Derivation
//!
//! Derives the six layer subkeys for one file:
//!
//! ```text
//! salt      = SHA3-512(path)[0..32)
//! subkeyᵢ   = HKDF<SHA3-512>(ikm = master_key, salt, info = LABELᵢ, len = Lᵢ)
//! ```
//!
//! SHA3-512 is used throughout for quantum resistance headroom. Every
//! requested subkey length is at most the 64-byte hash output, so each
//! HKDF expand is a single block.
//!
//! The six info labels are pairwise-distinct literals and are **wire
//! format constants**: changing any label orphans every blob already
//! committed with it.

use hkdf::Hkdf;
use sha3::{Digest, Sha3_512};

use crate::error::CloakError;
use crate::services::layer_cipher::{LAYER_COUNT, LAYER_KEY_SIZES};
use crate::value_objects::{DerivedKeys, LogicalPath, MasterKey};

/// HKDF info label per layer. Part of the wire format.
pub const SUBKEY_INFO_LABELS: [&[u8]; LAYER_COUNT] = [
    b"gitcloak/v3/layer1/aes-256-gcm",
    b"gitcloak/v3/layer2/aegis-256",
    b"gitcloak/v3/layer3/schwaemm256-256",
    b"gitcloak/v3/layer4/deoxys-ii-256",
    b"gitcloak/v3/layer5/ascon-128a",
    b"gitcloak/v3/layer6/chacha20-poly1305",
];

/// Derives the 32-byte per-file salt from the logical path.
pub fn derive_salt(path: &LogicalPath) -> [u8; 32] {
    let digest = Sha3_512::digest(path.as_bytes());
    let mut salt = [0u8; 32];
    salt.copy_from_slice(&digest[..32]);
    salt
}

/// Derives the six layer subkeys for `(master_key, path)`.
///
/// Deterministic: the same inputs always produce the same subkeys, which
/// is what makes the whole pipeline deterministic end to end.
pub fn derive_subkeys(
    master_key: &MasterKey,
    path: &LogicalPath,
) -> Result<DerivedKeys, CloakError> {
    let salt = derive_salt(path);
    let hkdf = Hkdf::<Sha3_512>::new(Some(&salt[..]), master_key.as_bytes());

    let mut subkeys: [Vec<u8>; LAYER_COUNT] = Default::default();
    for (index, subkey) in subkeys.iter_mut().enumerate() {
        let mut okm = vec![0u8; LAYER_KEY_SIZES[index]];
        hkdf.expand(SUBKEY_INFO_LABELS[index], &mut okm)
            .map_err(|_| {
                CloakError::invalid_parameters("HKDF expand exceeded the output limit")
            })?;
        *subkey = okm;
    }

    DerivedKeys::new(subkeys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> MasterKey {
        MasterKey::from_bytes([7u8; 32])
    }

    #[test]
    fn test_labels_are_pairwise_distinct() {
        for i in 0..LAYER_COUNT {
            for j in (i + 1)..LAYER_COUNT {
                assert_ne!(
                    SUBKEY_INFO_LABELS[i], SUBKEY_INFO_LABELS[j],
                    "labels {i} and {j} collide"
                );
            }
        }
    }

    #[test]
    fn test_subkey_lengths_match_profile() {
        let path = LogicalPath::new("src/lib.rs").unwrap();
        let keys = derive_subkeys(&master(), &path).unwrap();
        for layer in 1..=LAYER_COUNT {
            assert_eq!(keys.subkey(layer).len(), LAYER_KEY_SIZES[layer - 1]);
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let path = LogicalPath::new("secrets/.env").unwrap();
        let a = derive_subkeys(&master(), &path).unwrap();
        let b = derive_subkeys(&master(), &path).unwrap();
        for layer in 1..=LAYER_COUNT {
            assert_eq!(a.subkey(layer), b.subkey(layer));
        }
    }

    #[test]
    fn test_distinct_paths_yield_distinct_subkeys() {
        let a = derive_subkeys(&master(), &LogicalPath::new("a").unwrap()).unwrap();
        let b = derive_subkeys(&master(), &LogicalPath::new("b").unwrap()).unwrap();
        for layer in 1..=LAYER_COUNT {
            assert_ne!(a.subkey(layer), b.subkey(layer));
        }
    }

    #[test]
    fn test_distinct_layers_yield_distinct_subkeys() {
        let keys = derive_subkeys(&master(), &LogicalPath::new("x").unwrap()).unwrap();
        // Layer 5 is shorter than the rest; compare the common prefix.
        for i in 1..=LAYER_COUNT {
            for j in (i + 1)..=LAYER_COUNT {
                let shorter = keys.subkey(i).len().min(keys.subkey(j).len());
                assert_ne!(&keys.subkey(i)[..shorter], &keys.subkey(j)[..shorter]);
            }
        }
    }

    #[test]
    fn test_salt_is_path_dependent() {
        let a = derive_salt(&LogicalPath::new("a").unwrap());
        let b = derive_salt(&LogicalPath::new("b").unwrap());
        assert_ne!(a, b);
    }
}

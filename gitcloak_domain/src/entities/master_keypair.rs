// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Master Keypair Entity
//!
//! The repository's long-lived secret: 32 random bytes of classical secret
//! (with its X25519 public half) plus an ML-KEM-768 keypair. The 32-byte
//! master encryption key is `SHA3-512(classical_secret ‖ decaps_key)[0..32)`
//! and is derived on demand, never persisted.
//!
//! The trust model is a single shared symmetric secret distributed out of
//! band; the KEM keypair contributes post-quantum entropy to the master
//! key and reserves room for future encapsulation-based key exchange
//! without a file-format change.
//!
//! ## Serialization
//!
//! Fixed-layout binary, in order: classical secret (32) ‖ classical public
//! (32) ‖ ML-KEM encapsulation key (1184) ‖ ML-KEM decapsulation key
//! (2400). 3648 bytes total. `from_bytes ∘ to_bytes` is the identity; the
//! infrastructure key store requires a byte-exact round trip.

use fips203::ml_kem_768;
use fips203::traits::{KeyGen, SerDes};
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha3::{Digest, Sha3_512};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CloakError;
use crate::value_objects::MasterKey;

/// Classical secret size in bytes.
pub const CLASSICAL_SECRET_SIZE: usize = 32;

/// Classical (X25519) public key size in bytes.
pub const CLASSICAL_PUBLIC_SIZE: usize = 32;

/// ML-KEM-768 encapsulation key size in bytes.
pub const PQ_ENCAPS_KEY_SIZE: usize = ml_kem_768::EK_LEN;

/// ML-KEM-768 decapsulation key size in bytes.
pub const PQ_DECAPS_KEY_SIZE: usize = ml_kem_768::DK_LEN;

/// Total encoded keypair size in bytes.
pub const KEYPAIR_ENCODED_SIZE: usize =
    CLASSICAL_SECRET_SIZE + CLASSICAL_PUBLIC_SIZE + PQ_ENCAPS_KEY_SIZE + PQ_DECAPS_KEY_SIZE;

/// The hybrid master keypair a repository is initialized with.
///
/// Exclusively owned by the key store; every other consumer receives the
/// derived [`MasterKey`] instead. All secret fields are zeroized on drop
/// (best effort, not part of the security argument).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKeypair {
    classical_secret: [u8; CLASSICAL_SECRET_SIZE],
    classical_public: [u8; CLASSICAL_PUBLIC_SIZE],
    pq_encaps_key: [u8; PQ_ENCAPS_KEY_SIZE],
    pq_decaps_key: [u8; PQ_DECAPS_KEY_SIZE],
}

impl MasterKeypair {
    /// Generates a fresh keypair from the operating-system RNG.
    pub fn generate() -> Result<Self, CloakError> {
        let mut classical_secret = [0u8; CLASSICAL_SECRET_SIZE];
        OsRng
            .try_fill_bytes(&mut classical_secret)
            .map_err(|e| CloakError::io_error(format!("system RNG unavailable: {e}")))?;

        let classical_public = PublicKey::from(&StaticSecret::from(classical_secret)).to_bytes();

        let (encaps, decaps) = ml_kem_768::KG::try_keygen()
            .map_err(|e| CloakError::io_error(format!("ML-KEM keygen failed: {e}")))?;

        Ok(Self {
            classical_secret,
            classical_public,
            pq_encaps_key: encaps.into_bytes(),
            pq_decaps_key: decaps.into_bytes(),
        })
    }

    /// Reassembles a keypair from its fixed-layout encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CloakError> {
        if bytes.len() != KEYPAIR_ENCODED_SIZE {
            return Err(CloakError::KeyStoreCorrupted(format!(
                "keypair file is {} bytes, expected {}",
                bytes.len(),
                KEYPAIR_ENCODED_SIZE
            )));
        }

        let mut classical_secret = [0u8; CLASSICAL_SECRET_SIZE];
        let mut classical_public = [0u8; CLASSICAL_PUBLIC_SIZE];
        let mut pq_encaps_key = [0u8; PQ_ENCAPS_KEY_SIZE];
        let mut pq_decaps_key = [0u8; PQ_DECAPS_KEY_SIZE];

        let mut offset = 0;
        classical_secret.copy_from_slice(&bytes[offset..offset + CLASSICAL_SECRET_SIZE]);
        offset += CLASSICAL_SECRET_SIZE;
        classical_public.copy_from_slice(&bytes[offset..offset + CLASSICAL_PUBLIC_SIZE]);
        offset += CLASSICAL_PUBLIC_SIZE;
        pq_encaps_key.copy_from_slice(&bytes[offset..offset + PQ_ENCAPS_KEY_SIZE]);
        offset += PQ_ENCAPS_KEY_SIZE;
        pq_decaps_key.copy_from_slice(&bytes[offset..offset + PQ_DECAPS_KEY_SIZE]);

        let keypair = Self {
            classical_secret,
            classical_public,
            pq_encaps_key,
            pq_decaps_key,
        };

        // The public half is redundant with the secret; a mismatch means
        // the file was truncated-and-padded or otherwise rewritten.
        let expected_public =
            PublicKey::from(&StaticSecret::from(keypair.classical_secret)).to_bytes();
        if keypair.classical_public != expected_public {
            return Err(CloakError::KeyStoreCorrupted(
                "classical public key does not match its secret".to_string(),
            ));
        }

        Ok(keypair)
    }

    /// Encodes the keypair into its fixed-layout byte string.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(KEYPAIR_ENCODED_SIZE);
        out.extend_from_slice(&self.classical_secret);
        out.extend_from_slice(&self.classical_public);
        out.extend_from_slice(&self.pq_encaps_key);
        out.extend_from_slice(&self.pq_decaps_key);
        out
    }

    /// Derives the 32-byte master encryption key.
    ///
    /// `SHA3-512(classical_secret ‖ pq_decaps_key)[0..32)`; deterministic
    /// and pure, so it can be recomputed per filter invocation instead of
    /// being persisted.
    pub fn derive_master_key(&self) -> MasterKey {
        let mut hasher = Sha3_512::new();
        hasher.update(self.classical_secret);
        hasher.update(self.pq_decaps_key);
        let digest = hasher.finalize();

        let mut key = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        MasterKey::from_bytes(key)
    }

    /// The X25519 public half of the classical secret.
    pub fn classical_public(&self) -> &[u8; CLASSICAL_PUBLIC_SIZE] {
        &self.classical_public
    }

    /// The ML-KEM-768 encapsulation key.
    pub fn pq_encaps_key(&self) -> &[u8; PQ_ENCAPS_KEY_SIZE] {
        &self.pq_encaps_key
    }
}

impl std::fmt::Debug for MasterKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKeypair(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size_constant() {
        assert_eq!(KEYPAIR_ENCODED_SIZE, 32 + 32 + 1184 + 2400);
    }

    #[test]
    fn test_serialization_round_trip_is_byte_exact() {
        let keypair = MasterKeypair::generate().unwrap();
        let bytes = keypair.to_bytes();
        assert_eq!(bytes.len(), KEYPAIR_ENCODED_SIZE);

        let reloaded = MasterKeypair::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.to_bytes(), bytes);
    }

    #[test]
    fn test_master_key_derivation_is_deterministic() {
        let keypair = MasterKeypair::generate().unwrap();
        assert_eq!(
            keypair.derive_master_key().as_bytes(),
            keypair.derive_master_key().as_bytes()
        );
    }

    #[test]
    fn test_distinct_keypairs_derive_distinct_master_keys() {
        let a = MasterKeypair::generate().unwrap();
        let b = MasterKeypair::generate().unwrap();
        assert_ne!(a.derive_master_key().as_bytes(), b.derive_master_key().as_bytes());
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = MasterKeypair::from_bytes(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, CloakError::KeyStoreCorrupted(_)));
    }

    #[test]
    fn test_from_bytes_rejects_mismatched_public_half() {
        let keypair = MasterKeypair::generate().unwrap();
        let mut bytes = keypair.to_bytes();
        bytes[CLASSICAL_SECRET_SIZE] ^= 0x01; // first byte of the public half
        let err = MasterKeypair::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CloakError::KeyStoreCorrupted(_)));
    }
}

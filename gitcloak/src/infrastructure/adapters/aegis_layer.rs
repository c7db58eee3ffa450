// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AEGIS-256 Layer (layer 2)
//!
//! AES-permutation-based AEAD: 32-byte key, 32-byte nonce, 32-byte tag.
//! The large nonce and tag make this the widest layer in the wire layout.

use aegis::aegis256::Aegis256;

use gitcloak_domain::{CloakError, LayerCipher};

const TAG_BYTES: usize = 32;

/// AEGIS-256 implementation of the layer cipher capability.
pub struct AegisLayer;

impl AegisLayer {
    fn fixed_inputs(
        &self,
        key: &[u8],
        nonce: &[u8],
    ) -> Result<([u8; 32], [u8; 32]), CloakError> {
        self.check_input_sizes(key, nonce)?;
        let key: [u8; 32] = key
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("AEGIS-256 key conversion"))?;
        let nonce: [u8; 32] = nonce
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("AEGIS-256 nonce conversion"))?;
        Ok((key, nonce))
    }
}

impl LayerCipher for AegisLayer {
    fn algorithm(&self) -> &'static str {
        "AEGIS-256"
    }

    fn key_size(&self) -> usize {
        32
    }

    fn nonce_size(&self) -> usize {
        32
    }

    fn tag_size(&self) -> usize {
        TAG_BYTES
    }

    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CloakError> {
        let (key, nonce) = self.fixed_inputs(key, nonce)?;

        let state = Aegis256::<TAG_BYTES>::new(&key, &nonce);
        let (ciphertext, tag) = state.encrypt(plaintext, aad);

        Ok((ciphertext, tag.to_vec()))
    }

    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CloakError> {
        let (key, nonce) = self.fixed_inputs(key, nonce)?;
        self.check_tag_size(tag)?;
        let tag: [u8; TAG_BYTES] = tag
            .try_into()
            .map_err(|_| CloakError::invalid_parameters("AEGIS-256 tag conversion"))?;

        let state = Aegis256::<TAG_BYTES>::new(&key, &nonce);
        state
            .decrypt(ciphertext, &tag, aad)
            .map_err(|_| CloakError::authentication_failed("AEGIS-256 tag mismatch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0xAE; 32];
    const NONCE: [u8; 32] = [0x61; 32];

    #[test]
    fn test_round_trip() {
        let layer = AegisLayer;
        let (ciphertext, tag) = layer.encrypt(&KEY, &NONCE, b"wide layer", b"p").unwrap();
        assert_eq!(tag.len(), 32);
        let plaintext = layer.decrypt(&KEY, &NONCE, &ciphertext, &tag, b"p").unwrap();
        assert_eq!(plaintext, b"wide layer");
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let layer = AegisLayer;
        let (mut ciphertext, tag) = layer.encrypt(&KEY, &NONCE, b"wide layer", b"p").unwrap();
        ciphertext[3] ^= 0x10;
        let err = layer.decrypt(&KEY, &NONCE, &ciphertext, &tag, b"p").unwrap_err();
        assert!(matches!(err, CloakError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_rejects_12_byte_nonce() {
        let layer = AegisLayer;
        let err = layer.encrypt(&KEY, &[0u8; 12], b"x", b"p").unwrap_err();
        assert!(matches!(err, CloakError::InvalidParameters(_)));
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Deoxys-II-256 Layer (layer 4)
//!
//! Nonce-misuse-resistant tweakable block cipher: 32-byte key, 15-byte
//! nonce, 16-byte tag. Misuse resistance is a deliberate fit for this
//! design's deterministic nonces: even a derivation bug that repeated a
//! nonce would not leak plaintext structure through this layer.

use deoxys::aead::generic_array::GenericArray;
use deoxys::aead::{AeadInPlace, KeyInit};
use deoxys::DeoxysII256;

use gitcloak_domain::{CloakError, LayerCipher};

/// Deoxys-II-256 implementation of the layer cipher capability.
pub struct DeoxysLayer;

impl LayerCipher for DeoxysLayer {
    fn algorithm(&self) -> &'static str {
        "Deoxys-II-256"
    }

    fn key_size(&self) -> usize {
        32
    }

    fn nonce_size(&self) -> usize {
        15
    }

    fn tag_size(&self) -> usize {
        16
    }

    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CloakError> {
        self.check_input_sizes(key, nonce)?;

        let cipher = DeoxysII256::new(GenericArray::from_slice(key));
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, &mut buffer)
            .map_err(|_| {
                CloakError::invalid_parameters("Deoxys-II-256 rejected its encryption input")
            })?;

        Ok((buffer, tag.to_vec()))
    }

    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CloakError> {
        self.check_input_sizes(key, nonce)?;
        self.check_tag_size(tag)?;

        let cipher = DeoxysII256::new(GenericArray::from_slice(key));
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                aad,
                &mut buffer,
                GenericArray::from_slice(tag),
            )
            .map_err(|_| CloakError::authentication_failed("Deoxys-II-256 tag mismatch"))?;

        Ok(buffer)
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AES-256-GCM Layer (layer 1)
//!
//! Innermost cascade layer. AES-256 in Galois/Counter mode: 32-byte key,
//! 12-byte nonce, 16-byte tag. Commonly hardware-accelerated via AES-NI;
//! this is the layer that sees the raw plaintext.

use aes_gcm::{AeadInPlace, Aes256Gcm, Key, KeyInit, Nonce, Tag};

use gitcloak_domain::{CloakError, LayerCipher};

/// AES-256-GCM implementation of the layer cipher capability.
pub struct AesGcmLayer;

impl LayerCipher for AesGcmLayer {
    fn algorithm(&self) -> &'static str {
        "AES-256-GCM"
    }

    fn key_size(&self) -> usize {
        32
    }

    fn nonce_size(&self) -> usize {
        12
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

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
            .map_err(|_| {
                CloakError::invalid_parameters("AES-256-GCM rejected its encryption input")
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

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                aad,
                &mut buffer,
                Tag::from_slice(tag),
            )
            .map_err(|_| CloakError::authentication_failed("AES-256-GCM tag mismatch"))?;

        Ok(buffer)
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ChaCha20-Poly1305 Layer (layer 6)
//!
//! Outermost cascade layer: the 96-bit-nonce IETF variant. Stream cipher
//! plus polynomial MAC, constant-time on every platform. This layer's tag
//! is the first one verified on the smudge path.

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag};

use gitcloak_domain::{CloakError, LayerCipher};

/// ChaCha20-Poly1305 implementation of the layer cipher capability.
pub struct ChaCha20Poly1305Layer;

impl LayerCipher for ChaCha20Poly1305Layer {
    fn algorithm(&self) -> &'static str {
        "ChaCha20-Poly1305"
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

        let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
            .map_err(|_| {
                CloakError::invalid_parameters("ChaCha20-Poly1305 rejected its encryption input")
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

        let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                aad,
                &mut buffer,
                Tag::from_slice(tag),
            )
            .map_err(|_| CloakError::authentication_failed("ChaCha20-Poly1305 tag mismatch"))?;

        Ok(buffer)
    }
}

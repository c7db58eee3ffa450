// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ascon-128a Layer (layer 5)
//!
//! Lightweight sponge AEAD: 16-byte key, 16-byte nonce, 16-byte tag. The
//! only layer with a 128-bit key; the key-derivation profile accounts for
//! it.

use ascon_aead::aead::generic_array::GenericArray;
use ascon_aead::aead::{AeadInPlace, KeyInit};
use ascon_aead::Ascon128a;

use gitcloak_domain::{CloakError, LayerCipher};

/// Ascon-128a implementation of the layer cipher capability.
pub struct AsconLayer;

impl LayerCipher for AsconLayer {
    fn algorithm(&self) -> &'static str {
        "Ascon-128a"
    }

    fn key_size(&self) -> usize {
        16
    }

    fn nonce_size(&self) -> usize {
        16
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

        let cipher = Ascon128a::new(GenericArray::from_slice(key));
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, &mut buffer)
            .map_err(|_| {
                CloakError::invalid_parameters("Ascon-128a rejected its encryption input")
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

        let cipher = Ascon128a::new(GenericArray::from_slice(key));
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                aad,
                &mut buffer,
                GenericArray::from_slice(tag),
            )
            .map_err(|_| CloakError::authentication_failed("Ascon-128a tag mismatch"))?;

        Ok(buffer)
    }
}

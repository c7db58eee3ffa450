// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Six-Layer Cipher Cascade
//!
//! Orchestrates the nested AEAD encryption:
//!
//! ```text
//! c₀ = plaintext
//! for i in 1..=6:
//!     nᵢ        = derive_nonce(kᵢ, i)
//!     (cᵢ, tᵢ)  = layerᵢ.encrypt(kᵢ, nᵢ, cᵢ₋₁, aad = path)
//! wire = pack(version, t₁..t₆, c₆)
//! ```
//!
//! Decryption applies layers 6→1. The logical path is associated data for
//! **every** layer, so relocating a blob to another path fails all six
//! authentications. The first failing layer aborts the chain and its error
//! is returned unchanged.

use crate::error::CloakError;
use crate::services::layer_cipher::{
    LayerCipher, LAYER_COUNT, LAYER_KEY_SIZES, LAYER_NONCE_SIZES, LAYER_TAG_SIZES,
};
use crate::services::nonce_derivation::derive_nonce;
use crate::value_objects::{DerivedKeys, EncryptedBlob, LogicalPath};

/// The assembled six-layer cascade.
///
/// Holds one [`LayerCipher`] per layer in wire order. Construction
/// validates every layer's declared parameter sizes against the wire
/// profile, so a mis-assembled cascade fails fast instead of producing
/// unparseable blobs.
pub struct CascadeCipher {
    layers: [Box<dyn LayerCipher>; LAYER_COUNT],
}

impl CascadeCipher {
    /// Assembles a cascade from six layer implementations in wire order.
    pub fn new(layers: [Box<dyn LayerCipher>; LAYER_COUNT]) -> Result<Self, CloakError> {
        for (index, layer) in layers.iter().enumerate() {
            let position = index + 1;
            if layer.key_size() != LAYER_KEY_SIZES[index]
                || layer.nonce_size() != LAYER_NONCE_SIZES[index]
                || layer.tag_size() != LAYER_TAG_SIZES[index]
            {
                return Err(CloakError::invalid_config(format!(
                    "{} declares sizes key={}/nonce={}/tag={} but layer {} requires {}/{}/{}",
                    layer.algorithm(),
                    layer.key_size(),
                    layer.nonce_size(),
                    layer.tag_size(),
                    position,
                    LAYER_KEY_SIZES[index],
                    LAYER_NONCE_SIZES[index],
                    LAYER_TAG_SIZES[index],
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Encrypts `plaintext` through layers 1→6.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        keys: &DerivedKeys,
        path: &LogicalPath,
    ) -> Result<EncryptedBlob, CloakError> {
        let aad = path.as_bytes();
        let mut buffer = plaintext.to_vec();
        let mut tags: [Vec<u8>; LAYER_COUNT] = Default::default();

        for (index, layer) in self.layers.iter().enumerate() {
            let layer_no = index + 1;
            let subkey = keys.subkey(layer_no);
            let nonce = derive_nonce(subkey, layer_no)?;
            let (ciphertext, tag) = layer.encrypt(subkey, &nonce, &buffer, aad)?;
            buffer = ciphertext;
            tags[index] = tag;
        }

        EncryptedBlob::new(tags, buffer)
    }

    /// Decrypts a parsed blob through layers 6→1.
    pub fn decrypt(
        &self,
        blob: EncryptedBlob,
        keys: &DerivedKeys,
        path: &LogicalPath,
    ) -> Result<Vec<u8>, CloakError> {
        let aad = path.as_bytes();
        let (tags, mut buffer) = blob.into_parts();

        for index in (0..LAYER_COUNT).rev() {
            let layer_no = index + 1;
            let subkey = keys.subkey(layer_no);
            let nonce = derive_nonce(subkey, layer_no)?;
            buffer = self.layers[index].decrypt(subkey, &nonce, &buffer, &tags[index], aad)?;
        }

        Ok(buffer)
    }
}

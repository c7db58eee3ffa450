// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Encrypted Blob Wire Codec
//!
//! The on-wire shape of an encrypted file, exactly as the host VCS stores
//! it. The layout is a stability contract: every offset below is fixed for
//! wire version 3, and the six HKDF info labels in
//! [`key_derivation`](crate::services::key_derivation) are part of the same
//! contract.
//!
//! ## Layout
//!
//! ```text
//! offset  size  field
//!   0      1   version (== 3)
//!   1     16   tag₁ (AES-256-GCM)
//!  17     32   tag₂ (AEGIS-256)
//!  49     32   tag₃ (Schwaemm256-256)
//!  81     16   tag₄ (Deoxys-II-256)
//!  97     16   tag₅ (Ascon-128a)
//! 113     16   tag₆ (ChaCha20-Poly1305)
//! 129      *   ciphertext
//! ```
//!
//! Constant overhead: 129 bytes. An empty plaintext therefore encodes to
//! exactly 129 bytes.
//!
//! ## Parse Failures
//!
//! - total length < 129 → [`CloakError::InvalidBlobFormat`]
//! - leading byte ≠ 3 → [`CloakError::UnsupportedVersion`]
//!
//! The smudge facade maps both onto legacy-plaintext passthrough; other
//! callers may treat an unknown version as a hard error once additional
//! versions exist.

use crate::error::CloakError;
use crate::services::layer_cipher::{LAYER_COUNT, LAYER_TAG_SIZES};

/// Current wire format version byte.
pub const WIRE_VERSION: u8 = 3;

/// Fixed per-blob overhead: version byte plus the six tags.
pub const BLOB_OVERHEAD: usize = 1 + 16 + 32 + 32 + 16 + 16 + 16;

/// A parsed (or about-to-be-packed) encrypted blob.
///
/// Created by the clean path, consumed by the smudge path. Construction
/// validates the tag sizes against the wire profile so a packed blob is
/// structurally valid by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    version: u8,
    tags: [Vec<u8>; LAYER_COUNT],
    ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Assembles a version-3 blob from the cascade output.
    pub fn new(tags: [Vec<u8>; LAYER_COUNT], ciphertext: Vec<u8>) -> Result<Self, CloakError> {
        for (index, tag) in tags.iter().enumerate() {
            let expected = LAYER_TAG_SIZES[index];
            if tag.len() != expected {
                return Err(CloakError::invalid_parameters(format!(
                    "layer {} tag must be {} bytes, got {}",
                    index + 1,
                    expected,
                    tag.len()
                )));
            }
        }
        Ok(Self {
            version: WIRE_VERSION,
            tags,
            ciphertext,
        })
    }

    /// Parses stored bytes into a blob.
    pub fn parse(bytes: &[u8]) -> Result<Self, CloakError> {
        if bytes.len() < BLOB_OVERHEAD {
            return Err(CloakError::invalid_blob_format(format!(
                "{} bytes is shorter than the {}-byte header",
                bytes.len(),
                BLOB_OVERHEAD
            )));
        }
        let version = bytes[0];
        if version != WIRE_VERSION {
            return Err(CloakError::UnsupportedVersion(version));
        }

        let mut tags: [Vec<u8>; LAYER_COUNT] = Default::default();
        let mut offset = 1;
        for (index, tag) in tags.iter_mut().enumerate() {
            let size = LAYER_TAG_SIZES[index];
            *tag = bytes[offset..offset + size].to_vec();
            offset += size;
        }
        debug_assert_eq!(offset, BLOB_OVERHEAD);

        Ok(Self {
            version,
            tags,
            ciphertext: bytes[BLOB_OVERHEAD..].to_vec(),
        })
    }

    /// Packs the blob into the single opaque byte string the host VCS
    /// stores. Exact inverse of [`EncryptedBlob::parse`].
    pub fn pack(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOB_OVERHEAD + self.ciphertext.len());
        out.push(self.version);
        for tag in &self.tags {
            out.extend_from_slice(tag);
        }
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// The authentication tag for `layer` (1-based).
    pub fn tag(&self, layer: usize) -> &[u8] {
        assert!((1..=LAYER_COUNT).contains(&layer), "layer out of range");
        &self.tags[layer - 1]
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Consumes the blob, returning tags and ciphertext for decryption.
    pub fn into_parts(self) -> ([Vec<u8>; LAYER_COUNT], Vec<u8>) {
        (self.tags, self.ciphertext)
    }
}

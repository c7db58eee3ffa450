// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Layer Cipher Capability
//!
//! The domain contract every cipher layer implements. One capability, two
//! operations; six concrete implementations live in the infrastructure
//! layer, one per algorithm. There is deliberately no wide multi-algorithm
//! trait with stub methods: each adapter implements exactly the algorithm
//! it names, and the compiler guarantees the cascade is assembled from six
//! real implementations.
//!
//! ## Layer Profile
//!
//! The wire format fixes the parameter profile per layer:
//!
//! | # | Algorithm family | Key | Nonce | Tag |
//! |---|------------------|-----|-------|-----|
//! | 1 | AES-256-GCM      | 32  | 12    | 16  |
//! | 2 | AEGIS-256        | 32  | 32    | 32  |
//! | 3 | Schwaemm256-256  | 32  | 32    | 32  |
//! | 4 | Deoxys-II-256    | 32  | 15    | 16  |
//! | 5 | Ascon-128a       | 16  | 16    | 16  |
//! | 6 | ChaCha20-Poly1305| 32  | 12    | 16  |
//!
//! The families are intentionally diverse: a block cipher, a tweakable
//! block cipher, three distinct sponge constructions, and a stream cipher
//! with a polynomial MAC. A break in any one primitive exposes only the
//! output of the next wrapped AEAD, which is indistinguishable from random.

use crate::error::CloakError;

/// Number of cipher layers in the cascade.
pub const LAYER_COUNT: usize = 6;

/// Key size in bytes per layer, in layer order.
pub const LAYER_KEY_SIZES: [usize; LAYER_COUNT] = [32, 32, 32, 32, 16, 32];

/// Nonce size in bytes per layer, in layer order.
pub const LAYER_NONCE_SIZES: [usize; LAYER_COUNT] = [12, 32, 32, 15, 16, 12];

/// Authentication tag size in bytes per layer, in layer order.
pub const LAYER_TAG_SIZES: [usize; LAYER_COUNT] = [16, 32, 32, 16, 16, 16];

/// Authenticated encryption capability of a single cascade layer.
///
/// Implementations are pure functions over byte slices: no hidden global
/// state, no allocation beyond the returned buffers. Input sizes must
/// match the declared sizes exactly; decryption reports a tag mismatch as
/// [`CloakError::AuthenticationFailed`], distinct from
/// [`CloakError::InvalidParameters`] for malformed input. Implementations
/// must not leak timing on key or tag comparison.
pub trait LayerCipher: Send + Sync {
    /// Human-readable algorithm name, used in diagnostics only.
    fn algorithm(&self) -> &'static str;

    /// Required key size in bytes.
    fn key_size(&self) -> usize;

    /// Required nonce size in bytes.
    fn nonce_size(&self) -> usize;

    /// Produced/required tag size in bytes.
    fn tag_size(&self) -> usize;

    /// Encrypts `plaintext`, authenticating `aad` alongside it.
    ///
    /// Returns `(ciphertext, tag)` with `ciphertext.len() ==
    /// plaintext.len()` and `tag.len() == self.tag_size()`.
    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CloakError>;

    /// Decrypts `ciphertext`, verifying `tag` over ciphertext and `aad`.
    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CloakError>;

    /// Validates key and nonce lengths against the declared sizes.
    ///
    /// Adapters call this before touching the backing implementation so a
    /// size mismatch is always reported as `InvalidParameters` rather than
    /// whatever the backing crate does with a bad slice.
    fn check_input_sizes(&self, key: &[u8], nonce: &[u8]) -> Result<(), CloakError> {
        if key.len() != self.key_size() {
            return Err(CloakError::invalid_parameters(format!(
                "{}: key must be {} bytes, got {}",
                self.algorithm(),
                self.key_size(),
                key.len()
            )));
        }
        if nonce.len() != self.nonce_size() {
            return Err(CloakError::invalid_parameters(format!(
                "{}: nonce must be {} bytes, got {}",
                self.algorithm(),
                self.nonce_size(),
                nonce.len()
            )));
        }
        Ok(())
    }

    /// Validates a tag length before verification.
    fn check_tag_size(&self, tag: &[u8]) -> Result<(), CloakError> {
        if tag.len() != self.tag_size() {
            return Err(CloakError::invalid_parameters(format!(
                "{}: tag must be {} bytes, got {}",
                self.algorithm(),
                self.tag_size(),
                tag.len()
            )));
        }
        Ok(())
    }
}

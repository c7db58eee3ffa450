// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Services
//!
//! Stateless domain services of the cipher pipeline. All of them are
//! synchronous: a filter invocation is single-call CPU-bound work with no
//! suspension points, so the async runtime stays in the infrastructure
//! layer.
//!
//! - [`layer_cipher`] - the AEAD capability every layer implements, plus
//!   the wire-format size profile
//! - [`key_derivation`] - per-file subkeys from `(master key, path)`
//! - [`nonce_derivation`] - deterministic per-layer nonces
//! - [`cascade_cipher`] - the six-layer encrypt/decrypt orchestration

pub mod cascade_cipher;
pub mod key_derivation;
pub mod layer_cipher;
pub mod nonce_derivation;

pub use cascade_cipher::CascadeCipher;
pub use key_derivation::derive_subkeys;
pub use layer_cipher::{
    LayerCipher, LAYER_COUNT, LAYER_KEY_SIZES, LAYER_NONCE_SIZES, LAYER_TAG_SIZES,
};
pub use nonce_derivation::derive_nonce;

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GitCloak Domain
//!
//! Pure domain layer for GitCloak, a transparent encryption filter for git.
//! Designated files live as ciphertext in history and on every remote while
//! appearing as plaintext in the working tree. This crate holds the business
//! logic with no I/O: the wire format, key material, derivation rules, and
//! the six-layer cipher cascade.
//!
//! ## Architecture Overview
//!
//! The domain follows the same Clean Architecture split used across the
//! workspace:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer (gitcloak)               │
//! │  (clean/smudge use cases, staging workflow)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (this crate)                │
//! │  (CloakError, value objects, derivation, cipher cascade)    │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Infrastructure Layer (gitcloak)               │
//! │  (AEAD adapters, key store file, git command runner)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! ### Deterministic encryption
//! The host VCS is content-addressed: identical plaintext at an identical
//! path must produce byte-identical ciphertext so objects deduplicate and
//! status stays clean. Nonces are therefore derived from subkeys alone,
//! never from content. The trade-off (equal inputs are observable as equal
//! outputs) is accepted and documented on [`services::nonce_derivation`].
//!
//! ### Per-file keying
//! Six independent subkeys are derived per `(master key, logical path)`
//! pair, so a file's keys never repeat across paths and the path is bound
//! into every authentication tag as associated data.
//!
//! ### Defense in depth
//! Content passes through six AEAD layers from distinct primitive families.
//! A critical break of any single primitive yields only the output of the
//! next wrapped AEAD, which is indistinguishable from random noise.
//!
//! ## Crate Layout
//!
//! - [`error`] - the `CloakError` domain error
//! - [`entities`] - the master keypair
//! - [`value_objects`] - wire blob, derived keys, master key, logical path
//! - [`services`] - cipher capability, key/nonce derivation, cascade

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

pub use entities::MasterKeypair;
pub use error::CloakError;
pub use services::{
    derive_nonce, derive_subkeys, CascadeCipher, LayerCipher, LAYER_COUNT, LAYER_KEY_SIZES,
    LAYER_NONCE_SIZES, LAYER_TAG_SIZES,
};
pub use value_objects::{DerivedKeys, EncryptedBlob, LogicalPath, MasterKey, BLOB_OVERHEAD, WIRE_VERSION};

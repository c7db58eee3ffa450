// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Value Objects
//!
//! Immutable, self-validating values of the GitCloak domain:
//!
//! - [`EncryptedBlob`] - the versioned on-wire shape of an encrypted file
//! - [`DerivedKeys`] - the six per-file subkeys, zeroized on drop
//! - [`MasterKey`] - the 32-byte master encryption key, zeroized on drop
//! - [`LogicalPath`] - the repository-relative path used as salt input and
//!   associated data
//!
//! Value objects enforce their invariants at construction time and expose
//! no mutating operations.

mod derived_keys;
mod encrypted_blob;
mod logical_path;
mod master_key;

pub use derived_keys::DerivedKeys;
pub use encrypted_blob::{EncryptedBlob, BLOB_OVERHEAD, WIRE_VERSION};
pub use logical_path::LogicalPath;
pub use master_key::MasterKey;

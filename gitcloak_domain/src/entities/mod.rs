// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Entities
//!
//! The single entity of this domain is the [`MasterKeypair`]: the hybrid
//! classical + post-quantum secret a repository is initialized with. It is
//! created once, persisted by the infrastructure key store, and read-only
//! thereafter.

mod master_keypair;

pub use master_keypair::{
    MasterKeypair, CLASSICAL_PUBLIC_SIZE, CLASSICAL_SECRET_SIZE, KEYPAIR_ENCODED_SIZE,
    PQ_DECAPS_KEY_SIZE, PQ_ENCAPS_KEY_SIZE,
};

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Repositories
//!
//! Persistence for the domain's single entity: the master keypair, stored
//! as one binary file under the host VCS's private metadata directory.

mod key_store;

pub use key_store::KeyStore;

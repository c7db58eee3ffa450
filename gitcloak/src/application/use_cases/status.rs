// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Status Use Case
//!
//! Read-only report: is the key store initialized, are the filter
//! configuration keys present, and a public-key fingerprint so two clones
//! can confirm they share a keypair without comparing secrets.

use sha3::{Digest, Sha3_256};

use gitcloak_domain::CloakError;

use crate::infrastructure::repositories::KeyStore;
use crate::infrastructure::runtime::config_get;

/// Snapshot of the repository's gitcloak configuration.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub initialized: bool,
    pub clean_filter: Option<String>,
    pub smudge_filter: Option<String>,
    pub filter_required: bool,
    /// Short hex fingerprint of the ML-KEM encapsulation key; `None`
    /// until initialized.
    pub key_fingerprint: Option<String>,
}

/// Collects the status report for the given key store.
pub fn repository_status(key_store: &KeyStore) -> Result<StatusReport, CloakError> {
    let key_fingerprint = match key_store.load() {
        Ok(keypair) => {
            let digest = Sha3_256::digest(keypair.pq_encaps_key());
            Some(hex::encode(&digest[..8]))
        }
        Err(CloakError::NotInitialized) => None,
        Err(error) => return Err(error),
    };

    Ok(StatusReport {
        initialized: key_fingerprint.is_some(),
        clean_filter: config_get("filter.gitcloak.clean")?,
        smudge_filter: config_get("filter.gitcloak.smudge")?,
        filter_required: config_get("filter.gitcloak.required")?.as_deref() == Some("true"),
        key_fingerprint,
    })
}

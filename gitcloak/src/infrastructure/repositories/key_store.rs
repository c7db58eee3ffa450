// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Key Store
//!
//! File-backed persistence for the [`MasterKeypair`]. The keypair lives in
//! a single binary file (`keypair.bin`) inside a `gitcloak/` directory
//! under the host VCS's metadata directory, so it is never itself
//! versioned.
//!
//! ## Invariants
//!
//! - Owner read/write only (0600), enforced when the file is created and
//!   verified on every load (unix).
//! - Byte-exact round trip: `load ∘ persist` is the identity.
//! - Unencrypted at rest. Local-disk compromise is explicitly outside the
//!   threat model; passphrase wrapping can be added later without a wire
//!   format change.
//!
//! The store's location is a constructor input; there is no hidden
//! process-wide singleton, and tests point it at a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use gitcloak_domain::value_objects::MasterKey;
use gitcloak_domain::{CloakError, MasterKeypair};

/// File name of the persisted keypair within the store directory.
const KEYPAIR_FILE_NAME: &str = "keypair.bin";

/// File-backed master keypair store.
pub struct KeyStore {
    store_dir: PathBuf,
}

impl KeyStore {
    /// Creates a store rooted at `metadata_dir` (the host VCS's private
    /// directory, e.g. `.git`). The keypair file lives at
    /// `<metadata_dir>/gitcloak/keypair.bin`.
    pub fn new(metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: metadata_dir.into().join("gitcloak"),
        }
    }

    /// Full path of the keypair file.
    pub fn key_file(&self) -> PathBuf {
        self.store_dir.join(KEYPAIR_FILE_NAME)
    }

    /// Whether a keypair has been persisted.
    pub fn is_initialized(&self) -> bool {
        self.key_file().is_file()
    }

    /// Persists `keypair`, creating the store directory as needed.
    ///
    /// The file is written with owner-only permissions before any key
    /// bytes reach the disk.
    pub fn persist(&self, keypair: &MasterKeypair) -> Result<(), CloakError> {
        fs::create_dir_all(&self.store_dir)?;

        let path = self.key_file();
        write_owner_only(&path, &keypair.to_bytes())?;
        debug!(path = %path.display(), "persisted master keypair");
        Ok(())
    }

    /// Loads the persisted keypair.
    ///
    /// A missing file is [`CloakError::NotInitialized`]; a present file
    /// that fails permission or structure checks is reported as corruption
    /// rather than silently accepted.
    pub fn load(&self) -> Result<MasterKeypair, CloakError> {
        let path = self.key_file();
        if !path.is_file() {
            return Err(CloakError::NotInitialized);
        }

        verify_owner_only(&path)?;

        let bytes = fs::read(&path)?;
        MasterKeypair::from_bytes(&bytes)
    }

    /// Loads the keypair and derives the master encryption key from it.
    pub fn derive_master_key(&self) -> Result<MasterKey, CloakError> {
        Ok(self.load()?.derive_master_key())
    }
}

#[cfg(unix)]
fn write_owner_only(path: &Path, bytes: &[u8]) -> Result<(), CloakError> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // An existing file keeps its old mode; pin it down regardless.
    let mut permissions = file.metadata()?.permissions();
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(0o600);
    file.set_permissions(permissions)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, bytes: &[u8]) -> Result<(), CloakError> {
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(unix)]
fn verify_owner_only(path: &Path) -> Result<(), CloakError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)?.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(CloakError::io_error(format!(
            "{} is group/world accessible (mode {:o}); run chmod 600 on it",
            path.display(),
            mode & 0o777
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn verify_owner_only(_path: &Path) -> Result<(), CloakError> {
    Ok(())
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repository Initialization Use Case
//!
//! Generates and persists the master keypair, then wires the host VCS to
//! the filters: the clean and smudge commands plus the `required` flag
//! that makes silent bypass impossible. Refuses to overwrite an existing
//! keypair; losing it would orphan every blob encrypted under it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use gitcloak_domain::{CloakError, MasterKeypair};

use crate::infrastructure::repositories::KeyStore;
use crate::infrastructure::runtime::config_set;

/// Name of the filter in git configuration and `.gitattributes`.
const FILTER_NAME: &str = "gitcloak";

/// Template seeded into a missing `.gitattributes`.
const ATTRIBUTES_TEMPLATE: &str = "\
# Paths matched here are transparently encrypted by gitcloak.
# Uncomment or add patterns, then `gitcloak add` the affected files:
#
# secrets/**  filter=gitcloak
# *.env       filter=gitcloak
";

/// What `init` did, for user-facing reporting.
#[derive(Debug, Clone)]
pub struct InitReport {
    pub key_file: PathBuf,
    pub seeded_attributes: bool,
}

/// Initializes the current repository.
pub struct InitRepository {
    key_store: KeyStore,
    worktree_root: PathBuf,
}

impl InitRepository {
    pub fn new(key_store: KeyStore, worktree_root: PathBuf) -> Self {
        Self {
            key_store,
            worktree_root,
        }
    }

    pub fn execute(&self) -> Result<InitReport, CloakError> {
        if self.key_store.is_initialized() {
            return Err(CloakError::invalid_config(format!(
                "a master keypair already exists at {}; refusing to overwrite it",
                self.key_store.key_file().display()
            )));
        }

        let keypair = MasterKeypair::generate()?;
        self.key_store.persist(&keypair)?;
        info!(key_file = %self.key_store.key_file().display(), "generated master keypair");

        // Filter commands receive the logical path as their final argument.
        config_set(
            &format!("filter.{FILTER_NAME}.clean"),
            &format!("{FILTER_NAME} clean %f"),
        )?;
        config_set(
            &format!("filter.{FILTER_NAME}.smudge"),
            &format!("{FILTER_NAME} smudge %f"),
        )?;
        config_set(&format!("filter.{FILTER_NAME}.required"), "true")?;

        let seeded_attributes = self.seed_attributes_file(&self.worktree_root)?;

        Ok(InitReport {
            key_file: self.key_store.key_file(),
            seeded_attributes,
        })
    }

    /// Writes the `.gitattributes` template if the file does not exist.
    /// An existing file is never touched; pattern selection belongs to
    /// the user.
    fn seed_attributes_file(&self, root: &Path) -> Result<bool, CloakError> {
        let attributes = root.join(".gitattributes");
        if attributes.exists() {
            return Ok(false);
        }
        fs::write(&attributes, ATTRIBUTES_TEMPLATE)?;
        info!(path = %attributes.display(), "seeded .gitattributes template");
        Ok(true)
    }
}

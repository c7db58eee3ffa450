// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the error system for the GitCloak domain. Every
//! failure mode of the cipher cascade, the wire codec, the key store, and
//! the staging workflow maps onto one [`CloakError`] variant.
//!
//! ## Error Categories
//!
//! ### Cryptographic Errors
//! - **AuthenticationFailed**: a layer's tag did not verify on decrypt
//! - **InvalidParameters**: wrong key/nonce/tag sizes reached a provider
//!
//! ### Wire-Format Errors
//! - **InvalidBlobFormat**: stored bytes too short or structurally wrong
//! - **UnsupportedVersion**: unknown leading version byte
//!
//! ### Key-Store Errors
//! - **NotInitialized**: filter ran before a master keypair exists
//! - **KeyStoreCorrupted**: keypair file present but not parseable
//!
//! ### Workflow Errors
//! - **CommandFailed**: the host VCS add verb exited non-zero
//! - **IndexLockConflict**: index-lock contention, retried internally
//! - **TaskExit**: a staging worker was killed (e.g. timeout)
//! - **InvalidPaths**: paths that can never reach an exec'd command
//!
//! ## Recovery Strategy
//!
//! `IndexLockConflict` is the only retryable kind; the staging workflow
//! retries it with exponential backoff before surfacing it as
//! `CommandFailed`. `InvalidBlobFormat` and `UnsupportedVersion` are
//! tolerated on the smudge path (legacy plaintext passthrough); everything
//! else is reported to the user and exits non-zero.

use thiserror::Error;

/// Domain-specific errors for the GitCloak encryption filter.
///
/// Each variant represents a specific failure mode and carries enough
/// context for a one-line stderr diagnostic. Variants are designed so the
/// filter facade and the staging workflow can pattern-match on the *kind*
/// of failure without string inspection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloakError {
    #[error("gitcloak is not initialized in this repository; run `gitcloak init`")]
    NotInitialized,

    #[error("unsupported wire format version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid encrypted blob: {0}")]
    InvalidBlobFormat(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("key store corrupted: {0}")]
    KeyStoreCorrupted(String),

    #[error("command failed with status {exit_status:?}: {stderr}")]
    CommandFailed {
        exit_status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Internal signal: the add verb lost the race for the VCS index lock.
    /// Never surfaced directly; retried and then converted to
    /// [`CloakError::CommandFailed`].
    #[error("index lock contention: {stderr}")]
    IndexLockConflict {
        exit_status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("staging task exited abnormally: {0}")]
    TaskExit(String),

    #[error("invalid paths: {0}")]
    InvalidPaths(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl CloakError {
    /// Creates a new blob-format error
    pub fn invalid_blob_format(msg: impl Into<String>) -> Self {
        Self::InvalidBlobFormat(msg.into())
    }

    /// Creates a new authentication error
    pub fn authentication_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Creates a new parameter-validation error
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new IO error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }

    /// Creates a new task-exit error
    pub fn task_exit(msg: impl Into<String>) -> Self {
        Self::TaskExit(msg.into())
    }

    /// Creates a new invalid-paths error
    pub fn invalid_paths(msg: impl Into<String>) -> Self {
        Self::InvalidPaths(msg.into())
    }

    /// Checks if the error is retryable by the staging workflow
    pub fn is_retryable(&self) -> bool {
        matches!(self, CloakError::IndexLockConflict { .. })
    }

    /// Checks if the smudge path treats this parse failure as legacy
    /// plaintext.
    ///
    /// Buffers that are too short to be a blob, or whose leading byte is
    /// not the current wire version, predate the filter and pass through
    /// unchanged.
    pub fn is_legacy_passthrough(&self) -> bool {
        matches!(
            self,
            CloakError::InvalidBlobFormat(_) | CloakError::UnsupportedVersion(_)
        )
    }

    /// Gets the error category
    pub fn category(&self) -> &'static str {
        match self {
            CloakError::NotInitialized => "key_store",
            CloakError::UnsupportedVersion(_) => "wire_format",
            CloakError::InvalidBlobFormat(_) => "wire_format",
            CloakError::AuthenticationFailed(_) => "crypto",
            CloakError::InvalidParameters(_) => "crypto",
            CloakError::InvalidConfiguration(_) => "configuration",
            CloakError::KeyStoreCorrupted(_) => "key_store",
            CloakError::CommandFailed { .. } => "workflow",
            CloakError::IndexLockConflict { .. } => "workflow",
            CloakError::TaskExit(_) => "workflow",
            CloakError::InvalidPaths(_) => "workflow",
            CloakError::IoError(_) => "io",
        }
    }

    /// Converts an exhausted index-lock conflict into the surfaced
    /// command failure.
    pub fn into_command_failed(self) -> Self {
        match self {
            CloakError::IndexLockConflict {
                exit_status,
                stdout,
                stderr,
            } => CloakError::CommandFailed {
                exit_status,
                stdout,
                stderr,
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for CloakError {
    fn from(err: std::io::Error) -> Self {
        CloakError::IoError(err.to_string())
    }
}

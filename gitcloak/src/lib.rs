// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GitCloak
//!
//! A transparent encryption layer for git. Designated files live as
//! ciphertext in history and on every remote, yet appear as plaintext in
//! the working directory, with no change to user workflow: git invokes
//! the `clean` filter before storing content and the `smudge` filter
//! before writing it to the working tree, and this crate implements both.
//!
//! ## Architecture Overview
//!
//! The workspace follows Clean Architecture and Domain-Driven Design
//! principles:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Bootstrap (gitcloak-bootstrap)             │
//! │  (CLI parsing, exit codes, logger initialization)           │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (clean/smudge/init/status use cases, staging workflow)     │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Domain Layer (gitcloak-domain)                 │
//! │  (wire codec, key derivation, six-layer cipher cascade)     │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                         │
//! │  (AEAD adapters, key store, git runner, progress/telemetry) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! ### The cipher cascade
//! Content passes through six AEAD layers from distinct primitive
//! families (AES-256-GCM, AEGIS-256, Schwaemm256-256, Deoxys-II-256,
//! Ascon-128a, ChaCha20-Poly1305). Keys and nonces are derived per file
//! from the master key and the logical path, and the path is
//! authenticated by every layer.
//!
//! ### Determinism
//! git is content-addressed: the clean filter must be a pure function of
//! `(content, path, key)` so identical inputs produce identical stored
//! objects. Nonces are derived from subkeys, never from content or
//! randomness.
//!
//! ### The staging workflow
//! Bulk encryption happens by staging files through `git add` with
//! bounded concurrency. The git index is a single-writer resource behind
//! a lock file; contention is detected from the add verb's diagnostics
//! and retried with exponential backoff.
//!
//! ## Error Handling
//!
//! All failures map onto `gitcloak_domain::CloakError`. Filter processes
//! report a one-line diagnostic on stderr and exit non-zero with stdout
//! left empty, so the host VCS preserves the original content.

pub mod application;
pub mod infrastructure;
pub mod presentation;

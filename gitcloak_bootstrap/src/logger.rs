// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Tracing subscriber initialization. Everything goes to **stderr**: when
//! the binary runs as a filter, stdout carries the raw payload bytes and
//! a single stray log line would corrupt staged content.
//!
//! The filter defaults to `warn` (or `debug` with `--verbose`) and is
//! overridable through `GITCLOAK_LOG`.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV_VAR: &str = "GITCLOAK_LOG";

/// Initializes the global tracing subscriber.
///
/// Safe to call once per process; a second call is ignored (relevant for
/// test binaries that run several entry points).
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    tracing::debug!(verbose, "logger initialized");
}

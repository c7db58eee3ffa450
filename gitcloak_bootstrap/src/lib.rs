// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GitCloak Bootstrap
//!
//! Entry-point concerns, kept apart from both domain and application
//! logic: the clap CLI surface, Unix exit-code mapping, and tracing
//! subscriber initialization. The binary crate wires these together in
//! its `main`.

pub mod cli;
pub mod exit_code;
pub mod logger;

pub use cli::{parse_cli, Cli, Commands};
pub use exit_code::ExitCode;

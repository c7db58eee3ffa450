// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error Module
//!
//! Error types for the GitCloak domain layer. The single [`CloakError`]
//! enum covers every failure mode the filter pipeline and the staging
//! workflow can surface, categorized so callers can decide between retry,
//! passthrough, and hard failure.

mod cloak_error;

pub use cloak_error::CloakError;

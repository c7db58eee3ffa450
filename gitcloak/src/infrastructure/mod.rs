// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete implementations of the domain's ports: the six cipher layer
//! adapters, the file-backed key store, the git command runner and
//! environment queries, and the progress/telemetry services.

pub mod adapters;
pub mod repositories;
pub mod runtime;
pub mod services;

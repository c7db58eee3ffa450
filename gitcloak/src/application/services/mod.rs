// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Services
//!
//! Long-running application workflows. Currently one: the concurrent
//! staging workflow that drives bulk encryption through the host VCS's
//! add verb.

mod staging;

pub use staging::{StagingFailure, StagingOptions, StagingReport, StagingWorkflow};

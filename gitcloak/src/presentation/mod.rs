// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation Layer
//!
//! The stdio protocol shim the host VCS talks to. Everything here treats
//! content as opaque bytes; no text decoding ever happens on the filter
//! path.

mod filter_io;

pub use filter_io::run_filter;

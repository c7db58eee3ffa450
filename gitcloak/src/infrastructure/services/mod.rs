// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Services
//!
//! Observability plumbing for the staging workflow: the progress-adapter
//! capability with its terminal and no-op implementations, and the
//! telemetry sink that brackets each `add_files` run with start/stop
//! events.

mod progress_indicator;
mod telemetry;

pub use progress_indicator::{NoOpProgress, ProgressAdapter, TerminalProgressBar};
pub use telemetry::{RecordingTelemetry, TelemetryEvent, TelemetrySink, TracingTelemetry};

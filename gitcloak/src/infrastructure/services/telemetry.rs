// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Telemetry Service
//!
//! External instrumentation hooks for the staging workflow. The workflow
//! emits exactly one `<prefix>.start` and one `<prefix>.stop` event per
//! `add_files` call, including early-failure paths, with measurements
//! (counts, µs durations) and metadata (status) as structured JSON values.
//!
//! No sink is required to be present: the tracing-backed default simply
//! logs the events, and a recording sink backs the workflow tests.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::info;

/// One emitted telemetry event.
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    /// Full event name, e.g. `gitcloak.add_files.start`.
    pub name: String,
    /// Numeric measurements (counts, durations).
    pub measurements: Value,
    /// Contextual metadata (status, configuration echoes).
    pub metadata: Value,
}

/// Capability: a sink for telemetry events.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);
}

/// Default sink: forwards events to the tracing subscriber.
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        info!(
            target: "gitcloak::telemetry",
            event = %event.name,
            measurements = %event.measurements,
            metadata = %event.metadata,
            "telemetry event"
        );
    }
}

/// Recording sink for tests: stores every event in order.
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event emitted so far.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    /// Names only, for order assertions.
    pub fn event_names(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name.clone()).collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        self.events.lock().push(event);
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Progress Indicator Service
//!
//! Real-time progress feedback for the staging workflow, separate from
//! logging and telemetry. The terminal implementation draws a single-line
//! bar updated in place; the no-op implementation serves headless and test
//! contexts.
//!
//! ## Design Principles
//!
//! - **User-Focused**: immediate visual feedback, bypassing the logging
//!   system (which targets stderr diagnostics, not interactivity)
//! - **Concurrent-Safe**: lock-free counters; a mutex only coordinates
//!   terminal writes
//! - **Throttled**: redraws are rate-limited so high-throughput staging
//!   does not spend its time in terminal I/O
//! - **Non-Fatal**: terminal write errors are swallowed; progress display
//!   never affects processing
//!
//! ## Output Format
//!
//! ```text
//! Staging [##########----------] 125/250
//! ```

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Capability: a sink for staging progress events.
///
/// `start` announces the total, `advance` reports completed paths (in
/// completion order, not submission order), `finish` closes the display.
/// Implementations must be safe to call from the workflow's reducer only;
/// they are not required to tolerate concurrent `advance` calls.
pub trait ProgressAdapter: Send + Sync {
    fn start(&self, total: u64);
    fn advance(&self, completed: u64);
    fn finish(&self);
}

/// No-op adapter for headless contexts; every call returns immediately.
pub struct NoOpProgress;

impl ProgressAdapter for NoOpProgress {
    fn start(&self, _total: u64) {}
    fn advance(&self, _completed: u64) {}
    fn finish(&self) {}
}

/// Terminal implementation: a single-line bar redrawn in place.
pub struct TerminalProgressBar {
    total: AtomicU64,
    processed: AtomicU64,
    /// Coordinates terminal output and redraw throttling.
    display: Mutex<DisplayState>,
}

struct DisplayState {
    last_draw: Instant,
    started: bool,
}

/// Width of the bar in characters.
const BAR_WIDTH: u64 = 20;

/// Minimum interval between redraws.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

impl TerminalProgressBar {
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            display: Mutex::new(DisplayState {
                last_draw: Instant::now(),
                started: false,
            }),
        }
    }

    fn draw(&self, force: bool) {
        let mut display = self.display.lock();
        if !display.started {
            return;
        }
        let now = Instant::now();
        if !force && now.duration_since(display.last_draw) < REDRAW_INTERVAL {
            return;
        }
        display.last_draw = now;

        let total = self.total.load(Ordering::Relaxed);
        let processed = self.processed.load(Ordering::Relaxed).min(total);
        let filled = if total == 0 {
            BAR_WIDTH
        } else {
            processed * BAR_WIDTH / total
        };

        let mut line = String::with_capacity(64);
        line.push_str("\rStaging [");
        for i in 0..BAR_WIDTH {
            line.push(if i < filled { '#' } else { '-' });
        }
        line.push_str(&format!("] {processed}/{total}"));

        print!("{line}");
        io::stdout().flush().unwrap_or(());
    }
}

impl Default for TerminalProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressAdapter for TerminalProgressBar {
    fn start(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.display.lock().started = true;
        self.draw(true);
    }

    fn advance(&self, completed: u64) {
        self.processed.fetch_add(completed, Ordering::Relaxed);
        self.draw(false);
    }

    fn finish(&self) {
        self.draw(true);
        let mut display = self.display.lock();
        if display.started {
            println!();
            io::stdout().flush().unwrap_or(());
            display.started = false;
        }
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Staging Workflow Integration Tests
//!
//! Exercises `add_files` against in-memory command runners: exactly-once
//! dispatch, duplicate collapsing, index-lock retry bounds, cancellation
//! after a hard failure, timeouts, the concurrency bound, and the
//! one-start/one-stop telemetry contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use gitcloak::application::services::{StagingOptions, StagingWorkflow};
use gitcloak::infrastructure::runtime::{CommandOutput, CommandRunner};
use gitcloak::infrastructure::services::{NoOpProgress, RecordingTelemetry};
use gitcloak_domain::CloakError;

fn ok_output() -> CommandOutput {
    CommandOutput {
        exit_status: Some(0),
        stdout: String::new(),
        stderr: String::new(),
    }
}

/// Records every batch it receives and succeeds.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run_add(&self, batch: &[String]) -> Result<CommandOutput, CloakError> {
        self.calls.lock().push(batch.to_vec());
        Ok(ok_output())
    }
}

/// Always fails with an index.lock diagnostic; counts attempts per batch.
#[derive(Default)]
struct LockedIndexRunner {
    attempts: Mutex<HashMap<String, u32>>,
}

impl LockedIndexRunner {
    fn attempts_for(&self, key: &str) -> u32 {
        self.attempts.lock().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl CommandRunner for LockedIndexRunner {
    async fn run_add(&self, batch: &[String]) -> Result<CommandOutput, CloakError> {
        let key = batch.join(",");
        *self.attempts.lock().entry(key).or_insert(0) += 1;
        Ok(CommandOutput {
            exit_status: Some(128),
            stdout: String::new(),
            stderr: "fatal: Unable to create '/repo/.git/index.lock': File exists.".to_string(),
        })
    }
}

/// Fails hard on one specific path, succeeds otherwise; records calls.
struct PoisonedRunner {
    poison: String,
    calls: Mutex<Vec<Vec<String>>>,
}

impl PoisonedRunner {
    fn new(poison: &str) -> Self {
        Self {
            poison: poison.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CommandRunner for PoisonedRunner {
    async fn run_add(&self, batch: &[String]) -> Result<CommandOutput, CloakError> {
        self.calls.lock().push(batch.to_vec());
        if batch.iter().any(|p| *p == self.poison) {
            Ok(CommandOutput {
                exit_status: Some(1),
                stdout: String::new(),
                stderr: format!("fatal: pathspec '{}' did not match any files", self.poison),
            })
        } else {
            Ok(ok_output())
        }
    }
}

/// Tracks how many invocations run concurrently.
#[derive(Default)]
struct ConcurrencyProbeRunner {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl CommandRunner for ConcurrencyProbeRunner {
    async fn run_add(&self, _batch: &[String]) -> Result<CommandOutput, CloakError> {
        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(ok_output())
    }
}

/// Never finishes within any reasonable timeout.
struct StuckRunner;

#[async_trait]
impl CommandRunner for StuckRunner {
    async fn run_add(&self, _batch: &[String]) -> Result<CommandOutput, CloakError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ok_output())
    }
}

fn workflow_with(runner: Arc<dyn CommandRunner>) -> (StagingWorkflow, Arc<RecordingTelemetry>) {
    let telemetry = Arc::new(RecordingTelemetry::new());
    let workflow = StagingWorkflow::new(runner, Arc::new(NoOpProgress), telemetry.clone());
    (workflow, telemetry)
}

fn paths(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn options() -> StagingOptions {
    StagingOptions {
        max_concurrency: 2,
        batch_size: 1,
        retry_backoff_ms: 1,
        ..StagingOptions::default()
    }
}

#[tokio::test]
async fn test_e7_duplicates_and_empties_collapse() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let report = workflow
        .add_files(&paths(&["a", "b", "a", "", "c"]), &options())
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.batches, 3);
    assert_eq!(report.total, 3);

    let mut staged: Vec<String> = runner.calls().into_iter().flatten().collect();
    staged.sort();
    assert_eq!(staged, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_e8_retry_bound_on_persistent_lock_contention() {
    let runner = Arc::new(LockedIndexRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let failure = workflow
        .add_files(
            &paths(&["a", "b"]),
            &StagingOptions {
                index_lock_retries: 3,
                ..options()
            },
        )
        .await
        .unwrap_err();

    // index_lock_retries + 1 attempts per batch, then surfaced as a
    // command failure.
    assert_eq!(runner.attempts_for("a"), 4);
    assert_eq!(runner.attempts_for("b"), 4);
    assert!(matches!(failure.error, CloakError::CommandFailed { .. }));
    assert_eq!(failure.processed, 0);
    assert_eq!(failure.total, 2);
}

#[tokio::test]
async fn test_single_path_repeated_dispatches_once() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let report = workflow
        .add_files(&paths(&["p", "p", "p"]), &options())
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(runner.calls(), vec![vec!["p".to_string()]]);
}

#[tokio::test]
async fn test_batching_preserves_caller_order_within_batches() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let report = workflow
        .add_files(
            &paths(&["a", "b", "c", "d", "e"]),
            &StagingOptions {
                max_concurrency: 1,
                batch_size: 2,
                ..options()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.processed, 5);
    assert_eq!(report.batches, 3);
    assert_eq!(
        runner.calls(),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
            vec!["e".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_hard_failure_halts_undispatched_batches() {
    let runner = Arc::new(PoisonedRunner::new("c"));
    let (workflow, _) = workflow_with(runner.clone());

    let failure = workflow
        .add_files(
            &paths(&["a", "b", "c", "d", "e"]),
            &StagingOptions {
                max_concurrency: 1,
                ..options()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CloakError::CommandFailed { .. }));
    assert_eq!(failure.processed, 2);
    assert_eq!(failure.remaining, 3);
    assert_eq!(failure.total, 5);
    assert_eq!(failure.failed_paths, vec!["c".to_string()]);
    // a, b, c ran; d and e were never dispatched.
    assert_eq!(runner.call_count(), 3);
}

#[tokio::test]
async fn test_failure_record_carries_runner_diagnostics() {
    let runner = Arc::new(PoisonedRunner::new("x"));
    let (workflow, _) = workflow_with(runner);

    let failure = workflow.add_files(&paths(&["x"]), &options()).await.unwrap_err();
    match failure.error {
        CloakError::CommandFailed {
            exit_status,
            stderr,
            ..
        } => {
            assert_eq!(exit_status, Some(1));
            assert!(stderr.contains("pathspec"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_reports_task_exit() {
    let (workflow, _) = workflow_with(Arc::new(StuckRunner));

    let failure = workflow
        .add_files(
            &paths(&["slow"]),
            &StagingOptions {
                timeout: Some(Duration::from_millis(50)),
                ..options()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CloakError::TaskExit(_)));
    assert_eq!(failure.failed_paths, vec!["slow".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_stays_bounded() {
    let runner = Arc::new(ConcurrencyProbeRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let report = workflow
        .add_files(
            &paths(&["a", "b", "c", "d", "e", "f", "g", "h"]),
            &StagingOptions {
                max_concurrency: 2,
                ..options()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.processed, 8);
    assert!(runner.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_telemetry_emits_one_start_and_one_stop_on_success() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, telemetry) = workflow_with(runner);

    workflow.add_files(&paths(&["a", "b"]), &options()).await.unwrap();

    assert_eq!(
        telemetry.event_names(),
        vec!["gitcloak.add_files.start", "gitcloak.add_files.stop"]
    );
    let events = telemetry.events();
    assert_eq!(events[0].measurements["total"], 2);
    assert_eq!(events[1].metadata["status"], "ok");
}

#[tokio::test]
async fn test_telemetry_emits_one_pair_on_failure() {
    let (workflow, telemetry) = workflow_with(Arc::new(PoisonedRunner::new("a")));

    workflow.add_files(&paths(&["a"]), &options()).await.unwrap_err();

    assert_eq!(
        telemetry.event_names(),
        vec!["gitcloak.add_files.start", "gitcloak.add_files.stop"]
    );
    assert_eq!(telemetry.events()[1].metadata["status"], "error");
}

#[tokio::test]
async fn test_custom_telemetry_prefix() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, telemetry) = workflow_with(runner);

    workflow
        .add_files(
            &paths(&["a"]),
            &StagingOptions {
                telemetry_prefix: "myapp.bulk".to_string(),
                ..options()
            },
        )
        .await
        .unwrap();

    assert_eq!(telemetry.event_names(), vec!["myapp.bulk.start", "myapp.bulk.stop"]);
}

#[tokio::test]
async fn test_empty_input_is_a_successful_noop() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, telemetry) = workflow_with(runner.clone());

    let report = workflow.add_files(&[], &options()).await.unwrap();
    assert_eq!(report.processed, 0);
    assert_eq!(report.batches, 0);
    assert_eq!(report.total, 0);
    assert!(runner.calls().is_empty());
    // Even a no-op run brackets itself in telemetry.
    assert_eq!(telemetry.event_names().len(), 2);
}

#[tokio::test]
async fn test_nul_bytes_surface_invalid_paths_before_dispatch() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let failure = workflow
        .add_files(&paths(&["ok", "bad\0path"]), &options())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CloakError::InvalidPaths(_)));
    assert_eq!(failure.failed_paths, vec!["bad\0path".to_string()]);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_zero_concurrency_is_rejected() {
    let runner = Arc::new(RecordingRunner::default());
    let (workflow, _) = workflow_with(runner.clone());

    let failure = workflow
        .add_files(
            &paths(&["a"]),
            &StagingOptions {
                max_concurrency: 0,
                ..options()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CloakError::InvalidConfiguration(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_exactly_once_across_batch_and_concurrency_mixes() {
    // Invariant 7: every unique path reaches the runner exactly once for
    // any batch_size / max_concurrency combination.
    let names: Vec<String> = (0..23).map(|i| format!("file-{i:02}")).collect();

    for batch_size in [1usize, 2, 5, 23, 50] {
        for max_concurrency in [1usize, 2, 8] {
            let runner = Arc::new(RecordingRunner::default());
            let (workflow, _) = workflow_with(runner.clone());

            let report = workflow
                .add_files(
                    &names,
                    &StagingOptions {
                        max_concurrency,
                        batch_size,
                        ..options()
                    },
                )
                .await
                .unwrap();

            assert_eq!(report.processed, 23);
            assert_eq!(report.total, 23);
            assert_eq!(report.batches, 23u64.div_ceil(batch_size as u64));

            let mut staged: Vec<String> = runner.calls().into_iter().flatten().collect();
            staged.sort();
            let mut expected = names.clone();
            expected.sort();
            assert_eq!(
                staged, expected,
                "batch_size={batch_size} max_concurrency={max_concurrency}"
            );
        }
    }
}

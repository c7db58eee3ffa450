// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Concurrent Staging Workflow
//!
//! Bulk-encrypt driver: given a list of logical paths, invoke the host
//! VCS's add verb over them with bounded concurrency, which in turn runs
//! the clean filter per file. Per-file cryptographic work dominates, so
//! parallelism pays, but the VCS serializes its index through a lock
//! file, so lock contention is an expected, retryable signal rather than
//! an error.
//!
//! ## Algorithm
//!
//! 1. Normalize: drop empties, deduplicate preserving first occurrence.
//! 2. Chunk into batches of `batch_size`.
//! 3. Dispatch batches through a semaphore-bounded task set; results
//!    complete out of order.
//! 4. Per batch: retry index-lock contention with exponential backoff and
//!    jitter; halt new dispatch on the first non-retryable failure.
//! 5. A per-task timeout kills the batch (the runner's child process dies
//!    with the dropped future) and reports `task_exit`.
//! 6. Exactly one telemetry `start` and `stop` event per call.
//!
//! ## Concurrency Model
//!
//! No task shares writable state with another: batches are disjoint, and
//! the reducer that consumes completed tasks is the sole writer of the
//! progress counters. Batches already running when a failure occurs finish
//! on their own; their outcomes are collected but no longer change the
//! overall result.
//!
//! Re-running the workflow over the same paths is safe: the add verb is
//! idempotent for identical content and the clean filter is deterministic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use gitcloak_domain::CloakError;

use crate::infrastructure::runtime::CommandRunner;
use crate::infrastructure::services::{ProgressAdapter, TelemetryEvent, TelemetrySink};

/// Upper bound on the random per-retry jitter in milliseconds. Small
/// relative to the doubling backoff so the expected behavior stays
/// roughly exponential.
const RETRY_JITTER_MAX_MS: u64 = 15;

/// Options for one `add_files` run.
#[derive(Debug, Clone)]
pub struct StagingOptions {
    /// Upper bound on concurrent add invocations.
    pub max_concurrency: usize,
    /// Paths passed to a single invocation.
    pub batch_size: usize,
    /// Per-task wall-clock limit covering the batch's retries; `None`
    /// means unbounded.
    pub timeout: Option<Duration>,
    /// Event-name prefix for telemetry.
    pub telemetry_prefix: String,
    /// Retries on detected index-lock contention.
    pub index_lock_retries: u32,
    /// Initial backoff; doubles per retry, plus jitter.
    pub retry_backoff_ms: u64,
}

impl Default for StagingOptions {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            batch_size: 1,
            timeout: None,
            telemetry_prefix: "gitcloak.add_files".to_string(),
            index_lock_retries: 25,
            retry_backoff_ms: 50,
        }
    }
}

/// Successful workflow result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingReport {
    /// Paths staged successfully.
    pub processed: u64,
    /// Batches dispatched.
    pub batches: u64,
    /// Unique non-empty input paths.
    pub total: u64,
}

/// Rich failure record: the original error plus the running tally, so
/// callers can report partial progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("staging failed after {processed}/{total} paths ({remaining} remaining): {error}")]
pub struct StagingFailure {
    #[source]
    pub error: CloakError,
    pub processed: u64,
    pub remaining: u64,
    pub total: u64,
    /// Paths of the batch that caused the failure.
    pub failed_paths: Vec<String>,
}

/// Outcome of one dispatched batch, consumed by the reducer.
enum BatchOutcome {
    Done { count: u64 },
    Skipped,
    Failed { paths: Vec<String>, error: CloakError },
}

/// The staging workflow with its collaborator capabilities.
pub struct StagingWorkflow {
    runner: Arc<dyn CommandRunner>,
    progress: Arc<dyn ProgressAdapter>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl StagingWorkflow {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        progress: Arc<dyn ProgressAdapter>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            runner,
            progress,
            telemetry,
        }
    }

    /// Stages `paths` through the host VCS's add verb.
    ///
    /// Synchronous to its caller in the async sense: returns only when all
    /// dispatched work has completed, even after a failure halted new
    /// dispatch.
    pub async fn add_files(
        &self,
        paths: &[String],
        options: &StagingOptions,
    ) -> Result<StagingReport, StagingFailure> {
        let started_at = Instant::now();
        let unique = normalize_paths(paths);
        let total = unique.len() as u64;

        self.telemetry.emit(TelemetryEvent {
            name: format!("{}.start", options.telemetry_prefix),
            measurements: json!({
                "total": total,
                "max_concurrency": options.max_concurrency,
                "batch_size": options.batch_size,
            }),
            metadata: json!({}),
        });

        let result = self.run(unique, total, options).await;

        self.telemetry.emit(TelemetryEvent {
            name: format!("{}.stop", options.telemetry_prefix),
            measurements: json!({
                "duration_us": started_at.elapsed().as_micros() as u64,
            }),
            metadata: json!({
                "status": if result.is_ok() { "ok" } else { "error" },
            }),
        });

        result
    }

    async fn run(
        &self,
        unique: Vec<String>,
        total: u64,
        options: &StagingOptions,
    ) -> Result<StagingReport, StagingFailure> {
        let fail = |error: CloakError, failed_paths: Vec<String>| StagingFailure {
            error,
            processed: 0,
            remaining: total,
            total,
            failed_paths,
        };

        if options.max_concurrency == 0 {
            return Err(fail(
                CloakError::invalid_config("max_concurrency must be at least 1"),
                Vec::new(),
            ));
        }
        if options.batch_size == 0 {
            return Err(fail(
                CloakError::invalid_config("batch_size must be at least 1"),
                Vec::new(),
            ));
        }

        // Paths with interior NUL bytes can never be passed to an exec'd
        // command; surface them before any dispatch.
        let unrepresentable: Vec<String> = unique
            .iter()
            .filter(|p| p.contains('\0'))
            .cloned()
            .collect();
        if !unrepresentable.is_empty() {
            return Err(fail(
                CloakError::invalid_paths(format!(
                    "{} path(s) contain NUL bytes",
                    unrepresentable.len()
                )),
                unrepresentable,
            ));
        }

        let batches: Vec<Vec<String>> = unique
            .chunks(options.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        let batch_count = batches.len() as u64;

        if total == 0 {
            return Ok(StagingReport {
                processed: 0,
                batches: 0,
                total: 0,
            });
        }

        self.progress.start(total);

        let semaphore = Arc::new(Semaphore::new(options.max_concurrency));
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut tasks: JoinSet<BatchOutcome> = JoinSet::new();

        for batch in batches {
            let semaphore = semaphore.clone();
            let cancelled = cancelled.clone();
            let runner = self.runner.clone();
            let timeout = options.timeout;
            let retries = options.index_lock_retries;
            let backoff_ms = options.retry_backoff_ms;

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return BatchOutcome::Skipped,
                };
                // A batch that has not started when a failure lands is
                // not dispatched at all.
                if cancelled.load(Ordering::SeqCst) {
                    return BatchOutcome::Skipped;
                }

                let work = run_batch_with_retries(runner, &batch, retries, backoff_ms);
                let result = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, work).await {
                        Ok(result) => result,
                        Err(_) => Err(CloakError::task_exit(format!(
                            "batch killed after exceeding the {}ms task timeout",
                            limit.as_millis()
                        ))),
                    },
                    None => work.await,
                };

                match result {
                    Ok(()) => BatchOutcome::Done {
                        count: batch.len() as u64,
                    },
                    Err(error) => {
                        // Flag before this task's permit is released, so a
                        // batch waiting on the semaphore can never start
                        // after the failure.
                        cancelled.store(true, Ordering::SeqCst);
                        BatchOutcome::Failed {
                            paths: batch,
                            error,
                        }
                    }
                }
            });
        }

        // Reducer: the sole writer of the progress counters. Consumes
        // completions in finish order.
        let mut processed = 0u64;
        let mut failure: Option<StagingFailure> = None;

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_error) => BatchOutcome::Failed {
                    paths: Vec::new(),
                    error: CloakError::task_exit(join_error.to_string()),
                },
            };

            match outcome {
                BatchOutcome::Done { count } => {
                    if failure.is_none() {
                        processed += count;
                        self.progress.advance(count);
                    } else {
                        // Collected, but the overall status is already set.
                        debug!(count, "batch completed after failure; ignored");
                    }
                }
                BatchOutcome::Skipped => {}
                BatchOutcome::Failed { paths, error } => {
                    if failure.is_none() {
                        cancelled.store(true, Ordering::SeqCst);
                        warn!(%error, failed = paths.len(), "staging batch failed; halting dispatch");
                        failure = Some(StagingFailure {
                            error,
                            processed,
                            remaining: total - processed,
                            total,
                            failed_paths: paths,
                        });
                    }
                }
            }
        }

        self.progress.finish();

        match failure {
            Some(failure) => Err(failure),
            None => Ok(StagingReport {
                processed,
                batches: batch_count,
                total,
            }),
        }
    }
}

/// Stringify, drop empties, deduplicate preserving first-occurrence order.
fn normalize_paths(paths: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    paths
        .iter()
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.as_str().to_owned()))
        .cloned()
        .collect()
}

/// Runs one batch, retrying index-lock contention with exponential
/// backoff plus jitter. Exhausted contention surfaces as `CommandFailed`.
async fn run_batch_with_retries(
    runner: Arc<dyn CommandRunner>,
    batch: &[String],
    retries: u32,
    backoff_ms: u64,
) -> Result<(), CloakError> {
    let mut attempt: u32 = 0;
    loop {
        let output = runner.run_add(batch).await?;
        if output.success() {
            return Ok(());
        }

        let contended = output
            .combined_output()
            .to_ascii_lowercase()
            .contains("index.lock");
        let error = if contended {
            CloakError::IndexLockConflict {
                exit_status: output.exit_status,
                stdout: output.stdout,
                stderr: output.stderr,
            }
        } else {
            CloakError::CommandFailed {
                exit_status: output.exit_status,
                stdout: output.stdout,
                stderr: output.stderr,
            }
        };

        if error.is_retryable() && attempt < retries {
            let delay = retry_delay(backoff_ms, attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "index.lock contention; backing off");
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        return Err(error.into_command_failed());
    }
}

/// `backoff_ms · 2^attempt` plus a small positive jitter.
fn retry_delay(backoff_ms: u64, attempt: u32) -> Duration {
    let doubled = backoff_ms.saturating_mul(1u64 << attempt.min(20));
    let jitter = rand::rng().random_range(1..=RETRY_JITTER_MAX_MS);
    Duration::from_millis(doubled.saturating_add(jitter))
}

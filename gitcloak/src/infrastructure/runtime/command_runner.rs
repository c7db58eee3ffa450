// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command Runner Port
//!
//! The capability through which the staging workflow invokes the host
//! VCS's add verb. One async method taking a batch of paths; the real
//! implementation shells out to the git binary, and the test suites
//! substitute in-memory recorders and scripted failures.
//!
//! The runner reports outcomes, it does not classify them: whether a
//! failure is index-lock contention or a hard error is the workflow's
//! decision, made on the combined diagnostic streams.

use async_trait::async_trait;
use tokio::process::Command;

use gitcloak_domain::CloakError;

/// Outcome of one add-verb invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; `None` when the process died on a signal.
    pub exit_status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }

    /// Both diagnostic streams, for contention-signal matching.
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Capability: run the host VCS add verb over one batch of paths.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Stages `batch` (in the given order). An `Err` means the command
    /// could not be executed at all; a non-zero exit is a normal
    /// `CommandOutput`.
    async fn run_add(&self, batch: &[String]) -> Result<CommandOutput, CloakError>;
}

/// The production runner: `git add -- <batch…>`.
///
/// `kill_on_drop` is set so a timed-out task tears down the child process
/// when its future is dropped.
pub struct GitCommandRunner {
    git_binary: String,
}

impl GitCommandRunner {
    pub fn new() -> Self {
        Self {
            git_binary: "git".to_string(),
        }
    }

    /// Overrides the git binary, for sandboxed environments.
    pub fn with_binary(git_binary: impl Into<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
        }
    }
}

impl Default for GitCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitCommandRunner {
    async fn run_add(&self, batch: &[String]) -> Result<CommandOutput, CloakError> {
        let output = Command::new(&self.git_binary)
            .arg("add")
            .arg("--")
            .args(batch)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                CloakError::io_error(format!("failed to spawn {}: {e}", self.git_binary))
            })?;

        Ok(CommandOutput {
            exit_status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_exit() {
        let ok = CommandOutput {
            exit_status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(ok.success());

        let failed = CommandOutput {
            exit_status: Some(128),
            ..ok.clone()
        };
        assert!(!failed.success());

        let signalled = CommandOutput {
            exit_status: None,
            ..ok
        };
        assert!(!signalled.success());
    }

    #[test]
    fn test_combined_output_includes_both_streams() {
        let output = CommandOutput {
            exit_status: Some(1),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        let combined = output.combined_output();
        assert!(combined.contains("out"));
        assert!(combined.contains("err"));
    }
}

// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Git Environment Queries
//!
//! One-shot, synchronous queries against the surrounding git repository:
//! metadata-directory discovery (worktree-aware via `git rev-parse`) and
//! config reads/writes. These run once at startup, before any async work,
//! so they use blocking process I/O deliberately.

use std::path::PathBuf;
use std::process::Command;

use gitcloak_domain::CloakError;

/// Resolves the repository's metadata directory (`.git`, or the per-worktree
/// git dir). Fails when the working directory is not inside a git repository.
pub fn resolve_git_dir() -> Result<PathBuf, CloakError> {
    let output = run_git(&["rev-parse", "--absolute-git-dir"])?;
    Ok(PathBuf::from(output.trim()))
}

/// Resolves the top-level working-tree directory.
pub fn resolve_worktree_root() -> Result<PathBuf, CloakError> {
    let output = run_git(&["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(output.trim()))
}

/// Reads a config value; `None` when the key is unset.
pub fn config_get(key: &str) -> Result<Option<String>, CloakError> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .output()
        .map_err(|e| CloakError::io_error(format!("failed to spawn git: {e}")))?;

    if output.status.success() {
        Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ))
    } else {
        // Exit 1 from `git config --get` means the key is unset.
        Ok(None)
    }
}

/// Writes a repository-local config value.
pub fn config_set(key: &str, value: &str) -> Result<(), CloakError> {
    run_git(&["config", key, value]).map(|_| ())
}

fn run_git(args: &[&str]) -> Result<String, CloakError> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| CloakError::io_error(format!("failed to spawn git: {e}")))?;

    if !output.status.success() {
        return Err(CloakError::CommandFailed {
            exit_status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

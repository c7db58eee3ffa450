// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # End-to-End Repository Tests
//!
//! Drives the compiled `gitcloak` binary inside a scratch git repository:
//! init (keypair + filter config), the clean/smudge stdio protocol, and
//! the stderr/exit-code contract. Skipped silently when no git binary is
//! available in the environment.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn gitcloak_bin() -> &'static str {
    env!("CARGO_BIN_EXE_gitcloak")
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str]) -> std::process::Output {
    Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .expect("failed to run git")
}

fn init_scratch_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    assert!(git(dir.path(), &["init", "-q"]).status.success());
    dir
}

/// Runs a gitcloak verb with `input` piped to stdin, returning
/// `(exit_code, stdout, stderr)`.
fn run_gitcloak(repo: &Path, args: &[&str], input: &[u8]) -> (i32, Vec<u8>, String) {
    let mut child = Command::new(gitcloak_bin())
        .current_dir(repo)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn gitcloak");

    child.stdin.as_mut().unwrap().write_all(input).unwrap();
    let output = child.wait_with_output().unwrap();

    (
        output.status.code().unwrap_or(-1),
        output.stdout,
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_e2e_init_creates_key_and_filter_config() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();

    let (code, _, stderr) = run_gitcloak(repo.path(), &["init"], b"");
    assert_eq!(code, 0, "init failed: {stderr}");

    let key_file = repo.path().join(".git/gitcloak/keypair.bin");
    assert!(key_file.is_file(), "keypair file missing");

    let clean = git(repo.path(), &["config", "--get", "filter.gitcloak.clean"]);
    assert!(String::from_utf8_lossy(&clean.stdout).contains("gitcloak clean"));
    let required = git(repo.path(), &["config", "--get", "filter.gitcloak.required"]);
    assert_eq!(String::from_utf8_lossy(&required.stdout).trim(), "true");

    assert!(repo.path().join(".gitattributes").is_file());

    // Re-running init must refuse to overwrite the keypair.
    let (code, _, stderr) = run_gitcloak(repo.path(), &["init"], b"");
    assert_ne!(code, 0);
    assert!(stderr.contains("refusing"), "unexpected stderr: {stderr}");
}

#[test]
fn test_e2e_clean_smudge_round_trip_through_stdio() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    run_gitcloak(repo.path(), &["init"], b"");

    let plaintext: &[u8] = b"API_KEY=1234";
    let (code, blob, stderr) = run_gitcloak(repo.path(), &["clean", "secrets/.env"], plaintext);
    assert_eq!(code, 0, "clean failed: {stderr}");
    assert_eq!(blob.len(), plaintext.len() + 129);
    assert_eq!(blob[0], 3, "wire version byte");

    let (code, recovered, stderr) = run_gitcloak(repo.path(), &["smudge", "secrets/.env"], &blob);
    assert_eq!(code, 0, "smudge failed: {stderr}");
    assert_eq!(recovered, plaintext);
}

#[test]
fn test_e2e_clean_is_deterministic_across_processes() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    run_gitcloak(repo.path(), &["init"], b"");

    let (_, first, _) = run_gitcloak(repo.path(), &["clean", "blob.bin"], &[0xAB; 4096]);
    let (_, second, _) = run_gitcloak(repo.path(), &["clean", "blob.bin"], &[0xAB; 4096]);
    assert_eq!(first, second);
}

#[test]
fn test_e2e_smudge_passes_legacy_content_through() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    run_gitcloak(repo.path(), &["init"], b"");

    let legacy: &[u8] = b"# plain readme from before encryption\n";
    let (code, output, _) = run_gitcloak(repo.path(), &["smudge", "README.md"], legacy);
    assert_eq!(code, 0);
    assert_eq!(output, legacy);
}

#[test]
fn test_e2e_uninitialized_clean_exits_nonzero_with_empty_stdout() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    // No init: the clean filter must fail, leave stdout empty, and write
    // a one-line diagnostic to stderr.
    let (code, stdout, stderr) = run_gitcloak(repo.path(), &["clean", "f.txt"], b"content");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not initialized"), "stderr: {stderr}");
}

#[test]
fn test_e2e_tampered_blob_fails_smudge() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    run_gitcloak(repo.path(), &["init"], b"");

    let (_, mut blob, _) = run_gitcloak(repo.path(), &["clean", "f.txt"], b"secret data");
    let last = blob.len() - 1;
    blob[last] ^= 0x01;

    let (code, stdout, stderr) = run_gitcloak(repo.path(), &["smudge", "f.txt"], &blob);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("authentication"), "stderr: {stderr}");
}

#[test]
fn test_e2e_status_reflects_initialization() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();

    let (code, stdout, _) = run_gitcloak(repo.path(), &["status"], b"");
    assert_eq!(code, 0);
    assert!(String::from_utf8_lossy(&stdout).contains("not initialized"));

    run_gitcloak(repo.path(), &["init"], b"");

    let (code, stdout, _) = run_gitcloak(repo.path(), &["status"], b"");
    assert_eq!(code, 0);
    let stdout = String::from_utf8_lossy(&stdout);
    assert!(stdout.contains("initialized"));
    assert!(stdout.contains("required flag:  set"));
}

#[test]
fn test_e2e_add_stages_files_through_the_filter() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let repo = init_scratch_repo();
    run_gitcloak(repo.path(), &["init"], b"");

    // Route the file through the filter and verify the stored object is
    // an encrypted blob, not plaintext.
    std::fs::write(
        repo.path().join(".gitattributes"),
        "secret.txt filter=gitcloak\n",
    )
    .unwrap();
    std::fs::write(repo.path().join("secret.txt"), b"API_KEY=1234").unwrap();

    // The filter command must be resolvable by git; point it at the test
    // binary explicitly.
    git(
        repo.path(),
        &[
            "config",
            "filter.gitcloak.clean",
            &format!("{} clean %f", gitcloak_bin()),
        ],
    );
    git(
        repo.path(),
        &[
            "config",
            "filter.gitcloak.smudge",
            &format!("{} smudge %f", gitcloak_bin()),
        ],
    );

    let (code, _, stderr) = run_gitcloak(repo.path(), &["add", "--quiet", "secret.txt"], b"");
    assert_eq!(code, 0, "add failed: {stderr}");

    let stored = git(repo.path(), &["cat-file", "blob", ":secret.txt"]);
    assert!(stored.status.success());
    assert_ne!(stored.stdout, b"API_KEY=1234");
    assert_eq!(stored.stdout[0], 3, "stored object carries the wire version");
    assert_eq!(stored.stdout.len(), b"API_KEY=1234".len() + 129);
}

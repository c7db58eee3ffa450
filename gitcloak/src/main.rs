// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GitCloak Binary
//!
//! Wires bootstrap (CLI, logger, exit codes) to the application use
//! cases. The filter verbs exit 0/1 per git's filter protocol; the other
//! verbs use sysexits-style codes derived from the error category.

use std::sync::Arc;
use std::time::Duration;

use gitcloak_bootstrap::cli::{parse_cli, Commands};
use gitcloak_bootstrap::exit_code::ExitCode;
use gitcloak_bootstrap::logger;

use gitcloak_domain::value_objects::LogicalPath;
use gitcloak_domain::{CascadeCipher, CloakError};

use gitcloak::application::services::{StagingOptions, StagingWorkflow};
use gitcloak::application::use_cases::{
    repository_status, CleanFile, InitRepository, SmudgeFile,
};
use gitcloak::infrastructure::adapters::standard_cascade;
use gitcloak::infrastructure::repositories::KeyStore;
use gitcloak::infrastructure::runtime::{
    resolve_git_dir, resolve_worktree_root, GitCommandRunner,
};
use gitcloak::infrastructure::services::{
    NoOpProgress, ProgressAdapter, TerminalProgressBar, TracingTelemetry,
};
use gitcloak::presentation::run_filter;

#[tokio::main]
async fn main() {
    let cli = parse_cli();
    logger::init(cli.verbose);

    // git's filter protocol pins clean/smudge to exit 0 or 1.
    let is_filter = matches!(cli.command, Commands::Clean { .. } | Commands::Smudge { .. });

    let code = match run(cli.command).await {
        Ok(()) => ExitCode::Success,
        Err(error) => {
            eprintln!("gitcloak: {error}");
            if is_filter {
                ExitCode::Error
            } else {
                ExitCode::from_category(error.category())
            }
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands) -> Result<(), CloakError> {
    match command {
        Commands::Init => init().await,
        Commands::Clean { path } => clean(path).await,
        Commands::Smudge { path } => smudge(path).await,
        Commands::Add {
            paths,
            concurrency,
            batch_size,
            timeout_ms,
            quiet,
        } => add(paths, concurrency, batch_size, timeout_ms, quiet).await,
        Commands::Status => status().await,
    }
}

fn repository_key_store() -> Result<KeyStore, CloakError> {
    Ok(KeyStore::new(resolve_git_dir()?))
}

fn cascade() -> Result<Arc<CascadeCipher>, CloakError> {
    Ok(Arc::new(standard_cascade()?))
}

async fn init() -> Result<(), CloakError> {
    let key_store = repository_key_store()?;
    let worktree_root = resolve_worktree_root()?;
    let report = InitRepository::new(key_store, worktree_root).execute()?;

    println!("Initialized gitcloak.");
    println!("  key file: {}", report.key_file.display());
    if report.seeded_attributes {
        println!("  seeded .gitattributes; add patterns there to choose what gets encrypted");
    }
    println!("Share the key file out of band with collaborators who need access.");
    Ok(())
}

async fn clean(path: String) -> Result<(), CloakError> {
    let use_case = CleanFile::new(Arc::new(repository_key_store()?), cascade()?);
    let path = LogicalPath::new(path)?;
    run_filter(|input| use_case.execute(input, &path)).await
}

async fn smudge(path: String) -> Result<(), CloakError> {
    let use_case = SmudgeFile::new(Arc::new(repository_key_store()?), cascade()?);
    let path = LogicalPath::new(path)?;
    run_filter(|input| use_case.execute(input, &path)).await
}

async fn add(
    paths: Vec<String>,
    concurrency: Option<usize>,
    batch_size: usize,
    timeout_ms: Option<u64>,
    quiet: bool,
) -> Result<(), CloakError> {
    let mut options = StagingOptions {
        batch_size,
        timeout: timeout_ms.map(Duration::from_millis),
        ..StagingOptions::default()
    };
    if let Some(concurrency) = concurrency {
        options.max_concurrency = concurrency;
    }

    let progress: Arc<dyn ProgressAdapter> = if quiet {
        Arc::new(NoOpProgress)
    } else {
        Arc::new(TerminalProgressBar::new())
    };

    let workflow = StagingWorkflow::new(
        Arc::new(GitCommandRunner::new()),
        progress,
        Arc::new(TracingTelemetry),
    );

    match workflow.add_files(&paths, &options).await {
        Ok(report) => {
            println!(
                "Staged {} path(s) in {} batch(es).",
                report.processed, report.batches
            );
            Ok(())
        }
        Err(failure) => {
            eprintln!(
                "gitcloak: staged {}/{} path(s) before failing; {} remaining",
                failure.processed, failure.total, failure.remaining
            );
            if !failure.failed_paths.is_empty() {
                eprintln!("gitcloak: failing batch: {}", failure.failed_paths.join(", "));
            }
            if let CloakError::CommandFailed { stderr, .. } = &failure.error {
                for line in stderr.lines().take(5) {
                    eprintln!("gitcloak: git: {line}");
                }
            }
            Err(failure.error)
        }
    }
}

async fn status() -> Result<(), CloakError> {
    let key_store = repository_key_store()?;
    let report = repository_status(&key_store)?;

    println!(
        "key store:      {}",
        if report.initialized {
            "initialized"
        } else {
            "not initialized (run `gitcloak init`)"
        }
    );
    if let Some(fingerprint) = &report.key_fingerprint {
        println!("key:            {fingerprint}");
    }
    println!(
        "clean filter:   {}",
        report.clean_filter.as_deref().unwrap_or("not configured")
    );
    println!(
        "smudge filter:  {}",
        report.smudge_filter.as_deref().unwrap_or("not configured")
    );
    println!(
        "required flag:  {}",
        if report.filter_required { "set" } else { "not set" }
    );
    Ok(())
}

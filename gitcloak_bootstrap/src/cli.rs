// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! The clap surface of the `gitcloak` binary. The `clean` and `smudge`
//! verbs are what git invokes (the logical path arrives as the final
//! argument); `init`, `add`, and `status` are for people.

use clap::{Parser, Subcommand};

/// Transparent encryption for git: files live encrypted in history and on
/// remotes, and appear as plaintext in your working tree.
#[derive(Debug, Parser)]
#[command(name = "gitcloak", version, about)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the master keypair and configure this repository's filters
    Init,

    /// Clean filter: read plaintext on stdin, write the encrypted blob to
    /// stdout (invoked by git)
    Clean {
        /// Repository-relative path of the file being staged
        path: String,
    },

    /// Smudge filter: read stored bytes on stdin, write plaintext to
    /// stdout (invoked by git)
    Smudge {
        /// Repository-relative path of the file being checked out
        path: String,
    },

    /// Stage files through git with bounded concurrency, encrypting them
    /// via the clean filter
    Add {
        /// Paths to stage
        #[arg(required = true)]
        paths: Vec<String>,

        /// Maximum concurrent git invocations (default: hardware threads)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Paths per git invocation
        #[arg(long, default_value_t = 1)]
        batch_size: usize,

        /// Per-batch timeout in milliseconds (default: none)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Report key-store and filter-configuration status
    Status,
}

/// Parses the process arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_takes_a_path() {
        let cli = Cli::try_parse_from(["gitcloak", "clean", "secrets/.env"]).unwrap();
        match cli.command {
            Commands::Clean { path } => assert_eq!(path, "secrets/.env"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_add_requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["gitcloak", "add"]).is_err());
    }

    #[test]
    fn test_add_options() {
        let cli = Cli::try_parse_from([
            "gitcloak",
            "add",
            "--concurrency",
            "4",
            "--batch-size",
            "10",
            "--timeout-ms",
            "5000",
            "a",
            "b",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                paths,
                concurrency,
                batch_size,
                timeout_ms,
                quiet,
            } => {
                assert_eq!(paths, vec!["a", "b"]);
                assert_eq!(concurrency, Some(4));
                assert_eq!(batch_size, 10);
                assert_eq!(timeout_ms, Some(5000));
                assert!(!quiet);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["gitcloak", "status", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}

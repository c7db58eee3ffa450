// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Filter Stdio Shim
//!
//! The host VCS's filter protocol: the entire input arrives on stdin, the
//! entire output leaves on stdout. Content fits in memory by contract
//! with the host VCS (it buffers filter payloads itself), so the shim
//! reads to EOF before transforming.
//!
//! On error nothing is written to stdout; the caller prints a one-line
//! diagnostic to stderr and exits non-zero, and the host VCS keeps the
//! original file.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use gitcloak_domain::CloakError;

/// Reads all of stdin, applies `transform`, writes the result to stdout.
pub async fn run_filter<F>(transform: F) -> Result<(), CloakError>
where
    F: FnOnce(&[u8]) -> Result<Vec<u8>, CloakError>,
{
    let mut input = Vec::new();
    tokio::io::stdin().read_to_end(&mut input).await?;

    let output = transform(&input)?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}

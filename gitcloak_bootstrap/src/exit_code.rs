// /////////////////////////////////////////////////////////////////////////////
// GitCloak
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions,
//! mapped from error categories so the binary never hard-codes numbers.
//!
//! The filter verbs are an exception by protocol: git expects `clean` and
//! `smudge` to exit 0 or 1, so the binary collapses their failures to
//! [`ExitCode::Error`] regardless of category.

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65) - malformed blobs, failed authentication
    DataError = 65,

    /// Internal software error (70)
    Software = 70,

    /// I/O error (74)
    IoError = 74,

    /// Configuration error (78) - uninitialized key store, bad options
    Config = 78,
}

impl ExitCode {
    /// Maps an error category (as reported by the domain error's
    /// `category()`) onto an exit code.
    pub fn from_category(category: &str) -> Self {
        match category {
            "wire_format" | "crypto" => ExitCode::DataError,
            "key_store" | "configuration" => ExitCode::Config,
            "io" => ExitCode::IoError,
            "workflow" => ExitCode::Error,
            _ => ExitCode::Software,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(ExitCode::from_category("wire_format"), ExitCode::DataError);
        assert_eq!(ExitCode::from_category("crypto"), ExitCode::DataError);
        assert_eq!(ExitCode::from_category("key_store"), ExitCode::Config);
        assert_eq!(ExitCode::from_category("configuration"), ExitCode::Config);
        assert_eq!(ExitCode::from_category("io"), ExitCode::IoError);
        assert_eq!(ExitCode::from_category("workflow"), ExitCode::Error);
        assert_eq!(ExitCode::from_category("anything-else"), ExitCode::Software);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::DataError.as_i32(), 65);
        assert_eq!(ExitCode::Config.as_i32(), 78);
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Error types for the DVC executor capability

use std::path::PathBuf;
use thiserror::Error;

/// Result type for DVC executor operations
pub type DvcResult<T> = Result<T, DvcError>;

/// Errors raised by the DVC executor capability
#[derive(Debug, Error)]
pub enum DvcError {
    /// The dvc binary could not be found on PATH
    #[error("dvc executable `{binary}` was not found on PATH")]
    MissingExecutable {
        /// Name of the binary that was probed
        binary: String,
    },

    /// The dvc binary is present but its version is outside the supported range
    #[error("dvc executable has unsupported version {found} (required: {required})")]
    VersionMismatch {
        /// Version reported by `dvc version`
        found: semver::Version,
        /// Configured version constraint
        required: semver::VersionReq,
    },

    /// The output of `dvc version` could not be parsed
    #[error("could not parse dvc version from output: {0:?}")]
    VersionParse(String),

    /// A dvc subcommand exited with a non-zero status
    #[error("dvc command `{command}` exited with code {exit_code} (cwd: {}): {output}", .workdir.display())]
    Command {
        /// Full command line that was executed
        command: String,
        /// Process exit code (-1 when terminated by a signal)
        exit_code: i32,
        /// Captured stdout and stderr
        output: String,
        /// Working directory the command ran in
        workdir: PathBuf,
    },

    /// A pointer metadata file could not be parsed
    #[error("invalid pointer metadata: {0}")]
    Pointer(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DvcError {
    /// Create a Pointer error with context
    pub fn pointer<S: Into<String>>(msg: S) -> Self {
        DvcError::Pointer(msg.into())
    }

    /// Check if this is a MissingExecutable error
    pub fn is_missing_executable(&self) -> bool {
        matches!(self, DvcError::MissingExecutable { .. })
    }

    /// Check if this is a VersionMismatch error
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, DvcError::VersionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_display() {
        let err = DvcError::MissingExecutable {
            binary: "dvc".to_string(),
        };
        assert!(err.is_missing_executable());
        assert_eq!(
            err.to_string(),
            "dvc executable `dvc` was not found on PATH"
        );
    }

    #[test]
    fn test_command_error_display() {
        let err = DvcError::Command {
            command: "dvc push".to_string(),
            exit_code: 1,
            output: "remote unavailable".to_string(),
            workdir: PathBuf::from("/tmp/repo"),
        };
        let text = err.to_string();
        assert!(text.contains("dvc push"));
        assert!(text.contains("code 1"));
        assert!(text.contains("remote unavailable"));
    }

    #[test]
    fn test_pointer_helper() {
        let err = DvcError::pointer("missing outs");
        assert!(matches!(err, DvcError::Pointer(_)));
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Error types for the client facade

use datafs_dvc::DvcError;
use datafs_git::ScmError;
use thiserror::Error;

/// Result type for client operations
pub type FsResult<T> = Result<T, FsError>;

/// Errors raised by the client facade
#[derive(Debug, Error)]
pub enum FsError {
    /// The Git remote could not be cloned
    #[error("repository {url} is unreachable: {source}")]
    RepositoryUnreachable {
        /// Clone URL that was attempted
        url: String,
        /// Underlying source-control error
        source: ScmError,
    },

    /// The logical path has no pointer file in the repository
    #[error("file {path} is not tracked in repository {repo}")]
    FileNotTracked {
        /// Repository URL
        repo: String,
        /// Logical path that was requested
        path: String,
    },

    /// The pointer file exists but the payload could not be fetched
    #[error("payload for {path} in repository {repo} could not be materialized")]
    MaterializationFailed {
        /// Repository URL
        repo: String,
        /// Logical path whose payload is missing
        path: String,
    },

    /// The Git phase of a push protocol failed after the blob phase succeeded
    #[error("git update of {repo} failed for {files:?}: {source}")]
    GitUpdate {
        /// Repository URL
        repo: String,
        /// Logical paths the operation was working on
        files: Vec<String>,
        /// Underlying source-control error
        source: ScmError,
    },

    /// No commit touching the given paths exists in the inspected window
    #[error("no commit touching {paths:?} within the last {window} commits of {repo}")]
    NoHistory {
        /// Repository URL
        repo: String,
        /// Pointer-file paths that were searched for
        paths: Vec<String>,
        /// Number of newest commits inspected
        window: usize,
    },

    /// DVC executor error (missing executable, version mismatch, failed command)
    #[error(transparent)]
    Executor(#[from] DvcError),

    /// Source-control error outside the push protocol
    #[error(transparent)]
    Scm(#[from] ScmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Check if this is a FileNotTracked error
    pub fn is_not_tracked(&self) -> bool {
        matches!(self, FsError::FileNotTracked { .. })
    }

    /// Check if this is a MaterializationFailed error
    pub fn is_materialization_failed(&self) -> bool {
        matches!(self, FsError::MaterializationFailed { .. })
    }

    /// Check if this is a RepositoryUnreachable error
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FsError::RepositoryUnreachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_tracked_display_names_repo_and_path() {
        let err = FsError::FileNotTracked {
            repo: "https://example.invalid/data.git".to_string(),
            path: "models/weights.bin".to_string(),
        };
        assert!(err.is_not_tracked());
        let text = err.to_string();
        assert!(text.contains("models/weights.bin"));
        assert!(text.contains("https://example.invalid/data.git"));
    }

    #[test]
    fn test_executor_errors_convert() {
        let err: FsError = DvcError::pointer("empty outs").into();
        assert!(matches!(err, FsError::Executor(_)));
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Per-operation metadata records
//!
//! Every bulk operation returns a record describing what it actually did,
//! so callers can log or assert on it without re-querying the repository.

use datafs_git::CommitInfo;
use serde::Serialize;
use std::time::Duration;

/// Outcome of an update (or remove) push-protocol run.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMetadata {
    /// Repository URL the operation ran against
    pub repo: String,

    /// Logical paths the caller asked for
    pub requested: Vec<String>,

    /// Logical paths that actually went through the protocol. Empty when the
    /// operation was a no-op (empty input, or unchanged write-handle content).
    pub updated: Vec<String>,

    /// Commit message used for the Git phase, when a commit was made
    pub commit_message: Option<String>,

    /// Commit created by the Git phase, when one was made
    pub commit: Option<CommitInfo>,

    /// Wall-clock duration of the whole operation
    pub duration: Duration,
}

/// Outcome of a bulk download.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadMetadata {
    /// Repository URL the operation ran against
    pub repo: String,

    /// Logical paths delivered, in request order
    pub files: Vec<String>,

    /// Delivered payload sizes in bytes, parallel to `files`
    pub sizes: Vec<u64>,

    /// Wall-clock duration of the whole operation
    pub duration: Duration,
}

impl DownloadMetadata {
    /// Total number of payload bytes delivered.
    pub fn total_bytes(&self) -> u64 {
        self.sizes.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_bytes_sums_sizes() {
        let meta = DownloadMetadata {
            repo: "repo".to_string(),
            files: vec!["a".to_string(), "b".to_string()],
            sizes: vec![3, 7],
            duration: Duration::from_millis(1),
        };
        assert_eq!(meta.total_bytes(), 10);
    }
}

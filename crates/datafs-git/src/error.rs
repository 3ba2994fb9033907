// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Error types for the source-control capability

use thiserror::Error;

/// Result type for source-control operations
pub type ScmResult<T> = Result<T, ScmError>;

/// Errors raised by the source-control capability
#[derive(Debug, Error)]
pub enum ScmError {
    /// Cloning the remote failed for transport or authentication reasons
    #[error("repository {url} is not accessible: {source}")]
    NotAccessible {
        /// Clone URL that was attempted
        url: String,
        /// Underlying git error
        source: git2::Error,
    },

    /// No repository exists at the given local path
    #[error("no repository at path: {0}")]
    NotARepository(String),

    /// Git library error
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScmError {
    /// Check if this is a NotAccessible error
    pub fn is_not_accessible(&self) -> bool {
        matches!(self, ScmError::NotAccessible { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_accessible_display() {
        let err = ScmError::NotAccessible {
            url: "https://example.invalid/repo.git".to_string(),
            source: git2::Error::from_str("could not resolve host"),
        };
        assert!(err.is_not_accessible());
        assert!(err.to_string().contains("https://example.invalid/repo.git"));
    }
}

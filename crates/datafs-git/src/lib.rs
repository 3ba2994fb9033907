// DataFs - filesystem-like access to DVC-tracked repositories
// Copyright (C) 2026 DataFs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! # DataFs Source-Control Layer
//!
//! Capability interface over the Git side of a DVC repository:
//!
//! - [`SourceControl`]: clones a remote (or opens a pre-staged local
//!   working copy) and hands back a repository handle
//! - [`ScmRepo`]: index add/remove, commit, push to origin, and a bounded
//!   newest-first history query over specific paths
//!
//! [`Git2SourceControl`] is the libgit2-backed implementation;
//! [`CountingScm`] wraps any implementation and counts clone/open calls for
//! tests that assert on cache reuse.

pub mod error;
pub mod mock;
pub mod repo;

pub use error::{ScmError, ScmResult};
pub use mock::{CountingScm, ScmCounters};
pub use repo::Git2SourceControl;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

/// Identity and timestamp of a created or inspected commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit id (hex object id)
    pub id: String,

    /// Committer timestamp
    pub timestamp: DateTime<Utc>,
}

/// Factory capability: obtains repository handles.
pub trait SourceControl: Send + Sync + Debug {
    /// Clones `url` into `dest` and returns a handle bound to the clone.
    ///
    /// # Errors
    ///
    /// Any transport or authentication failure maps to
    /// [`ScmError::NotAccessible`].
    fn clone_repo(&self, url: &str, dest: &Path) -> ScmResult<Box<dyn ScmRepo>>;

    /// Opens an existing local working copy without cloning.
    fn open_repo(&self, path: &Path) -> ScmResult<Box<dyn ScmRepo>>;
}

/// Operations on one cloned working copy.
pub trait ScmRepo: Debug {
    /// Stages the given workdir-relative paths into the index.
    fn add_to_index(&self, rel_paths: &[String]) -> ScmResult<()>;

    /// Stages deletions of the given workdir-relative paths.
    fn remove_from_index(&self, rel_paths: &[String]) -> ScmResult<()>;

    /// Commits the current index state.
    fn commit(&self, message: &str) -> ScmResult<CommitInfo>;

    /// Pushes the current branch to `origin`.
    fn push_origin(&self) -> ScmResult<()>;

    /// Finds the newest commit among the most recent `max_count` that
    /// touches any of the given paths. Returns `None` when no commit in the
    /// inspected window matches (including repositories with no commits).
    fn last_commit_for(
        &self,
        rel_paths: &[String],
        max_count: usize,
    ) -> ScmResult<Option<CommitInfo>>;
}

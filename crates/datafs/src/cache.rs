// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Repository cache
//!
//! One cache owns one clone of the Git remote for the lifetime of a client.
//! The clone lives in a temporary directory that is removed when the cache
//! is disposed (or dropped); a cache opened over a pre-existing working copy
//! borrows the directory instead and never deletes it.

use crate::error::{FsError, FsResult};
use datafs_git::{ScmRepo, SourceControl};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// Owned clone of the repository's Git side.
pub struct RepoCache {
    remote_url: String,
    clone_path: PathBuf,
    /// Present only for caches that own their directory
    temp_dir: Option<TempDir>,
    repo: Box<dyn ScmRepo>,
}

impl fmt::Debug for RepoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoCache")
            .field("remote_url", &self.remote_url)
            .field("clone_path", &self.clone_path)
            .field("owned", &self.temp_dir.is_some())
            .finish()
    }
}

impl RepoCache {
    /// Clones `url` into a fresh temporary directory.
    ///
    /// The clone lands in a `repo` subdirectory so sibling staging files can
    /// live next to it without entering the working copy.
    ///
    /// # Errors
    ///
    /// [`FsError::RepositoryUnreachable`] when the clone fails.
    pub fn clone_into(
        scm: &dyn SourceControl,
        url: &str,
        temp_root: Option<&Path>,
    ) -> FsResult<Self> {
        let temp_dir = match temp_root {
            Some(root) => TempDir::new_in(root)?,
            None => TempDir::new()?,
        };
        let clone_path = temp_dir.path().join("repo");
        let repo = scm
            .clone_repo(url, &clone_path)
            .map_err(|source| FsError::RepositoryUnreachable {
                url: url.to_string(),
                source,
            })?;
        info!(url, clone = %clone_path.display(), "cached repository clone");
        Ok(Self {
            remote_url: url.to_string(),
            clone_path,
            temp_dir: Some(temp_dir),
            repo,
        })
    }

    /// Wraps an existing working copy without cloning or taking ownership.
    pub fn open_existing(scm: &dyn SourceControl, url: &str, path: &Path) -> FsResult<Self> {
        let repo = scm.open_repo(path)?;
        Ok(Self {
            remote_url: url.to_string(),
            clone_path: path.to_path_buf(),
            temp_dir: None,
            repo,
        })
    }

    /// Root of the cached working copy.
    pub fn clone_path(&self) -> &Path {
        &self.clone_path
    }

    /// Absolute path of a repository-relative file inside the clone.
    pub fn abs_path(&self, rel: &str) -> PathBuf {
        self.clone_path.join(rel)
    }

    /// Git handle over the clone.
    pub fn repo(&self) -> &dyn ScmRepo {
        self.repo.as_ref()
    }

    /// Deletes the owned clone directory. Borrowed working copies survive.
    pub fn dispose(self) {
        let Self {
            remote_url,
            temp_dir,
            repo,
            ..
        } = self;
        drop(repo);
        if let Some(temp_dir) = temp_dir {
            if let Err(err) = temp_dir.close() {
                warn!(url = %remote_url, %err, "failed to remove cached clone");
            } else {
                info!(url = %remote_url, "removed cached clone");
            }
        }
    }
}

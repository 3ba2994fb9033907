// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! libgit2-backed source-control implementation

use crate::error::{ScmError, ScmResult};
use crate::{CommitInfo, ScmRepo, SourceControl};
use chrono::{DateTime, Utc};
use git2::build::RepoBuilder;
use git2::{Commit, Repository, Signature, Sort};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Fallback committer identity for clones without a configured signature.
const FALLBACK_SIGNATURE: (&str, &str) = ("datafs", "datafs@localhost");

/// Source-control factory backed by libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2SourceControl;

impl Git2SourceControl {
    /// Creates the factory.
    pub fn new() -> Self {
        Self
    }
}

impl SourceControl for Git2SourceControl {
    fn clone_repo(&self, url: &str, dest: &Path) -> ScmResult<Box<dyn ScmRepo>> {
        debug!(url, dest = %dest.display(), "cloning repository");
        let repo = RepoBuilder::new()
            .clone(url, dest)
            .map_err(|source| ScmError::NotAccessible {
                url: url.to_string(),
                source,
            })?;
        Ok(Box::new(Git2Repo { repo }))
    }

    fn open_repo(&self, path: &Path) -> ScmResult<Box<dyn ScmRepo>> {
        let repo = Repository::open(path)
            .map_err(|_| ScmError::NotARepository(path.display().to_string()))?;
        Ok(Box::new(Git2Repo { repo }))
    }
}

/// Handle over one cloned working copy.
pub struct Git2Repo {
    repo: Repository,
}

impl fmt::Debug for Git2Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Git2Repo")
            .field("workdir", &self.repo.workdir())
            .finish()
    }
}

fn commit_info(commit: &Commit<'_>) -> CommitInfo {
    CommitInfo {
        id: commit.id().to_string(),
        timestamp: DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or_default(),
    }
}

impl ScmRepo for Git2Repo {
    fn add_to_index(&self, rel_paths: &[String]) -> ScmResult<()> {
        let mut index = self.repo.index()?;
        for path in rel_paths {
            index.add_path(Path::new(path))?;
        }
        index.write()?;
        Ok(())
    }

    fn remove_from_index(&self, rel_paths: &[String]) -> ScmResult<()> {
        let mut index = self.repo.index()?;
        for path in rel_paths {
            index.remove_path(Path::new(path))?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> ScmResult<CommitInfo> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let sig = self
            .repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_SIGNATURE.0, FALLBACK_SIGNATURE.1))?;

        // HEAD is unborn in a clone of an empty remote; the first commit
        // then has no parent.
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let oid = match &parent {
            Some(parent) => {
                self.repo
                    .commit(Some("HEAD"), &sig, &sig, message, &tree, &[parent])?
            }
            None => self
                .repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &[])?,
        };

        let commit = self.repo.find_commit(oid)?;
        debug!(id = %oid, "created commit");
        Ok(commit_info(&commit))
    }

    fn push_origin(&self) -> ScmResult<()> {
        let head = self.repo.head()?;
        let branch = head.shorthand().unwrap_or("master").to_string();
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let mut remote = self.repo.find_remote("origin")?;
        debug!(%branch, "pushing to origin");
        remote.push(&[refspec.as_str()], None)?;
        Ok(())
    }

    fn last_commit_for(
        &self,
        rel_paths: &[String],
        max_count: usize,
    ) -> ScmResult<Option<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        if revwalk.push_head().is_err() {
            return Ok(None);
        }
        revwalk.set_sorting(Sort::TIME)?;

        for (inspected, oid) in revwalk.enumerate() {
            if inspected >= max_count {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            let tree = commit.tree()?;
            let parent_tree = match commit.parent(0) {
                Ok(parent) => Some(parent.tree()?),
                Err(_) => None,
            };
            let diff =
                self.repo
                    .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
            let touched = diff.deltas().any(|delta| {
                [delta.new_file().path(), delta.old_file().path()]
                    .into_iter()
                    .flatten()
                    .any(|changed| rel_paths.iter().any(|p| Path::new(p) == changed))
            });
            if touched {
                return Ok(Some(commit_info(&commit)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafs_test_utils::FixtureRemote;
    use std::fs;
    use tempfile::TempDir;

    fn clone_fixture(remote: &FixtureRemote) -> (TempDir, Box<dyn ScmRepo>, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let clone_path = dir.path().join("repo");
        let repo = Git2SourceControl::new()
            .clone_repo(&remote.url(), &clone_path)
            .unwrap();
        (dir, repo, clone_path)
    }

    #[test]
    fn test_clone_bad_url_is_not_accessible() {
        let dir = TempDir::new().unwrap();
        let result =
            Git2SourceControl::new().clone_repo("/nonexistent/origin.git", &dir.path().join("r"));
        assert!(matches!(result, Err(ref e) if e.is_not_accessible()));
    }

    #[test]
    fn test_open_non_repository_fails() {
        let dir = TempDir::new().unwrap();
        let result = Git2SourceControl::new().open_repo(dir.path());
        assert!(matches!(result, Err(ScmError::NotARepository(_))));
    }

    #[test]
    fn test_add_commit_push_roundtrip() {
        let remote = FixtureRemote::new();
        let (_dir, repo, clone_path) = clone_fixture(&remote);

        fs::write(clone_path.join("data.txt.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["data.txt.dvc".to_string()]).unwrap();
        let info = repo.commit("Track data.txt").unwrap();
        assert_eq!(info.id.len(), 40);
        repo.push_origin().unwrap();

        assert_eq!(remote.commit_count(), 2);
        assert_eq!(remote.head_message(), "Track data.txt");
        assert!(remote.head_contains("data.txt.dvc"));
    }

    #[test]
    fn test_remove_from_index_stages_deletion() {
        let remote = FixtureRemote::new();
        let (_dir, repo, clone_path) = clone_fixture(&remote);

        fs::write(clone_path.join("a.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["a.dvc".to_string()]).unwrap();
        repo.commit("Track a").unwrap();
        repo.push_origin().unwrap();
        assert!(remote.head_contains("a.dvc"));

        fs::remove_file(clone_path.join("a.dvc")).unwrap();
        repo.remove_from_index(&["a.dvc".to_string()]).unwrap();
        repo.commit("Untrack a").unwrap();
        repo.push_origin().unwrap();
        assert!(!remote.head_contains("a.dvc"));
    }

    #[test]
    fn test_commit_on_unborn_head() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = Git2SourceControl::new().open_repo(dir.path()).unwrap();

        fs::write(dir.path().join("first.txt"), "x").unwrap();
        repo.add_to_index(&["first.txt".to_string()]).unwrap();
        let info = repo.commit("Root commit").unwrap();
        assert!(!info.id.is_empty());
    }

    #[test]
    fn test_last_commit_for_matches_touched_path() {
        let remote = FixtureRemote::new();
        let (_dir, repo, clone_path) = clone_fixture(&remote);

        fs::write(clone_path.join("a.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["a.dvc".to_string()]).unwrap();
        let a_commit = repo.commit("Track a").unwrap();

        fs::write(clone_path.join("b.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["b.dvc".to_string()]).unwrap();
        let b_commit = repo.commit("Track b").unwrap();

        let found = repo
            .last_commit_for(&["a.dvc".to_string()], 100)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, a_commit.id);

        let found = repo
            .last_commit_for(&["a.dvc".to_string(), "b.dvc".to_string()], 100)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, b_commit.id);
    }

    #[test]
    fn test_last_commit_for_untouched_path_is_none() {
        let remote = FixtureRemote::new();
        let (_dir, repo, _clone_path) = clone_fixture(&remote);
        let found = repo.last_commit_for(&["ghost.dvc".to_string()], 100).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_last_commit_for_respects_window() {
        let remote = FixtureRemote::new();
        let (_dir, repo, clone_path) = clone_fixture(&remote);

        fs::write(clone_path.join("a.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["a.dvc".to_string()]).unwrap();
        repo.commit("Track a").unwrap();

        fs::write(clone_path.join("b.dvc"), "outs: []\n").unwrap();
        repo.add_to_index(&["b.dvc".to_string()]).unwrap();
        repo.commit("Track b").unwrap();

        // Window of one only inspects the newest commit, which touches b
        let found = repo.last_commit_for(&["a.dvc".to_string()], 1).unwrap();
        assert!(found.is_none());
    }
}

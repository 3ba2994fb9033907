// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Local bare-repository fixture.
//!
//! Builds a bare Git repository seeded with one commit carrying a `.dvc`
//! config directory and a README, mirroring the layout of a freshly
//! provisioned DVC repository. The bare path doubles as a clone URL, so
//! integration tests run fully offline.

use git2::{Repository, Signature};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURE_DVC_CONFIG: &str =
    "[core]\n    remote = storage\n['remote \"storage\"']\n    url = memory://fixture\n";

/// A disposable bare Git remote with automatic cleanup.
pub struct FixtureRemote {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl FixtureRemote {
    /// Creates a bare repository seeded with an initial commit.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("origin.git");
        let repo = Repository::init_bare(&path).expect("failed to init bare repository");
        Self::seed_initial_commit(&repo);
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    /// Path of the bare repository.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clone URL for the fixture (the bare path itself).
    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let repo = Repository::open_bare(&self.path).expect("failed to open bare repository");
        let mut revwalk = repo.revwalk().expect("failed to create revwalk");
        revwalk.push_head().expect("failed to push HEAD");
        revwalk.count()
    }

    /// Message of the commit at HEAD.
    pub fn head_message(&self) -> String {
        let repo = Repository::open_bare(&self.path).expect("failed to open bare repository");
        let commit = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("failed to resolve HEAD commit");
        commit.message().unwrap_or_default().to_string()
    }

    /// Checks whether the tree at HEAD contains the given path.
    pub fn head_contains(&self, rel_path: &str) -> bool {
        let repo = Repository::open_bare(&self.path).expect("failed to open bare repository");
        let tree = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .and_then(|c| c.tree())
            .expect("failed to resolve HEAD tree");
        tree.get_path(Path::new(rel_path)).is_ok()
    }

    fn seed_initial_commit(repo: &Repository) {
        let readme = repo
            .blob(b"# Fixture repository\n")
            .expect("failed to write blob");
        let config = repo
            .blob(FIXTURE_DVC_CONFIG.as_bytes())
            .expect("failed to write blob");

        let mut dvc_tree = repo.treebuilder(None).expect("failed to create treebuilder");
        dvc_tree
            .insert("config", config, 0o100644)
            .expect("failed to insert config");
        let dvc_tree_id = dvc_tree.write().expect("failed to write tree");

        let mut root = repo.treebuilder(None).expect("failed to create treebuilder");
        root.insert("README.md", readme, 0o100644)
            .expect("failed to insert README");
        root.insert(".dvc", dvc_tree_id, 0o040000)
            .expect("failed to insert .dvc tree");
        let tree_id = root.write().expect("failed to write tree");
        let tree = repo.find_tree(tree_id).expect("failed to find tree");

        let sig = Signature::now("fixture", "fixture@localhost").expect("failed to build signature");
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .expect("failed to create initial commit");
    }
}

impl Default for FixtureRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_has_initial_commit() {
        let remote = FixtureRemote::new();
        assert_eq!(remote.commit_count(), 1);
        assert_eq!(remote.head_message(), "Initial commit");
    }

    #[test]
    fn test_fixture_tree_layout() {
        let remote = FixtureRemote::new();
        assert!(remote.head_contains("README.md"));
        assert!(remote.head_contains(".dvc/config"));
        assert!(!remote.head_contains("missing.txt"));
    }

    #[test]
    fn test_fixture_is_cloneable() {
        let remote = FixtureRemote::new();
        let dest = TempDir::new().unwrap();
        let clone = Repository::clone(&remote.url(), dest.path().join("repo")).unwrap();
        assert!(clone.workdir().unwrap().join("README.md").is_file());
        assert!(clone.workdir().unwrap().join(".dvc").is_dir());
    }
}

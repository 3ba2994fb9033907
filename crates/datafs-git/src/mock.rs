// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Call-counting source-control wrapper for tests
//!
//! Decorates any [`SourceControl`] implementation and records how many
//! clone and open calls went through it. The repository-cache idempotence
//! property ("one clone per client, ever") is asserted with this wrapper
//! around the real libgit2 factory.

use crate::error::ScmResult;
use crate::{ScmRepo, SourceControl};
use std::fmt::Debug;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counters observable after the wrapped factory has been handed off.
#[derive(Debug, Clone, Default)]
pub struct ScmCounters {
    clones: Arc<AtomicUsize>,
    opens: Arc<AtomicUsize>,
}

impl ScmCounters {
    /// Number of clone calls recorded so far.
    pub fn clones(&self) -> usize {
        self.clones.load(Ordering::SeqCst)
    }

    /// Number of open calls recorded so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

/// Source-control decorator that counts factory calls.
#[derive(Debug)]
pub struct CountingScm<S> {
    inner: S,
    counters: ScmCounters,
}

impl<S: SourceControl> CountingScm<S> {
    /// Wraps the given factory.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counters: ScmCounters::default(),
        }
    }

    /// Returns a handle to the shared counters.
    pub fn counters(&self) -> ScmCounters {
        self.counters.clone()
    }
}

impl<S: SourceControl> SourceControl for CountingScm<S> {
    fn clone_repo(&self, url: &str, dest: &Path) -> ScmResult<Box<dyn ScmRepo>> {
        self.counters.clones.fetch_add(1, Ordering::SeqCst);
        self.inner.clone_repo(url, dest)
    }

    fn open_repo(&self, path: &Path) -> ScmResult<Box<dyn ScmRepo>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open_repo(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Git2SourceControl;
    use datafs_test_utils::FixtureRemote;
    use tempfile::TempDir;

    #[test]
    fn test_counters_track_clones_and_opens() {
        let remote = FixtureRemote::new();
        let scm = CountingScm::new(Git2SourceControl::new());
        let counters = scm.counters();
        assert_eq!(counters.clones(), 0);

        let dir = TempDir::new().unwrap();
        let clone_path = dir.path().join("repo");
        scm.clone_repo(&remote.url(), &clone_path).unwrap();
        scm.open_repo(&clone_path).unwrap();

        assert_eq!(counters.clones(), 1);
        assert_eq!(counters.opens(), 1);
    }
}

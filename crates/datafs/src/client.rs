// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Client facade
//!
//! One [`Client`] serves one repository URL. The first operation that needs
//! repository content probes the DVC executor, clones the Git side into the
//! cache and reuses that clone for every later operation. Uploads follow the
//! two-phase push protocol: payloads go to the blob remote first, pointer
//! files are committed and pushed to Git second, so a Git-visible pointer
//! always has its payload already published.

use crate::cache::RepoCache;
use crate::error::{FsError, FsResult};
use crate::handle::{FileHandle, WriteHandle};
use crate::scan::{self, DirEntry};
use crate::stats::{DownloadMetadata, UpdateMetadata};
use crate::transfer::{DownloadTarget, UploadSource};
use datafs_dvc::{pointer_name, DvcExecutor, ShellDvc};
use datafs_git::{CommitInfo, Git2SourceControl, ScmResult, SourceControl};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Commit message prefix for automatic update commits.
const UPDATE_MESSAGE_PREFIX: &str = "DVC Automatically updated files";

/// Commit message prefix for automatic remove commits.
const REMOVE_MESSAGE_PREFIX: &str = "DVC Automatically removed files";

/// Newest-first commit window inspected by [`Client::modified_date`].
const HISTORY_WINDOW: usize = 100;

/// Filesystem-like client over one DVC-tracked Git repository.
pub struct Client {
    repo_url: String,
    temp_root: Option<PathBuf>,
    existing_clone: Option<PathBuf>,
    cache: Option<RepoCache>,
    executor: Arc<dyn DvcExecutor>,
    scm: Arc<dyn SourceControl>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("repo_url", &self.repo_url)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the given Git remote, using the external `dvc`
    /// executable and libgit2.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            temp_root: None,
            existing_clone: None,
            cache: None,
            executor: Arc::new(ShellDvc::new()),
            scm: Arc::new(Git2SourceControl::new()),
        }
    }

    /// Places the cached clone under the given directory instead of the
    /// system temp location.
    pub fn with_temp_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(path.into());
        self
    }

    /// Uses a pre-existing local working copy instead of cloning. The
    /// directory is never deleted by the client.
    pub fn with_existing_clone(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing_clone = Some(path.into());
        self
    }

    /// Replaces the DVC executor.
    pub fn with_executor(mut self, executor: Arc<dyn DvcExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replaces the source-control factory.
    pub fn with_source_control(mut self, scm: Arc<dyn SourceControl>) -> Self {
        self.scm = scm;
        self
    }

    /// Repository URL this client serves.
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub(crate) fn executor(&self) -> Arc<dyn DvcExecutor> {
        Arc::clone(&self.executor)
    }

    /// Probes the executor and clones the repository on first use; later
    /// calls reuse the cached clone.
    pub(crate) fn ensure_cache(&mut self) -> FsResult<&RepoCache> {
        if self.cache.is_none() {
            let version = self.executor.check_version()?;
            debug!(%version, "dvc executor accepted");
            let cache = match &self.existing_clone {
                Some(path) => RepoCache::open_existing(self.scm.as_ref(), &self.repo_url, path)?,
                None => RepoCache::clone_into(
                    self.scm.as_ref(),
                    &self.repo_url,
                    self.temp_root.as_deref(),
                )?,
            };
            self.cache = Some(cache);
        }
        match &self.cache {
            Some(cache) => Ok(cache),
            // assigned just above
            None => Err(io::Error::other("repository cache unavailable").into()),
        }
    }

    /// Returns a lazy handle for one logical path. Nothing is fetched until
    /// the handle is read.
    pub fn get(&mut self, path: &str, empty_fallback: bool) -> FileHandle<'_> {
        FileHandle::new(self, path, empty_fallback)
    }

    /// Reads the content of one tracked file.
    pub fn read(&mut self, path: &str) -> FsResult<Vec<u8>> {
        self.get(path, false).read()
    }

    /// Reads the content of one tracked file as UTF-8 text.
    pub fn read_to_string(&mut self, path: &str) -> FsResult<String> {
        self.get(path, false).read_to_string()
    }

    /// Whether the given logical path is tracked and its payload fetchable.
    pub fn exists(&mut self, path: &str) -> FsResult<bool> {
        self.get(path, false).exists()
    }

    /// Opens one logical path for writing; see [`WriteHandle`].
    pub fn open_write(&mut self, path: &str) -> FsResult<WriteHandle<'_>> {
        self.get(path, false).open_write()
    }

    /// Downloads a batch of files into their targets.
    ///
    /// Targets are processed in order; the first failure aborts the batch.
    /// An empty batch returns immediately without touching the network.
    pub fn download(
        &mut self,
        targets: Vec<DownloadTarget>,
        empty_fallback: bool,
    ) -> FsResult<DownloadMetadata> {
        let start = Instant::now();
        let repo = self.repo_url.clone();
        if targets.is_empty() {
            return Ok(DownloadMetadata {
                repo,
                files: Vec::new(),
                sizes: Vec::new(),
                duration: start.elapsed(),
            });
        }

        let mut files = Vec::with_capacity(targets.len());
        let mut sizes = Vec::with_capacity(targets.len());
        for mut target in targets {
            let path = normalize_path(target.repo_path());
            let content = self.get(&path, empty_fallback).read()?;
            target.deliver(&content)?;
            sizes.push(content.len() as u64);
            files.push(path);
        }
        info!(count = files.len(), "downloaded files");
        Ok(DownloadMetadata {
            repo,
            files,
            sizes,
            duration: start.elapsed(),
        })
    }

    /// Pushes a batch of files through the two-phase update protocol.
    ///
    /// Every source is written into the clone and `dvc add`ed, all payloads
    /// are pushed to the blob remote, then the pointer files are committed
    /// and pushed to Git in a single commit. A failure in the Git phase
    /// surfaces as [`FsError::GitUpdate`]; already-pushed payloads are not
    /// rolled back. An empty batch returns immediately without touching the
    /// network.
    pub fn update(
        &mut self,
        sources: Vec<UploadSource>,
        commit_message: Option<&str>,
        commit_message_extra: Option<&str>,
    ) -> FsResult<UpdateMetadata> {
        let start = Instant::now();
        let repo_url = self.repo_url.clone();
        let requested: Vec<String> = sources
            .iter()
            .map(|s| normalize_path(s.repo_path()))
            .collect();
        if sources.is_empty() {
            return Ok(UpdateMetadata {
                repo: repo_url,
                requested,
                updated: Vec::new(),
                commit_message: None,
                commit: None,
                duration: start.elapsed(),
            });
        }
        let message = resolve_commit_message(
            UPDATE_MESSAGE_PREFIX,
            &requested,
            commit_message,
            commit_message_extra,
        );

        let executor = self.executor();
        let cache = self.ensure_cache()?;
        for (mut source, rel) in sources.into_iter().zip(&requested) {
            let dest = cache.abs_path(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            if source.should_copy_to(&dest) {
                let bytes = source.read()?;
                fs::write(&dest, bytes)?;
            }
            executor.add(cache.clone_path(), rel)?;
        }
        info!(count = requested.len(), "pushing payloads to blob remote");
        executor.push(cache.clone_path())?;

        let pointer_files: Vec<String> = requested.iter().map(|p| pointer_name(p)).collect();
        let commit = git_push_phase(cache, &repo_url, &pointer_files, &message, false, &requested)?;
        info!(commit = %commit.id, count = requested.len(), "updated files");
        Ok(UpdateMetadata {
            repo: repo_url,
            requested: requested.clone(),
            updated: requested,
            commit_message: Some(message),
            commit: Some(commit),
            duration: start.elapsed(),
        })
    }

    /// Stops tracking a batch of files.
    ///
    /// Pointer files are deleted and their removal committed and pushed;
    /// payload blobs stay on the remote until [`Client::cleanup_remote`].
    /// An empty batch returns immediately without touching the network.
    pub fn remove(
        &mut self,
        paths: &[&str],
        commit_message: Option<&str>,
        commit_message_extra: Option<&str>,
    ) -> FsResult<UpdateMetadata> {
        let start = Instant::now();
        let repo_url = self.repo_url.clone();
        let requested: Vec<String> = paths.iter().map(|p| normalize_path(p)).collect();
        if requested.is_empty() {
            return Ok(UpdateMetadata {
                repo: repo_url,
                requested,
                updated: Vec::new(),
                commit_message: None,
                commit: None,
                duration: start.elapsed(),
            });
        }
        let message = resolve_commit_message(
            REMOVE_MESSAGE_PREFIX,
            &requested,
            commit_message,
            commit_message_extra,
        );

        let executor = self.executor();
        let cache = self.ensure_cache()?;
        for rel in &requested {
            executor.remove(cache.clone_path(), rel)?;
        }

        let pointer_files: Vec<String> = requested.iter().map(|p| pointer_name(p)).collect();
        let commit = git_push_phase(cache, &repo_url, &pointer_files, &message, true, &requested)?;
        info!(commit = %commit.id, count = requested.len(), "removed files");
        Ok(UpdateMetadata {
            repo: repo_url,
            requested: requested.clone(),
            updated: requested,
            commit_message: Some(message),
            commit: Some(commit),
            duration: start.elapsed(),
        })
    }

    /// Timestamp of the newest commit that touched any of the given files'
    /// pointer entries, searching the most recent [`HISTORY_WINDOW`] commits.
    ///
    /// # Errors
    ///
    /// [`FsError::NoHistory`] when no commit in the window touched them.
    pub fn modified_date(&mut self, paths: &[&str]) -> FsResult<chrono::DateTime<chrono::Utc>> {
        let repo_url = self.repo_url.clone();
        let pointer_files: Vec<String> = paths
            .iter()
            .map(|p| pointer_name(&normalize_path(p)))
            .collect();
        let cache = self.ensure_cache()?;
        match cache.repo().last_commit_for(&pointer_files, HISTORY_WINDOW)? {
            Some(info) => Ok(info.timestamp),
            None => Err(FsError::NoHistory {
                repo: repo_url,
                paths: pointer_files,
                window: HISTORY_WINDOW,
            }),
        }
    }

    /// Lists the immediate children of a directory; see [`DirEntry`].
    pub fn scan_dir(&mut self, path: &str) -> FsResult<Vec<DirEntry>> {
        let repo_url = self.repo_url.clone();
        let cache = self.ensure_cache()?;
        scan::scan_dir(cache.clone_path(), &repo_url, path)
    }

    /// Repository-relative paths of the tracked files directly under `path`.
    pub fn list_files(&mut self, path: &str) -> FsResult<Vec<String>> {
        Ok(self
            .scan_dir(path)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.path)
            .collect())
    }

    /// Drops the cached clone. Safe to call at any time and more than once;
    /// the next operation re-clones.
    pub fn cleanup(&mut self) {
        if let Some(cache) = self.cache.take() {
            cache.dispose();
        }
    }

    /// Garbage-collects unreferenced payload blobs on the remote.
    pub fn cleanup_remote(&mut self) -> FsResult<()> {
        let executor = self.executor();
        let cache = self.ensure_cache()?;
        executor.gc(cache.clone_path())?;
        Ok(())
    }
}

/// Runs the Git phase of a push protocol, wrapping any failure with the
/// logical paths it was working on.
fn git_push_phase(
    cache: &RepoCache,
    repo_url: &str,
    pointer_files: &[String],
    message: &str,
    delete: bool,
    logical: &[String],
) -> FsResult<CommitInfo> {
    let run = || -> ScmResult<CommitInfo> {
        let repo = cache.repo();
        if delete {
            repo.remove_from_index(pointer_files)?;
        } else {
            repo.add_to_index(pointer_files)?;
        }
        let commit = repo.commit(message)?;
        repo.push_origin()?;
        Ok(commit)
    };
    run().map_err(|source| FsError::GitUpdate {
        repo: repo_url.to_string(),
        files: logical.to_vec(),
        source,
    })
}

fn normalize_path(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).to_string()
}

fn resolve_commit_message(
    prefix: &str,
    paths: &[String],
    message: Option<&str>,
    extra: Option<&str>,
) -> String {
    let mut message = match message {
        Some(m) => m.to_string(),
        None => {
            let names: Vec<String> = paths
                .iter()
                .map(|p| match Path::new(p).file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => p.clone(),
                })
                .collect();
            format!("{prefix}: {}", names.join(", "))
        }
    };
    if let Some(extra) = extra {
        message.push('\n');
        message.push_str(extra);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_uses_basenames() {
        let paths = vec!["dir/a.txt".to_string(), "b.bin".to_string()];
        let message = resolve_commit_message(UPDATE_MESSAGE_PREFIX, &paths, None, None);
        assert_eq!(message, "DVC Automatically updated files: a.txt, b.bin");
    }

    #[test]
    fn test_custom_message_wins_and_extra_appends() {
        let paths = vec!["a.txt".to_string()];
        let message =
            resolve_commit_message(UPDATE_MESSAGE_PREFIX, &paths, Some("Nightly refresh"), Some("job 42"));
        assert_eq!(message, "Nightly refresh\njob 42");
    }

    #[test]
    fn test_normalize_path_strips_one_leading_slash() {
        assert_eq!(normalize_path("/a/b.txt"), "a/b.txt");
        assert_eq!(normalize_path("a/b.txt"), "a/b.txt");
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Upload sources and download targets
//!
//! The bulk operations take closed enums instead of an open content-provider
//! hierarchy: a local file, an in-memory string, or a caller-supplied
//! closure. Each variant carries the logical repository path it maps to.

use crate::error::FsResult;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Producer closure for callback uploads.
pub type UploadProducer = Box<dyn FnMut() -> io::Result<Vec<u8>> + Send>;

/// Consumer closure for callback downloads.
pub type DownloadConsumer = Box<dyn FnMut(&[u8]) -> io::Result<()> + Send>;

/// One piece of content to push into the repository.
pub enum UploadSource {
    /// Copy a local file into the repository
    LocalFile {
        /// Logical destination path inside the repository
        repo_path: String,
        /// File on the local filesystem to read
        local_path: PathBuf,
    },

    /// Write an in-memory string as the file content
    Text {
        /// Logical destination path inside the repository
        repo_path: String,
        /// Content to write
        content: String,
    },

    /// Obtain the content from a closure at transfer time
    Callback {
        /// Logical destination path inside the repository
        repo_path: String,
        /// Closure producing the content
        producer: UploadProducer,
    },
}

impl UploadSource {
    /// Upload the file at `local_path` to the logical `repo_path`.
    pub fn local_file(repo_path: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self::LocalFile {
            repo_path: repo_path.into(),
            local_path: local_path.into(),
        }
    }

    /// Upload the given string as the content of `repo_path`.
    pub fn text(repo_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text {
            repo_path: repo_path.into(),
            content: content.into(),
        }
    }

    /// Upload whatever the closure produces at transfer time.
    pub fn callback(
        repo_path: impl Into<String>,
        producer: impl FnMut() -> io::Result<Vec<u8>> + Send + 'static,
    ) -> Self {
        Self::Callback {
            repo_path: repo_path.into(),
            producer: Box::new(producer),
        }
    }

    /// Logical repository path this source maps to.
    pub fn repo_path(&self) -> &str {
        match self {
            Self::LocalFile { repo_path, .. }
            | Self::Text { repo_path, .. }
            | Self::Callback { repo_path, .. } => repo_path,
        }
    }

    /// Produces the content bytes.
    pub fn read(&mut self) -> FsResult<Vec<u8>> {
        match self {
            Self::LocalFile { local_path, .. } => Ok(fs::read(local_path)?),
            Self::Text { content, .. } => Ok(content.clone().into_bytes()),
            Self::Callback { producer, .. } => Ok(producer()?),
        }
    }

    /// Whether the content still has to be written to `dest`.
    ///
    /// A local-file source whose path already is `dest` (a staging file
    /// inside the clone, typically) needs no copy; everything else does.
    pub fn should_copy_to(&self, dest: &Path) -> bool {
        match self {
            Self::LocalFile { local_path, .. } => {
                match (local_path.canonicalize(), dest.canonicalize()) {
                    (Ok(src), Ok(dst)) => src != dst,
                    _ => true,
                }
            }
            Self::Text { .. } | Self::Callback { .. } => true,
        }
    }
}

impl fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile {
                repo_path,
                local_path,
            } => f
                .debug_struct("LocalFile")
                .field("repo_path", repo_path)
                .field("local_path", local_path)
                .finish(),
            Self::Text { repo_path, content } => f
                .debug_struct("Text")
                .field("repo_path", repo_path)
                .field("len", &content.len())
                .finish(),
            Self::Callback { repo_path, .. } => f
                .debug_struct("Callback")
                .field("repo_path", repo_path)
                .finish_non_exhaustive(),
        }
    }
}

/// One destination for a downloaded payload.
pub enum DownloadTarget {
    /// Write the payload to a local file, creating parent directories
    LocalFile {
        /// Logical path inside the repository to fetch
        repo_path: String,
        /// Destination file on the local filesystem
        local_path: PathBuf,
    },

    /// Hand the payload to a closure
    Callback {
        /// Logical path inside the repository to fetch
        repo_path: String,
        /// Closure receiving the content
        consumer: DownloadConsumer,
    },
}

impl DownloadTarget {
    /// Download the logical `repo_path` into the file at `local_path`.
    pub fn local_file(repo_path: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self::LocalFile {
            repo_path: repo_path.into(),
            local_path: local_path.into(),
        }
    }

    /// Download the logical `repo_path` and hand the bytes to the closure.
    pub fn callback(
        repo_path: impl Into<String>,
        consumer: impl FnMut(&[u8]) -> io::Result<()> + Send + 'static,
    ) -> Self {
        Self::Callback {
            repo_path: repo_path.into(),
            consumer: Box::new(consumer),
        }
    }

    /// Logical repository path this target fetches.
    pub fn repo_path(&self) -> &str {
        match self {
            Self::LocalFile { repo_path, .. } | Self::Callback { repo_path, .. } => repo_path,
        }
    }

    /// Delivers the payload to the destination.
    pub fn deliver(&mut self, content: &[u8]) -> FsResult<()> {
        match self {
            Self::LocalFile { local_path, .. } => {
                if let Some(parent) = local_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(local_path, content)?;
                Ok(())
            }
            Self::Callback { consumer, .. } => {
                consumer(content)?;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for DownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile {
                repo_path,
                local_path,
            } => f
                .debug_struct("LocalFile")
                .field("repo_path", repo_path)
                .field("local_path", local_path)
                .finish(),
            Self::Callback { repo_path, .. } => f
                .debug_struct("Callback")
                .field("repo_path", repo_path)
                .finish_non_exhaustive(),
        }
    }
}

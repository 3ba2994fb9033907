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

//! # DataFs DVC Executor Layer
//!
//! This crate wraps the DVC data-versioning tool as a capability: the
//! [`DvcExecutor`] trait covers the subcommands the client needs (`init`,
//! `remote add`/`modify`, `add`, `remove`, `pull <path>`, `push`, `gc`),
//! plus a version probe against a semantic-version constraint.
//!
//! Two implementations ship here:
//!
//! - [`ShellDvc`]: spawns the external `dvc` process per operation
//! - [`MockDvc`]: an in-memory content-addressed store for tests
//!
//! The crate also owns the pointer-file convention ([`pointer`]): a tracked
//! logical path `p` is represented in Git by a small YAML metadata file at
//! `p + ".dvc"`, while the payload bytes live in a separate blob remote.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use datafs_dvc::{DvcExecutor, ShellDvc};
//! use std::path::Path;
//!
//! let dvc = ShellDvc::new();
//! let _version = dvc.check_version()?;
//! dvc.pull(Path::new("/tmp/clone/repo"), "data/train.csv")?;
//! # Ok::<(), datafs_dvc::DvcError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mock;
pub mod pointer;
pub mod remote;

pub use cli::ShellDvc;
pub use config::ExecutorConfig;
pub use error::{DvcError, DvcResult};
pub use mock::MockDvc;
pub use pointer::{md5_hex, pointer_name, DvcPointer, PointerOutput, POINTER_SUFFIX};
pub use remote::{ExternalRemoteStorage, RemoteStorage};

use semver::Version;
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;

/// Capability interface over the DVC tool.
///
/// All operations are synchronous and blocking; the working directory is an
/// explicit argument so a single executor can serve multiple repository
/// caches. Implementations must be `Send + Sync + Debug`.
pub trait DvcExecutor: Send + Sync + Debug {
    /// Probes the executor and validates it against the configured version
    /// constraint.
    ///
    /// # Errors
    ///
    /// [`DvcError::MissingExecutable`] when the tool is unavailable,
    /// [`DvcError::VersionMismatch`] when it is outside the supported range.
    /// Neither condition is ever silently downgraded.
    fn check_version(&self) -> DvcResult<Version>;

    /// Initializes DVC metadata in the given working directory.
    fn init(&self, workdir: &Path) -> DvcResult<()>;

    /// Registers `url` as the default blob remote named `name`.
    fn set_remote(&self, workdir: &Path, name: &str, url: &str) -> DvcResult<()>;

    /// Sets one configuration option on the named remote.
    fn set_remote_option(&self, workdir: &Path, name: &str, key: &str, value: &str)
        -> DvcResult<()>;

    /// Starts tracking `path`, creating or refreshing its pointer file.
    fn add(&self, workdir: &Path, path: &str) -> DvcResult<()>;

    /// Stops tracking `path` by deleting its pointer file.
    ///
    /// Payload blobs already pushed to the remote are left in place; removing
    /// them is an explicit [`DvcExecutor::gc`] call.
    fn remove(&self, workdir: &Path, path: &str) -> DvcResult<()>;

    /// Fetches the payload for exactly one logical path (scoped pull).
    fn pull(&self, workdir: &Path, path: &str) -> DvcResult<()>;

    /// Uploads every staged payload to the blob remote.
    fn push(&self, workdir: &Path) -> DvcResult<()>;

    /// Garbage-collects remote blobs no longer referenced by the repository.
    fn gc(&self, workdir: &Path) -> DvcResult<()>;
}

/// Prepares a working directory as a DVC repository.
///
/// No-op when the directory already carries `.dvc` metadata. When a storage
/// URL is given it becomes the default remote, with any extra options applied
/// on top (credentials from a [`RemoteStorage`] provisioner, typically).
pub fn init_repository(
    executor: &dyn DvcExecutor,
    workdir: &Path,
    storage_url: Option<&str>,
    storage_options: &[(&str, &str)],
) -> DvcResult<()> {
    if workdir.join(".dvc").is_dir() {
        debug!(workdir = %workdir.display(), "dvc metadata already present, skipping init");
        return Ok(());
    }
    executor.init(workdir)?;
    if let Some(url) = storage_url {
        executor.set_remote(workdir, "storage", url)?;
        for (key, value) in storage_options {
            executor.set_remote_option(workdir, "storage", key, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn trait_is_object_safe() {
        fn _check_object_safe(_: &dyn DvcExecutor) {}
    }

    #[test]
    fn test_init_repository_configures_remote() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        init_repository(
            &mock,
            dir.path(),
            Some("s3://bucket/dvc"),
            &[("region", "eu-central-1")],
        )
        .unwrap();
        assert!(dir.path().join(".dvc").is_dir());
        assert_eq!(mock.calls("init"), 1);
        assert_eq!(mock.calls("remote-add"), 1);
        assert_eq!(mock.calls("remote-modify"), 1);
    }

    #[test]
    fn test_init_repository_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        init_repository(&mock, dir.path(), None, &[]).unwrap();
        init_repository(&mock, dir.path(), None, &[]).unwrap();
        assert_eq!(mock.calls("init"), 1);
    }
}

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

//! # DataFs
//!
//! Filesystem-like client for repositories where Git tracks small pointer
//! files and a separate blob remote holds the payloads (the DVC layout).
//! One [`Client`] serves one repository URL:
//!
//! - reads are lazy: [`Client::get`] returns a [`FileHandle`] and nothing
//!   is cloned or pulled until the handle is used
//! - writes follow a two-phase push protocol: payloads reach the blob
//!   remote before the pointer commit reaches Git
//! - the clone made on first use is cached for the client's whole lifetime
//!
//! ## Usage
//!
//! ```rust,no_run
//! use datafs::{Client, UploadSource};
//!
//! let mut client = Client::new("https://example.com/data-repo.git");
//! let report = client.update(
//!     vec![UploadSource::text("notes/hello.txt", "hello world")],
//!     None,
//!     None,
//! )?;
//! assert_eq!(report.updated, vec!["notes/hello.txt".to_string()]);
//!
//! let content = client.read_to_string("notes/hello.txt")?;
//! assert_eq!(content, "hello world");
//! # Ok::<(), datafs::FsError>(())
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod handle;
pub mod scan;
pub mod stats;
pub mod transfer;

pub use cache::RepoCache;
pub use client::Client;
pub use error::{FsError, FsResult};
pub use handle::{FileHandle, WriteHandle};
pub use scan::{DirEntry, EXCLUDED_SCAN_DIRS};
pub use stats::{DownloadMetadata, UpdateMetadata};
pub use transfer::{DownloadTarget, UploadSource};

// The lower layers are part of the public surface: custom executors and
// source-control backends plug in through their traits.
pub use datafs_dvc::{DvcError, DvcExecutor, MockDvc, ShellDvc};
pub use datafs_git::{CommitInfo, Git2SourceControl, ScmError, SourceControl};

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Synchronized file handles
//!
//! A [`FileHandle`] is a lazy view of one tracked file: nothing touches the
//! network until a read is asked for. [`WriteHandle`] is the explicit
//! open-write-close lifecycle; closing runs the full single-file update
//! protocol, and dropping an unclosed handle runs it as a best-effort
//! fallback.

use crate::client::Client;
use crate::error::{FsError, FsResult};
use crate::stats::UpdateMetadata;
use crate::transfer::UploadSource;
use datafs_dvc::{md5_hex, pointer_name};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error};

/// Internal result of a materialization attempt.
enum ReadOutcome {
    Content(Vec<u8>),
    NotTracked,
    NotMaterialized,
}

/// Lazy handle over one logical path in the repository.
pub struct FileHandle<'c> {
    client: &'c mut Client,
    path: String,
    empty_fallback: bool,
}

impl<'c> FileHandle<'c> {
    pub(crate) fn new(client: &'c mut Client, path: &str, empty_fallback: bool) -> Self {
        let path = path.strip_prefix('/').unwrap_or(path).to_string();
        Self {
            client,
            path,
            empty_fallback,
        }
    }

    /// Logical path this handle is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn materialize(&mut self) -> FsResult<ReadOutcome> {
        let executor = self.client.executor();
        let clone_path = self.client.ensure_cache()?.clone_path().to_path_buf();

        if !clone_path.join(pointer_name(&self.path)).is_file() {
            return Ok(ReadOutcome::NotTracked);
        }
        executor.pull(&clone_path, &self.path)?;

        let payload = clone_path.join(&self.path);
        if !payload.is_file() {
            return Ok(ReadOutcome::NotMaterialized);
        }
        Ok(ReadOutcome::Content(fs::read(payload)?))
    }

    /// Pulls the payload and returns its bytes.
    ///
    /// # Errors
    ///
    /// [`FsError::FileNotTracked`] when no pointer file exists and
    /// [`FsError::MaterializationFailed`] when the pointer exists but the
    /// payload cannot be fetched. With the empty fallback enabled both cases
    /// yield empty content instead.
    pub fn read(&mut self) -> FsResult<Vec<u8>> {
        match self.materialize()? {
            ReadOutcome::Content(bytes) => Ok(bytes),
            ReadOutcome::NotTracked if self.empty_fallback => Ok(Vec::new()),
            ReadOutcome::NotMaterialized if self.empty_fallback => Ok(Vec::new()),
            ReadOutcome::NotTracked => Err(FsError::FileNotTracked {
                repo: self.client.repo_url().to_string(),
                path: self.path.clone(),
            }),
            ReadOutcome::NotMaterialized => Err(FsError::MaterializationFailed {
                repo: self.client.repo_url().to_string(),
                path: self.path.clone(),
            }),
        }
    }

    /// Pulls the payload and returns it as UTF-8 text.
    pub fn read_to_string(&mut self) -> FsResult<String> {
        let bytes = self.read()?;
        String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }

    /// Whether the file is tracked and its payload can be fetched.
    ///
    /// Both miss cases (no pointer, pointer without a fetchable payload)
    /// answer `false`; any other failure propagates.
    pub fn exists(&mut self) -> FsResult<bool> {
        match self.materialize()? {
            ReadOutcome::Content(_) => Ok(true),
            ReadOutcome::NotTracked | ReadOutcome::NotMaterialized => Ok(false),
        }
    }

    /// Opens the file for writing.
    ///
    /// The baseline content is pulled first when the file is already tracked,
    /// so an unchanged rewrite can be detected at close time.
    pub fn open_write(self) -> FsResult<WriteHandle<'c>> {
        let FileHandle { client, path, .. } = self;
        let executor = client.executor();
        let clone_path = client.ensure_cache()?.clone_path().to_path_buf();

        let staging = clone_path.join(&path);
        let mut baseline_md5 = None;
        if clone_path.join(pointer_name(&path)).is_file() {
            executor.pull(&clone_path, &path)?;
            if staging.is_file() {
                baseline_md5 = Some(md5_hex(&fs::read(&staging)?));
            }
        }

        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&staging)?;
        debug!(path = %path, staging = %staging.display(), "opened write handle");
        Ok(WriteHandle {
            client,
            repo_path: path,
            staging,
            baseline_md5,
            file: Some(file),
            finished: false,
        })
    }
}

/// Open write lifecycle over one logical path.
///
/// Bytes go to a staging file inside the clone; [`WriteHandle::close`] runs
/// the single-file update protocol and returns its metadata. A handle that is
/// dropped without being closed still attempts the write-back, logging any
/// failure instead of panicking.
pub struct WriteHandle<'c> {
    client: &'c mut Client,
    repo_path: String,
    staging: PathBuf,
    baseline_md5: Option<String>,
    file: Option<fs::File>,
    finished: bool,
}

impl WriteHandle<'_> {
    /// Logical path this handle writes to.
    pub fn path(&self) -> &str {
        &self.repo_path
    }

    /// Finishes the write and pushes the content through the update protocol.
    ///
    /// When the staged content is byte-identical to the pulled baseline the
    /// push is skipped entirely and the returned metadata carries no commit.
    pub fn close(mut self) -> FsResult<UpdateMetadata> {
        self.finish()
    }

    fn finish(&mut self) -> FsResult<UpdateMetadata> {
        self.finished = true;
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        let staged = fs::read(&self.staging)?;
        if self.baseline_md5.as_deref() == Some(md5_hex(&staged).as_str()) {
            debug!(path = %self.repo_path, "content unchanged, skipping update");
            return Ok(UpdateMetadata {
                repo: self.client.repo_url().to_string(),
                requested: vec![self.repo_path.clone()],
                updated: Vec::new(),
                commit_message: None,
                commit: None,
                duration: Duration::ZERO,
            });
        }

        self.client.update(
            vec![UploadSource::local_file(
                self.repo_path.clone(),
                self.staging.clone(),
            )],
            None,
            None,
        )
    }
}

impl Write for WriteHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.file {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("write handle already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for WriteHandle<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.finish() {
                error!(path = %self.repo_path, %err, "deferred write-back failed");
            }
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! In-memory mock executor for testing
//!
//! Behaves like a content-addressed DVC remote without touching the network
//! or requiring the dvc binary. `add` writes a real pointer file next to the
//! payload and stages the blob; `push` publishes staged blobs; `pull`
//! materializes a payload only when the blob is actually present, which lets
//! tests model partial remote synchronization. Every operation is counted so
//! tests can assert on executor activity.

use crate::error::{DvcError, DvcResult};
use crate::pointer::{pointer_name, DvcPointer};
use crate::DvcExecutor;
use semver::Version;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    /// Published blobs, keyed by MD5 object id
    remote: HashMap<String, Vec<u8>>,
    /// Blobs added since the last push
    staged: HashMap<String, Vec<u8>>,
    /// Per-operation invocation counts
    calls: HashMap<&'static str, usize>,
}

/// In-memory mock DVC executor for testing.
///
/// Cloning shares the underlying store, so a single blob remote can be
/// observed across multiple clients.
#[derive(Debug, Clone, Default)]
pub struct MockDvc {
    state: Arc<Mutex<MockState>>,
}

impl MockDvc {
    /// Creates an empty mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: &'static str) {
        *self.state().calls.entry(op).or_insert(0) += 1;
    }

    /// Number of times the given operation was invoked.
    pub fn calls(&self, op: &str) -> usize {
        self.state().calls.get(op).copied().unwrap_or(0)
    }

    /// Total number of executor invocations across all operations.
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Number of blobs published to the simulated remote.
    pub fn remote_len(&self) -> usize {
        self.state().remote.len()
    }

    /// Checks whether a blob with the given object id has been published.
    pub fn remote_contains(&self, oid: &str) -> bool {
        self.state().remote.contains_key(oid)
    }

    /// Drops a published blob, simulating a remote that lost an object.
    pub fn corrupt_remote(&self, oid: &str) {
        self.state().remote.remove(oid);
    }

    fn command_error(op: &str, detail: &str, workdir: &Path) -> DvcError {
        DvcError::Command {
            command: format!("dvc {op}"),
            exit_code: 1,
            output: detail.to_string(),
            workdir: workdir.to_path_buf(),
        }
    }
}

impl DvcExecutor for MockDvc {
    fn check_version(&self) -> DvcResult<Version> {
        self.record("version");
        Ok(Version::new(3, 30, 0))
    }

    fn init(&self, workdir: &Path) -> DvcResult<()> {
        self.record("init");
        fs::create_dir_all(workdir.join(".dvc"))?;
        Ok(())
    }

    fn set_remote(&self, workdir: &Path, name: &str, url: &str) -> DvcResult<()> {
        self.record("remote-add");
        fs::create_dir_all(workdir.join(".dvc"))?;
        fs::write(
            workdir.join(".dvc").join("config"),
            format!("[core]\n    remote = {name}\n['remote \"{name}\"']\n    url = {url}\n"),
        )?;
        Ok(())
    }

    fn set_remote_option(&self, workdir: &Path, name: &str, key: &str, value: &str) -> DvcResult<()> {
        self.record("remote-modify");
        let config = workdir.join(".dvc").join("config");
        let mut text = fs::read_to_string(&config).unwrap_or_default();
        text.push_str(&format!("# {name}: {key} = {value}\n"));
        fs::write(&config, text)?;
        Ok(())
    }

    fn add(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.record("add");
        let payload = fs::read(workdir.join(path)).map_err(|_| {
            Self::command_error("add", &format!("unable to read {path}"), workdir)
        })?;
        let pointer = DvcPointer::for_content(path, &payload);
        fs::write(workdir.join(pointer_name(path)), pointer.to_yaml()?)?;
        if let Some(out) = pointer.primary() {
            self.state().staged.insert(out.md5.clone(), payload);
        }
        Ok(())
    }

    fn remove(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.record("remove");
        let pointer_path = workdir.join(pointer_name(path));
        if !pointer_path.is_file() {
            return Err(Self::command_error(
                "remove",
                &format!("{} does not exist", pointer_name(path)),
                workdir,
            ));
        }
        fs::remove_file(pointer_path)?;
        Ok(())
    }

    fn pull(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.record("pull");
        let pointer_path = workdir.join(pointer_name(path));
        let text = fs::read_to_string(&pointer_path).map_err(|_| {
            Self::command_error(
                "pull",
                &format!("{} is not tracked", pointer_name(path)),
                workdir,
            )
        })?;
        let pointer = DvcPointer::parse(&text)?;
        let Some(out) = pointer.primary() else {
            return Ok(());
        };
        // A blob missing from the remote is not a pull failure; the payload
        // simply does not materialize.
        let payload = { self.state().remote.get(&out.md5).cloned() };
        if let Some(payload) = payload {
            let dest = workdir.join(path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(dest, payload)?;
        }
        Ok(())
    }

    fn push(&self, _workdir: &Path) -> DvcResult<()> {
        self.record("push");
        let mut state = self.state();
        let staged: Vec<(String, Vec<u8>)> = state.staged.drain().collect();
        for (oid, payload) in staged {
            state.remote.insert(oid, payload);
        }
        Ok(())
    }

    fn gc(&self, _workdir: &Path) -> DvcResult<()> {
        self.record("gc");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::md5_hex;
    use tempfile::TempDir;

    #[test]
    fn test_add_writes_pointer_and_stages_blob() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        fs::write(dir.path().join("data.txt"), b"hello").unwrap();

        mock.add(dir.path(), "data.txt").unwrap();

        let pointer_text = fs::read_to_string(dir.path().join("data.txt.dvc")).unwrap();
        let pointer = DvcPointer::parse(&pointer_text).unwrap();
        assert_eq!(pointer.primary().unwrap().md5, md5_hex(b"hello"));
        // Staged but not yet published
        assert!(!mock.remote_contains(&md5_hex(b"hello")));
    }

    #[test]
    fn test_push_publishes_staged_blobs() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        fs::write(dir.path().join("data.txt"), b"hello").unwrap();
        mock.add(dir.path(), "data.txt").unwrap();

        mock.push(dir.path()).unwrap();
        assert!(mock.remote_contains(&md5_hex(b"hello")));
        assert_eq!(mock.remote_len(), 1);
    }

    #[test]
    fn test_pull_materializes_payload() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        fs::write(dir.path().join("data.txt"), b"hello").unwrap();
        mock.add(dir.path(), "data.txt").unwrap();
        mock.push(dir.path()).unwrap();

        // Simulate a fresh clone: pointer present, payload absent
        fs::remove_file(dir.path().join("data.txt")).unwrap();
        mock.pull(dir.path(), "data.txt").unwrap();
        assert_eq!(fs::read(dir.path().join("data.txt")).unwrap(), b"hello");
    }

    #[test]
    fn test_pull_on_lost_blob_leaves_payload_absent() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        fs::write(dir.path().join("data.txt"), b"hello").unwrap();
        mock.add(dir.path(), "data.txt").unwrap();
        mock.push(dir.path()).unwrap();
        mock.corrupt_remote(&md5_hex(b"hello"));

        fs::remove_file(dir.path().join("data.txt")).unwrap();
        mock.pull(dir.path(), "data.txt").unwrap();
        assert!(!dir.path().join("data.txt").exists());
    }

    #[test]
    fn test_remove_deletes_pointer_only() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        fs::write(dir.path().join("data.txt"), b"hello").unwrap();
        mock.add(dir.path(), "data.txt").unwrap();
        mock.push(dir.path()).unwrap();

        mock.remove(dir.path(), "data.txt").unwrap();
        assert!(!dir.path().join("data.txt.dvc").exists());
        // Payload blobs survive a remove; gc is a separate explicit step
        assert!(mock.remote_contains(&md5_hex(b"hello")));
    }

    #[test]
    fn test_remove_missing_pointer_fails() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        let result = mock.remove(dir.path(), "ghost.txt");
        assert!(matches!(result, Err(DvcError::Command { .. })));
    }

    #[test]
    fn test_call_counters() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        mock.push(dir.path()).unwrap();
        mock.push(dir.path()).unwrap();
        assert_eq!(mock.calls("push"), 2);
        assert_eq!(mock.calls("pull"), 0);
        assert_eq!(mock.total_calls(), 2);
    }

    #[test]
    fn test_clone_shares_store() {
        let dir = TempDir::new().unwrap();
        let mock = MockDvc::new();
        let other = mock.clone();
        fs::write(dir.path().join("data.txt"), b"shared").unwrap();
        mock.add(dir.path(), "data.txt").unwrap();
        mock.push(dir.path()).unwrap();
        assert!(other.remote_contains(&md5_hex(b"shared")));
    }
}

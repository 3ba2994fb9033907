// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Process-backed DVC executor
//!
//! Spawns the `dvc` binary for every operation. Arguments are passed to the
//! process directly (no shell interpolation), stdout and stderr are captured,
//! and any non-zero exit status maps to [`DvcError::Command`].

use crate::config::ExecutorConfig;
use crate::error::{DvcError, DvcResult};
use crate::pointer::pointer_name;
use crate::DvcExecutor;
use semver::Version;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// DVC executor backed by the external `dvc` process.
///
/// The working directory is supplied per call, so one `ShellDvc` instance can
/// serve any number of repository caches.
#[derive(Debug, Clone, Default)]
pub struct ShellDvc {
    config: ExecutorConfig,
}

impl ShellDvc {
    /// Creates an executor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor with an explicit configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the executor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    fn run(&self, args: &[&str], workdir: Option<&Path>) -> DvcResult<String> {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(args);
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }
        debug!(binary = %self.config.binary, ?args, cwd = ?workdir, "spawning dvc");

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                DvcError::MissingExecutable {
                    binary: self.config.binary.clone(),
                }
            } else {
                DvcError::Io(e)
            }
        })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.is_empty() {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&stderr);
            }
            return Err(DvcError::Command {
                command: format!("{} {}", self.config.binary, args.join(" ")),
                exit_code: output.status.code().unwrap_or(-1),
                output: combined,
                workdir: workdir.unwrap_or_else(|| Path::new(".")).to_path_buf(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Parses the version out of the first line of `dvc version` output.
    ///
    /// Accepts both `DVC version: 3.30.1 (pip)` and bare `3.30.1` forms.
    fn parse_version(output: &str) -> DvcResult<Version> {
        let first_line = output.lines().next().unwrap_or_default();
        let text = first_line
            .trim_start_matches("DVC version:")
            .split('(')
            .next()
            .unwrap_or_default()
            .trim();
        Version::parse(text).map_err(|_| DvcError::VersionParse(first_line.to_string()))
    }
}

impl DvcExecutor for ShellDvc {
    fn check_version(&self) -> DvcResult<Version> {
        let output = self.run(&["version"], None)?;
        let version = Self::parse_version(&output)?;
        if !self.config.version_constraint.matches(&version) {
            return Err(DvcError::VersionMismatch {
                found: version,
                required: self.config.version_constraint.clone(),
            });
        }
        debug!(%version, "dvc executable accepted");
        Ok(version)
    }

    fn init(&self, workdir: &Path) -> DvcResult<()> {
        self.run(&["init"], Some(workdir)).map(|_| ())
    }

    fn set_remote(&self, workdir: &Path, name: &str, url: &str) -> DvcResult<()> {
        self.run(&["remote", "add", "-d", name, url], Some(workdir))
            .map(|_| ())
    }

    fn set_remote_option(&self, workdir: &Path, name: &str, key: &str, value: &str) -> DvcResult<()> {
        self.run(&["remote", "modify", name, key, value], Some(workdir))
            .map(|_| ())
    }

    fn add(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.run(&["add", path], Some(workdir)).map(|_| ())
    }

    fn remove(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.run(&["remove", &pointer_name(path)], Some(workdir))
            .map(|_| ())
    }

    fn pull(&self, workdir: &Path, path: &str) -> DvcResult<()> {
        self.run(&["pull", path], Some(workdir)).map(|_| ())
    }

    fn push(&self, workdir: &Path) -> DvcResult<()> {
        self.run(&["push"], Some(workdir)).map(|_| ())
    }

    fn gc(&self, workdir: &Path) -> DvcResult<()> {
        self.run(&["gc", "--workspace", "--cloud", "--all-branches", "--force"], Some(workdir))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_pip_banner() {
        let version = ShellDvc::parse_version("DVC version: 3.30.1 (pip)\n---------\n").unwrap();
        assert_eq!(version, Version::new(3, 30, 1));
    }

    #[test]
    fn test_parse_version_bare() {
        let version = ShellDvc::parse_version("2.58.2").unwrap();
        assert_eq!(version, Version::new(2, 58, 2));
    }

    #[test]
    fn test_parse_version_garbage() {
        let result = ShellDvc::parse_version("command not found");
        assert!(matches!(result, Err(DvcError::VersionParse(_))));
    }

    #[test]
    fn test_missing_binary_maps_to_missing_executable() {
        let exec = ShellDvc::with_config(
            ExecutorConfig::new().with_binary("datafs-definitely-not-a-binary"),
        );
        let result = exec.check_version();
        assert!(matches!(result, Err(ref e) if e.is_missing_executable()));
    }
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Shallow directory listing over the cached clone
//!
//! Only tracked files are visible: a file appears in a listing when its
//! pointer file does, under its logical name. Git and DVC metadata
//! directories never appear.

use crate::error::FsResult;
use datafs_dvc::POINTER_SUFFIX;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Directories never surfaced by a scan.
pub const EXCLUDED_SCAN_DIRS: [&str; 2] = [".git", ".dvc"];

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// Repository-relative path of the entry
    pub path: String,

    /// Base name of the entry
    pub name: String,

    /// Repository URL the listing came from
    pub repo: String,

    /// Whether the entry is a subdirectory
    pub is_dir: bool,
}

/// Lists the immediate children of `path` inside the clone at `clone_path`.
///
/// Files are reported under their logical names (pointer suffix stripped);
/// untracked plain files are invisible. One leading slash on `path` is
/// tolerated and treated as the repository root.
pub(crate) fn scan_dir(clone_path: &Path, repo_url: &str, path: &str) -> FsResult<Vec<DirEntry>> {
    let rel = path.strip_prefix('/').unwrap_or(path);
    let search = clone_path.join(rel);

    let mut entries = Vec::new();
    for dirent in fs::read_dir(&search)? {
        let dirent = dirent?;
        let name = dirent.file_name().to_string_lossy().into_owned();
        let file_type = dirent.file_type()?;

        if file_type.is_dir() {
            if EXCLUDED_SCAN_DIRS.contains(&name.as_str()) {
                continue;
            }
            entries.push(DirEntry {
                path: join_rel(rel, &name),
                name,
                repo: repo_url.to_string(),
                is_dir: true,
            });
        } else if file_type.is_file() {
            let Some(logical) = name.strip_suffix(POINTER_SUFFIX) else {
                continue;
            };
            if logical.is_empty() {
                continue;
            }
            entries.push(DirEntry {
                path: join_rel(rel, logical),
                name: logical.to_string(),
                repo: repo_url.to_string(),
                is_dir: false,
            });
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir == "." {
        name.to_string()
    } else {
        format!("{}/{name}", dir.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join(".dvc")).unwrap();
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("data.csv.dvc"), "outs: []\n").unwrap();
        fs::write(dir.path().join("data.csv"), "payload").unwrap();
        fs::write(dir.path().join("untracked.txt"), "x").unwrap();
        fs::write(dir.path().join("models/weights.bin.dvc"), "outs: []\n").unwrap();
        dir
    }

    #[test]
    fn test_scan_root_lists_tracked_files_and_dirs() {
        let dir = fixture_tree();
        let entries = scan_dir(dir.path(), "repo", "").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["data.csv", "models"]);
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn test_scan_hides_metadata_dirs_and_untracked_files() {
        let dir = fixture_tree();
        let entries = scan_dir(dir.path(), "repo", "").unwrap();
        assert!(entries.iter().all(|e| e.name != ".git"));
        assert!(entries.iter().all(|e| e.name != ".dvc"));
        assert!(entries.iter().all(|e| e.name != "untracked.txt"));
    }

    #[test]
    fn test_scan_subdirectory_builds_relative_paths() {
        let dir = fixture_tree();
        let entries = scan_dir(dir.path(), "repo", "models").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "models/weights.bin");
        assert_eq!(entries[0].name, "weights.bin");
    }

    #[test]
    fn test_scan_tolerates_leading_slash() {
        let dir = fixture_tree();
        let entries = scan_dir(dir.path(), "repo", "/models").unwrap();
        assert_eq!(entries[0].path, "models/weights.bin");
    }

    #[test]
    fn test_scan_missing_directory_is_io_error() {
        let dir = fixture_tree();
        let result = scan_dir(dir.path(), "repo", "no/such/dir");
        assert!(matches!(result, Err(crate::FsError::Io(_))));
    }
}

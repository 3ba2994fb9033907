// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! DVC pointer metadata files
//!
//! For every tracked logical path `p` the Git repository carries a small
//! metadata file at `p + ".dvc"`; the payload bytes live in the blob remote
//! and are fetched into `p` on demand. The metadata format is YAML and must
//! stay bit-compatible with existing DVC repositories:
//!
//! ```text
//! outs:
//! - md5: d3b07384d113edec49eaa6238ad5ff00
//!   size: 4
//!   hash: md5
//!   path: foo.txt
//! ```

use crate::error::{DvcError, DvcResult};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suffix marking pointer metadata files inside the Git-tracked tree
pub const POINTER_SUFFIX: &str = ".dvc";

/// Hash algorithm DVC uses for content addressing
pub const HASH_NAME: &str = "md5";

/// One tracked output recorded in a pointer file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerOutput {
    /// MD5 object id of the payload
    pub md5: String,

    /// Payload size in bytes
    pub size: u64,

    /// Hash algorithm name (`md5`); older DVC versions omit the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Payload file name relative to the pointer file
    pub path: String,
}

/// Parsed contents of a `*.dvc` pointer file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DvcPointer {
    /// Tracked outputs; exactly one for files tracked through this library
    pub outs: Vec<PointerOutput>,
}

impl DvcPointer {
    /// Builds pointer metadata for the given logical path and payload bytes.
    ///
    /// The recorded `path` is the file name component, matching how dvc
    /// writes pointer files next to their payloads.
    pub fn for_content(path: &str, content: &[u8]) -> Self {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Self {
            outs: vec![PointerOutput {
                md5: md5_hex(content),
                size: content.len() as u64,
                hash: Some(HASH_NAME.to_string()),
                path: name,
            }],
        }
    }

    /// Parses pointer metadata from its YAML representation.
    ///
    /// # Errors
    ///
    /// Returns [`DvcError::Pointer`] when the YAML is malformed, lists no
    /// outputs, or carries an object id that is not 32 hex characters.
    pub fn parse(text: &str) -> DvcResult<Self> {
        let pointer: DvcPointer = serde_yaml::from_str(text)
            .map_err(|e| DvcError::pointer(format!("malformed YAML: {e}")))?;
        if pointer.outs.is_empty() {
            return Err(DvcError::pointer("pointer file lists no outputs"));
        }
        for out in &pointer.outs {
            if out.md5.len() != 32 || !out.md5.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(DvcError::pointer(format!(
                    "invalid MD5 object id: {}",
                    out.md5
                )));
            }
        }
        Ok(pointer)
    }

    /// Serializes the metadata back to its on-disk YAML form.
    pub fn to_yaml(&self) -> DvcResult<String> {
        serde_yaml::to_string(self).map_err(|e| DvcError::pointer(format!("serialize: {e}")))
    }

    /// The first (primary) tracked output.
    pub fn primary(&self) -> Option<&PointerOutput> {
        self.outs.first()
    }
}

/// Maps a logical path to its pointer-file name (`p` → `p.dvc`).
pub fn pointer_name(path: &str) -> String {
    format!("{path}{POINTER_SUFFIX}")
}

/// MD5 digest of the given bytes as lowercase hex.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_content_records_md5_and_size() {
        let pointer = DvcPointer::for_content("dir/data.txt", b"foo\n");
        let out = pointer.primary().unwrap();
        assert_eq!(out.md5, "d3b07384d113edec49eaa6238ad5ff00");
        assert_eq!(out.size, 4);
        assert_eq!(out.path, "data.txt");
        assert_eq!(out.hash.as_deref(), Some(HASH_NAME));
    }

    #[test]
    fn test_roundtrip() {
        let original = DvcPointer::for_content("a.bin", b"payload");
        let yaml = original.to_yaml().unwrap();
        let parsed = DvcPointer::parse(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_real_dvc_layout() {
        let text = "outs:\n- md5: d3b07384d113edec49eaa6238ad5ff00\n  size: 4\n  hash: md5\n  path: foo.txt\n";
        let pointer = DvcPointer::parse(text).unwrap();
        assert_eq!(pointer.outs.len(), 1);
        assert_eq!(pointer.primary().unwrap().path, "foo.txt");
    }

    #[test]
    fn test_parse_without_hash_field() {
        // dvc 2.x pointer files carry no `hash` key
        let text = "outs:\n- md5: d3b07384d113edec49eaa6238ad5ff00\n  size: 4\n  path: foo.txt\n";
        let pointer = DvcPointer::parse(text).unwrap();
        assert_eq!(pointer.primary().unwrap().hash, None);
    }

    #[test]
    fn test_parse_rejects_empty_outs() {
        let result = DvcPointer::parse("outs: []\n");
        assert!(matches!(result, Err(DvcError::Pointer(_))));
    }

    #[test]
    fn test_parse_rejects_bad_oid() {
        let text = "outs:\n- md5: nothex\n  size: 4\n  path: foo.txt\n";
        let result = DvcPointer::parse(text);
        assert!(matches!(result, Err(DvcError::Pointer(_))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DvcPointer::parse("not yaml at all: [").is_err());
    }

    #[test]
    fn test_pointer_name() {
        assert_eq!(pointer_name("dir/file.txt"), "dir/file.txt.dvc");
    }

    #[test]
    fn test_md5_hex_empty() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}

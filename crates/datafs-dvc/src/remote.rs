// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Remote storage provisioner capability
//!
//! The blob remote backing a repository is usually provisioned out of band;
//! this trait is the seam a repository-creation helper plugs into. The only
//! implementation shipped here is the passthrough for pre-provisioned
//! remotes.

use crate::error::DvcResult;
use std::collections::HashMap;
use std::fmt::Debug;

/// Provisioner for the blob storage behind a DVC remote.
pub trait RemoteStorage: Send + Sync + Debug {
    /// Creates the backing storage if it does not exist yet.
    fn init_storage(&self) -> DvcResult<()>;

    /// Deletes every object held by the backing storage.
    fn remove_all(&self) -> DvcResult<()>;

    /// URL the repository's DVC remote should point at.
    fn url(&self) -> String;

    /// Credential settings to apply to the DVC remote, if any.
    fn credential_config(&self) -> Option<HashMap<String, String>> {
        None
    }
}

/// A remote that already exists and needs no provisioning.
#[derive(Debug, Clone)]
pub struct ExternalRemoteStorage {
    url: String,
}

impl ExternalRemoteStorage {
    /// Wraps an already-provisioned storage URL.
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into() }
    }
}

impl RemoteStorage for ExternalRemoteStorage {
    fn init_storage(&self) -> DvcResult<()> {
        Ok(())
    }

    fn remove_all(&self) -> DvcResult<()> {
        Ok(())
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_remote_is_passthrough() {
        let remote = ExternalRemoteStorage::new("s3://bucket/dvc");
        remote.init_storage().unwrap();
        remote.remove_all().unwrap();
        assert_eq!(remote.url(), "s3://bucket/dvc");
        assert!(remote.credential_config().is_none());
    }
}

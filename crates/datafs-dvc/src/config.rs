// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 DataFs Contributors

//! Executor configuration

use semver::VersionReq;

/// Name of the dvc binary probed on PATH
pub const DEFAULT_BINARY: &str = "dvc";

/// Default semantic-version constraint for the dvc executable
pub const DEFAULT_VERSION_CONSTRAINT: &str = ">=2.0.0, <4.0.0";

/// Configuration for the process-backed executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Binary name or path used to spawn dvc
    pub binary: String,

    /// Version range the probed executable must satisfy
    pub version_constraint: VersionReq,
}

impl ExecutorConfig {
    /// Creates a configuration with the default binary and constraint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the binary name or path.
    pub fn with_binary<S: Into<String>>(mut self, binary: S) -> Self {
        self.binary = binary.into();
        self
    }

    /// Overrides the version constraint.
    pub fn with_version_constraint(mut self, constraint: VersionReq) -> Self {
        self.version_constraint = constraint;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            version_constraint: VersionReq::parse(DEFAULT_VERSION_CONSTRAINT)
                .unwrap_or(VersionReq::STAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_default_constraint_parses() {
        let config = ExecutorConfig::default();
        assert_eq!(config.binary, "dvc");
        assert!(config.version_constraint.matches(&Version::new(3, 30, 1)));
        assert!(config.version_constraint.matches(&Version::new(2, 0, 0)));
        assert!(!config.version_constraint.matches(&Version::new(1, 11, 0)));
        assert!(!config.version_constraint.matches(&Version::new(4, 0, 0)));
    }

    #[test]
    fn test_builder_overrides() {
        let req = VersionReq::parse(">=3.0.0").unwrap();
        let config = ExecutorConfig::new()
            .with_binary("/opt/dvc/bin/dvc")
            .with_version_constraint(req.clone());
        assert_eq!(config.binary, "/opt/dvc/bin/dvc");
        assert_eq!(config.version_constraint, req);
    }
}

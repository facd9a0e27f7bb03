//! Version stamping for the manifest.

use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

/// Source of the version stamped into the manifest.
pub trait VersionOracle {
    /// The current release version, without any leading `v`, if known.
    fn latest_version(&self) -> Option<String>;
}

/// Reads the most recent tag reachable from `HEAD` with
/// `git describe --tags --abbrev=0`.
#[derive(Debug, Clone)]
pub struct GitTagOracle {
    repo: PathBuf,
}

impl GitTagOracle {
    /// Oracle for the repository containing `repo`.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }
}

impl VersionOracle for GitTagOracle {
    fn latest_version(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["describe", "--tags", "--abbrev=0"])
            .current_dir(&self.repo)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let tag = String::from_utf8_lossy(&out.stdout);
                let version = normalize_tag(&tag);
                debug!(tag = %tag.trim(), ?version, "resolved git tag");
                version
            }
            Ok(out) => {
                debug!(
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "git describe found no tag"
                );
                None
            }
            Err(e) => {
                debug!(error = %e, "git is not available");
                None
            }
        }
    }
}

/// Always returns the same version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(pub String);

impl FixedVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionOracle for FixedVersion {
    fn latest_version(&self) -> Option<String> {
        normalize_tag(&self.0)
    }
}

/// Trim whitespace and a leading `v`; empty tags are no version at all.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Ask the oracle once, falling back to `fallback` when it has nothing.
pub fn resolve_version(oracle: &dyn VersionOracle, fallback: &str) -> String {
    match oracle.latest_version() {
        Some(version) => version,
        None => {
            warn!(fallback, "no release tag found, using fallback version");
            fallback.to_string()
        }
    }
}

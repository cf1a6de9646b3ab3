//! Source-repository operations.
//!
//! Shells out to `git` for all operations. This ensures we inherit the
//! user's SSH keys, proxies, and other configuration, and keeps the tool
//! from reimplementing a version-control client.
//!
//! The working copy is shared mutable state: `checkout` switches it in
//! place, so callers must never run two checkouts concurrently. The
//! pipeline is strictly sequential by construction.

use std::process::Command;

use camino::Utf8Path;
use semver::Version;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from repository operations.
#[derive(Error, Debug)]
pub enum RepoError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "fetch").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Cloning the source repository failed.
    #[error("failed to clone {url}: {stderr}")]
    Clone {
        /// The remote URL.
        url: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Checking out a tag failed — unknown tag or unclean working copy.
    #[error("failed to check out {tag}: {stderr}")]
    Checkout {
        /// The tag that could not be checked out.
        tag: String,
        /// Captured stderr.
        stderr: String,
    },
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// A release tag paired with its normalized version.
///
/// The raw tag (e.g. `v1.2.3`) addresses the revision in git; the
/// normalized version (`1.2.3`) drives all path and URL construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    /// The tag as it appears in the repository.
    pub tag: String,
    /// The parsed semver, prefix stripped.
    pub version: Version,
}

impl ReleaseTag {
    /// Parse a raw tag into a release tag.
    ///
    /// Returns `None` when the tag lacks the expected prefix, is not valid
    /// semver, or carries a pre-release component (release tags only).
    pub fn parse(tag: &str, prefix: &str) -> Option<Self> {
        let bare = tag.strip_prefix(prefix)?;
        let version = Version::parse(bare).ok()?;
        if !version.pre.is_empty() {
            return None;
        }
        Some(Self {
            tag: tag.to_string(),
            version,
        })
    }

    /// The normalized version string used for paths and URLs.
    pub fn version_str(&self) -> String {
        self.version.to_string()
    }
}

/// Establish the local reference to the source repository.
///
/// Reuses `dir` if it is already a git work tree (fetching tags to pick up
/// new releases), otherwise clones `url` into it. Idempotent: repeated
/// calls never re-clone.
#[instrument(fields(%dir))]
pub fn init_reference(url: &str, dir: &Utf8Path) -> RepoResult<()> {
    if dir.join(".git").exists() {
        debug!("reusing existing working copy");
        git(Some(dir), &["fetch", "--tags", "--quiet"])?;
        return Ok(());
    }

    if let Some(parent) = dir.parent() {
        std::fs::create_dir_all(parent)?;
    }

    debug!(%url, "cloning source repository");
    let output = Command::new("git")
        .args(["clone", "--quiet", url, dir.as_str()])
        .output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(RepoError::Clone {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// List release tags, oldest first.
///
/// Tags are filtered to `<prefix><semver>` with no pre-release component
/// and sorted ascending by version, so processing order is stable and
/// deterministic across runs.
#[instrument(fields(%dir))]
pub fn list_versions(dir: &Utf8Path, prefix: &str) -> RepoResult<Vec<ReleaseTag>> {
    let pattern = format!("{prefix}*");
    let output = git(Some(dir), &["tag", "--list", &pattern])?;

    let mut tags: Vec<ReleaseTag> = output
        .lines()
        .filter_map(|line| ReleaseTag::parse(line.trim(), prefix))
        .collect();
    tags.sort_by(|a, b| a.version.cmp(&b.version));

    debug!(count = tags.len(), "release tags");
    Ok(tags)
}

/// Switch the shared working copy to the state at `tag`.
///
/// Fails when the tag does not exist or the working copy cannot be made
/// clean. Blocking, no timeout; must not run concurrently with another
/// checkout on the same working copy.
#[instrument(fields(%dir))]
pub fn checkout(dir: &Utf8Path, tag: &str) -> RepoResult<()> {
    let output = Command::new("git")
        .args(["-C", dir.as_str(), "checkout", "--quiet", tag])
        .output()?;

    if output.status.success() {
        debug!(%tag, "checked out");
        Ok(())
    } else {
        Err(RepoError::Checkout {
            tag: tag.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run a git command and return its stdout.
fn git(dir: Option<&Utf8Path>, args: &[&str]) -> RepoResult<String> {
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.args(["-C", dir.as_str()]);
    }
    let output = cmd.args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(RepoError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

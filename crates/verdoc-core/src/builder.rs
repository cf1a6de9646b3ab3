//! Build invocation for the checked-out revision.
//!
//! Runs the configured install and documentation-build commands through
//! `sh -c` in the working copy, the same way user-configured commands are
//! executed elsewhere in the tool. Both operations are side-effecting
//! only: the docs build leaves its output on disk for the file locator to
//! discover, keeping the build tool decoupled from path conventions.

use std::io::{Read, Seek};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Poll interval while waiting on a time-limited build.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from build invocation.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Failed to spawn a build command.
    #[error("failed to execute build command: {0}")]
    Exec(#[from] std::io::Error),

    /// The dependency install failed — the revision's build environment
    /// could not be prepared.
    #[error("install failed: {command}")]
    Environment {
        /// The command that failed.
        command: String,
        /// The exit code, if available.
        exit_code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// The documentation build exited non-zero.
    #[error("docs build failed: {command}")]
    Command {
        /// The command that failed.
        command: String,
        /// The exit code, if available.
        exit_code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// The documentation build exceeded its time ceiling and was killed.
    #[error("docs build timed out after {}s: {command}", limit.as_secs())]
    Timeout {
        /// The command that was killed.
        command: String,
        /// The configured ceiling.
        limit: Duration,
    },
}

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Install build-time dependencies for the currently checked-out revision.
///
/// Blocking, no timeout. A failure here is fatal for the whole run: later
/// versions share the same working copy state.
#[instrument(fields(%dir))]
pub fn install(command: &str, dir: &Utf8Path) -> BuildResult<()> {
    debug!(%command, "installing dependencies");
    let output = Command::new("sh")
        .args(["-c", command])
        .current_dir(dir.as_std_path())
        .output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(BuildError::Environment {
            command: command.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run the documentation-generation build with a wall-clock ceiling.
///
/// Child output is staged through temp files so the wait loop never
/// blocks on a full pipe. On timeout the child is killed and
/// [`BuildError::Timeout`] returned.
#[instrument(fields(%dir, limit_secs = timeout.as_secs()))]
pub fn build_docs(command: &str, dir: &Utf8Path, timeout: Duration) -> BuildResult<()> {
    debug!(%command, "building docs");

    let stdout_file = tempfile::tempfile()?;
    let mut stderr_file = tempfile::tempfile()?;

    let start = Instant::now();
    let mut child = Command::new("sh")
        .args(["-c", command])
        .current_dir(dir.as_std_path())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file.try_clone()?))
        .spawn()?;

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            warn!(%command, "build exceeded ceiling, killing");
            child.kill()?;
            child.wait()?;
            return Err(BuildError::Timeout {
                command: command.to_string(),
                limit: timeout,
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "build finished");

    if status.success() {
        Ok(())
    } else {
        stderr_file.rewind()?;
        let mut stderr = String::new();
        stderr_file.read_to_string(&mut stderr)?;
        Err(BuildError::Command {
            command: command.to_string(),
            exit_code: status.code(),
            stderr: stderr.trim().to_string(),
        })
    }
}

//! Locating documentation sources in the working copy.
//!
//! A thin layer over recursive globbing. The docs build leaves component
//! readmes on disk; this module finds them without interpreting them —
//! every match is handed downstream, and an empty match set is valid
//! (a revision with no documented components).

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors from file location.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The configured glob pattern is malformed.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying parse error.
        source: glob::PatternError,
    },
}

/// Result alias for locate operations.
pub type LocateResult<T> = Result<T, LocateError>;

/// Find all files matching `pattern` under `root`.
///
/// Results are sorted for determinism. Entries that cannot be read are
/// logged and skipped; a path that is not valid UTF-8 is skipped the same
/// way (the rest of the pipeline is UTF-8 paths throughout).
#[instrument(fields(%root))]
pub fn find(root: &Utf8Path, pattern: &str) -> LocateResult<Vec<Utf8PathBuf>> {
    let full_pattern = root.join(pattern);
    let paths = glob::glob(full_pattern.as_str()).map_err(|source| LocateError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<Utf8PathBuf> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => match Utf8PathBuf::from_path_buf(path) {
                Ok(path) => files.push(path),
                Err(path) => warn!(path = %path.display(), "skipping non-UTF-8 path"),
            },
            Ok(_) => {}
            Err(err) => warn!(%err, "skipping unreadable glob entry"),
        }
    }
    files.sort();

    debug!(count = files.len(), "located documentation files");
    Ok(files)
}

/// Derive a component name from a documentation file's parent directory.
///
/// Pure function of the path — independent of which version is checked
/// out. `None` only for paths with no named parent.
pub fn component_name(path: &Utf8Path) -> Option<&str> {
    path.parent().and_then(Utf8Path::file_name)
}

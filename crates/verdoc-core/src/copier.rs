//! Copying component documentation into a versioned destination.
//!
//! For each located readme this copies two artifacts into the destination
//! directory: the optional preview page (`<component>.html`, with the
//! local asset path rewritten to a version-pinned URL) and the markdown
//! itself (`<component>.md`, prefixed with a small metadata header).
//!
//! Both copies transform fully in memory and only then write, so a failed
//! transform never leaves a partially written destination file.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::{SourceConfig, UrlConfig};
use crate::locate;

/// Errors from the copy step.
#[derive(Error, Debug)]
pub enum CopyError {
    /// Reading or writing a documentation file failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The path being read or written.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A documentation file has no parent directory to name the component.
    #[error("cannot derive component name from {path}")]
    ComponentName {
        /// The offending path.
        path: Utf8PathBuf,
    },
}

/// Result alias for copy operations.
pub type CopyResult<T> = Result<T, CopyError>;

/// One component's copy outcome.
#[derive(Debug, Clone)]
pub struct CopiedComponent {
    /// Component name (parent directory of the readme).
    pub name: String,
    /// Whether a preview page was found and copied alongside the markdown.
    pub has_demo: bool,
}

/// Summary of a `copy_all` invocation.
#[derive(Debug, Clone, Default)]
pub struct CopySummary {
    /// Per-component outcomes, in input order.
    pub components: Vec<CopiedComponent>,
    /// Total destination files written (markdown + previews).
    pub files_written: usize,
}

/// Copy every component's documentation into `dest`.
///
/// `dest` is created if needed. `version` is the normalized version string
/// used for URL pinning; the caller decides where `dest` actually lives
/// (the pipeline points it at a staging directory).
#[instrument(skip(files, source, urls), fields(%dest, %version, count = files.len()))]
pub fn copy_all(
    files: &[Utf8PathBuf],
    dest: &Utf8Path,
    version: &str,
    source: &SourceConfig,
    urls: &UrlConfig,
) -> CopyResult<CopySummary> {
    debug!("copying component docs");
    std::fs::create_dir_all(dest).map_err(|source| CopyError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut summary = CopySummary::default();

    for file in files {
        // has_demo is per component: recomputed on every iteration, never
        // carried over from the previous one.
        let name = locate::component_name(file)
            .ok_or_else(|| CopyError::ComponentName { path: file.clone() })?
            .to_string();

        let has_demo = copy_preview(file, dest, &name, version, source, urls)?;
        if has_demo {
            summary.files_written += 1;
        }

        copy_markdown(file, dest, &name, version, has_demo, urls)?;
        summary.files_written += 1;

        debug!(component = %name, has_demo, "copied");
        summary.components.push(CopiedComponent { name, has_demo });
    }

    Ok(summary)
}

/// Copy the component's preview page, if it has one.
///
/// Returns whether a preview existed. The local asset reference is
/// rewritten to the version-pinned URL before writing.
fn copy_preview(
    readme: &Utf8Path,
    dest: &Utf8Path,
    name: &str,
    version: &str,
    source: &SourceConfig,
    urls: &UrlConfig,
) -> CopyResult<bool> {
    let Some(component_dir) = readme.parent() else {
        return Ok(false);
    };
    let preview_src = component_dir.join(&source.preview_file);
    if !preview_src.is_file() {
        return Ok(false);
    }

    let content = read(&preview_src)?;
    let content = content.replace(&urls.asset_path, &urls.asset_url_for(version));
    write(&dest.join(format!("{name}.html")), &content)?;
    Ok(true)
}

/// Copy the markdown with its metadata header prepended.
///
/// The header carries a `previewUrl` field only when this component's
/// preview was copied.
fn copy_markdown(
    readme: &Utf8Path,
    dest: &Utf8Path,
    name: &str,
    version: &str,
    has_demo: bool,
    urls: &UrlConfig,
) -> CopyResult<()> {
    let content = read(readme)?;

    let mut header = String::from("---\n");
    if has_demo {
        header.push_str(&format!(
            "previewUrl: '{}'\n",
            urls.preview_url(version, name)
        ));
    }
    header.push_str("---\n\n");

    write(&dest.join(format!("{name}.md")), &(header + &content))
}

fn read(path: &Utf8Path) -> CopyResult<String> {
    std::fs::read_to_string(path).map_err(|source| CopyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Utf8Path, content: &str) -> CopyResult<()> {
    std::fs::write(path, content).map_err(|source| CopyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//! Generation pipeline — the per-version run loop.
//!
//! Wires prechecks, the repository collaborator, the build invoker, the
//! file locator, the doc copier, and the navigation updater into a single
//! sequential pipeline. Per version the flow is:
//!
//! ```text
//! PENDING → CHECKING_EXISTS → SKIPPED
//!                           → BUILDING → LOCATING → COPYING → NAV_UPDATING → DONE
//! ```
//!
//! `SKIPPED` and `DONE` are both success. Any failure between checkout and
//! the navigation update aborts the entire run: later versions share the
//! working copy, so building past a failure would run against undefined
//! checkout state.
//!
//! Copies land in a staging directory inside the docs root and are renamed
//! into place only after the version fully succeeds, so an aborted run
//! cannot leave a destination directory that the skip check would mistake
//! for a completed build.

use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::builder;
use crate::config::Config;
use crate::copier;
use crate::locate;
use crate::nav;
use crate::precheck;
use crate::repo::{self, ReleaseTag};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors from the generation pipeline.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Prechecks failed; nothing was attempted.
    #[error("precheck failed: {0}")]
    Precheck(String),

    /// `--only` named a tag that is not a known release tag.
    #[error("{tag} is not a release tag of the source repository")]
    UnknownTag {
        /// The requested tag.
        tag: String,
    },

    /// Repository error.
    #[error(transparent)]
    Repo(#[from] repo::RepoError),

    /// Build error.
    #[error(transparent)]
    Build(#[from] builder::BuildError),

    /// File location error.
    #[error(transparent)]
    Locate(#[from] locate::LocateError),

    /// Copy error.
    #[error(transparent)]
    Copy(#[from] copier::CopyError),

    /// Navigation index error.
    #[error(transparent)]
    Nav(#[from] nav::NavError),

    /// Filesystem error while staging or committing a destination.
    #[error("io error on {path}: {source}")]
    Io {
        /// The path involved.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Result alias for pipeline operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

// ──────────────────────────────────────────────
// Options, phases, events
// ──────────────────────────────────────────────

/// Options controlling a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Restrict the run to a single tag (raw tag or bare version).
    pub only: Option<String>,
    /// Rebuild versions whose destination directory already exists.
    pub force: bool,
    /// Preview the plan without checking out, building, or writing.
    pub dry_run: bool,
}

/// Phases of a single version's build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionPhase {
    /// Switch the working copy to the version's tag.
    Checkout,
    /// Install the revision's build dependencies.
    Install,
    /// Run the documentation build.
    BuildDocs,
    /// Glob the generated documentation sources.
    Locate,
    /// Copy docs into the staged destination.
    Copy,
    /// Upsert the navigation index.
    NavUpdate,
}

impl std::fmt::Display for VersionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkout => write!(f, "checkout"),
            Self::Install => write!(f, "install"),
            Self::BuildDocs => write!(f, "build docs"),
            Self::Locate => write!(f, "locate"),
            Self::Copy => write!(f, "copy"),
            Self::NavUpdate => write!(f, "nav update"),
        }
    }
}

/// Events emitted during a run for progress reporting.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    /// The version list is known; the loop is starting.
    RunStarted {
        /// Number of versions that will be visited.
        total: usize,
    },
    /// A version's destination already exists; nothing to do.
    VersionSkipped {
        /// The raw tag.
        tag: String,
        /// The normalized version.
        version: String,
    },
    /// Dry run: this version would be built.
    VersionPlanned {
        /// The raw tag.
        tag: String,
        /// The normalized version.
        version: String,
    },
    /// A version's build is starting.
    VersionStarted {
        /// The raw tag.
        tag: String,
        /// The normalized version.
        version: String,
        /// 1-based position in the run.
        index: usize,
        /// Number of versions in the run.
        total: usize,
    },
    /// A phase of the current version is starting.
    PhaseStarted {
        /// The raw tag.
        tag: String,
        /// The phase.
        phase: VersionPhase,
    },
    /// A version finished successfully.
    VersionCompleted {
        /// The raw tag.
        tag: String,
        /// The normalized version.
        version: String,
        /// Number of documented components found.
        components: usize,
    },
}

/// Outcome of a full generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    /// Versions built this run (or planned, in dry-run mode).
    pub built: Vec<String>,
    /// Versions skipped because their destination already existed.
    pub skipped: Vec<String>,
    /// Total destination files written.
    pub files_copied: usize,
    /// Wall-clock duration of the run, in milliseconds.
    pub elapsed_ms: u64,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

// ──────────────────────────────────────────────
// Run
// ──────────────────────────────────────────────

/// Execute the generation pipeline.
///
/// Calls `on_event` at version and phase boundaries so the CLI can drive
/// progress display. Strictly sequential: one working copy, one version
/// at a time, one navigation read-modify-write per built version.
#[instrument(skip(config, options, on_event), fields(%project_root, dry_run = options.dry_run))]
pub fn run(
    project_root: &Utf8Path,
    config: &Config,
    options: &GenerateOptions,
    mut on_event: impl FnMut(GenerateEvent),
) -> GenerateResult<GenerateOutcome> {
    let start = Instant::now();

    // Precheck gate: abort before any destructive or network operation.
    let report = precheck::run_precheck(project_root, config);
    if !report.all_passed {
        let failures: Vec<&str> = report
            .checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.message.as_str())
            .collect();
        return Err(GenerateError::Precheck(failures.join("; ")));
    }

    let repo_dir = project_root.join(&config.repo.dir);
    let docs_root = project_root.join(&config.output.docs_root);
    let menu_path = project_root.join(&config.output.menu_file);

    // A corrupt navigation index must abort the run before any copy, not
    // after versions have been built against it.
    nav::read_index(&menu_path, &config.output.menu_declaration)?;

    repo::init_reference(&config.repo.url, &repo_dir)?;
    let mut tags = repo::list_versions(&repo_dir, &config.repo.tag_prefix)?;

    if let Some(ref only) = options.only {
        tags.retain(|t| t.tag == *only || t.version_str() == *only);
        if tags.is_empty() {
            return Err(GenerateError::UnknownTag { tag: only.clone() });
        }
    }

    info!(count = tags.len(), "processing release tags");
    on_event(GenerateEvent::RunStarted { total: tags.len() });

    let total = tags.len();
    let mut built = Vec::new();
    let mut skipped = Vec::new();
    let mut files_copied = 0usize;

    for (i, tag) in tags.iter().enumerate() {
        let version = tag.version_str();
        let dest = docs_root.join(&version);

        // Skip this version if it has already been generated. Pass --force
        // (or remove the directory) to rebuild it.
        if dest.exists() && !options.force {
            debug!(%version, "destination exists, skipping");
            on_event(GenerateEvent::VersionSkipped {
                tag: tag.tag.clone(),
                version: version.clone(),
            });
            skipped.push(version);
            continue;
        }

        if options.dry_run {
            on_event(GenerateEvent::VersionPlanned {
                tag: tag.tag.clone(),
                version: version.clone(),
            });
            built.push(version);
            continue;
        }

        on_event(GenerateEvent::VersionStarted {
            tag: tag.tag.clone(),
            version: version.clone(),
            index: i + 1,
            total,
        });

        let summary = build_version(
            tag,
            &version,
            &repo_dir,
            &docs_root,
            &dest,
            &menu_path,
            config,
            options,
            &mut on_event,
        )?;

        files_copied += summary.files_written;
        on_event(GenerateEvent::VersionCompleted {
            tag: tag.tag.clone(),
            version: version.clone(),
            components: summary.components.len(),
        });
        built.push(version);
    }

    let elapsed = start.elapsed();
    info!(
        built = built.len(),
        skipped = skipped.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );

    Ok(GenerateOutcome {
        built,
        skipped,
        files_copied,
        elapsed_ms: elapsed.as_millis() as u64,
        dry_run: options.dry_run,
    })
}

/// Build a single version: checkout through navigation update, committing
/// the staged destination on success.
#[expect(clippy::too_many_arguments)]
fn build_version(
    tag: &ReleaseTag,
    version: &str,
    repo_dir: &Utf8Path,
    docs_root: &Utf8Path,
    dest: &Utf8Path,
    menu_path: &Utf8Path,
    config: &Config,
    options: &GenerateOptions,
    on_event: &mut impl FnMut(GenerateEvent),
) -> GenerateResult<copier::CopySummary> {
    let mut phase = |p: VersionPhase| {
        on_event(GenerateEvent::PhaseStarted {
            tag: tag.tag.clone(),
            phase: p,
        });
    };

    phase(VersionPhase::Checkout);
    repo::checkout(repo_dir, &tag.tag)?;

    phase(VersionPhase::Install);
    builder::install(&config.build.install, repo_dir)?;

    phase(VersionPhase::BuildDocs);
    builder::build_docs(
        &config.build.docs,
        repo_dir,
        Duration::from_secs(config.build.timeout_secs),
    )?;

    phase(VersionPhase::Locate);
    let files = locate::find(repo_dir, &config.source.readme_glob)?;

    phase(VersionPhase::Copy);
    std::fs::create_dir_all(docs_root).map_err(|source| GenerateError::Io {
        path: docs_root.to_path_buf(),
        source,
    })?;
    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(docs_root)
        .map_err(|source| GenerateError::Io {
            path: docs_root.to_path_buf(),
            source,
        })?;
    let staging_path = Utf8Path::from_path(staging.path()).ok_or_else(|| GenerateError::Io {
        path: docs_root.to_path_buf(),
        source: std::io::Error::other("staging path is not valid UTF-8"),
    })?;

    let summary = copier::copy_all(&files, staging_path, version, &config.source, &config.urls)?;

    phase(VersionPhase::NavUpdate);
    nav::update(
        menu_path,
        &config.output.menu_declaration,
        &files,
        version,
        &config.urls,
    )?;

    // Commit: the destination appears only after every phase succeeded.
    if options.force && dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|source| GenerateError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    let staged = staging.keep();
    std::fs::rename(&staged, dest).map_err(|source| GenerateError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(summary)
}

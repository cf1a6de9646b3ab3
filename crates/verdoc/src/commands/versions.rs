//! Versions command — list release tags and their build status.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use verdoc_core::config::Config;
use verdoc_core::repo;

/// Arguments for the `versions` subcommand.
#[derive(Args, Debug, Default)]
pub struct VersionsArgs {
    // Uses global --json flag for structured output
}

/// One release tag's status for display.
#[derive(Debug, Serialize)]
struct VersionStatus {
    /// The raw tag.
    tag: String,
    /// The normalized version.
    version: String,
    /// Whether the per-version docs directory already exists.
    built: bool,
}

/// List the release tags the pipeline would process.
#[instrument(name = "cmd_versions", skip_all, fields(json_output))]
pub fn cmd_versions(
    _args: VersionsArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing versions command");

    anyhow::ensure!(
        !config.repo.url.is_empty(),
        "repo.url is not configured — set it in .verdoc.toml"
    );

    let repo_dir = cwd.join(&config.repo.dir);
    let docs_root = cwd.join(&config.output.docs_root);

    repo::init_reference(&config.repo.url, &repo_dir)
        .context("failed to initialize the source repository")?;
    let tags = repo::list_versions(&repo_dir, &config.repo.tag_prefix)
        .context("failed to list release tags")?;

    let statuses: Vec<VersionStatus> = tags
        .iter()
        .map(|t| {
            let version = t.version_str();
            let built = docs_root.join(&version).exists();
            VersionStatus {
                tag: t.tag.clone(),
                version,
                built,
            }
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        println!("{}", "Release tags".bold().underline());
        println!();
        for status in &statuses {
            let state = if status.built {
                "built".green().to_string()
            } else {
                "pending".yellow().to_string()
            };
            println!("  {}  {}  [{state}]", status.tag.bold(), status.version);
        }
        println!();
        let pending = statuses.iter().filter(|s| !s.built).count();
        println!(
            "  {} tag(s), {} pending",
            statuses.len(),
            pending.to_string().bold()
        );
    }

    Ok(())
}

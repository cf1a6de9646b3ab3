//! Info command — show the resolved configuration.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use verdoc_core::config::Config;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // Uses global --json flag for structured output
}

/// JSON payload for `info --json`.
#[derive(Debug, Serialize)]
struct InfoOutput<'a> {
    /// Tool name.
    name: &'static str,
    /// Tool version.
    version: &'static str,
    /// The fully resolved configuration.
    config: &'a Config,
}

/// Show the resolved configuration after discovery and merging.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    if global_json {
        let output = InfoOutput {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            config,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let config_file = verdoc_core::config::find_project_config(cwd);
    match config_file {
        Some(path) => println!("{}: {path}", "Config file".bold()),
        None => println!("{}: {}", "Config file".bold(), "none (defaults)".dimmed()),
    }
    println!();

    let repo_url = if config.repo.url.is_empty() {
        "(not configured)".dimmed().to_string()
    } else {
        config.repo.url.clone()
    };
    println!("{}", "Repository".underline());
    println!("  url:        {repo_url}");
    println!("  dir:        {}", config.repo.dir);
    println!("  tag prefix: {:?}", config.repo.tag_prefix);
    println!();
    println!("{}", "Output".underline());
    println!("  docs root:  {}", config.output.docs_root);
    println!("  menu file:  {}", config.output.menu_file);
    println!();
    println!("{}", "Build".underline());
    println!("  install:    {}", config.build.install);
    println!("  docs:       {}", config.build.docs);
    println!("  timeout:    {}s", config.build.timeout_secs);

    Ok(())
}

//! Generate command — thin CLI layer over `verdoc_core::pipeline`.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use verdoc_core::config::Config;
use verdoc_core::pipeline::{self, GenerateEvent, GenerateOptions};

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Generate docs for a single tag (e.g., "v1.2.3" or "1.2.3")
    #[arg(long, value_name = "TAG")]
    pub only: Option<String>,

    /// Rebuild versions whose docs directory already exists
    #[arg(long)]
    pub force: bool,

    /// Preview which versions would be built without building them
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the generate command.
#[instrument(name = "cmd_generate", skip_all)]
pub fn cmd_generate(
    args: GenerateArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(
        json_output = global_json,
        dry_run = args.dry_run,
        force = args.force,
        only = ?args.only,
        "executing generate command"
    );

    let options = GenerateOptions {
        only: args.only,
        force: args.force,
        dry_run: args.dry_run,
    };

    if !global_json && options.dry_run {
        println!("{}", "DRY RUN — no docs will be generated".yellow().bold());
    }

    let mut spinner: Option<ProgressBar> = None;
    let outcome = pipeline::run(cwd, config, &options, |event| {
        if !global_json {
            handle_event(&mut spinner, event);
        }
    })
    .context("doc generation failed")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!();
        if outcome.dry_run {
            println!(
                "{} Dry run complete — {} version(s) would be built, {} already present",
                "✓".green(),
                outcome.built.len(),
                outcome.skipped.len(),
            );
        } else {
            println!(
                "{} {} version(s) built, {} skipped, {} files copied in {}ms",
                "✓".green().bold(),
                outcome.built.len(),
                outcome.skipped.len(),
                outcome.files_copied,
                outcome.elapsed_ms,
            );
        }
    }

    Ok(())
}

/// Render pipeline events as terminal progress.
fn handle_event(spinner: &mut Option<ProgressBar>, event: GenerateEvent) {
    match event {
        GenerateEvent::RunStarted { total } => {
            println!("{} release tag(s) to process", total.to_string().bold());
        }
        GenerateEvent::VersionSkipped { tag, .. } => {
            println!(
                "  {} {}",
                "→".dimmed(),
                format!("Skipping existing API docs for {tag}").dimmed()
            );
        }
        GenerateEvent::VersionPlanned { tag, version } => {
            println!("  {} would build {} → {}", "•".cyan(), tag.bold(), version);
        }
        GenerateEvent::VersionStarted {
            tag, index, total, ..
        } => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("  {spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message(format!(
                "[{index}/{total}] Generating API docs for {tag} (1-3 mins)"
            ));
            *spinner = Some(pb);
        }
        GenerateEvent::PhaseStarted { tag, phase } => {
            if let Some(pb) = spinner.as_ref() {
                pb.set_message(format!("{tag}: {phase}"));
            }
        }
        GenerateEvent::VersionCompleted {
            tag,
            version,
            components,
        } => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            println!(
                "  {} {}: {} component(s) → {}",
                "✓".green(),
                tag.bold(),
                components,
                version,
            );
        }
    }
}

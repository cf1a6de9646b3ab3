//! Precheck command — validate configuration and environment readiness.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use verdoc_core::config::Config;
use verdoc_core::precheck;

/// Arguments for the `precheck` subcommand.
#[derive(Args, Debug, Default)]
pub struct PrecheckArgs {
    // Uses global --json flag for structured output
}

/// Run prechecks and display results.
///
/// Exits non-zero when any check fails — a misconfigured environment must
/// fail the CI job, not silently produce nothing.
#[instrument(name = "cmd_precheck", skip_all, fields(json_output))]
pub fn cmd_precheck(
    _args: PrecheckArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing precheck command");

    let report = precheck::run_precheck(cwd, config);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Precheck".bold().underline());
        println!();

        for check in &report.checks {
            let icon = if check.passed {
                "✓".green().to_string()
            } else {
                "✗".red().to_string()
            };
            println!("  {icon} {}: {}", check.name.bold(), check.message);
        }

        println!();
        if report.all_passed {
            println!("  {}", "Ready to generate!".green().bold());
        } else {
            let failed = report.checks.iter().filter(|c| !c.passed).count();
            println!(
                "  {} — fix configuration issues above before generating",
                format!("{failed} check(s) failed").red().bold(),
            );
        }
    }

    if report.all_passed {
        Ok(())
    } else {
        Err(anyhow::anyhow!("precheck failed"))
    }
}

//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_pipeline_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("precheck"))
        .stdout(predicate::str::contains("versions"));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    // The resolved config rides along for scripting
    assert!(json["config"]["build"]["timeout_secs"].is_number());
}

#[test]
fn info_shows_resolved_config_values() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".verdoc.toml"),
        r#"
[repo]
url = "https://example.com/widgets.git"
"#,
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/widgets.git"));
}

// =============================================================================
// Precheck Command
// =============================================================================

#[test]
fn precheck_fails_without_configuration() {
    let tmp = TempDir::new().unwrap();

    // Empty directory: no repo url, no menu file — must exit non-zero
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "precheck"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Repository URL"))
        .stdout(predicate::str::contains("check(s) failed"));
}

#[test]
fn precheck_json_reports_all_passed_false() {
    let tmp = TempDir::new().unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "precheck", "--json"])
        .assert()
        .failure();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("precheck --json should output valid JSON");
    assert_eq!(json["all_passed"], false);
    assert!(json["checks"].as_array().is_some_and(|c| !c.is_empty()));
}

#[test]
fn precheck_passes_on_complete_setup() {
    // The git-binary check needs git on PATH; skip where it is absent.
    let git_ok = std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !git_ok {
        return;
    }

    let tmp = TempDir::new().unwrap();

    // Menu file and docs root at the default locations
    let menu = tmp.path().join("src/components/site-menu/api-menu.ts");
    fs::create_dir_all(menu.parent().unwrap()).unwrap();
    fs::write(&menu, "export let apiMenu = {}").unwrap();
    fs::create_dir_all(tmp.path().join("src/docs-content/api")).unwrap();

    // Build commands that exist on any PATH these tests run with
    fs::write(
        tmp.path().join(".verdoc.toml"),
        r#"
[repo]
url = "https://example.com/widgets.git"

[build]
install = "true"
docs = "true"
"#,
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "precheck"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready to generate!"));
}

// =============================================================================
// Versions Command
// =============================================================================

#[test]
fn versions_requires_repo_url() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "versions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repo.url"));
}

// =============================================================================
// Generate Command
// =============================================================================

#[test]
fn generate_fails_precheck_in_empty_directory() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("precheck failed"));
}

#[test]
fn generate_end_to_end() {
    // Full pipeline against a real git fixture; skipped when git is absent.
    let git_ok = std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !git_ok {
        return;
    }

    let tmp = TempDir::new().unwrap();
    let origin = tmp.path().join("origin");
    let component = origin.join("src/components/button");
    fs::create_dir_all(&component).unwrap();
    fs::write(component.join("readme.md"), "# Button\n").unwrap();

    let git = |args: &[&str]| {
        let out = std::process::Command::new("git")
            .arg("-C")
            .arg(&origin)
            .args(args)
            .output()
            .unwrap();
        assert!(out.status.success(), "git {args:?} failed");
    };
    git(&["init", "--quiet"]);
    git(&["config", "user.email", "test@example.com"]);
    git(&["config", "user.name", "Test"]);
    git(&["add", "."]);
    git(&["commit", "--quiet", "-m", "release"]);
    git(&["tag", "v1.0.0"]);

    let menu = tmp.path().join("src/components/site-menu/api-menu.ts");
    fs::create_dir_all(menu.parent().unwrap()).unwrap();
    fs::write(&menu, "export let apiMenu = {}").unwrap();
    fs::create_dir_all(tmp.path().join("src/docs-content/api")).unwrap();
    fs::write(
        tmp.path().join(".verdoc.toml"),
        format!(
            r#"
[repo]
url = "{}"

[build]
install = "true"
docs = "true"
"#,
            origin.display()
        ),
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 version(s) built"));

    let md = fs::read_to_string(tmp.path().join("src/docs-content/api/1.0.0/button.md")).unwrap();
    assert!(md.starts_with("---\n---\n\n"));
    assert!(
        fs::read_to_string(&menu)
            .unwrap()
            .contains("/docs/api/1.0.0/button")
    );

    // Second run skips the version entirely
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping existing API docs for v1.0.0"));
}

#[test]
fn generate_help_shows_flags() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--only"))
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--dry-run"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_choices_accepted() {
    for choice in ["auto", "always", "never"] {
        cmd().args(["--color", choice, "info"]).assert().success();
    }
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}

//! Environment checks before a generation run.
//!
//! Validates configuration and required paths up front. Returns structured
//! results that the CLI formats; no check has side effects, so a failed
//! precheck aborts the run before any clone, build, or copy happens.

use camino::Utf8Path;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::Config;

/// A single precheck result.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Human-readable name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Description of the result (reason for failure, or confirmation).
    pub message: String,
}

/// Full precheck report.
#[derive(Debug, Clone, Serialize)]
pub struct PrecheckReport {
    /// Individual check results.
    pub checks: Vec<CheckResult>,
    /// Whether all checks passed.
    pub all_passed: bool,
}

/// Run all prechecks.
///
/// # Arguments
/// * `project_root` — directory the configured relative paths resolve against
/// * `config` — loaded verdoc configuration
#[instrument(skip(config), fields(root = %project_root))]
pub fn run_precheck(project_root: &Utf8Path, config: &Config) -> PrecheckReport {
    let checks = vec![
        check_repo_url(config),
        check_git_binary(),
        check_build_tools(config),
        check_menu_file(project_root, config),
        check_docs_root(project_root, config),
    ];

    let all_passed = checks.iter().all(|c| c.passed);
    debug!(all_passed, check_count = checks.len(), "precheck complete");

    PrecheckReport { checks, all_passed }
}

fn check_repo_url(config: &Config) -> CheckResult {
    if config.repo.url.is_empty() {
        CheckResult {
            name: "Repository URL".into(),
            passed: false,
            message: "repo.url is not configured".into(),
        }
    } else {
        CheckResult {
            name: "Repository URL".into(),
            passed: true,
            message: format!("Source repository: {}", config.repo.url),
        }
    }
}

fn check_git_binary() -> CheckResult {
    if has_binary("git") {
        CheckResult {
            name: "Git binary".into(),
            passed: true,
            message: "git is on PATH".into(),
        }
    } else {
        CheckResult {
            name: "Git binary".into(),
            passed: false,
            message: "git not found on PATH".into(),
        }
    }
}

fn check_build_tools(config: &Config) -> CheckResult {
    let mut missing = Vec::new();

    for cmd in [&config.build.install, &config.build.docs] {
        if let Some(bin) = cmd.split_whitespace().next()
            && !has_binary(bin)
            && !missing.iter().any(|m| m == bin)
        {
            missing.push(bin.to_string());
        }
    }

    if missing.is_empty() {
        CheckResult {
            name: "Build tools".into(),
            passed: true,
            message: "All build-command binaries are installed".into(),
        }
    } else {
        CheckResult {
            name: "Build tools".into(),
            passed: false,
            message: format!("Missing tools: {}", missing.join(", ")),
        }
    }
}

fn check_menu_file(project_root: &Utf8Path, config: &Config) -> CheckResult {
    let path = project_root.join(&config.output.menu_file);
    if path.is_file() {
        CheckResult {
            name: "Navigation menu".into(),
            passed: true,
            message: format!("Menu file present at {path}"),
        }
    } else {
        CheckResult {
            name: "Navigation menu".into(),
            passed: false,
            message: format!("Menu file missing: {path}"),
        }
    }
}

fn check_docs_root(project_root: &Utf8Path, config: &Config) -> CheckResult {
    // The per-version directories are created on demand; what must already
    // exist is the docs tree the root lives in.
    let path = project_root.join(&config.output.docs_root);
    let parent_ok = path
        .parent()
        .map(Utf8Path::is_dir)
        .unwrap_or(false);

    if path.is_dir() || parent_ok {
        CheckResult {
            name: "Docs root".into(),
            passed: true,
            message: format!("Output root available at {path}"),
        }
    } else {
        CheckResult {
            name: "Docs root".into(),
            passed: false,
            message: format!("Neither {path} nor its parent directory exists"),
        }
    }
}

/// Check whether a binary is available on `PATH`.
pub fn has_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;

    fn passing_setup() -> (tempfile::TempDir, Utf8PathBuf, Config) {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();

        let mut config = Config::default();
        config.repo.url = "https://example.com/widgets.git".into();
        // "true" ships with coreutils everywhere these tests run
        config.build.install = "true".into();
        config.build.docs = "true".into();

        let menu = root.join(&config.output.menu_file);
        fs::create_dir_all(menu.parent().unwrap()).unwrap();
        fs::write(&menu, "export let apiMenu = {}").unwrap();
        fs::create_dir_all(root.join(&config.output.docs_root)).unwrap();

        (tmp, root, config)
    }

    #[test]
    fn all_checks_pass_on_complete_setup() {
        let (_tmp, root, config) = passing_setup();
        let report = run_precheck(&root, &config);
        assert!(report.all_passed, "failed checks: {:?}", report.checks);
    }

    #[test]
    fn empty_repo_url_fails() {
        let (_tmp, root, mut config) = passing_setup();
        config.repo.url = String::new();
        let report = run_precheck(&root, &config);
        assert!(!report.all_passed);
        let check = report.checks.iter().find(|c| c.name == "Repository URL").unwrap();
        assert!(!check.passed);
    }

    #[test]
    fn missing_menu_file_fails() {
        let (_tmp, root, mut config) = passing_setup();
        config.output.menu_file = Utf8PathBuf::from("nowhere/menu.ts");
        let report = run_precheck(&root, &config);
        let check = report.checks.iter().find(|c| c.name == "Navigation menu").unwrap();
        assert!(!check.passed);
    }

    #[test]
    fn missing_build_tool_fails() {
        let (_tmp, root, mut config) = passing_setup();
        config.build.docs = "definitely-not-a-real-binary-xyz run docs".into();
        let report = run_precheck(&root, &config);
        let check = report.checks.iter().find(|c| c.name == "Build tools").unwrap();
        assert!(!check.passed);
        assert!(check.message.contains("definitely-not-a-real-binary-xyz"));
    }

    #[test]
    fn report_serializes() {
        let (_tmp, root, config) = passing_setup();
        let report = run_precheck(&root, &config);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"all_passed\":true"));
    }
}

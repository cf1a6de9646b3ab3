//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! The following configuration file formats are supported:
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `.verdoc.<ext>` in current directory or any parent
//! - `verdoc.<ext>` in current directory or any parent
//! - `~/.config/verdoc/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use verdoc_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// The configuration for verdoc.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON). Every section carries serialized defaults that reproduce the
/// stock documentation-site layout; config values act as overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (stderr-only logging if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Source repository settings.
    pub repo: RepoConfig,
    /// Where documentation sources live inside the checked-out tree.
    pub source: SourceConfig,
    /// Where generated documentation lands.
    pub output: OutputConfig,
    /// External build commands run against the checked-out revision.
    pub build: BuildConfig,
    /// URL templates for generated links and asset rewrites.
    pub urls: UrlConfig,
}

/// Source repository settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoConfig {
    /// Remote URL of the component library repository. Required for
    /// `generate`; there is no usable default.
    pub url: String,
    /// Local working copy path, relative to the project root. Cloned on
    /// first use, fetched and reused afterwards.
    pub dir: Utf8PathBuf,
    /// Prefix release tags carry in front of the semver (e.g. `v1.2.3`).
    pub tag_prefix: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            dir: Utf8PathBuf::from("build/source"),
            tag_prefix: "v".into(),
        }
    }
}

/// Locations of documentation sources inside the working copy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Glob matching per-component documentation files, relative to the
    /// working copy root.
    pub readme_glob: String,
    /// Path of a component's preview page, relative to the component's
    /// directory. Absent previews are not an error.
    pub preview_file: Utf8PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            readme_glob: "src/components/**/readme.md".into(),
            preview_file: Utf8PathBuf::from("test/preview/index.html"),
        }
    }
}

/// Destination layout for generated documentation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory receiving one subdirectory per version.
    pub docs_root: Utf8PathBuf,
    /// The persisted navigation index consumed by the docs site build.
    pub menu_file: Utf8PathBuf,
    /// Declaration text wrapped around the JSON object in the menu file.
    /// Stripped on read and re-added byte-for-byte on write.
    pub menu_declaration: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            docs_root: Utf8PathBuf::from("src/docs-content/api"),
            menu_file: Utf8PathBuf::from("src/components/site-menu/api-menu.ts"),
            menu_declaration: "export let apiMenu = ".into(),
        }
    }
}

/// External build commands, run through `sh -c` in the working copy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Dependency install command for the checked-out revision.
    pub install: String,
    /// Documentation-generation command.
    pub docs: String,
    /// Wall-clock ceiling for the docs build, in seconds. Builds are
    /// documented as taking 1-3 minutes; the default leaves headroom.
    pub timeout_secs: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            install: "npm ci".into(),
            docs: "npm run build.docs".into(),
            timeout_secs: 600,
        }
    }
}

/// URL templates. `{version}` and `{component}` are interpolated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UrlConfig {
    /// Navigation entry for a component's documentation page.
    pub component: String,
    /// `previewUrl` value written into each component's markdown header.
    pub preview: String,
    /// Substring in preview pages that references the locally built
    /// asset bundle.
    pub asset_path: String,
    /// Version-pinned replacement for [`asset_path`](Self::asset_path).
    pub asset_url: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            component: "/docs/api/{version}/{component}".into(),
            preview: "/docs/docs-content/api/{version}/{component}.html".into(),
            asset_path: "/dist/core.js".into(),
            asset_url: "https://unpkg.com/@example/core@{version}/dist/core.js".into(),
        }
    }
}

impl UrlConfig {
    /// Navigation URL for a component at a version.
    pub fn component_url(&self, version: &str, component: &str) -> String {
        interpolate(&self.component, version, component)
    }

    /// Preview URL for a component at a version.
    pub fn preview_url(&self, version: &str, component: &str) -> String {
        interpolate(&self.preview, version, component)
    }

    /// Version-pinned asset URL substituted into preview pages.
    pub fn asset_url_for(&self, version: &str) -> String {
        self.asset_url.replace("{version}", version)
    }
}

/// Replace `{version}` and `{component}` placeholders in a URL template.
fn interpolate(template: &str, version: &str, component: &str) -> String {
    template
        .replace("{version}", version)
        .replace("{component}", component)
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "verdoc";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/verdoc/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. Explicit files (in order added via `with_file`)
    /// 2. Project config (closest to search root)
    /// 3. User config (`~/.config/verdoc/config.<ext>`)
    /// 4. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<Config> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Start with user config (lowest precedence of file sources)
        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
        }

        // Add project config
        if let Some(ref root) = self.project_search_root
            && let Some(project_config) = self.find_project_config(root)
        {
            figment = Self::merge_file(figment, &project_config);
        }

        // Add explicit files (highest precedence)
        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<Config> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .and_then(|root| self.find_project_config(root))
            .is_some();
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config by walking up from the given directory.
    fn find_project_config(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            // Check for boundary marker
            if let Some(ref marker) = self.boundary_marker {
                let marker_path = dir.join(marker);
                if marker_path.exists() && dir != start {
                    // Found boundary in a parent dir, stop searching
                    break;
                }
            }

            // Check for config files in this directory (try each extension)
            for ext in CONFIG_EXTENSIONS {
                // Try dotfile first (.verdoc.toml)
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    return Some(dotfile);
                }

                // Then try regular name (verdoc.toml)
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    return Some(regular);
                }
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        None
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
        let config_dir = proj_dirs.config_dir();

        // Try each supported extension
        for ext in CONFIG_EXTENSIONS {
            let config_path = config_dir.join(format!("config.{ext}"));
            if config_path.is_file() {
                return Utf8PathBuf::from_path_buf(config_path).ok();
            }
        }

        None
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("toml") => figment.merge(Toml::file_exact(path.as_str())),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Find the project config file path without loading it.
///
/// Useful for commands that need to know where config is located.
pub fn find_project_config<P: AsRef<Utf8Path>>(start: P) -> Option<Utf8PathBuf> {
    ConfigLoader::new()
        .with_project_search(start.as_ref())
        .without_boundary_marker()
        .find_project_config(start.as_ref())
}

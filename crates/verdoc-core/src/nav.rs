//! Navigation index maintenance.
//!
//! The docs site's version/component menu is persisted as a JSON object
//! wrapped in a source-level declaration (default `export let apiMenu = `)
//! so the site build can import it directly. This module strips the
//! declaration, parses the object into a typed nested map, replaces the
//! entry for one version, and writes the whole thing back with the
//! declaration re-added.
//!
//! Parse failure is loud: silently resetting the menu would corrupt
//! navigation for every published version, which is worse than aborting.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::UrlConfig;
use crate::locate;

/// The navigation index: version → component → URL path.
///
/// `BTreeMap` keeps key order stable, so serialization is canonical and
/// entries for untouched versions survive a round trip unchanged.
pub type NavIndex = BTreeMap<String, BTreeMap<String, String>>;

/// Errors from navigation index maintenance.
#[derive(Error, Debug)]
pub enum NavError {
    /// Reading or writing the menu file failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The menu file path.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The stored index could not be parsed.
    #[error("cannot parse navigation index {path}: {source}")]
    Parse {
        /// The menu file path.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Result alias for navigation operations.
pub type NavResult<T> = Result<T, NavError>;

/// Read and parse the stored navigation index.
#[instrument(fields(%path))]
pub fn read_index(path: &Utf8Path, declaration: &str) -> NavResult<NavIndex> {
    let content = std::fs::read_to_string(path).map_err(|source| NavError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json = content.strip_prefix(declaration).unwrap_or(&content);
    let index: NavIndex = serde_json::from_str(json).map_err(|source| NavError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(versions = index.len(), "navigation index loaded");
    Ok(index)
}

/// Serialize the index and write it back, declaration re-added.
#[instrument(skip(index), fields(%path, versions = index.len()))]
pub fn write_index(path: &Utf8Path, declaration: &str, index: &NavIndex) -> NavResult<()> {
    // serde_json pretty-printing plus BTreeMap ordering makes this
    // canonical: parse-then-write of an already-written file is a no-op.
    let json = serde_json::to_string_pretty(index).map_err(|source| NavError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, format!("{declaration}{json}")).map_err(|source| NavError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Upsert one version's navigation entries.
///
/// The version's component map is replaced wholesale — components left
/// over from an earlier partial build of the same version are dropped.
/// Entries for other versions are untouched. Returns the number of
/// components recorded.
#[instrument(skip(files, urls), fields(%path, %version))]
pub fn update(
    path: &Utf8Path,
    declaration: &str,
    files: &[Utf8PathBuf],
    version: &str,
    urls: &UrlConfig,
) -> NavResult<usize> {
    let mut index = read_index(path, declaration)?;

    let components: BTreeMap<String, String> = files
        .iter()
        .filter_map(|file| locate::component_name(file))
        .map(|name| (name.to_string(), urls.component_url(version, name)))
        .collect();
    let count = components.len();

    index.insert(version.to_string(), components);
    write_index(path, declaration, &index)?;

    debug!(count, "navigation updated");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DECL: &str = "export let apiMenu = ";

    fn menu_file(content: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("api-menu.ts")).unwrap();
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn read_strips_declaration() {
        let (_tmp, path) = menu_file(
            "export let apiMenu = {\n  \"1.0.0\": {\n    \"button\": \"/docs/api/1.0.0/button\"\n  }\n}",
        );
        let index = read_index(&path, DECL).unwrap();
        assert_eq!(
            index["1.0.0"]["button"],
            "/docs/api/1.0.0/button"
        );
    }

    #[test]
    fn read_accepts_bare_json() {
        let (_tmp, path) = menu_file("{}");
        let index = read_index(&path, DECL).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn malformed_index_fails_loudly() {
        let (_tmp, path) = menu_file("export let apiMenu = {not json at all");
        let result = read_index(&path, DECL);
        assert!(matches!(result, Err(NavError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("absent.ts")).unwrap();
        let result = read_index(&path, DECL);
        assert!(matches!(result, Err(NavError::Io { .. })));
    }

    #[test]
    fn round_trip_preserves_other_versions() {
        let (_tmp, path) = menu_file("export let apiMenu = {}");

        // Seed with one version
        let files = vec![Utf8PathBuf::from("src/components/button/readme.md")];
        update(&path, DECL, &files, "1.0.0", &UrlConfig::default()).unwrap();
        let first_entry = read_index(&path, DECL).unwrap()["1.0.0"].clone();

        // Updating a different version leaves 1.0.0's entry untouched
        let files = vec![Utf8PathBuf::from("src/components/card/readme.md")];
        update(&path, DECL, &files, "2.0.0", &UrlConfig::default()).unwrap();

        let index = read_index(&path, DECL).unwrap();
        assert_eq!(index["1.0.0"], first_entry);
        assert_eq!(index["2.0.0"]["card"], "/docs/api/2.0.0/card");
    }

    #[test]
    fn update_replaces_version_wholesale() {
        let (_tmp, path) = menu_file("export let apiMenu = {}");

        let files = vec![
            Utf8PathBuf::from("src/components/button/readme.md"),
            Utf8PathBuf::from("src/components/card/readme.md"),
        ];
        update(&path, DECL, &files, "1.0.0", &UrlConfig::default()).unwrap();

        // Rebuild of the same version with fewer components drops the stale one
        let files = vec![Utf8PathBuf::from("src/components/card/readme.md")];
        let count = update(&path, DECL, &files, "1.0.0", &UrlConfig::default()).unwrap();
        assert_eq!(count, 1);

        let index = read_index(&path, DECL).unwrap();
        assert_eq!(index["1.0.0"].len(), 1);
        assert!(index["1.0.0"].contains_key("card"));
        assert!(!index["1.0.0"].contains_key("button"));
    }

    #[test]
    fn written_file_keeps_declaration_prefix() {
        let (_tmp, path) = menu_file("export let apiMenu = {}");
        let files = vec![Utf8PathBuf::from("src/components/tabs/readme.md")];
        update(&path, DECL, &files, "3.1.4", &UrlConfig::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("export let apiMenu = {"));
        assert!(content.contains("\"3.1.4\""));
    }

    #[test]
    fn serialization_is_canonical() {
        let (_tmp, path) = menu_file("export let apiMenu = {}");
        let files = vec![
            Utf8PathBuf::from("src/components/zeta/readme.md"),
            Utf8PathBuf::from("src/components/alpha/readme.md"),
        ];
        update(&path, DECL, &files, "1.0.0", &UrlConfig::default()).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        // Parse and write back with no changes: bytes identical
        let index = read_index(&path, DECL).unwrap();
        write_index(&path, DECL, &index).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);

        // Keys come out sorted regardless of input order
        let alpha = first.find("alpha").unwrap();
        let zeta = first.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}

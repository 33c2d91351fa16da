//! Installed distribution metadata
//!
//! Finds a distribution's `.dist-info/METADATA` (or `.egg-info/PKG-INFO`) on
//! the interpreter's import path and maps its core-metadata headers onto
//! version-file fields:
//!
//! | header | field |
//! |---|---|
//! | `Version` | version |
//! | `Author`, else `Author-email` display name, else `Maintainer` | company_name |
//! | `Summary` | file_description |
//! | `Name` | internal_name, product_name |
//! | `License-Expression`, else first line of `License` | legal_copyright |

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use versionfile_core::{Field, PartialMetadata};

use crate::errors::InstallerError;

const SYS_PATH_SCRIPT: &str = "import json, sys; print(json.dumps([p for p in sys.path if p]))";

/// Placeholder setuptools writes for missing metadata
const UNKNOWN: &str = "UNKNOWN";

/// Locate installed distributions on a set of import paths
#[derive(Debug, Clone, Default)]
pub struct DistributionLocator {
    search_paths: Vec<PathBuf>,
}

impl DistributionLocator {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Use the import path (`sys.path`) of `python`
    pub fn from_interpreter(python: &Path) -> Result<Self, InstallerError> {
        let output = Command::new(python)
            .args(["-c", SYS_PATH_SCRIPT])
            .output()
            .map_err(|e| {
                InstallerError::Interpreter(format!("could not run {}: {}", python.display(), e))
            })?;

        if !output.status.success() {
            return Err(InstallerError::Interpreter(format!(
                "{} exited with status {}: {}",
                python.display(),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let paths: Vec<String> = serde_json::from_slice(&output.stdout).map_err(|e| {
            InstallerError::Interpreter(format!("unexpected sys.path output: {}", e))
        })?;
        debug!("Interpreter import path: {:?}", paths);

        Ok(Self::new(paths.into_iter().map(PathBuf::from).collect()))
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Path of the metadata file for `name`, first match on the search path
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let wanted = normalize_name(name);

        self.search_paths
            .iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| find_in_dir(dir, &wanted))
    }

    /// Read the metadata of an installed distribution
    pub fn read_metadata(&self, name: &str) -> Result<PartialMetadata, InstallerError> {
        let path = self
            .find(name)
            .ok_or_else(|| InstallerError::DistributionNotFound(name.to_string()))?;
        debug!("Reading distribution metadata from {}", path.display());

        let content = fs::read(&path)?;
        Ok(metadata_from_headers(&parse_headers(&content)?))
    }
}

fn find_in_dir(dir: &Path, wanted: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let (stem, metadata_file) = if let Some(stem) = file_name.strip_suffix(".dist-info") {
                (stem.to_string(), "METADATA")
            } else if let Some(stem) = file_name.strip_suffix(".egg-info") {
                (stem.to_string(), "PKG-INFO")
            } else {
                return None;
            };

            let project = stem.split('-').next().unwrap_or(&stem);
            if normalize_name(project) != wanted {
                return None;
            }

            let path = entry.path().join(metadata_file);
            path.is_file().then_some(path)
        })
        .collect();

    // read_dir order is unspecified; prefer dist-info, then name order
    candidates.sort_by_key(|p| {
        (
            p.file_name().is_some_and(|n| n != "METADATA"),
            p.to_string_lossy().to_string(),
        )
    });
    candidates.into_iter().next()
}

/// PEP 503 name normalization: runs of `-`, `_`, `.` become `-`, lowercase
pub fn normalize_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                result.push('-');
                in_separator = true;
            }
        } else {
            result.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }

    result
}

/// Parse the RFC 822 style header block of a core-metadata file
///
/// Header names are case-insensitive; the first occurrence of a repeated
/// header is kept. Continuation lines are kept as separate lines of the value.
pub fn parse_headers(content: &[u8]) -> Result<HashMap<String, String>, InstallerError> {
    let (parsed, _body_offset) = mailparse::parse_headers(content)
        .map_err(|e| InstallerError::InvalidMetadata(e.to_string()))?;

    let mut headers = HashMap::new();
    for header in &parsed {
        let value = String::from_utf8_lossy(header.get_value_raw())
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        headers
            .entry(header.get_key().to_ascii_lowercase())
            .or_insert(value);
    }

    Ok(headers)
}

/// Map core-metadata headers onto version-file fields
pub fn metadata_from_headers(headers: &HashMap<String, String>) -> PartialMetadata {
    let get = |key: &str| {
        headers
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty() && *v != UNKNOWN)
    };

    let company = get("author")
        .map(str::to_string)
        .or_else(|| get("author-email").and_then(display_name))
        .or_else(|| get("maintainer").map(str::to_string));

    let license = get("license-expression")
        .or_else(|| get("license"))
        .and_then(|text| text.lines().next())
        .map(|line| line.trim().to_string());

    let mut metadata = PartialMetadata::new();
    metadata
        .set_opt(Field::Version, get("version"))
        .set_opt(Field::CompanyName, company)
        .set_opt(Field::FileDescription, get("summary"))
        .set_opt(Field::InternalName, get("name"))
        .set_opt(Field::LegalCopyright, license)
        .set_opt(Field::ProductName, get("name"));
    metadata
}

/// Display name of the first address in an `Author-email` header
///
/// `"Jane Doe" <jane@example.com>, Bob <bob@example.com>` gives `Jane Doe`.
fn display_name(addresses: &str) -> Option<String> {
    let first = addresses.split(',').next()?;
    let (name, _) = first.split_once('<')?;
    let name = name.trim().trim_matches('"').trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use versionfile_core::RawValue;
    use tempfile::TempDir;

    const METADATA: &str = "\
Metadata-Version: 2.1
Name: demo-app
Version: 0.4.2
Summary: A demo application
Author-email: \"Jane Doe\" <jane@example.com>
License: MIT License
        Permission is hereby granted
Requires-Python: >=3.9
Classifier: Programming Language :: Python :: 3

# demo-app

Version: 9.9.9 (inside the description)
";

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Demo_App"), "demo-app");
        assert_eq!(normalize_name("demo.-_app"), "demo-app");
        assert_eq!(normalize_name("demo-app"), "demo-app");
    }

    fn headers(content: &str) -> HashMap<String, String> {
        parse_headers(content.as_bytes()).unwrap_or_default()
    }

    #[test]
    fn test_parse_headers_stops_at_body() {
        let headers = headers(METADATA);
        assert_eq!(headers.get("version").map(String::as_str), Some("0.4.2"));
        assert_eq!(
            headers.get("license").map(String::as_str),
            Some("MIT License\nPermission is hereby granted")
        );
    }

    #[test]
    fn test_first_header_wins() {
        let headers = headers("Name: first\nname: second\n");
        assert_eq!(headers.get("name").map(String::as_str), Some("first"));
    }

    #[test]
    fn test_metadata_mapping() {
        let meta = metadata_from_headers(&headers(METADATA));
        assert_eq!(meta.get(Field::Version), Some(&RawValue::from("0.4.2")));
        assert_eq!(meta.get(Field::CompanyName), Some(&RawValue::from("Jane Doe")));
        assert_eq!(
            meta.get(Field::FileDescription),
            Some(&RawValue::from("A demo application"))
        );
        assert_eq!(meta.get(Field::InternalName), Some(&RawValue::from("demo-app")));
        assert_eq!(meta.get(Field::ProductName), Some(&RawValue::from("demo-app")));
        assert_eq!(meta.get(Field::LegalCopyright), Some(&RawValue::from("MIT License")));
        assert!(!meta.contains(Field::OriginalFilename));
        assert!(!meta.contains(Field::Translations));
    }

    #[test]
    fn test_unknown_values_are_absent() {
        let headers = headers("Name: legacy\nVersion: 1.0\nAuthor: UNKNOWN\nSummary: UNKNOWN\n");
        let meta = metadata_from_headers(&headers);
        assert!(!meta.contains(Field::CompanyName));
        assert!(!meta.contains(Field::FileDescription));
        assert_eq!(meta.len(), 3);
    }

    #[test]
    fn test_author_preferred_over_email() {
        let headers = headers("Name: x\nAuthor: Acme\nAuthor-email: Jane <j@x.org>\n");
        let meta = metadata_from_headers(&headers);
        assert_eq!(meta.get(Field::CompanyName), Some(&RawValue::from("Acme")));
    }

    #[test]
    fn test_email_without_display_name_skipped() {
        assert_eq!(display_name("jane@example.com"), None);
        assert_eq!(
            display_name("Bob Smith <bob@x.org>, Ann <ann@x.org>"),
            Some("Bob Smith".to_string())
        );
    }

    #[test]
    fn test_locator_finds_dist_info() {
        let Ok(site) = TempDir::new() else {
            return;
        };
        let dist_info = site.path().join("demo_app-0.4.2.dist-info");
        assert!(fs::create_dir_all(&dist_info).is_ok());
        assert!(fs::write(dist_info.join("METADATA"), METADATA).is_ok());
        assert!(fs::create_dir_all(site.path().join("other_pkg-1.0.dist-info")).is_ok());

        let locator = DistributionLocator::new(vec![
            PathBuf::from("/nonexistent/site-packages"),
            site.path().to_path_buf(),
        ]);
        assert!(locator
            .find("Demo-App")
            .is_some_and(|p| p.ends_with("demo_app-0.4.2.dist-info/METADATA")));

        let meta = locator.read_metadata("demo_app");
        assert!(meta.is_ok_and(|m| m.get(Field::Version) == Some(&RawValue::from("0.4.2"))));
    }

    #[test]
    fn test_locator_finds_egg_info() {
        let Ok(site) = TempDir::new() else {
            return;
        };
        let egg_info = site.path().join("legacy_pkg.egg-info");
        assert!(fs::create_dir_all(&egg_info).is_ok());
        assert!(fs::write(egg_info.join("PKG-INFO"), "Name: legacy-pkg\nVersion: 2.1\n").is_ok());

        let locator = DistributionLocator::new(vec![site.path().to_path_buf()]);
        assert!(locator
            .find("legacy-pkg")
            .is_some_and(|p| p.ends_with("PKG-INFO")));
    }

    #[test]
    fn test_missing_distribution() {
        let Ok(site) = TempDir::new() else {
            return;
        };
        let locator = DistributionLocator::new(vec![site.path().to_path_buf()]);
        assert!(matches!(
            locator.read_metadata("not-installed"),
            Err(InstallerError::DistributionNotFound(ref name)) if name == "not-installed"
        ));
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        let Ok(site) = TempDir::new() else {
            return;
        };
        let dist_info = site.path().join("demo_app_extra-1.0.dist-info");
        assert!(fs::create_dir_all(&dist_info).is_ok());
        assert!(fs::write(dist_info.join("METADATA"), "Name: demo-app-extra\n").is_ok());

        let locator = DistributionLocator::new(vec![site.path().to_path_buf()]);
        assert_eq!(locator.find("demo-app"), None);
    }
}

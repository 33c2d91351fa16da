//! `[tool.versionfile]` reader for pyproject.toml

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::aliases::{extract_fields, is_known_key};
use crate::errors::MetadataError;
use crate::types::{PartialMetadata, RawValue};

/// Read the `[tool.versionfile]` section of a TOML document.
///
/// A missing path, or one that is not an existing file, yields empty metadata.
/// A document that fails to parse is an error; defaults are never substituted
/// for a malformed file.
pub fn read_config(path: Option<&Path>) -> Result<PartialMetadata, MetadataError> {
    let Some(path) = path else {
        return Ok(PartialMetadata::new());
    };

    if !path.is_file() {
        debug!("No configuration file at {}", path.display());
        return Ok(PartialMetadata::new());
    }

    let content = fs::read_to_string(path)?;
    read_config_str(&content, path)
}

/// Parse already-loaded TOML text; `origin` is used in error messages.
pub fn read_config_str(content: &str, origin: &Path) -> Result<PartialMetadata, MetadataError> {
    let document: toml::Table =
        toml::from_str(content).map_err(|e| MetadataError::ConfigParse {
            path: origin.to_path_buf(),
            message: e.message().to_string(),
        })?;

    let section = match document.get("tool").and_then(|tool| tool.get("versionfile")) {
        None => {
            debug!("{} has no [tool.versionfile] section", origin.display());
            return Ok(PartialMetadata::new());
        }
        Some(toml::Value::Table(section)) => section,
        Some(other) => {
            return Err(MetadataError::ConfigParse {
                path: origin.to_path_buf(),
                message: format!(
                    "tool.versionfile must be a table, found {}",
                    other.type_str()
                ),
            })
        }
    };

    for key in section.keys().filter(|key| !is_known_key(key)) {
        warn!(
            "Ignoring unknown key '{}' in [tool.versionfile] of {}",
            key,
            origin.display()
        );
    }

    let metadata = extract_fields(&origin.display().to_string(), |key| {
        section.get(key).map(RawValue::from)
    });
    debug!(
        "Read {} field(s) from [tool.versionfile] in {}",
        metadata.len(),
        origin.display()
    );

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;
    use tempfile::TempDir;

    fn origin() -> &'static Path {
        Path::new("pyproject.toml")
    }

    #[test]
    fn test_read_config_none_is_empty() {
        assert!(read_config(None).is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_read_config_missing_file_is_empty() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let missing = dir.path().join("pyproject.toml");
        assert!(read_config(Some(&missing)).is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_read_config_directory_is_empty() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        assert!(read_config(Some(dir.path())).is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_read_versionfile_section() {
        let content = r#"
[project]
name = "demo"
version = "9.9.9"

[tool.versionfile]
version = "1.2.3"
company-name = "Acme Corp"
file_description = "Demo tool"
legal-copyright = "(c) Acme"
translations = [1033, 1200]
"#;
        let meta = read_config_str(content, origin());
        assert!(meta.as_ref().is_ok_and(|m| m.len() == 5));
        assert!(meta
            .as_ref()
            .is_ok_and(|m| m.get(Field::Version) == Some(&RawValue::from("1.2.3"))));
        assert!(meta
            .as_ref()
            .is_ok_and(|m| m.get(Field::CompanyName) == Some(&RawValue::from("Acme Corp"))));
        assert!(meta.is_ok_and(|m| m.get(Field::Translations)
            == Some(&RawValue::Array(vec![
                RawValue::Integer(1033),
                RawValue::Integer(1200)
            ]))));
    }

    #[test]
    fn test_missing_section_is_empty() {
        let content = "[project]\nname = \"demo\"\n\n[tool.black]\nline-length = 88\n";
        assert!(read_config_str(content, origin()).is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn test_both_spellings_resolve_to_snake_case() {
        let content = r#"
[tool.versionfile]
company-name = "Hyphen Inc"
company_name = "Snake Inc"
"#;
        let meta = read_config_str(content, origin());
        assert!(meta.is_ok_and(|m| m.get(Field::CompanyName) == Some(&RawValue::from("Snake Inc"))));
    }

    #[test]
    fn test_translations_not_coerced() {
        let content = "[tool.versionfile]\ntranslations = \"1033\"\n";
        let meta = read_config_str(content, origin());
        assert!(meta.is_ok_and(|m| m.get(Field::Translations) == Some(&RawValue::from("1033"))));
    }

    #[test]
    fn test_malformed_document_is_config_parse_error() {
        let result = read_config_str("[tool.versionfile\nversion = ", origin());
        assert!(matches!(
            result,
            Err(MetadataError::ConfigParse { ref path, .. }) if path == origin()
        ));
    }

    #[test]
    fn test_non_table_section_is_error() {
        let result = read_config_str("[tool]\nversionfile = \"1.0\"\n", origin());
        assert!(matches!(result, Err(MetadataError::ConfigParse { .. })));
    }

    #[test]
    fn test_read_config_from_disk() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("pyproject.toml");
        assert!(fs::write(&path, "[tool.versionfile]\nproduct-name = \"Demo\"\n").is_ok());

        let meta = read_config(Some(&path));
        assert!(meta.is_ok_and(|m| m.get(Field::ProductName) == Some(&RawValue::from("Demo"))));
    }
}

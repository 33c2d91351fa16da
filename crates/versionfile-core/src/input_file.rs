//! YAML input files
//!
//! The input file is a flat mapping, conventionally using PyInstaller names:
//!
//! ```yaml
//! Version: 1.2.3.4
//! CompanyName: Acme Corp
//! FileDescription: Demo tool
//! InternalName: demo
//! LegalCopyright: (c) Acme Corp
//! OriginalFilename: demo.exe
//! ProductName: Demo
//! Translation: [1033, 1200]
//! ```
//!
//! `Version` may instead name a file, relative to the input file, whose first
//! line holds the version.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::aliases::extract_fields;
use crate::errors::MetadataError;
use crate::types::{Field, PartialMetadata, RawValue};

pub fn read_input_file(path: &Path) -> Result<PartialMetadata, MetadataError> {
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    read_input_str(&content, path, base_dir)
}

/// Parse YAML text; relative version files are looked up in `base_dir`.
pub fn read_input_str(
    content: &str,
    origin: &Path,
    base_dir: &Path,
) -> Result<PartialMetadata, MetadataError> {
    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| MetadataError::ConfigParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

    let mapping = match document {
        serde_yaml::Value::Null => return Ok(PartialMetadata::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => {
            return Err(MetadataError::ConfigParse {
                path: origin.to_path_buf(),
                message: "expected a mapping of version-file fields".to_string(),
            })
        }
    };

    let mut metadata = extract_fields(&origin.display().to_string(), |key| {
        mapping.get(key).and_then(RawValue::from_yaml)
    });

    if let Some(version) = version_from_file(&metadata, base_dir)? {
        metadata.set(Field::Version, version);
    }

    Ok(metadata)
}

/// When `Version` names an existing file, read the version from its first line
fn version_from_file(
    metadata: &PartialMetadata,
    base_dir: &Path,
) -> Result<Option<String>, MetadataError> {
    let Some(candidate) = metadata.get(Field::Version).and_then(RawValue::as_str) else {
        return Ok(None);
    };

    let path = base_dir.join(candidate.trim());
    if !path.is_file() {
        return Ok(None);
    }

    debug!("Reading version from {}", path.display());
    let content = fs::read_to_string(&path)?;
    let version = content.lines().next().unwrap_or_default().trim().to_string();
    if version.is_empty() {
        return Err(MetadataError::Validation(format!(
            "version file {} is empty",
            path.display()
        )));
    }
    Ok(Some(version))
}

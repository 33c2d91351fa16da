//! Version-file rendering
//!
//! Produces the `VSVersionInfo(...)` text definition that PyInstaller accepts
//! through `--version-file`. Absent fields fall back to the defaults below.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::MetadataError;
use crate::types::MetadataRecord;

pub const DEFAULT_VERSION: &str = "0.0.0.0";
pub const DEFAULT_TRANSLATIONS: [u32; 2] = [1033, 1200];

const VERSION_PARTS: usize = 4;

static RELEASE_SEGMENT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*[vV]?(\d+(?:\.\d+)*)").ok());

/// Writes a resolved record to an output file
pub trait Renderer {
    fn render(&self, record: &MetadataRecord, output: &Path) -> Result<(), MetadataError>;
}

/// Renderer for the PyInstaller version-file format
#[derive(Debug, Clone, Copy, Default)]
pub struct PyInstallerRenderer;

impl Renderer for PyInstallerRenderer {
    fn render(&self, record: &MetadataRecord, output: &Path) -> Result<(), MetadataError> {
        let content = render_to_string(record)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, content)?;
        debug!("Wrote version file {}", output.display());
        Ok(())
    }
}

/// Render the version-file text for `record`
pub fn render_to_string(record: &MetadataRecord) -> Result<String, MetadataError> {
    let parts = version_parts(record.version.as_deref().unwrap_or(DEFAULT_VERSION))?;
    let version = parts
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(".");
    let version_tuple = parts
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let translations = record
        .translations
        .clone()
        .unwrap_or_else(|| DEFAULT_TRANSLATIONS.to_vec());
    let lang_key = string_table_key(&translations)?;
    let translation_list = translations
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let text = |value: &Option<String>| escape(value.as_deref().unwrap_or_default());

    Ok(format!(
        r"# UTF-8
#
# For more details about fixed file info 'ffi' see:
# http://msdn.microsoft.com/en-us/library/ms646997.aspx
VSVersionInfo(
  ffi=FixedFileInfo(
    # filevers and prodvers should be always a tuple with four items: (1, 2, 3, 4)
    # Set not needed items to zero 0.
    filevers=({version_tuple}),
    prodvers=({version_tuple}),
    # Contains a bitmask that specifies the valid bits 'flags'r
    mask=0x3f,
    # Contains a bitmask that specifies the Boolean attributes of the file.
    flags=0x0,
    # The operating system for which this file was designed.
    # 0x4 - NT and there is no need to change it.
    OS=0x40004,
    # The general type of file.
    # 0x1 - the file is an application.
    fileType=0x1,
    # The function of the file.
    # 0x0 - the function is not defined for this fileType
    subtype=0x0,
    # Creation date and time stamp.
    date=(0, 0)
    ),
  kids=[
    StringFileInfo(
      [
      StringTable(
        u'{lang_key}',
        [StringStruct(u'CompanyName', u'{company_name}'),
        StringStruct(u'FileDescription', u'{file_description}'),
        StringStruct(u'FileVersion', u'{version}'),
        StringStruct(u'InternalName', u'{internal_name}'),
        StringStruct(u'LegalCopyright', u'{legal_copyright}'),
        StringStruct(u'OriginalFilename', u'{original_filename}'),
        StringStruct(u'ProductName', u'{product_name}'),
        StringStruct(u'ProductVersion', u'{version}')])
      ]),
    VarFileInfo([VarStruct(u'Translation', [{translation_list}])])
  ]
)
",
        version_tuple = version_tuple,
        version = version,
        lang_key = lang_key,
        company_name = text(&record.company_name),
        file_description = text(&record.file_description),
        internal_name = text(&record.internal_name),
        legal_copyright = text(&record.legal_copyright),
        original_filename = text(&record.original_filename),
        product_name = text(&record.product_name),
        translation_list = translation_list,
    ))
}

/// Take the numeric release segment of `version` and pad it to four parts
///
/// `1.2.3rc1` becomes `[1, 2, 3, 0]`.
pub fn version_parts(version: &str) -> Result<[u16; VERSION_PARTS], MetadataError> {
    let segment = RELEASE_SEGMENT
        .as_ref()
        .and_then(|re| re.captures(version))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            MetadataError::Render(format!("version '{}' has no numeric release part", version))
        })?;

    let numbers: Vec<&str> = segment.split('.').collect();
    if numbers.len() > VERSION_PARTS {
        return Err(MetadataError::Render(format!(
            "version '{}' has more than {} parts",
            version, VERSION_PARTS
        )));
    }

    let mut parts = [0_u16; VERSION_PARTS];
    for (slot, number) in parts.iter_mut().zip(numbers) {
        *slot = number.parse().map_err(|_| {
            MetadataError::Render(format!(
                "version part '{}' of '{}' exceeds 65535",
                number, version
            ))
        })?;
    }
    Ok(parts)
}

/// `StringTable` key from the first language/codepage pair, e.g. `040904B0`
fn string_table_key(translations: &[u32]) -> Result<String, MetadataError> {
    if translations.is_empty() || translations.len() % 2 != 0 {
        return Err(MetadataError::Render(format!(
            "translations must be language/codepage pairs, got {:?}",
            translations
        )));
    }
    Ok(format!("{:04X}{:04X}", translations[0], translations[1]))
}

/// Escape a value for a single-quoted string literal that must stay on one line
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

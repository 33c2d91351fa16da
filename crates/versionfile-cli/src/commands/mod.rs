pub mod create;
pub mod dist;
pub mod package;
pub mod yaml;

use anyhow::{Context, Result};
use std::path::PathBuf;
use versionfile_config::{resolve_interpreter, Settings};
use versionfile_core::{normalize, MetadataRecord, NormalizeOptions, PyInstallerRenderer, Renderer};

use crate::common::{GlobalOpts, VersionOptions};
use crate::logger;

/// Render `record` to the output file, normalize it unless `--no-fmt`, and
/// return its absolute path.
pub fn write_version_file(
    record: &MetadataRecord,
    options: &VersionOptions,
    settings: &Settings,
) -> Result<PathBuf> {
    let output = &options.output_file;
    PyInstallerRenderer
        .render(record, output)
        .with_context(|| format!("Failed to write version file {}", output.display()))?;

    let path = output
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", output.display()))?;

    if options.format_output() {
        let normalize_options = NormalizeOptions {
            markdown_linebreaks: settings.markdown_linebreaks,
        };
        let changed = normalize(&path, &normalize_options)
            .with_context(|| format!("Failed to format {}", path.display()))?;
        if changed {
            logger::debug(&format!("Normalized whitespace in {}", path.display()));
        }
    }

    logger::success(&format!("Wrote {}", path.display()));
    Ok(path)
}

/// The interpreter used for installs and distribution lookups
pub fn interpreter(global: &GlobalOpts, settings: &Settings) -> Result<PathBuf> {
    let python = resolve_interpreter(global.python.as_deref(), settings)
        .context("Could not find a Python interpreter")?;
    logger::debug(&format!("Using Python interpreter {}", python.display()));
    Ok(python)
}

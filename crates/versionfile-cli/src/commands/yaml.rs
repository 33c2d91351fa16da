use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use versionfile_config::Settings;
use versionfile_core::{read_input_file, resolve_layers};

use super::write_version_file;
use crate::common::VersionOptions;
use crate::errors::{Outcome, EXIT_OK};
use crate::logger;

/// Create a version file from a YAML input file
#[derive(Args, Debug, Clone)]
pub struct YamlCommand {
    /// YAML file with the version information
    pub input_file: PathBuf,

    #[command(flatten)]
    pub options: VersionOptions,
}

/// Values from the command line override the input file.
pub fn handle_yaml(cmd: &YamlCommand, settings: &Settings) -> Result<Outcome> {
    logger::debug(&format!("Reading {}", cmd.input_file.display()));
    let from_file = read_input_file(&cmd.input_file)
        .with_context(|| format!("Failed to read input file {}", cmd.input_file.display()))?;

    let record = resolve_layers(&[&from_file, &cmd.options.explicit_overrides()])?;
    let path = write_version_file(&record, &cmd.options, settings)?;
    Ok(Outcome::new(path, EXIT_OK))
}

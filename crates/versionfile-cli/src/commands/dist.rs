use anyhow::{Context, Result};
use clap::Args;
use versionfile_config::Settings;
use versionfile_core::{resolve, PartialMetadata};
use versionfile_python::DistributionLocator;

use super::{interpreter, write_version_file};
use crate::common::{GlobalOpts, VersionOptions};
use crate::errors::Outcome;
use crate::logger;

/// Create a version file from an installed distribution
#[derive(Args, Debug, Clone)]
pub struct DistCommand {
    /// Name of the installed distribution
    pub distname: String,

    #[command(flatten)]
    pub options: VersionOptions,
}

pub fn handle_dist(cmd: &DistCommand, global: &GlobalOpts, settings: &Settings) -> Result<Outcome> {
    let existed = cmd.options.output_file.is_file();

    let python = interpreter(global, settings)?;
    let locator = DistributionLocator::from_interpreter(&python)?;
    logger::step(&format!(
        "Searching {} import paths for '{}'",
        locator.search_paths().len(),
        cmd.distname
    ));

    let metadata = locator
        .read_metadata(&cmd.distname)
        .with_context(|| format!("Failed to read metadata of '{}'", cmd.distname))?;

    let record = resolve(
        &metadata,
        &PartialMetadata::new(),
        &cmd.options.explicit_overrides(),
    )?;
    let path = write_version_file(&record, &cmd.options, settings)?;
    Ok(Outcome::for_existing(path, existed))
}

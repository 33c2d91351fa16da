use anyhow::Result;
use clap::Args;
use versionfile_config::Settings;
use versionfile_core::resolve_layers;

use super::write_version_file;
use crate::common::VersionOptions;
use crate::errors::{Outcome, EXIT_OK};

/// Create a version file from command-line arguments only
#[derive(Args, Debug, Clone)]
pub struct CreateCommand {
    #[command(flatten)]
    pub options: VersionOptions,
}

pub fn handle_create(cmd: &CreateCommand, settings: &Settings) -> Result<Outcome> {
    let record = resolve_layers(&[&cmd.options.explicit_overrides()])?;
    let path = write_version_file(&record, &cmd.options, settings)?;
    Ok(Outcome::new(path, EXIT_OK))
}

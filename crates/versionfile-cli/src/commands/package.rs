use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use versionfile_config::Settings;
use versionfile_core::{read_config, resolve};
use versionfile_python::{DistributionLocator, EditableInstall, PackageInstaller};

use super::{interpreter, write_version_file};
use crate::common::{GlobalOpts, VersionOptions};
use crate::errors::{CommandError, Outcome};
use crate::logger;

/// Install a local project in editable mode and create a version file from
/// its distribution metadata
#[derive(Args, Debug, Clone)]
pub struct PackageCommand {
    /// Project directory to install
    pub input_path: PathBuf,

    #[command(flatten)]
    pub options: VersionOptions,

    /// pyproject.toml with a [tool.versionfile] section (default: <INPUT_PATH>/pyproject.toml)
    #[arg(long, value_name = "PYPROJECT", num_args = 0..=1, require_equals = true)]
    pub toml: Option<Option<PathBuf>>,

    /// Uninstall the project afterwards (default)
    #[arg(long, overrides_with = "no_uninstall")]
    pub uninstall: bool,

    /// Keep the project installed
    #[arg(long, overrides_with = "uninstall")]
    pub no_uninstall: bool,
}

impl PackageCommand {
    pub fn uninstall_after(&self) -> bool {
        !self.no_uninstall
    }

    /// The TOML file to read, if any. An explicitly named file must exist.
    pub fn toml_path(&self) -> Result<Option<PathBuf>, CommandError> {
        match &self.toml {
            None => Ok(None),
            Some(None) => Ok(Some(self.input_path.join("pyproject.toml"))),
            Some(Some(path)) if path.is_file() => Ok(Some(path.clone())),
            Some(Some(path)) => Err(CommandError::TomlNotFound(path.clone())),
        }
    }
}

pub fn handle_package(
    cmd: &PackageCommand,
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<Outcome> {
    // Bad configuration fails before anything is installed
    let toml_path = cmd.toml_path()?;
    let config = read_config(toml_path.as_deref())?;
    if !config.is_empty() {
        logger::debug(&format!(
            "Read {} field(s) from [tool.versionfile]",
            config.len()
        ));
    }

    let existed = cmd.options.output_file.is_file();

    let python = interpreter(global, settings)?;
    let installer = PackageInstaller::from_settings(settings, python.clone());
    let install = EditableInstall::acquire(&installer, &cmd.input_path, cmd.uninstall_after())?;

    let locator = DistributionLocator::from_interpreter(&python)?;
    let metadata = locator
        .read_metadata(install.name())
        .with_context(|| format!("Failed to read metadata of '{}'", install.name()))?;

    let record = resolve(&metadata, &config, &cmd.options.explicit_overrides())?;
    let path = write_version_file(&record, &cmd.options, settings)?;
    Ok(Outcome::for_existing(path, existed))
}

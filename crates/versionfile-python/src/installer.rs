//! Editable installs through pip or uv
//!
//! The installer runs without a timeout; its output is captured to the log
//! file and scanned for the installed distribution name.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use versionfile_config::{InstallerKind, Settings};
use versionfile_logger as logger;

use crate::errors::InstallerError;
use crate::output_matchers::parse_distribution_name;

/// Install and remove distributions
pub trait DistributionManager {
    /// Install `directory` in editable mode and return the distribution name
    fn install_editable(&self, directory: &Path) -> Result<String, InstallerError>;

    /// Uninstall a distribution by name, returning the installer's exit code
    fn uninstall(&self, name: &str) -> Result<i32, InstallerError>;
}

/// Runs `pip` (through the interpreter) or `uv pip`
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    kind: InstallerKind,
    python: PathBuf,
    uv_program: String,
}

impl PackageInstaller {
    pub fn new(kind: InstallerKind, python: PathBuf, uv_program: impl Into<String>) -> Self {
        Self {
            kind,
            python,
            uv_program: uv_program.into(),
        }
    }

    pub fn from_settings(settings: &Settings, python: PathBuf) -> Self {
        Self::new(settings.installer, python, settings.uv_program())
    }

    fn install_command(&self, directory: &Path) -> Command {
        match self.kind {
            InstallerKind::Pip => {
                let mut cmd = Command::new(&self.python);
                cmd.args([
                    "-m",
                    "pip",
                    "install",
                    "--no-color",
                    "--disable-pip-version-check",
                    "--editable",
                ])
                .arg(directory);
                cmd
            }
            InstallerKind::Uv => {
                let mut cmd = Command::new(&self.uv_program);
                // --reinstall makes uv print a package line even when the
                // project is already installed and unchanged
                cmd.args(["pip", "install", "--no-progress", "--reinstall", "--python"])
                    .arg(&self.python)
                    .arg("--editable")
                    .arg(directory);
                cmd
            }
        }
    }

    fn uninstall_command(&self, name: &str) -> Command {
        match self.kind {
            InstallerKind::Pip => {
                let mut cmd = Command::new(&self.python);
                cmd.args([
                    "-m",
                    "pip",
                    "--no-color",
                    "--disable-pip-version-check",
                    "uninstall",
                    "-y",
                    name,
                ]);
                cmd
            }
            InstallerKind::Uv => {
                let mut cmd = Command::new(&self.uv_program);
                cmd.args(["pip", "uninstall", "--python"])
                    .arg(&self.python)
                    .arg(name);
                cmd
            }
        }
    }
}

impl DistributionManager for PackageInstaller {
    fn install_editable(&self, directory: &Path) -> Result<String, InstallerError> {
        let directory = check_directory(directory)?;

        let mut cmd = self.install_command(&directory);
        let command_line = describe(&cmd);
        logger::debug(&format!("Running: {}", command_line));

        logger::spinner_start(&format!(
            "Installing {} in editable mode ({})",
            directory.display(),
            self.kind
        ));
        let output = cmd.output();
        match &output {
            Ok(result) if result.status.success() => logger::spinner_stop(),
            _ => logger::spinner_error(&format!("{} install failed", self.kind)),
        }

        let output = output.map_err(|e| InstallerError::Install {
            directory: directory.clone(),
            reason: format!("could not run {}: {}", command_line, e),
        })?;
        logger::capture_output(&command_line, &output);

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            return Err(InstallerError::Install {
                directory,
                reason: format!(
                    "{} exited with status {}\n{}",
                    self.kind,
                    output.status.code().unwrap_or(-1),
                    combined.trim_end()
                ),
            });
        }

        let matched = parse_distribution_name(&combined)?;
        debug!(
            "Installed distribution '{}' (matched by '{}')",
            matched.name, matched.matcher
        );
        Ok(matched.name)
    }

    fn uninstall(&self, name: &str) -> Result<i32, InstallerError> {
        let mut cmd = self.uninstall_command(name);
        let command_line = describe(&cmd);
        logger::debug(&format!("Running: {}", command_line));

        let output = cmd.output()?;
        logger::capture_output(&command_line, &output);

        if !output.status.success() {
            return Err(InstallerError::CommandFailed {
                command: command_line,
                status: output.status.code(),
            });
        }

        Ok(output.status.code().unwrap_or(0))
    }
}

/// Resolve `directory` and make sure it is a directory, before anything runs
fn check_directory(directory: &Path) -> Result<PathBuf, InstallerError> {
    let resolved = directory
        .canonicalize()
        .map_err(|e| InstallerError::Install {
            directory: directory.to_path_buf(),
            reason: format!("path is not accessible: {}", e),
        })?;

    if !resolved.is_dir() {
        return Err(InstallerError::Install {
            directory: directory.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(resolved)
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Configuration for the versionfile CLI
//!
//! Holds the tool settings file and the helpers that locate the Python
//! interpreter used to install packages and query distribution metadata.

pub mod settings;
pub mod venv_paths;

pub use settings::{InstallerKind, Settings, SettingsError, CONFIG_ENV_VAR};
pub use venv_paths::{resolve_interpreter, resolve_python_exe, VenvPathError};

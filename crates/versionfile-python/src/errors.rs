use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while installing packages or reading their metadata
#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("Failed to install {} in editable mode: {reason}", directory.display())]
    Install { directory: PathBuf, reason: String },

    #[error("Could not determine the installed distribution name: {0}")]
    OutputParse(String),

    #[error("Distribution '{0}' is not installed")]
    DistributionNotFound(String),

    #[error("Invalid distribution metadata: {0}")]
    InvalidMetadata(String),

    #[error("Command failed: {command} (exit {status:?})")]
    CommandFailed {
        command: String,
        status: Option<i32>,
    },

    #[error("Python interpreter error: {0}")]
    Interpreter(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

//! Exit codes and error reporting for the `versionfile` binary
//!
//! Library crates return typed errors; by the time they reach here they are
//! wrapped in `anyhow::Error` with context.

use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

use crate::logger;

/// Output written, or overwritten for `dist` and `package`
pub const EXIT_OK: i32 = 0;
/// `dist` and `package` created a new output file
pub const EXIT_CREATED: i32 = 1;
/// Any failure
pub const EXIT_ERROR: i32 = 3;

/// Errors raised by the command layer itself
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("TOML file '{}' does not exist", .0.display())]
    TomlNotFound(PathBuf),
}

/// A successfully written version file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub path: PathBuf,
    pub exit_code: i32,
}

impl Outcome {
    pub fn new(path: PathBuf, exit_code: i32) -> Self {
        Self { path, exit_code }
    }

    /// Exit code for commands that report whether the file already existed
    pub fn for_existing(path: PathBuf, existed: bool) -> Self {
        let exit_code = if existed { EXIT_OK } else { EXIT_CREATED };
        Self { path, exit_code }
    }
}

/// Print a failed command's error to standard error and the log file
pub fn report_error(error: &anyhow::Error, traceback: bool) {
    if traceback {
        logger::error_to_file(&format!("{:?}", error));
        eprintln!("{} {:?}", "Error:".red().bold(), error);
    } else {
        logger::error(&format!("{:#}", error));
    }

    if logger::get_verbosity() >= 1 {
        logger::show_log_path();
    }
}

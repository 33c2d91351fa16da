//! Python interpreter resolution
//!
//! Locates the interpreter that runs the package installer and whose import
//! path is searched for installed distributions.
//!
//! Resolution order:
//! 1. explicit `--python` path (a file, a venv directory, or a name on `PATH`)
//! 2. `python` key of the settings file
//! 3. the active virtual environment (`VIRTUAL_ENV`)
//! 4. `python3` / `python` on `PATH`

use std::fs;
use std::path::{Path, PathBuf};

use crate::Settings;

/// The name of the binaries/scripts directory in a Python venv
/// "Scripts" on Windows, "bin" on Unix
#[cfg(windows)]
pub const PYTHON_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const PYTHON_BIN_DIR: &str = "bin";

/// Candidate executable names in a venv
#[cfg(not(windows))]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python3", "python"];
#[cfg(windows)]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python.exe", "python3.exe"];

/// Interpreter names searched on `PATH`
const PATH_CANDIDATES: &[&str] = &["python3", "python"];

/// Error type for interpreter resolution
#[derive(Debug, Clone)]
pub enum VenvPathError {
    /// The venv path does not exist or is not a directory
    VenvNotFound(PathBuf),
    /// An explicitly configured interpreter does not exist
    InterpreterNotFound(PathBuf),
    /// Failed to find a required directory or file
    PathResolution(String),
}

impl std::fmt::Display for VenvPathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenvPathError::VenvNotFound(path) => {
                write!(f, "Virtual environment not found: {}", path.display())
            }
            VenvPathError::InterpreterNotFound(path) => {
                write!(f, "Python interpreter not found: {}", path.display())
            }
            VenvPathError::PathResolution(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for VenvPathError {}

/// Find the interpreter inside a virtual environment
///
/// Well-known names (`python3`, `python`; `python.exe` on Windows) are tried
/// first, then any file in the scripts directory whose name starts with
/// `python`, in name order.
pub fn resolve_python_exe(venv_path: &Path) -> Result<PathBuf, VenvPathError> {
    if !venv_path.is_dir() {
        return Err(VenvPathError::VenvNotFound(venv_path.to_path_buf()));
    }

    let bin_dir = venv_path.join(PYTHON_BIN_DIR);
    let well_known = PYTHON_EXE_CANDIDATES
        .iter()
        .map(|name| bin_dir.join(name))
        .find(|candidate| candidate.is_file());

    well_known
        .or_else(|| python_like_entry(&bin_dir))
        .ok_or_else(|| {
            VenvPathError::PathResolution(format!(
                "No Python executable in {}",
                bin_dir.display()
            ))
        })
}

fn python_like_entry(bin_dir: &Path) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(bin_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("python"))
        })
        .collect();
    found.sort();
    found.into_iter().next()
}

/// Resolve the interpreter from the CLI flag, the settings and the environment
pub fn resolve_interpreter(
    explicit: Option<&Path>,
    settings: &Settings,
) -> Result<PathBuf, VenvPathError> {
    let virtual_env = std::env::var_os("VIRTUAL_ENV").map(PathBuf::from);
    resolve_interpreter_with(explicit, settings, virtual_env.as_deref())
}

fn resolve_interpreter_with(
    explicit: Option<&Path>,
    settings: &Settings,
    virtual_env: Option<&Path>,
) -> Result<PathBuf, VenvPathError> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| settings.python.as_ref().map(PathBuf::from));

    if let Some(path) = configured {
        return find_program(&path);
    }

    if let Some(venv) = virtual_env {
        if let Ok(exe) = resolve_python_exe(venv) {
            return Ok(exe);
        }
    }

    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| {
            VenvPathError::PathResolution(
                "No Python interpreter found on PATH; pass --python".to_string(),
            )
        })
}

/// Accept an existing file, a virtual environment directory, or a bare
/// program name found on `PATH`
fn find_program(path: &Path) -> Result<PathBuf, VenvPathError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        return resolve_python_exe(path);
    }
    if path.components().count() == 1 {
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
    }
    Err(VenvPathError::InterpreterNotFound(path.to_path_buf()))
}

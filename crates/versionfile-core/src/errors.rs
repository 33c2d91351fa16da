use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, resolving, rendering or formatting metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid metadata: {0}")]
    Validation(String),

    #[error("Cannot render version file: {0}")]
    Render(String),
}

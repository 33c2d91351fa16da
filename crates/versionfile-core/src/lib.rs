//! Version-file metadata
//!
//! Reads metadata from configuration documents, merges the sources in
//! precedence order, renders the PyInstaller version-file definition and
//! normalizes the written file.

pub mod aliases;
pub mod errors;
pub mod input_file;
pub mod normalize;
pub mod pyproject;
pub mod render;
pub mod resolver;
pub mod types;

pub use errors::MetadataError;
pub use input_file::read_input_file;
pub use normalize::{normalize, NormalizeOptions};
pub use pyproject::read_config;
pub use render::{PyInstallerRenderer, Renderer};
pub use resolver::{resolve, resolve_layers};
pub use types::{Field, MetadataRecord, PartialMetadata, RawValue};

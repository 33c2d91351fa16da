//! versionfile library - expose modules for testing
//!
//! The binary in `main.rs` only parses arguments and maps outcomes to exit
//! codes; everything else lives here.

pub mod commands;
pub mod common;
pub mod errors;

pub use common::{GlobalOpts, VersionOptions};
pub use versionfile_logger as logger;

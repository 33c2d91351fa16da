//! Common types and utilities shared across commands

use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;
use versionfile_core::{Field, PartialMetadata};

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "version_file.txt";

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Do not print the output path")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Python interpreter used to install packages and find distributions"
    )]
    pub python: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: warnings only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        self.verbose
    }
}

/// Output file, field overrides and output handling shared by every command
#[derive(Args, Debug, Clone)]
pub struct VersionOptions {
    /// File to write
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Version of the file
    #[arg(long = "version", id = "file_version", value_name = "VERSION")]
    pub file_version: Option<String>,

    /// Company name for the file
    #[arg(long)]
    pub company_name: Option<String>,

    /// Description of the file
    #[arg(long)]
    pub file_description: Option<String>,

    /// Internal name of the file
    #[arg(long)]
    pub internal_name: Option<String>,

    /// Legal copyright information
    #[arg(long)]
    pub legal_copyright: Option<String>,

    /// Original filename of the file
    #[arg(long)]
    pub original_filename: Option<String>,

    /// Product name for the file
    #[arg(long)]
    pub product_name: Option<String>,

    /// Translation IDs for the file, repeat for each ID [default: 1033 1200]
    #[arg(short, long = "translations", value_name = "ID")]
    pub translations: Vec<u32>,

    /// Strip trailing whitespace and fix the final newline after writing (default)
    #[arg(long, overrides_with = "no_fmt")]
    pub fmt: bool,

    /// Leave the written file as rendered
    #[arg(long, overrides_with = "fmt")]
    pub no_fmt: bool,

    /// Print the full error cause chain on failure
    #[arg(long)]
    pub traceback: bool,
}

impl VersionOptions {
    /// Options for `output_file` with nothing else set
    pub fn for_output(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            file_version: None,
            company_name: None,
            file_description: None,
            internal_name: None,
            legal_copyright: None,
            original_filename: None,
            product_name: None,
            translations: Vec::new(),
            fmt: false,
            no_fmt: false,
            traceback: false,
        }
    }

    /// Whether the written file is normalized
    pub fn format_output(&self) -> bool {
        !self.no_fmt
    }

    /// The fields given on the command line, the highest-precedence layer
    pub fn explicit_overrides(&self) -> PartialMetadata {
        let mut metadata = PartialMetadata::new();
        metadata
            .set_opt(Field::Version, self.file_version.as_deref())
            .set_opt(Field::CompanyName, self.company_name.as_deref())
            .set_opt(Field::FileDescription, self.file_description.as_deref())
            .set_opt(Field::InternalName, self.internal_name.as_deref())
            .set_opt(Field::LegalCopyright, self.legal_copyright.as_deref())
            .set_opt(Field::OriginalFilename, self.original_filename.as_deref())
            .set_opt(Field::ProductName, self.product_name.as_deref());

        if !self.translations.is_empty() {
            metadata.set(Field::Translations, self.translations.as_slice());
        }

        metadata
    }
}

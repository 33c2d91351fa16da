//! Trailing-whitespace and end-of-file normalization

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

use crate::errors::MetadataError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Keep two trailing spaces (a markdown hard break) on non-blank lines
    /// that end with at least two spaces.
    pub markdown_linebreaks: bool,
}

/// Normalize `path` in place; returns whether any byte changed.
pub fn normalize(path: &Path, options: &NormalizeOptions) -> Result<bool, MetadataError> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    let mut original = Vec::new();
    file.read_to_end(&mut original)?;

    let normalized = normalize_bytes(&original, options);
    if normalized == original {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&normalized)?;
    file.set_len(normalized.len() as u64)?;
    file.flush()?;

    debug!("Normalized whitespace in {}", path.display());
    Ok(true)
}

/// Strip trailing whitespace from every line and end with exactly one newline
pub fn normalize_bytes(content: &[u8], options: &NormalizeOptions) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 1);

    for line in content.split_inclusive(|b| *b == b'\n') {
        let (body, eol): (&[u8], &[u8]) = if let Some(body) = line.strip_suffix(b"\r\n") {
            (body, &b"\r\n"[..])
        } else if let Some(body) = line.strip_suffix(b"\n") {
            (body, &b"\n"[..])
        } else {
            (line, &[][..])
        };

        let stripped = trim_trailing_whitespace(body);
        out.extend_from_slice(stripped);
        if options.markdown_linebreaks
            && !stripped.is_empty()
            && body.len() - stripped.len() >= 2
            && body.ends_with(b"  ")
        {
            out.extend_from_slice(b"  ");
        }
        out.extend_from_slice(eol);
    }

    fix_end_of_file(out)
}

fn trim_trailing_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !is_trailing_whitespace(*b))
        .map_or(0, |i| i + 1);
    &line[..end]
}

fn is_trailing_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c')
}

/// Collapse trailing newlines to exactly one, keeping the file's line ending
fn fix_end_of_file(mut content: Vec<u8>) -> Vec<u8> {
    let body_len = content
        .iter()
        .rposition(|&b| !matches!(b, b'\n' | b'\r'))
        .map_or(0, |i| i + 1);

    if body_len == 0 {
        // Empty, or nothing but newlines
        content.clear();
        return content;
    }

    let crlf = content[body_len..].starts_with(b"\r\n");
    content.truncate(body_len);
    if crlf {
        content.extend_from_slice(b"\r\n");
    } else {
        content.push(b'\n');
    }
    content
}

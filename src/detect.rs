//! DOCX container detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// ZIP end-of-central-directory magic, found at offset 0 only in empty archives.
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const MAGIC_LEN: usize = 4;

/// Kind of ZIP container found at the start of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Archive with at least one entry
    Populated,
    /// Archive with no entries (cannot hold a document)
    Empty,
}

/// Detect the container kind from a file path.
///
/// # Example
/// ```no_run
/// use refmark::detect::detect_format_from_path;
///
/// let kind = detect_format_from_path("reference.docx").unwrap();
/// println!("{:?}", kind);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerKind> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; MAGIC_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::UnknownFormat)?;
    detect_format_from_bytes(&header)
}

/// Detect the container kind from bytes.
///
/// # Returns
/// * `Ok(ContainerKind)` if the data starts with a ZIP signature
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ContainerKind> {
    if data.len() < MAGIC_LEN {
        return Err(Error::UnknownFormat);
    }

    if data.starts_with(ZIP_MAGIC) {
        Ok(ContainerKind::Populated)
    } else if data.starts_with(ZIP_EMPTY_MAGIC) {
        Ok(ContainerKind::Empty)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check whether bytes look like a DOCX (non-empty ZIP) package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(ContainerKind::Populated))
}

/// Check whether a path looks like a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(ContainerKind::Populated))
}

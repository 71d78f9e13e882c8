//! Error types for refmark library.

use std::io;
use thiserror::Error;

/// Result type alias for refmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting phrases or highlighting files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as DOCX.
    #[error("Unknown file format: not a valid DOCX")]
    UnknownFormat,

    /// Error reading or writing the ZIP container.
    #[error("ZIP container error: {0}")]
    Zip(String),

    /// A required part is missing from the DOCX package.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The XML of a package part is malformed.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// A target file is not valid UTF-8 text.
    #[error("Encoding error in '{name}': {reason}")]
    Encoding {
        /// Name of the offending target file
        name: String,
        /// Decoder message
        reason: String,
    },

    /// Text contains a character that cannot be stored in an XML document.
    #[error("Character U+{code:04X} at line {line} cannot be written to XML")]
    InvalidXmlChar {
        /// Code point of the rejected character
        code: u32,
        /// 1-indexed line (paragraph) number
        line: usize,
    },

    /// A required input was not supplied.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Error during rendering (DOCX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The batch was cancelled before every file was processed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::MissingPart(err.to_string()),
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

//! DOCX parsing module.

mod docx_parser;
mod options;

pub use docx_parser::DocxParser;
pub use options::ParseOptions;

//! Document model types.
//!
//! This module defines the representation shared by the DOCX parser, the
//! phrase extractor and the DOCX writer: documents made of paragraphs, which
//! are made of styled text runs.

mod document;
mod paragraph;
mod phrase;

pub use document::{Document, Metadata};
pub use paragraph::{
    Numbering, Paragraph, ParagraphStyle, TextRun, TextStyle, HIGHLIGHT_COLOR,
};
pub use phrase::PhraseSet;

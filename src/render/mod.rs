//! Rendering module for writing highlighted documents.

mod cleanup;
mod docx;
mod json;
mod options;

pub use cleanup::{BoilerplateCleanup, CleanupOptions, DEFAULT_BOILERPLATE_MARKER};
pub use docx::{is_xml_char, to_docx, DocxWriter};
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;

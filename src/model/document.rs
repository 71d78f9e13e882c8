//! Document-level types.

use super::Paragraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A word-processing document: an ordered sequence of paragraphs.
///
/// Used both for parsed reference documents and for generated highlight
/// output. A new document has no paragraphs (no template content).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, creator, etc.)
    pub metadata: Metadata,

    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of paragraphs in the document.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Check if the document has any paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total number of highlighted runs across all paragraphs.
    pub fn highlighted_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.highlighted_count()).sum()
    }

    /// Get plain text content, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document metadata (core properties).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub creator: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Check whether any property is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subject.is_none()
            && self.creator.is_none()
            && self.created.is_none()
            && self.modified.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.paragraph_count(), 0);
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_document_plain_text() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("first"));
        doc.add_paragraph(Paragraph::new());
        let mut p = Paragraph::with_text("third ");
        p.add_highlighted("line");
        doc.add_paragraph(p);

        assert_eq!(doc.plain_text(), "first\n\nthird line");
        assert_eq!(doc.highlighted_count(), 1);
    }

    #[test]
    fn test_metadata_with_title() {
        let metadata = Metadata::with_title("Checklist");
        assert_eq!(metadata.title.as_deref(), Some("Checklist"));
        assert!(!metadata.is_empty());
    }
}

//! JSON rendering for highlighted documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
///
/// Paragraphs serialize in output order with their runs. A matched run
/// carries `"highlight": "yellow"` in its style; plain runs omit the field,
/// so `style.highlight` being present is the match marker.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());
        let mut paragraph = Paragraph::with_text("Review ");
        paragraph.add_highlighted("Safety Requirements");
        doc.add_paragraph(paragraph);

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"highlight\": \"yellow\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_plain_runs_omit_highlight() {
        let mut doc = Document::new();
        let mut paragraph = Paragraph::with_text("see ");
        paragraph.add_highlighted("Safety");
        doc.add_paragraph(paragraph);

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let runs = value["paragraphs"][0]["runs"].as_array().unwrap();

        assert_eq!(runs.len(), 2);
        assert!(runs[0]["style"].get("highlight").is_none());
        assert_eq!(runs[1]["style"]["highlight"], "yellow");
        assert_eq!(runs[1]["text"], "Safety");
    }

    #[test]
    fn test_to_json_compact() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("line"));

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}

//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// Highlight color applied to matched phrases in output documents.
pub const HIGHLIGHT_COLOR: &str = "yellow";

/// A paragraph of text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Set the paragraph style name (e.g. "List Paragraph").
    pub fn with_style_name(mut self, name: impl Into<String>) -> Self {
        self.style.style_name = Some(name.into());
        self
    }

    /// Attach a numbering property.
    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.style.numbering = Some(numbering);
        self
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::new(text));
    }

    /// Add a highlighted run.
    pub fn add_highlighted(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::highlighted(text));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Check if the paragraph carries a numbering (list) property.
    pub fn has_numbering(&self) -> bool {
        self.style.numbering.is_some()
    }

    /// Paragraph style name, if any.
    pub fn style_name(&self) -> Option<&str> {
        self.style.style_name.as_deref()
    }

    /// Number of highlighted runs.
    pub fn highlighted_count(&self) -> usize {
        self.runs.iter().filter(|r| r.is_highlighted()).count()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Create a run highlighted with [`HIGHLIGHT_COLOR`].
    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                highlight: Some(HIGHLIGHT_COLOR.to_string()),
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if this run carries a highlight.
    pub fn is_highlighted(&self) -> bool {
        self.style.highlight.is_some()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text (direct formatting only, not inherited from styles)
    pub bold: bool,

    /// Highlight color name (e.g. "yellow")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Display name of the paragraph style
    pub style_name: Option<String>,

    /// Numbering property if this is a list item
    pub numbering: Option<Numbering>,
}

/// Numbering (list) property of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    /// Numbering definition instance
    pub num_id: u32,

    /// Nesting level (0 = top level)
    pub level: u8,
}

impl Numbering {
    /// Create a numbering property at the given level.
    pub fn new(num_id: u32, level: u8) -> Self {
        Self { num_id, level }
    }
}

//! Reference phrase extraction.
//!
//! Phrases are the texts of "emphasized" reference paragraphs: list items,
//! bulleted lines and, depending on the [`ExtractionPolicy`], bold or
//! numbered paragraphs. Leading bullet and numbering glyphs are stripped and
//! the result is collected into a longest-first [`PhraseSet`].

mod policy;

pub use policy::{ExtractionPolicy, ParagraphSignals};

use serde::{Deserialize, Serialize};

use crate::model::{Document, Paragraph, PhraseSet};

/// Characters stripped from the left edge of a candidate phrase.
const LEADING_GLYPHS: &[char] = &[
    '•', '-', '–', '*', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', ')', ' ',
];

/// Options for phrase extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Candidate qualification policy
    pub policy: ExtractionPolicy,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the qualification policy.
    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Strip leading bullet/numbering glyphs and surrounding whitespace.
///
/// Returns `None` when nothing is left.
///
/// # Example
///
/// ```
/// use refmark::extract::clean_phrase;
///
/// assert_eq!(clean_phrase("• 1) Safety Requirements"), Some("Safety Requirements".to_string()));
/// assert_eq!(clean_phrase("- "), None);
/// ```
pub fn clean_phrase(text: &str) -> Option<String> {
    let cleaned = text.trim_start_matches(LEADING_GLYPHS).trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Extracts reference phrases from paragraphs.
#[derive(Debug, Clone, Default)]
pub struct PhraseExtractor {
    options: ExtractOptions,
}

impl PhraseExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Create an extractor for a policy.
    pub fn with_policy(policy: ExtractionPolicy) -> Self {
        Self::with_options(ExtractOptions::new().with_policy(policy))
    }

    /// The active qualification policy.
    pub fn policy(&self) -> ExtractionPolicy {
        self.options.policy
    }

    /// Extract the phrase set of a document.
    pub fn extract(&self, document: &Document) -> PhraseSet {
        self.extract_paragraphs(&document.paragraphs)
    }

    /// Extract the phrase set of a paragraph sequence.
    pub fn extract_paragraphs(&self, paragraphs: &[Paragraph]) -> PhraseSet {
        let phrases: PhraseSet = paragraphs
            .iter()
            .filter_map(|p| self.candidate(p))
            .collect();

        log::debug!(
            "Extracted {} phrases from {} paragraphs ({:?})",
            phrases.len(),
            paragraphs.len(),
            self.options.policy
        );
        phrases
    }

    /// The cleaned phrase of a qualifying paragraph.
    pub fn candidate(&self, paragraph: &Paragraph) -> Option<String> {
        let text = paragraph.plain_text();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if !self.options.policy.qualifies(&ParagraphSignals::of(paragraph)) {
            return None;
        }

        clean_phrase(text)
    }
}

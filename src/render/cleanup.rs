//! Boilerplate paragraph cleanup for generated documents.

use serde::{Deserialize, Serialize};

use crate::model::Document;

/// Marker left by the python-docx default template.
pub const DEFAULT_BOILERPLATE_MARKER: &str = "generated by python-docx";

/// Options for boilerplate removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOptions {
    /// Remove paragraphs whose text is purely numeric (page numbers, counters)
    pub remove_numeric: bool,

    /// Remove paragraphs containing any of these markers (case-insensitive)
    pub markers: Vec<String>,
}

impl CleanupOptions {
    /// Create options with the default markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable numeric-paragraph removal.
    pub fn with_numeric_removal(mut self, remove: bool) -> Self {
        self.remove_numeric = remove;
        self
    }

    /// Add a boilerplate marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Drop all markers.
    pub fn without_markers(mut self) -> Self {
        self.markers.clear();
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            remove_numeric: true,
            markers: vec![DEFAULT_BOILERPLATE_MARKER.to_string()],
        }
    }
}

/// Removes boilerplate paragraphs from a document.
#[derive(Debug, Clone)]
pub struct BoilerplateCleanup {
    remove_numeric: bool,
    markers: Vec<String>,
}

impl BoilerplateCleanup {
    /// Create a cleanup pass with the given options.
    pub fn new(options: &CleanupOptions) -> Self {
        Self {
            remove_numeric: options.remove_numeric,
            markers: options
                .markers
                .iter()
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Check whether a paragraph text is boilerplate.
    ///
    /// The text is trimmed and lowercased first. Empty text is never
    /// boilerplate. Only decimal digits count as numeric, so fractions and
    /// Roman numerals are kept.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }

        if self.remove_numeric && normalized.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }

        self.markers.iter().any(|m| normalized.contains(m.as_str()))
    }

    /// Delete boilerplate paragraphs in place, preserving order.
    ///
    /// Returns the number of paragraphs removed.
    pub fn apply(&self, document: &mut Document) -> usize {
        let before = document.paragraphs.len();
        document
            .paragraphs
            .retain(|p| !self.is_boilerplate(&p.plain_text()));
        let removed = before - document.paragraphs.len();

        if removed > 0 {
            log::debug!("Removed {} boilerplate paragraphs", removed);
        }
        removed
    }
}

impl Default for BoilerplateCleanup {
    fn default() -> Self {
        Self::new(&CleanupOptions::default())
    }
}

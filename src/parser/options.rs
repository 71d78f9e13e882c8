//! Parsing options and configuration.

use serde::{Deserialize, Serialize};

/// Options for parsing DOCX reference documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Also collect paragraphs inside table cells
    pub include_tables: bool,

    /// Read core properties (title, creator, dates)
    pub read_metadata: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table-cell paragraphs.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable metadata extraction.
    pub fn with_metadata(mut self, read: bool) -> Self {
        self.read_metadata = read;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_tables: false,
            read_metadata: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().with_tables(true).with_metadata(false);

        assert!(options.include_tables);
        assert!(!options.read_metadata);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(!options.include_tables);
        assert!(options.read_metadata);
    }
}

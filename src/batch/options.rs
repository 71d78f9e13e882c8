//! Batch processing options.

use serde::{Deserialize, Serialize};

use crate::highlight::MatchStrategy;
use crate::render::{CleanupOptions, RenderOptions};

/// Default suffix appended to output file stems.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_highlighted";

/// Options for a highlight batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Handling of files that fail to decode or serialize
    pub error_mode: ErrorMode,

    /// Process files on the rayon thread pool
    pub parallel: bool,

    /// Suffix inserted between the file stem and `.docx`
    pub suffix: String,

    /// Phrase matcher
    pub strategy: MatchStrategy,

    /// Output document rendering (cleanup, metadata)
    pub render: RenderOptions,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error handling mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort the batch on the first failing file.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip failing files and continue.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the output name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the match strategy.
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Set boilerplate cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.render.cleanup = Some(cleanup);
        self
    }

    /// Keep every paragraph.
    pub fn without_cleanup(mut self) -> Self {
        self.render.cleanup = None;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            parallel: false,
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            strategy: MatchStrategy::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Error handling mode for failing target files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Abort the batch on the first failure
    Strict,
    /// Record the failure and continue with the next file
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_options_default() {
        let options = BatchOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(options.suffix, "_highlighted");
        assert_eq!(options.strategy, MatchStrategy::Automaton);
        assert!(options.render.cleanup.is_some());
    }

    #[test]
    fn test_batch_options_builder() {
        let options = BatchOptions::new()
            .strict()
            .with_parallel(true)
            .with_suffix("_marked")
            .with_strategy(MatchStrategy::Linear)
            .without_cleanup();

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert_eq!(options.suffix, "_marked");
        assert_eq!(options.strategy, MatchStrategy::Linear);
        assert!(options.render.cleanup.is_none());

        let options = options.lenient();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_error_mode_serde() {
        let json = serde_json::to_string(&ErrorMode::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
    }
}

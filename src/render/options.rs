//! Rendering options and configuration.

use serde::{Deserialize, Serialize};

use super::CleanupOptions;

/// Options for rendering output documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Boilerplate cleanup applied before serialization (None = keep all)
    pub cleanup: Option<CleanupOptions>,

    /// Write document metadata to `docProps/core.xml`
    pub include_metadata: bool,

    /// Use the target file name as the output document title
    pub title_from_name: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Disable boilerplate cleanup.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }

    /// Enable or disable core properties.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Enable or disable titling outputs after their source file.
    pub fn with_title_from_name(mut self, enable: bool) -> Self {
        self.title_from_name = enable;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cleanup: Some(CleanupOptions::default()),
            include_metadata: true,
            title_from_name: true,
        }
    }
}

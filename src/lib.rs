//! # refmark
//!
//! Reference-phrase highlighting for batches of text files.
//!
//! A reference DOCX supplies the phrases: its list items, bulleted lines and
//! (by default) bold or numbered paragraphs. Every line of every target file
//! is then scanned for those phrases, and each target becomes a DOCX document
//! with one paragraph per line and the matched phrases highlighted in yellow.
//!
//! ## Quick Start
//!
//! ```no_run
//! use refmark::{batch::TargetFile, Refmark};
//!
//! fn main() -> refmark::Result<()> {
//!     let session = Refmark::new().load_reference("reference.docx")?;
//!     println!("{} phrases", session.phrases().len());
//!
//!     let targets = vec![TargetFile::read("run.xml")?];
//!     for file in session.run(&targets)?.outputs {
//!         file.write_to("out")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **DOCX reading**: styles, numbering, bold runs, hyperlinks, tables
//! - **Two extraction policies**: bullet/style only, or bullet/style/bold/numbering
//! - **Longest-at-earliest matching**: linear scan or compiled automaton
//! - **Boilerplate cleanup**: page numbers and generator markers are dropped
//! - **Batch processing**: lenient or strict failures, cancellation, progress,
//!   optional parallelism with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{
    BatchOptions, BatchProcessor, BatchReport, CancelToken, ErrorMode, HighlightedFile,
    TargetFile,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, ContainerKind};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, ExtractionPolicy, PhraseExtractor};
pub use highlight::{HighlightScanner, MatchStrategy, Run};
pub use model::{
    Document, Metadata, Numbering, Paragraph, ParagraphStyle, PhraseSet, TextRun, TextStyle,
    HIGHLIGHT_COLOR,
};
pub use parser::{DocxParser, ParseOptions};
pub use render::{CleanupOptions, JsonFormat, RenderOptions};

use std::path::Path;

/// Parse a reference DOCX file.
///
/// # Example
///
/// ```no_run
/// use refmark::parse_reference_file;
///
/// let doc = parse_reference_file("reference.docx").unwrap();
/// println!("Paragraphs: {}", doc.paragraph_count());
/// ```
pub fn parse_reference_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocxParser::open(path)?.parse()
}

/// Parse a reference DOCX from bytes.
pub fn parse_reference_bytes(data: &[u8]) -> Result<Document> {
    DocxParser::from_bytes(data)?.parse()
}

/// Extract the phrase set of a reference DOCX with the default policy.
pub fn extract_phrases(data: &[u8]) -> Result<PhraseSet> {
    let document = parse_reference_bytes(data)?;
    Ok(PhraseExtractor::new().extract(&document))
}

/// Highlight target files against a reference document.
///
/// Takes the reference DOCX bytes and `(name, text bytes)` pairs, and returns
/// `(output name, DOCX bytes)` pairs in input order. Any failing target
/// aborts the call.
///
/// # Example
///
/// ```no_run
/// let reference = std::fs::read("reference.docx").unwrap();
/// let targets = vec![("a.xml".to_string(), std::fs::read("a.xml").unwrap())];
///
/// for (name, bytes) in refmark::highlight_batch(&reference, targets).unwrap() {
///     std::fs::write(name, bytes).unwrap();
/// }
/// ```
pub fn highlight_batch<I>(reference: &[u8], targets: I) -> Result<Vec<(String, Vec<u8>)>>
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let targets: Vec<TargetFile> = targets
        .into_iter()
        .map(|(name, content)| TargetFile::new(name, content))
        .collect();

    let session = Refmark::new().strict().load_reference_bytes(reference)?;
    let outputs = session.run(&targets)?.into_outputs()?;
    Ok(outputs.into_iter().map(|f| (f.name, f.bytes)).collect())
}

/// Builder for a highlighting session.
///
/// # Example
///
/// ```no_run
/// use refmark::{ExtractionPolicy, MatchStrategy, Refmark};
///
/// let session = Refmark::new()
///     .with_policy(ExtractionPolicy::BulletOrStyleOnly)
///     .with_strategy(MatchStrategy::Linear)
///     .strict()
///     .load_reference("reference.docx")?;
/// # Ok::<(), refmark::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Refmark {
    parse_options: ParseOptions,
    extract_options: ExtractOptions,
    batch_options: BatchOptions,
}

impl Refmark {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the phrase extraction policy.
    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.extract_options = self.extract_options.with_policy(policy);
        self
    }

    /// Set the match strategy.
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.batch_options = self.batch_options.with_strategy(strategy);
        self
    }

    /// Abort on the first failing target file.
    pub fn strict(mut self) -> Self {
        self.batch_options = self.batch_options.strict();
        self
    }

    /// Skip failing target files.
    pub fn lenient(mut self) -> Self {
        self.batch_options = self.batch_options.lenient();
        self
    }

    /// Process target files in parallel.
    pub fn parallel(mut self) -> Self {
        self.batch_options = self.batch_options.with_parallel(true);
        self
    }

    /// Set the output name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.batch_options = self.batch_options.with_suffix(suffix);
        self
    }

    /// Include table-cell paragraphs of the reference document.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.parse_options = self.parse_options.with_tables(include);
        self
    }

    /// Set boilerplate cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.batch_options = self.batch_options.with_cleanup(cleanup);
        self
    }

    /// Keep every output paragraph.
    pub fn without_cleanup(mut self) -> Self {
        self.batch_options = self.batch_options.without_cleanup();
        self
    }

    /// Set the full batch options.
    pub fn with_batch_options(mut self, options: BatchOptions) -> Self {
        self.batch_options = options;
        self
    }

    /// Parse a reference file and prepare a session.
    pub fn load_reference<P: AsRef<Path>>(self, path: P) -> Result<RefmarkSession> {
        let parser = DocxParser::open_with_options(path, self.parse_options.clone())?;
        self.into_session(parser.parse()?)
    }

    /// Parse reference bytes and prepare a session.
    pub fn load_reference_bytes(self, data: &[u8]) -> Result<RefmarkSession> {
        let parser = DocxParser::from_bytes_with_options(data, self.parse_options.clone())?;
        self.into_session(parser.parse()?)
    }

    /// Prepare a session from an already-parsed reference document.
    pub fn with_reference(self, reference: Document) -> Result<RefmarkSession> {
        self.into_session(reference)
    }

    fn into_session(self, reference: Document) -> Result<RefmarkSession> {
        let phrases = PhraseExtractor::with_options(self.extract_options).extract(&reference);
        let processor = BatchProcessor::new(phrases, self.batch_options);
        Ok(RefmarkSession {
            reference,
            processor,
        })
    }
}

/// A loaded reference document and its batch processor.
#[derive(Debug)]
pub struct RefmarkSession {
    reference: Document,
    processor: BatchProcessor,
}

impl RefmarkSession {
    /// The parsed reference document.
    pub fn reference(&self) -> &Document {
        &self.reference
    }

    /// The extracted phrases, longest first.
    pub fn phrases(&self) -> &PhraseSet {
        self.processor.phrases()
    }

    /// The underlying processor.
    pub fn processor(&self) -> &BatchProcessor {
        &self.processor
    }

    /// Highlight target files.
    pub fn run(&self, targets: &[TargetFile]) -> Result<BatchReport> {
        self.processor.run(targets)
    }

    /// Highlight target files with cancellation and progress reporting.
    pub fn run_with(
        &self,
        targets: &[TargetFile],
        cancel: &CancelToken,
        progress: Option<&(dyn Fn(&batch::BatchProgress) + Sync)>,
    ) -> Result<BatchReport> {
        self.processor.run_with(targets, cancel, progress)
    }

    /// Build the output document of one target without serializing it.
    pub fn preview(&self, target: &TargetFile) -> Result<Document> {
        self.processor
            .highlight_document(target)
            .map(|(document, _)| document)
    }
}

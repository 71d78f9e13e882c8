//! Batch highlighting of target files.
//!
//! Each target file is decoded as UTF-8 text, scanned line by line into a
//! fresh document (one paragraph per line), cleaned of boilerplate and
//! serialized to DOCX. Files share nothing but the immutable phrase set.
//!
//! # Example
//!
//! ```
//! use refmark::batch::{BatchOptions, BatchProcessor, TargetFile};
//! use refmark::PhraseSet;
//!
//! let phrases = PhraseSet::from_phrases(["Safety Requirements"]);
//! let processor = BatchProcessor::new(phrases, BatchOptions::default());
//!
//! let targets = vec![TargetFile::new("notes.xml", "Review Safety Requirements\n")];
//! let report = processor.run(&targets).unwrap();
//!
//! assert_eq!(report.outputs[0].name, "notes_highlighted.docx");
//! assert_eq!(report.outputs[0].stats.highlighted_runs, 1);
//! ```

mod options;

pub use options::{BatchOptions, ErrorMode, DEFAULT_OUTPUT_SUFFIX};

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::highlight::HighlightScanner;
use crate::model::{Document, PhraseSet};
use crate::render::{BoilerplateCleanup, DocxWriter};

/// A target file: a name and its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// File name, used to derive the output name
    pub name: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl TargetFile {
    /// Create a target from a name and content.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a target from disk. The name is the path's file name.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { name, content })
    }
}

/// Per-file statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HighlightStats {
    /// Lines read from the target file
    pub lines: usize,
    /// Highlighted runs in the output document
    pub highlighted_runs: usize,
    /// Paragraphs deleted as boilerplate
    pub paragraphs_removed: usize,
}

/// A highlighted output document.
#[derive(Debug, Clone)]
pub struct HighlightedFile {
    /// Output file name (`<stem><suffix>.docx`)
    pub name: String,
    /// DOCX bytes
    pub bytes: Vec<u8>,
    /// Processing statistics
    pub stats: HighlightStats,
}

impl HighlightedFile {
    /// Write the document into `dir` under its output name.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// A target file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Target file name
    pub name: String,
    /// Error message
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Output documents, in input order
    pub outputs: Vec<HighlightedFile>,
    /// Skipped files (lenient mode), in input order
    pub failures: Vec<FileFailure>,
    /// Whether the batch stopped early on cancellation
    pub cancelled: bool,
    /// Files processed (succeeded or failed) before the batch ended
    pub completed: usize,
    /// Files submitted
    pub total: usize,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Whether every submitted file produced an output.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty() && self.outputs.len() == self.total
    }

    /// Take the outputs, failing if the batch was cancelled.
    pub fn into_outputs(self) -> Result<Vec<HighlightedFile>> {
        if self.cancelled {
            return Err(Error::Cancelled);
        }
        Ok(self.outputs)
    }
}

/// Progress notification sent after each file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Files finished so far
    pub completed: usize,
    /// Files submitted
    pub total: usize,
    /// Name of the file just finished
    pub name: String,
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Files already started run to completion.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Highlights target files against a phrase set.
#[derive(Debug)]
pub struct BatchProcessor {
    phrases: PhraseSet,
    scanner: HighlightScanner,
    cleanup: Option<BoilerplateCleanup>,
    writer: DocxWriter,
    options: BatchOptions,
}

impl BatchProcessor {
    /// Create a processor for a phrase set.
    pub fn new(phrases: PhraseSet, options: BatchOptions) -> Self {
        let scanner = HighlightScanner::new(&phrases, options.strategy);
        let cleanup = options.render.cleanup.as_ref().map(BoilerplateCleanup::new);
        let writer = DocxWriter::new(&options.render);

        Self {
            phrases,
            scanner,
            cleanup,
            writer,
            options,
        }
    }

    /// The phrase set in priority order.
    pub fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    /// The batch options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Build the cleaned output document for a target file without
    /// serializing it.
    pub fn highlight_document(&self, target: &TargetFile) -> Result<(Document, HighlightStats)> {
        let text = decode_text(&target.name, &target.content)?;

        let mut document = self.scanner.build_document(text);
        let lines = document.paragraph_count();
        let paragraphs_removed = self
            .cleanup
            .as_ref()
            .map_or(0, |cleanup| cleanup.apply(&mut document));

        if self.options.render.title_from_name {
            document.metadata.title = Some(file_stem(&target.name));
        }

        let stats = HighlightStats {
            lines,
            highlighted_runs: document.highlighted_count(),
            paragraphs_removed,
        };
        Ok((document, stats))
    }

    /// Highlight a single target file.
    pub fn process_file(&self, target: &TargetFile) -> Result<HighlightedFile> {
        let (document, stats) = self.highlight_document(target)?;

        let mut bytes = Cursor::new(Vec::new());
        self.writer.write(&document, &mut bytes)?;

        log::debug!(
            "Highlighted '{}': {} lines, {} runs, {} removed",
            target.name,
            stats.lines,
            stats.highlighted_runs,
            stats.paragraphs_removed
        );

        Ok(HighlightedFile {
            name: output_name(&target.name, &self.options.suffix),
            bytes: bytes.into_inner(),
            stats,
        })
    }

    /// Highlight all target files, in input order.
    pub fn run(&self, targets: &[TargetFile]) -> Result<BatchReport> {
        self.run_with(targets, &CancelToken::new(), None)
    }

    /// Highlight all target files with cancellation and progress reporting.
    ///
    /// The token is checked before each file starts. In strict mode the
    /// first failing file (in input order) aborts the batch.
    pub fn run_with(
        &self,
        targets: &[TargetFile],
        cancel: &CancelToken,
        progress: Option<&(dyn Fn(&BatchProgress) + Sync)>,
    ) -> Result<BatchReport> {
        let total = targets.len();
        let finished = AtomicUsize::new(0);
        let aborted = AtomicBool::new(false);

        let step = |target: &TargetFile| -> Option<Result<HighlightedFile>> {
            if cancel.is_cancelled() || aborted.load(Ordering::Relaxed) {
                return None;
            }

            let result = self.process_file(target);
            if result.is_err() && self.options.error_mode == ErrorMode::Strict {
                aborted.store(true, Ordering::Relaxed);
            }

            let completed = finished.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(callback) = progress {
                callback(&BatchProgress {
                    completed,
                    total,
                    name: target.name.clone(),
                });
            }
            Some(result)
        };

        let mut report = BatchReport::new(total);

        if self.options.parallel {
            let outcomes: Vec<_> = targets.par_iter().map(step).collect();
            for (target, outcome) in targets.iter().zip(outcomes) {
                match outcome {
                    Some(result) => self.record(&mut report, target, result)?,
                    None => report.cancelled = true,
                }
            }
        } else {
            for target in targets {
                match step(target) {
                    Some(result) => self.record(&mut report, target, result)?,
                    None => {
                        report.cancelled = true;
                        break;
                    }
                }
            }
        }

        if report.cancelled {
            log::warn!(
                "Batch cancelled after {} of {} files",
                report.completed,
                report.total
            );
        }
        Ok(report)
    }

    fn record(
        &self,
        report: &mut BatchReport,
        target: &TargetFile,
        result: Result<HighlightedFile>,
    ) -> Result<()> {
        report.completed += 1;
        match result {
            Ok(file) => report.outputs.push(file),
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Skipping '{}': {}", target.name, e);
                report.failures.push(FileFailure {
                    name: target.name.clone(),
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Decode target bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode_text<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Encoding {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text))
}

/// Output file name for a target: `<stem><suffix>.docx`.
///
/// The stem is the file name without directories and without its last
/// extension.
///
/// # Example
///
/// ```
/// use refmark::batch::output_name;
///
/// assert_eq!(output_name("logs/run.1.xml", "_highlighted"), "run.1_highlighted.docx");
/// ```
pub fn output_name(name: &str, suffix: &str) -> String {
    format!("{}{}.docx", file_stem(name), suffix)
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

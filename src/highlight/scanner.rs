//! Line scanner producing highlighted and plain runs.

use serde::{Deserialize, Serialize};

use crate::model::{Document, Paragraph, PhraseSet, TextRun};

use super::matcher::{AutomatonMatcher, LinearMatcher, PhraseMatcher};

/// Characters that end a line of target text. `\r\n` counts as one break.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Matcher implementation used by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Rescan every phrase at every cursor position
    Linear,
    /// Single compiled alternation of all phrases
    #[default]
    Automaton,
}

/// A contiguous segment of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run<'a> {
    /// Segment text
    pub text: &'a str,
    /// Whether the segment is a matched phrase
    pub highlighted: bool,
}

impl<'a> Run<'a> {
    /// A plain (unmatched) run.
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }

    /// A highlighted (matched) run.
    pub fn highlighted(text: &'a str) -> Self {
        Self {
            text,
            highlighted: true,
        }
    }

    /// Convert to an owned document run.
    pub fn to_text_run(&self) -> TextRun {
        if self.highlighted {
            TextRun::highlighted(self.text)
        } else {
            TextRun::new(self.text)
        }
    }
}

/// Partitions lines into highlighted and plain runs.
///
/// The scanner holds only immutable state and can be shared across threads.
pub struct HighlightScanner {
    matcher: Box<dyn PhraseMatcher>,
}

impl HighlightScanner {
    /// Create a scanner for a phrase set.
    ///
    /// If the automaton cannot be compiled (e.g. an extremely large phrase
    /// set), the linear matcher is used instead.
    pub fn new(phrases: &PhraseSet, strategy: MatchStrategy) -> Self {
        let matcher: Box<dyn PhraseMatcher> = match strategy {
            MatchStrategy::Linear => Box::new(LinearMatcher::new(phrases)),
            MatchStrategy::Automaton => match AutomatonMatcher::new(phrases) {
                Ok(matcher) => Box::new(matcher),
                Err(e) => {
                    log::warn!("{}; falling back to linear matching", e);
                    Box::new(LinearMatcher::new(phrases))
                }
            },
        };

        log::debug!(
            "Scanner ready: {} phrases, {} matcher",
            phrases.len(),
            matcher.name()
        );
        Self { matcher }
    }

    /// Create a scanner with a custom matcher.
    pub fn with_matcher(matcher: Box<dyn PhraseMatcher>) -> Self {
        Self { matcher }
    }

    /// Name of the active matcher.
    pub fn matcher_name(&self) -> &'static str {
        self.matcher.name()
    }

    /// Split one line into runs.
    ///
    /// Concatenating the returned runs reproduces `line` exactly. An empty
    /// line yields no runs.
    pub fn scan_line<'a>(&self, line: &'a str) -> Vec<Run<'a>> {
        let mut runs = Vec::new();
        let mut cursor = 0;

        while cursor < line.len() {
            match self.matcher.find_at(line, cursor) {
                Some(m) => {
                    if m.start > cursor {
                        runs.push(Run::plain(&line[cursor..m.start]));
                    }
                    runs.push(Run::highlighted(&line[m.start..m.end]));
                    cursor = m.end;
                }
                None => {
                    runs.push(Run::plain(&line[cursor..]));
                    break;
                }
            }
        }

        runs
    }

    /// Split text into lines and scan each one.
    pub fn scan_text<'a>(&self, text: &'a str) -> Vec<Vec<Run<'a>>> {
        split_lines(text)
            .into_iter()
            .map(|line| self.scan_line(line))
            .collect()
    }

    /// Build a document with one paragraph per line of `text`.
    pub fn build_document(&self, text: &str) -> Document {
        let mut document = Document::new();
        for line in split_lines(text) {
            document.add_paragraph(assemble_paragraph(&self.scan_line(line)));
        }
        document
    }
}

impl std::fmt::Debug for HighlightScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightScanner")
            .field("matcher", &self.matcher.name())
            .finish()
    }
}

/// Split text into lines.
///
/// Breaks on `\n`, `\r\n`, a lone `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators. A final terminator does not start an empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Assemble a paragraph from the runs of one line.
pub fn assemble_paragraph(runs: &[Run<'_>]) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for run in runs {
        paragraph.add_run(run.to_text_run());
    }
    paragraph
}

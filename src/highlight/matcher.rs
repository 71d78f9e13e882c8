//! Multi-phrase matchers.
//!
//! Both matchers answer the same question: where does the next phrase occur
//! at or after a position? The earliest start wins; when several phrases
//! start there, the one listed first in the [`PhraseSet`] wins. Because the
//! set is ordered longest first, that is the longest phrase.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::model::PhraseSet;

/// Compiled size limit for the phrase automaton.
const AUTOMATON_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Byte span of a phrase occurrence within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// Finds phrase occurrences in a line of text.
pub trait PhraseMatcher: Send + Sync {
    /// Find the earliest phrase occurrence starting at or after `from`.
    ///
    /// `from` must lie on a character boundary of `line`.
    fn find_at(&self, line: &str, from: usize) -> Option<PhraseMatch>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Rescans every phrase from the cursor on each call.
#[derive(Debug, Clone)]
pub struct LinearMatcher {
    phrases: Vec<String>,
}

impl LinearMatcher {
    /// Create a matcher over the phrases of a set.
    pub fn new(phrases: &PhraseSet) -> Self {
        Self {
            phrases: phrases.as_slice().to_vec(),
        }
    }
}

impl PhraseMatcher for LinearMatcher {
    fn find_at(&self, line: &str, from: usize) -> Option<PhraseMatch> {
        let haystack = line.get(from..)?;
        let mut best: Option<PhraseMatch> = None;

        for phrase in &self.phrases {
            let Some(pos) = haystack.find(phrase.as_str()) else {
                continue;
            };
            let start = from + pos;
            // Strict: an equal start keeps the earlier (longer) phrase.
            if best.map_or(true, |b| start < b.start) {
                best = Some(PhraseMatch {
                    start,
                    end: start + phrase.len(),
                });
                if pos == 0 {
                    break;
                }
            }
        }

        best
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Single leftmost-first alternation over all phrases.
///
/// The alternation lists phrases in set order, so regex leftmost-first
/// semantics pick the same match as [`LinearMatcher`].
#[derive(Debug, Clone)]
pub struct AutomatonMatcher {
    regex: Option<Regex>,
}

impl AutomatonMatcher {
    /// Compile the phrase alternation.
    pub fn new(phrases: &PhraseSet) -> Result<Self> {
        if phrases.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&pattern)
            .size_limit(AUTOMATON_SIZE_LIMIT)
            .dfa_size_limit(AUTOMATON_SIZE_LIMIT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to compile phrase automaton: {}", e)))?;

        Ok(Self { regex: Some(regex) })
    }
}

impl PhraseMatcher for AutomatonMatcher {
    fn find_at(&self, line: &str, from: usize) -> Option<PhraseMatch> {
        let m = self.regex.as_ref()?.find_at(line, from)?;
        Some(PhraseMatch {
            start: m.start(),
            end: m.end(),
        })
    }

    fn name(&self) -> &'static str {
        "automaton"
    }
}

//! Phrase highlighting.
//!
//! The scanner walks each line with a cursor. At every step it asks its
//! [`PhraseMatcher`] for the earliest phrase occurrence after the cursor
//! (longest phrase on ties), emits the plain text before it and the phrase
//! itself as a highlighted run, and continues after the match.
//!
//! # Example
//!
//! ```
//! use refmark::highlight::{HighlightScanner, MatchStrategy, Run};
//! use refmark::PhraseSet;
//!
//! let phrases = PhraseSet::from_phrases(["apple", "apple pie"]);
//! let scanner = HighlightScanner::new(&phrases, MatchStrategy::default());
//!
//! let runs = scanner.scan_line("I like apple pie today");
//! assert_eq!(runs[1], Run::highlighted("apple pie"));
//! ```

mod matcher;
mod scanner;

pub use matcher::{AutomatonMatcher, LinearMatcher, PhraseMatch, PhraseMatcher};
pub use scanner::{assemble_paragraph, split_lines, HighlightScanner, MatchStrategy, Run};

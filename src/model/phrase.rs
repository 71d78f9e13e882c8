//! Reference phrase set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deduplicated reference phrases, ordered longest first.
///
/// Phrases of equal length are ordered lexicographically, so the order is
/// fully deterministic. Empty strings are never stored. The scanner relies on
/// the longest-first order to prefer longer phrases that start at the same
/// position as shorter ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    /// Create an empty phrase set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a phrase set from arbitrary phrases.
    ///
    /// Duplicates and empty strings are dropped; no other cleaning is applied.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = phrases
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();

        let mut phrases: Vec<String> = unique.into_iter().collect();
        // Stable: equal lengths keep the BTreeSet's lexicographic order.
        phrases.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));

        Self { phrases }
    }

    /// Number of phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Check if the set holds no phrases.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Check whether an exact phrase is present.
    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }

    /// Phrases in priority order.
    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }

    /// Iterate phrases in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.phrases.iter()
    }
}

impl From<Vec<String>> for PhraseSet {
    fn from(phrases: Vec<String>) -> Self {
        Self::from_phrases(phrases)
    }
}

impl From<PhraseSet> for Vec<String> {
    fn from(set: PhraseSet) -> Self {
        set.phrases
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_phrases(iter)
    }
}

impl<'a> IntoIterator for &'a PhraseSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}

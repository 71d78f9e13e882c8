//! Candidate-paragraph heuristics.

use serde::{Deserialize, Serialize};

use crate::model::Paragraph;

/// Leading characters that mark list items ("•", "-", "*").
const BULLET_PREFIXES: [char; 3] = ['•', '-', '*'];

/// Style-name fragments (lowercase) that identify list styles.
const LIST_STYLE_MARKERS: [&str; 2] = ["list paragraph", "bullet"];

/// Which formatting signals make a paragraph a phrase candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Only a bullet prefix or a list/bullet style qualifies.
    BulletOrStyleOnly,
    /// Bullet prefix, list style, bold emphasis or list numbering qualifies.
    #[default]
    BulletOrStyleOrBoldOrNumbering,
}

impl ExtractionPolicy {
    /// Decide whether a paragraph with the given signals qualifies.
    pub fn qualifies(&self, signals: &ParagraphSignals) -> bool {
        match self {
            Self::BulletOrStyleOnly => signals.bullet_prefix || signals.style_match,
            Self::BulletOrStyleOrBoldOrNumbering => signals.any(),
        }
    }
}

/// Formatting signals computed for one paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphSignals {
    /// A run with non-blank text is bold
    pub has_bold: bool,
    /// The paragraph carries a numbering property
    pub has_numbering: bool,
    /// The style name contains "list paragraph" or "bullet"
    pub style_match: bool,
    /// The trimmed text starts with a bullet character
    pub bullet_prefix: bool,
}

impl ParagraphSignals {
    /// Compute the signals of a paragraph.
    pub fn of(paragraph: &Paragraph) -> Self {
        let text = paragraph.plain_text();
        let style = paragraph.style_name().unwrap_or_default().to_lowercase();

        Self {
            has_bold: paragraph
                .runs
                .iter()
                .any(|r| r.style.bold && !r.text.trim().is_empty()),
            has_numbering: paragraph.has_numbering(),
            style_match: LIST_STYLE_MARKERS.iter().any(|m| style.contains(m)),
            bullet_prefix: text.trim().starts_with(BULLET_PREFIXES),
        }
    }

    /// Check whether any signal is set.
    pub fn any(&self) -> bool {
        self.has_bold || self.has_numbering || self.style_match || self.bullet_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Numbering, TextRun};

    #[test]
    fn test_signals_bullet_prefix() {
        let signals = ParagraphSignals::of(&Paragraph::with_text("  • Item"));
        assert!(signals.bullet_prefix);
        assert!(!signals.has_bold);

        // "–" (en dash) is stripped during cleaning but is not a bullet signal.
        let signals = ParagraphSignals::of(&Paragraph::with_text("– Item"));
        assert!(!signals.bullet_prefix);
    }

    #[test]
    fn test_signals_bold_requires_text() {
        let mut p = Paragraph::with_text("Plain");
        p.add_run(TextRun::bold("   "));
        assert!(!ParagraphSignals::of(&p).has_bold);

        p.add_run(TextRun::bold("Key"));
        assert!(ParagraphSignals::of(&p).has_bold);
    }

    #[test]
    fn test_signals_style_match_is_case_insensitive() {
        let p = Paragraph::with_text("x").with_style_name("List Bullet 2");
        assert!(ParagraphSignals::of(&p).style_match);

        let p = Paragraph::with_text("x").with_style_name("LIST PARAGRAPH");
        assert!(ParagraphSignals::of(&p).style_match);

        let p = Paragraph::with_text("x").with_style_name("Heading 1");
        assert!(!ParagraphSignals::of(&p).style_match);
    }

    #[test]
    fn test_policy_qualification() {
        let bold_only = ParagraphSignals {
            has_bold: true,
            ..Default::default()
        };
        let numbered = ParagraphSignals::of(
            &Paragraph::with_text("Step").with_numbering(Numbering::new(1, 0)),
        );

        let full = ExtractionPolicy::BulletOrStyleOrBoldOrNumbering;
        let narrow = ExtractionPolicy::BulletOrStyleOnly;

        assert!(full.qualifies(&bold_only));
        assert!(!narrow.qualifies(&bold_only));
        assert!(full.qualifies(&numbered));
        assert!(!narrow.qualifies(&numbered));
        assert!(!full.qualifies(&ParagraphSignals::default()));
        assert!(!ParagraphSignals::default().any());
        assert!(bold_only.any());
    }

    #[test]
    fn test_default_policy_is_full() {
        assert_eq!(
            ExtractionPolicy::default(),
            ExtractionPolicy::BulletOrStyleOrBoldOrNumbering
        );
    }
}

#![forbid(unsafe_code)]

//! Grapheme-safe truncation with word back-off.
//!
//! Lengths are measured in extended grapheme clusters. The ellipsis counts
//! toward the limit, so a truncated result never exceeds `max_len` clusters.
//!
//! # Invariants
//!
//! 1. **Boundary safety**: the kept prefix always ends on a grapheme
//!    boundary of the input.
//! 2. **Bounded output**: `grapheme_count(result) <= max_len`.
//! 3. **Idempotence**: because of (2), truncating a result again with the
//!    same or a larger limit returns it unchanged.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `max_len == 0` | Caller bug | `TextError::InvalidLength` |
//! | Single word longer than the budget | Long compound word | Grapheme cut, outcome `WordUnsplittable` |
//! | Only whitespace before the cut | Leading spaces, long first word | Grapheme cut, outcome `WordUnsplittable` |
//! | Ellipsis as long as the limit | Tiny `max_len` | Cut without ellipsis |
//!
//! # Example
//! ```
//! use vitrine_text::truncate::{truncate, BreakMode, TruncationOutcome};
//!
//! let t = truncate("Sturdy build with long battery life", 16, BreakMode::Word, "…").unwrap();
//! assert_eq!(t.text, "Sturdy build…");
//! assert_eq!(t.outcome, TruncationOutcome::WordBoundary);
//! ```

use std::fmt;

use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, TextError};

/// Ellipsis appended to truncated text unless the caller supplies another.
pub const DEFAULT_ELLIPSIS: &str = "\u{2026}";

/// Where a truncation is allowed to cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreakMode {
    /// Whitespace-segmented scripts: prefer the end of the last whole word.
    #[default]
    Word,
    /// Scripts without inter-word spaces: cut at the nearest grapheme boundary.
    Grapheme,
}

/// How a truncation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruncationOutcome {
    /// The text already fit.
    Unchanged,
    /// Cut at the end of a whole word.
    WordBoundary,
    /// Cut at a grapheme boundary (grapheme break mode).
    GraphemeBoundary,
    /// No whole word fit, so the first word was cut at a grapheme boundary.
    WordUnsplittable,
}

/// Result of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// The (possibly shortened) text, including any ellipsis.
    pub text: String,
    /// How the cut was chosen.
    pub outcome: TruncationOutcome,
}

impl Truncated {
    /// Whether any text was removed.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.outcome != TruncationOutcome::Unchanged
    }

    /// Whether the cut had to fall inside the first word.
    #[must_use]
    pub fn is_word_unsplittable(&self) -> bool {
        self.outcome == TruncationOutcome::WordUnsplittable
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Truncated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

/// Strip trailing whitespace clusters without splitting a cluster.
fn trim_end_spaces(text: &str) -> &str {
    let mut end = text.len();
    for (offset, grapheme) in text.grapheme_indices(true).rev() {
        if !is_whitespace(grapheme) {
            break;
        }
        end = offset;
    }
    &text[..end]
}

/// Shorten `text` to at most `max_len` grapheme clusters.
///
/// In [`BreakMode::Word`], a cut that would land strictly inside a word backs
/// off to the end of the previous whitespace-delimited word. When no word fits
/// the result is cut at the grapheme boundary and reported as
/// [`TruncationOutcome::WordUnsplittable`].
///
/// # Errors
///
/// Returns [`TextError::InvalidLength`] when `max_len` is zero.
pub fn truncate(text: &str, max_len: usize, mode: BreakMode, ellipsis: &str) -> Result<Truncated> {
    if max_len == 0 {
        return Err(TextError::InvalidLength { max_len });
    }

    let clusters: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    if clusters.len() <= max_len {
        return Ok(Truncated {
            text: text.to_string(),
            outcome: TruncationOutcome::Unchanged,
        });
    }

    let ellipsis_len = crate::grapheme_count(ellipsis);
    let (budget, ellipsis) = if ellipsis_len >= max_len {
        (max_len, "")
    } else {
        (max_len - ellipsis_len, ellipsis)
    };

    // budget < clusters.len(), so the cluster at `budget` exists.
    let cut = clusters[budget].0;

    let (head, outcome) = match mode {
        BreakMode::Grapheme => (&text[..cut], TruncationOutcome::GraphemeBoundary),
        BreakMode::Word => {
            let at_space =
                is_whitespace(clusters[budget].1) || is_whitespace(clusters[budget - 1].1);
            if !at_space {
                back_off_to_word_end(text, &clusters[..budget], cut)
            } else {
                let head = trim_end_spaces(&text[..cut]);
                if head.is_empty() {
                    // Only leading whitespace fits, so no word does.
                    (&text[..cut], TruncationOutcome::WordUnsplittable)
                } else {
                    (head, TruncationOutcome::WordBoundary)
                }
            }
        }
    };

    trace!(
        max_len,
        kept_bytes = head.len(),
        outcome = ?outcome,
        "truncated text"
    );

    let mut result = String::with_capacity(head.len() + ellipsis.len());
    result.push_str(head);
    result.push_str(ellipsis);
    Ok(Truncated {
        text: result,
        outcome,
    })
}

/// The cut at `cut` lies inside a word: find the last whitespace cluster
/// before it and keep everything up to there.
fn back_off_to_word_end<'a>(
    text: &'a str,
    kept: &[(usize, &str)],
    cut: usize,
) -> (&'a str, TruncationOutcome) {
    let last_space = kept.iter().rev().find(|(_, g)| is_whitespace(g));
    if let Some(&(offset, _)) = last_space {
        let head = trim_end_spaces(&text[..offset]);
        if !head.is_empty() {
            return (head, TruncationOutcome::WordBoundary);
        }
    }
    (&text[..cut], TruncationOutcome::WordUnsplittable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, max_len: usize) -> Truncated {
        truncate(text, max_len, BreakMode::Word, DEFAULT_ELLIPSIS).unwrap()
    }

    #[test]
    fn short_text_is_unchanged() {
        let t = word("Desk Lamp", 20);
        assert_eq!(t.text, "Desk Lamp");
        assert_eq!(t.outcome, TruncationOutcome::Unchanged);
        assert!(!t.is_truncated());
    }

    #[test]
    fn exact_fit_is_unchanged() {
        let t = word("abcde", 5);
        assert_eq!(t.outcome, TruncationOutcome::Unchanged);
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = truncate("abc", 0, BreakMode::Word, DEFAULT_ELLIPSIS).unwrap_err();
        assert_eq!(err, TextError::InvalidLength { max_len: 0 });
    }

    #[test]
    fn cut_inside_word_backs_off() {
        // Budget is 11 clusters: "Ergonomic" fits, "wireless" would be split.
        let t = word("Ergonomic wireless mouse", 12);
        assert_eq!(t.text, "Ergonomic…");
        assert_eq!(t.outcome, TruncationOutcome::WordBoundary);
    }

    #[test]
    fn cut_on_space_keeps_whole_words() {
        let t = word("one two three", 8);
        // budget 7 = "one two", next cluster is a space.
        assert_eq!(t.text, "one two…");
        assert_eq!(t.outcome, TruncationOutcome::WordBoundary);
    }

    #[test]
    fn single_long_word_is_unsplittable() {
        let long: String = "Geschwindigkeitsbegrenzung".repeat(4);
        let t = word(&long, 55);
        assert!(t.is_word_unsplittable());
        assert_eq!(crate::grapheme_count(&t.text), 55);
        assert!(t.text.ends_with(DEFAULT_ELLIPSIS));
    }

    #[test]
    fn leading_whitespace_before_long_word_is_unsplittable() {
        let t = word("   Geschwindigkeit", 3);
        assert_eq!(t.outcome, TruncationOutcome::WordUnsplittable);
        assert_eq!(t.text, "  …");

        let t = word("  Geschwindigkeitsbegrenzung", 6);
        assert_eq!(t.outcome, TruncationOutcome::WordUnsplittable);
        assert_eq!(t.text, "  Ges…");
    }

    #[test]
    fn long_compound_after_short_word_backs_off() {
        let t = word(
            "Over-ear noise-cancelling headphones. Die Geschwindigkeitsbegrenzungsüberwachungskamera ist lang.",
            55,
        );
        assert_eq!(t.text, "Over-ear noise-cancelling headphones. Die…");
        assert_eq!(t.outcome, TruncationOutcome::WordBoundary);
    }

    #[test]
    fn grapheme_mode_never_backs_off() {
        let t = truncate("東京都千代田区千代田", 5, BreakMode::Grapheme, DEFAULT_ELLIPSIS).unwrap();
        assert_eq!(t.text, "東京都千…");
        assert_eq!(t.outcome, TruncationOutcome::GraphemeBoundary);
    }

    #[test]
    fn combining_marks_stay_attached() {
        // "e" + combining acute is one cluster.
        let text = "e\u{0301}e\u{0301}e\u{0301}e\u{0301}";
        let t = truncate(text, 3, BreakMode::Grapheme, DEFAULT_ELLIPSIS).unwrap();
        assert_eq!(t.text, "e\u{0301}e\u{0301}…");
    }

    #[test]
    fn zwj_sequence_is_not_split() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let text = format!("{family}{family}{family}");
        let t = truncate(&text, 2, BreakMode::Grapheme, DEFAULT_ELLIPSIS).unwrap();
        assert_eq!(t.text, format!("{family}…"));
    }

    #[test]
    fn ellipsis_longer_than_limit_is_dropped() {
        let t = truncate("abcdef", 2, BreakMode::Grapheme, "...").unwrap();
        assert_eq!(t.text, "ab");
    }

    #[test]
    fn truncation_is_idempotent_on_examples() {
        for (text, k) in [
            ("Ergonomic wireless mouse", 12),
            ("Geschwindigkeitsbegrenzungsüberwachungskamera", 10),
            ("a b c d e f g", 4),
        ] {
            let once = word(text, k);
            let twice = word(&once.text, k);
            assert_eq!(once.text, twice.text);
            assert_eq!(twice.outcome, TruncationOutcome::Unchanged);
        }
    }

    #[test]
    fn display_writes_text() {
        assert_eq!(word("abc", 5).to_string(), "abc");
    }
}

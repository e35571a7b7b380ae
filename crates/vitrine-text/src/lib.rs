#![forbid(unsafe_code)]

//! Text primitives for Vitrine.
//!
//! Everything here operates on extended grapheme clusters (UAX #29) rather
//! than bytes or scalar values, so no operation can split a user-perceived
//! character.
//!
//! # Role in Vitrine
//! `vitrine-text` is the leaf of the workspace. It knows nothing about
//! locales as registry entries; callers pass the concrete knobs (break mode,
//! case rules, collation identifier) that a locale resolves to.
//!
//! - [`truncate`]: grapheme-safe truncation with word back-off.
//! - [`case`]: locale case mapping (Turkic dotted/dotless i).
//! - [`collate`]: collation sort keys and primary-strength folding for search.

pub mod case;
pub mod collate;
pub mod error;
pub mod truncate;

pub use case::CaseRules;
pub use collate::{CollationKey, Collator, Folded};
pub use error::TextError;
pub use truncate::{BreakMode, DEFAULT_ELLIPSIS, Truncated, TruncationOutcome, truncate};

use unicode_segmentation::UnicodeSegmentation;

/// Count the extended grapheme clusters in `text`.
///
/// ```
/// assert_eq!(vitrine_text::grapheme_count("e\u{0301}"), 1);
/// assert_eq!(vitrine_text::grapheme_count("Straße"), 6);
/// ```
#[inline]
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

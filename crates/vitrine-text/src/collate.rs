#![forbid(unsafe_code)]

//! Locale collation: sort keys and primary-strength folding.
//!
//! A lightweight multi-level collation in the spirit of UCA:
//!
//! - **Primary**: base letters. Accents and case are ignored, but letters a
//!   locale treats as distinct (Turkish `ç`, `ı`, Polish `ł`, ...) get their
//!   own weight slotted next to their anchor letter.
//! - **Secondary**: combining marks (accents).
//! - **Tertiary**: case (lowercase before uppercase).
//!
//! Tailorings are data rows keyed by collation identifier; the `root` row is
//! the mandatory default for unknown identifiers.
//!
//! Search uses the same primary weights ([`Collator::fold`]) so that "cafe"
//! finds "Café", "strasse" finds "Straße", and in Turkish "istanbul" finds
//! "İstanbul" while "ısparta" stays distinct from "isparta".
//!
//! # Example
//! ```
//! use std::cmp::Ordering;
//! use vitrine_text::collate::Collator;
//!
//! let tr = Collator::for_id("tr");
//! assert_eq!(tr.compare("çay", "dere"), Ordering::Less);
//! assert_eq!(tr.compare("çay", "cuma"), Ordering::Greater);
//!
//! let root = Collator::for_id("root");
//! assert_eq!(root.compare("Äpfel", "Zebra"), Ordering::Less);
//! assert!(root.contains("Café Crème", "cafe creme"));
//! ```

use std::cmp::Ordering;
use std::iter;

use smallvec::SmallVec;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

use crate::case::CaseRules;

/// Distance between adjacent untailored primary weights.
const WEIGHT_GAP: u32 = 32;
/// Untailored letters sit in the middle of their gap.
const WEIGHT_BIAS: i32 = 16;
const CLASS_SHIFT: u32 = 27;

/// Coarse ordering classes: whitespace < punctuation/symbols < digits < letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum WeightClass {
    Space = 1,
    Symbol = 2,
    Digit = 3,
    Letter = 4,
}

/// A letter a collation sorts as its own primary, next to `anchor`.
#[derive(Debug, Clone, Copy)]
struct Tailored {
    letter: char,
    anchor: char,
    offset: i8,
}

const fn after(letter: char, anchor: char, offset: i8) -> Tailored {
    Tailored {
        letter,
        anchor,
        offset,
    }
}

#[derive(Debug)]
struct Tailoring {
    id: &'static str,
    case: CaseRules,
    letters: &'static [Tailored],
}

/// Letters that are distinct primaries in every collation.
const ROOT_LETTERS: &[Tailored] = &[
    after('đ', 'd', 1),
    after('ħ', 'h', 1),
    after('ı', 'i', 1),
    after('ł', 'l', 1),
    after('ø', 'o', 1),
    after('þ', 'z', 2),
];

/// Letters that expand to several primaries.
const EXPANSIONS: &[(char, &str)] = &[('ß', "ss"), ('æ', "ae"), ('œ', "oe")];

/// Collation tailorings. The first row is the default.
const TAILORINGS: &[Tailoring] = &[
    Tailoring {
        id: "root",
        case: CaseRules::Default,
        letters: &[],
    },
    // DIN 5007-1: umlauts sort with their base letter, so German needs no
    // extra primaries.
    Tailoring {
        id: "de",
        case: CaseRules::Default,
        letters: &[],
    },
    Tailoring {
        id: "tr",
        case: CaseRules::Turkic,
        letters: &[
            after('ç', 'c', 1),
            after('ğ', 'g', 1),
            after('ı', 'i', -1),
            after('ö', 'o', 1),
            after('ş', 's', 1),
            after('ü', 'u', 1),
        ],
    },
    Tailoring {
        id: "pl",
        case: CaseRules::Default,
        letters: &[
            after('ą', 'a', 1),
            after('ć', 'c', 1),
            after('ę', 'e', 1),
            after('ń', 'n', 1),
            after('ó', 'o', 1),
            after('ś', 's', 1),
            after('ź', 'z', 1),
            after('ż', 'z', 2),
        ],
    },
    Tailoring {
        id: "ja",
        case: CaseRules::Default,
        letters: &[],
    },
];

/// Comparable collation key for one string.
///
/// Keys compare level by level: all primaries, then all secondaries, then
/// all tertiaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CollationKey {
    primary: SmallVec<[u32; 16]>,
    secondary: SmallVec<[u32; 16]>,
    tertiary: SmallVec<[u8; 16]>,
}

impl CollationKey {
    /// Primary weights only (accent- and case-insensitive).
    #[must_use]
    pub fn primary(&self) -> &[u32] {
        &self.primary
    }

    fn push(&mut self, primary: u32, tertiary: u8) {
        self.primary.push(primary);
        self.secondary.push(0);
        self.tertiary.push(tertiary);
    }

    fn add_mark(&mut self, mark: char) {
        if let Some(last) = self.secondary.last_mut() {
            *last = last.saturating_add(mark as u32);
        }
    }
}

/// Primary-strength folded text, used for collation-aware substring search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Folded(Vec<u32>);

impl Folded {
    /// Whether `needle` occurs in `self`. An empty needle always matches.
    #[must_use]
    pub fn contains(&self, needle: &Folded) -> bool {
        if needle.0.is_empty() {
            return true;
        }
        self.0
            .windows(needle.0.len())
            .any(|window| window == needle.0.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Locale collator selected by collation identifier.
#[derive(Debug, Clone, Copy)]
pub struct Collator {
    tailoring: &'static Tailoring,
}

impl Default for Collator {
    fn default() -> Self {
        Self {
            tailoring: &TAILORINGS[0],
        }
    }
}

impl Collator {
    /// Collator for a collation identifier (`"root"`, `"de"`, `"tr"`, ...).
    ///
    /// Unknown identifiers use the root collation.
    #[must_use]
    pub fn for_id(id: &str) -> Self {
        match TAILORINGS.iter().find(|t| t.id.eq_ignore_ascii_case(id)) {
            Some(tailoring) => Self { tailoring },
            None => {
                debug!(collation = id, "unknown collation id; using root");
                Self::default()
            }
        }
    }

    /// Whether `id` names a known tailoring.
    #[must_use]
    pub fn is_known(id: &str) -> bool {
        TAILORINGS.iter().any(|t| t.id.eq_ignore_ascii_case(id))
    }

    /// Identifier of the active tailoring.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.tailoring.id
    }

    /// Case rules implied by the tailoring.
    #[must_use]
    pub fn case_rules(&self) -> CaseRules {
        self.tailoring.case
    }

    /// Build the full collation key for `text`.
    #[must_use]
    pub fn key(&self, text: &str) -> CollationKey {
        let mut key = CollationKey::default();
        let composed: String = text.nfc().collect();
        for grapheme in composed.graphemes(true) {
            let tertiary = u8::from(grapheme.chars().any(char::is_uppercase));
            let lower = self.tailoring.case.lowercase(grapheme);
            for ch in lower.nfc() {
                self.push_char(ch, tertiary, &mut key);
            }
        }
        key
    }

    /// Compare two strings under this collation.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    /// Fold `text` to its primary weights for searching.
    #[must_use]
    pub fn fold(&self, text: &str) -> Folded {
        let nfkc: String = text.nfkc().collect();
        Folded(self.key(&nfkc).primary.into_vec())
    }

    /// Primary-strength substring test.
    #[must_use]
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        self.fold(haystack).contains(&self.fold(needle))
    }

    fn push_char(&self, ch: char, tertiary: u8, key: &mut CollationKey) {
        if let Some(weight) = self.tailored_weight(ch) {
            key.push(weight, tertiary);
            return;
        }
        for part in iter::once(ch).nfkd() {
            if is_combining_mark(part) {
                key.add_mark(part);
            } else if part.is_control() {
                continue;
            } else if let Some(&(_, expansion)) = EXPANSIONS.iter().find(|(c, _)| *c == part) {
                for e in expansion.chars() {
                    key.push(base_weight(e), tertiary);
                }
            } else if let Some(weight) = self.tailored_weight(part) {
                key.push(weight, tertiary);
            } else {
                key.push(base_weight(part), tertiary);
            }
        }
    }

    fn tailored_weight(&self, ch: char) -> Option<u32> {
        self.tailoring
            .letters
            .iter()
            .chain(ROOT_LETTERS)
            .find(|t| t.letter == ch)
            .map(|t| weight(WeightClass::Letter, t.anchor as u32, i32::from(t.offset)))
    }
}

fn weight(class: WeightClass, ordinal: u32, offset: i32) -> u32 {
    let slot = ordinal * WEIGHT_GAP;
    let biased = slot.saturating_add_signed(WEIGHT_BIAS + offset);
    ((class as u32) << CLASS_SHIFT) | biased
}

fn base_weight(ch: char) -> u32 {
    if ch.is_whitespace() {
        weight(WeightClass::Space, 0, 0)
    } else if let Some(value) = decimal_value(ch) {
        weight(WeightClass::Digit, value, 0)
    } else if ch.is_alphanumeric() {
        weight(WeightClass::Letter, ch as u32, 0)
    } else {
        weight(WeightClass::Symbol, ch as u32, 0)
    }
}

/// Decimal digit value across the digit sets the formatters emit.
fn decimal_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => ch.to_digit(10),
        '\u{0660}'..='\u{0669}' => Some(ch as u32 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(ch as u32 - 0x06F0),
        _ => None,
    }
}

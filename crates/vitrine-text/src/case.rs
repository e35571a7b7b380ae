#![forbid(unsafe_code)]

//! Locale case mapping.
//!
//! Unicode's default case mapping is correct for most languages, but the
//! Turkic languages pair `i`/`İ` and `ı`/`I`. Default mapping would turn the
//! Turkish word "istanbul" into "Istanbul" instead of "İstanbul".
//!
//! # Example
//! ```
//! use vitrine_text::case::CaseRules;
//!
//! assert_eq!(CaseRules::Turkic.capitalize("istanbul"), "İstanbul");
//! assert_eq!(CaseRules::Default.capitalize("istanbul"), "Istanbul");
//! assert_eq!(CaseRules::Turkic.lowercase("IŞIK"), "ışık");
//! ```

use unicode_segmentation::UnicodeSegmentation;

const COMBINING_DOT_ABOVE: char = '\u{0307}';

/// Case mapping rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseRules {
    /// Unicode default case mapping.
    #[default]
    Default,
    /// Turkish and Azerbaijani dotted/dotless i.
    Turkic,
}

impl CaseRules {
    /// Case rules for a primary language subtag (e.g. `"tr"`, `"de"`).
    #[must_use]
    pub fn for_language(lang: &str) -> Self {
        let primary = lang.split(['-', '_']).next().unwrap_or(lang);
        match primary.to_ascii_lowercase().as_str() {
            "tr" | "az" => Self::Turkic,
            _ => Self::Default,
        }
    }

    /// Lowercase `text` under these rules.
    #[must_use]
    pub fn lowercase(self, text: &str) -> String {
        match self {
            Self::Default => text.to_lowercase(),
            Self::Turkic => {
                let mut out = String::with_capacity(text.len());
                let mut chars = text.chars().peekable();
                while let Some(ch) = chars.next() {
                    match ch {
                        'İ' => out.push('i'),
                        'I' => {
                            // "I" + combining dot above is a decomposed "İ".
                            if chars.peek() == Some(&COMBINING_DOT_ABOVE) {
                                chars.next();
                                out.push('i');
                            } else {
                                out.push('ı');
                            }
                        }
                        other => out.extend(other.to_lowercase()),
                    }
                }
                out
            }
        }
    }

    /// Uppercase `text` under these rules.
    #[must_use]
    pub fn uppercase(self, text: &str) -> String {
        match self {
            Self::Default => text.to_uppercase(),
            Self::Turkic => {
                let mut out = String::with_capacity(text.len());
                for ch in text.chars() {
                    match ch {
                        'i' => out.push('İ'),
                        'ı' => out.push('I'),
                        other => out.extend(other.to_uppercase()),
                    }
                }
                out
            }
        }
    }

    /// Uppercase the first grapheme cluster and lowercase the rest.
    #[must_use]
    pub fn capitalize(self, text: &str) -> String {
        let mut graphemes = text.graphemes(true);
        let Some(first) = graphemes.next() else {
            return String::new();
        };
        let rest = graphemes.as_str();
        let mut out = self.uppercase(first);
        out.push_str(&self.lowercase(rest));
        out
    }
}

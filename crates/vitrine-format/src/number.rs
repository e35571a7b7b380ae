#![forbid(unsafe_code)]

//! Locale number symbols and digit grouping.
//!
//! Symbols are looked up exact locale → base language → default row, so a
//! regional locale only needs a row when it differs from its language
//! (`de-CH` groups with `’` and uses `.` as decimal separator, unlike `de`).

use vitrine_i18n::{DEFAULT_LOCALE, LocaleRegistry, primary_language};

use crate::error::Result;

/// Digits a locale renders numbers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitSet {
    /// `0123456789`
    Latin,
    /// `٠١٢٣٤٥٦٧٨٩`
    ArabicIndic,
}

impl DigitSet {
    fn map(self, ascii_digit: char) -> char {
        match self {
            Self::Latin => ascii_digit,
            Self::ArabicIndic => match ascii_digit.to_digit(10) {
                Some(d) => char::from_u32(0x0660 + d).unwrap_or(ascii_digit),
                None => ascii_digit,
            },
        }
    }
}

/// Separators and digits for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSymbols {
    pub locale: &'static str,
    pub group: &'static str,
    pub decimal: &'static str,
    /// Integer digits required before grouping kicks in, beyond the first
    /// group of three (1 groups `1,000`; 2 leaves `1000` but groups `10 000`).
    pub min_grouping: usize,
    pub digits: DigitSet,
    pub minus: &'static str,
}

const fn symbols(
    locale: &'static str,
    group: &'static str,
    decimal: &'static str,
    min_grouping: usize,
) -> NumberSymbols {
    NumberSymbols {
        locale,
        group,
        decimal,
        min_grouping,
        digits: DigitSet::Latin,
        minus: "-",
    }
}

const SYMBOLS: &[NumberSymbols] = &[
    symbols(DEFAULT_LOCALE, ",", ".", 1),
    symbols("de", ".", ",", 1),
    symbols("de-CH", "\u{2019}", ".", 1),
    symbols("fr", "\u{202F}", ",", 1),
    symbols("tr", ".", ",", 1),
    symbols("ja", ",", ".", 1),
    symbols("ru", "\u{00A0}", ",", 1),
    symbols("pl", "\u{00A0}", ",", 2),
    NumberSymbols {
        locale: "ar",
        group: "\u{066C}",
        decimal: "\u{066B}",
        min_grouping: 1,
        digits: DigitSet::ArabicIndic,
        minus: "\u{061C}-",
    },
];

impl NumberSymbols {
    /// Symbols for a canonical locale code: exact row, then base language,
    /// then the default row.
    #[must_use]
    pub fn for_locale(code: &str) -> &'static NumberSymbols {
        let find = |c: &str| SYMBOLS.iter().find(|s| s.locale == c);
        find(code)
            .or_else(|| find(primary_language(code)))
            .unwrap_or(&SYMBOLS[0])
    }

    /// Render ASCII digits in this locale's digit set.
    #[must_use]
    pub fn localize_digits(&self, ascii: &str) -> String {
        ascii.chars().map(|c| self.digits.map(c)).collect()
    }

    /// Insert group separators into a run of ASCII integer digits and
    /// localize them.
    #[must_use]
    pub fn group_integer(&self, ascii_digits: &str) -> String {
        let len = ascii_digits.len();
        if len < 3 + self.min_grouping {
            return self.localize_digits(ascii_digits);
        }
        let mut out = String::with_capacity(len + len / 3 * self.group.len());
        for (i, ch) in ascii_digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(self.group);
            }
            out.push(self.digits.map(ch));
        }
        out
    }

    /// Join grouped integer digits and fraction digits (both ASCII).
    #[must_use]
    pub fn format_decimal(&self, integer: &str, fraction: &str) -> String {
        let mut out = self.group_integer(integer);
        if !fraction.is_empty() {
            out.push_str(self.decimal);
            out.push_str(&self.localize_digits(fraction));
        }
        out
    }
}

/// Locale-validated integer formatting.
#[derive(Debug, Clone, Copy)]
pub struct NumberFormatter<'a> {
    registry: &'a LocaleRegistry,
}

impl<'a> NumberFormatter<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self { registry }
    }

    /// Symbols for a registered locale.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::Locale` when `locale` is not registered.
    pub fn symbols(&self, locale: &str) -> Result<&'static NumberSymbols> {
        let entry = self.registry.get(locale)?;
        Ok(NumberSymbols::for_locale(entry.code()))
    }

    /// Render a count with the locale's digits and grouping.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::Locale` when `locale` is not registered.
    pub fn format_integer(&self, n: u64, locale: &str) -> Result<String> {
        Ok(self.symbols(locale)?.group_integer(&n.to_string()))
    }
}

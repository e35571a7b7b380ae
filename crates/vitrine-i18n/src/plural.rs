#![forbid(unsafe_code)]

//! CLDR plural rules and plural-aware template selection.
//!
//! Covers the language families Vitrine ships translations for. Each
//! [`PluralRuleSet`] maps a non-negative count to a [`PluralCategory`] it
//! declares in [`PluralRuleSet::categories`].
//!
//! # Invariants
//!
//! 1. **Closed mapping**: `rules.categorize(n)` is always a member of
//!    `rules.categories()`.
//! 2. **`Other` is declared**: every rule set lists `Other`, which is the
//!    template fallback for any category a locale did not translate.
//! 3. **No guessing**: selection for an unregistered locale is an error,
//!    never a silent two-category English rule.
//!
//! # Template keys
//!
//! Plural templates live in the flat translation table as
//! `{prefix}_{category}`, e.g. `itemFound_few`.

use std::fmt;

use tracing::trace;

use crate::catalog::{Origin, Resolved, TranslationResolver, interpolate};
use crate::error::Result;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// Lowercase CLDR name used in template keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    /// Template key for this category, e.g. `itemFound_one`.
    #[must_use]
    pub fn key(self, prefix: &str) -> String {
        format!("{prefix}_{}", self.as_str())
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plural rule family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRuleSet {
    /// `one` for 1, `other` otherwise (en, de, tr).
    OneOther,
    /// `one` for 0 and 1, `many` for exact millions, `other` otherwise (fr).
    French,
    /// `one`/`few`/`many` by last digits (ru, uk).
    EastSlavic,
    /// `one` for 1 only, `few`/`many` by last digits (pl).
    Polish,
    /// All six categories (ar).
    Arabic,
    /// No distinction (ja, zh, ko).
    NoPlural,
}

impl PluralRuleSet {
    /// Rule family for a primary language subtag. Unknown languages get
    /// [`PluralRuleSet::OneOther`].
    #[must_use]
    pub fn for_language(lang: &str) -> Self {
        let primary = lang.split(['-', '_']).next().unwrap_or(lang);
        match primary.to_ascii_lowercase().as_str() {
            "fr" => Self::French,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "pl" => Self::Polish,
            "ar" => Self::Arabic,
            "ja" | "zh" | "ko" | "th" | "vi" => Self::NoPlural,
            _ => Self::OneOther,
        }
    }

    /// Categories this rule set can produce or that translators may supply.
    #[must_use]
    pub const fn categories(self) -> &'static [PluralCategory] {
        use PluralCategory::*;
        match self {
            Self::OneOther => &[One, Other],
            Self::French => &[One, Many, Other],
            Self::EastSlavic | Self::Polish => &[One, Few, Many, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
            Self::NoPlural => &[Other],
        }
    }

    /// Category for a count.
    #[must_use]
    pub fn categorize(self, n: u64) -> PluralCategory {
        match self {
            Self::OneOther => one_other(n),
            Self::French => french(n),
            Self::EastSlavic => east_slavic(n),
            Self::Polish => polish(n),
            Self::Arabic => arabic(n),
            Self::NoPlural => PluralCategory::Other,
        }
    }
}

// ── Rule implementations ────────────────────────────────────────────

fn one_other(n: u64) -> PluralCategory {
    if n == 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

fn french(n: u64) -> PluralCategory {
    if n <= 1 {
        PluralCategory::One
    } else if n % 1_000_000 == 0 {
        PluralCategory::Many
    } else {
        PluralCategory::Other
    }
}

fn east_slavic(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if mod10 == 1 && mod100 != 11 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn polish(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if n == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn arabic(n: u64) -> PluralCategory {
    match (n, n % 100) {
        (0, _) => PluralCategory::Zero,
        (1, _) => PluralCategory::One,
        (2, _) => PluralCategory::Two,
        (_, 3..=10) => PluralCategory::Few,
        (_, 11..=99) => PluralCategory::Many,
        _ => PluralCategory::Other,
    }
}

/// Plural selection bound to a registry and translation table.
#[derive(Debug, Clone, Copy)]
pub struct PluralRuleEngine<'a> {
    resolver: TranslationResolver<'a>,
}

impl<'a> PluralRuleEngine<'a> {
    #[must_use]
    pub fn new(resolver: TranslationResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Plural category of `count` in `locale`.
    ///
    /// # Errors
    ///
    /// Returns `I18nError::UnsupportedLocale` when `locale` is not registered.
    pub fn select(&self, count: u64, locale: &str) -> Result<PluralCategory> {
        let rules = self.resolver.registry().get(locale)?.plural_rule_set();
        Ok(rules.categorize(count))
    }

    /// Raw template for `count` under `key_prefix`, without substitution.
    ///
    /// For each locale of the fallback chain, `{prefix}_{category}` is tried
    /// before `{prefix}_other`. When nothing matches, the category key itself
    /// is returned as [`Origin::MissingKey`].
    ///
    /// # Errors
    ///
    /// Returns `I18nError::UnsupportedLocale` when `locale` is not registered.
    pub fn select_template(&self, count: u64, locale: &str, key_prefix: &str) -> Result<Resolved> {
        let category = self.select(count, locale)?;
        let chain = self.resolver.registry().fallback_chain(locale)?;
        let exact = category.key(key_prefix);
        let other = PluralCategory::Other.key(key_prefix);
        let table = self.resolver.table();

        for (depth, code) in chain.iter().enumerate() {
            let template = table
                .get_canonical(code, &exact)
                .or_else(|| table.get_canonical(code, &other));
            if let Some(template) = template {
                trace!(count, locale, category = %category, used = *code, "plural template selected");
                let origin = if depth == 0 {
                    Origin::Requested
                } else {
                    Origin::Fallback {
                        locale: (*code).to_string(),
                    }
                };
                return Ok(Resolved {
                    text: template.to_string(),
                    origin,
                });
            }
        }

        Ok(Resolved {
            text: exact,
            origin: Origin::MissingKey,
        })
    }

    /// Select the template for `count` and substitute `{{count}}` with
    /// `formatted_count` (already localized by the caller).
    ///
    /// # Errors
    ///
    /// Returns `I18nError::UnsupportedLocale` when `locale` is not registered.
    pub fn format_count(
        &self,
        count: u64,
        locale: &str,
        key_prefix: &str,
        formatted_count: &str,
    ) -> Result<Resolved> {
        let template = self.select_template(count, locale, key_prefix)?;
        if template.is_missing() {
            return Ok(template);
        }
        Ok(Resolved {
            text: interpolate(&template.text, &[("count", formatted_count)]),
            origin: template.origin,
        })
    }

    /// Declared categories of `locale` with no `{prefix}_{category}` template
    /// in that exact locale.
    ///
    /// # Errors
    ///
    /// Returns `I18nError::UnsupportedLocale` when `locale` is not registered.
    pub fn missing_categories(&self, locale: &str, key_prefix: &str) -> Result<Vec<PluralCategory>> {
        let entry = self.resolver.registry().get(locale)?;
        let table = self.resolver.table();
        Ok(entry
            .plural_rule_set()
            .categories()
            .iter()
            .copied()
            .filter(|c| table.get(entry.code(), &c.key(key_prefix)).is_none())
            .collect())
    }
}

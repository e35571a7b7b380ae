#![forbid(unsafe_code)]

//! Locale registry and fallback chains.
//!
//! # Invariants
//!
//! 1. **Default present**: every registry contains [`DEFAULT_LOCALE`].
//! 2. **Chains terminate**: `fallback_chain(code)` is
//!    `[code, base language (if registered), DEFAULT_LOCALE]` with
//!    duplicates removed, so it always ends at the default locale.
//! 3. **No silent substitution**: an unregistered code is an error, never
//!    quietly replaced by another locale.
//!
//! # Example
//! ```
//! use vitrine_i18n::locale::LocaleRegistry;
//!
//! let registry = LocaleRegistry::builtin();
//! assert_eq!(registry.fallback_chain("de_ch").unwrap(), vec!["de-CH", "de", "en"]);
//! assert!(registry.get("xx").is_err());
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::error::{I18nError, Result};
use crate::plural::PluralRuleSet;

/// Locale every fallback chain ends at.
pub const DEFAULT_LOCALE: &str = "en";

/// Writing direction of a locale's script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a locale's script separates words with whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordSegmentation {
    /// Words are delimited by whitespace (Latin, Cyrillic, Arabic, ...).
    #[default]
    Whitespace,
    /// No inter-word spaces (Japanese, Chinese, Thai).
    None,
}

/// A supported locale and its formatting metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    code: String,
    display_name: String,
    direction: TextDirection,
    plural_rules: PluralRuleSet,
    collation: String,
    segmentation: WordSegmentation,
}

impl Locale {
    /// Create a left-to-right, whitespace-segmented locale using the
    /// plural rules for its language and the root collation.
    #[must_use]
    pub fn new(code: &str, display_name: impl Into<String>) -> Self {
        let code = canonicalize(code);
        Self {
            plural_rules: PluralRuleSet::for_language(primary_language(&code)),
            code,
            display_name: display_name.into(),
            direction: TextDirection::Ltr,
            collation: "root".to_string(),
            segmentation: WordSegmentation::Whitespace,
        }
    }

    #[must_use]
    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn plural_rules(mut self, rules: PluralRuleSet) -> Self {
        self.plural_rules = rules;
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = collation.into();
        self
    }

    #[must_use]
    pub fn segmentation(mut self, segmentation: WordSegmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Canonical code, e.g. `"de-CH"`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn text_direction(&self) -> TextDirection {
        self.direction
    }

    #[must_use]
    pub fn plural_rule_set(&self) -> PluralRuleSet {
        self.plural_rules
    }

    /// Collation identifier (`"root"`, `"de"`, `"tr"`, ...).
    #[must_use]
    pub fn collation_id(&self) -> &str {
        &self.collation
    }

    #[must_use]
    pub fn word_segmentation(&self) -> WordSegmentation {
        self.segmentation
    }

    /// Primary language subtag (`"de"` for `"de-CH"`).
    #[must_use]
    pub fn language(&self) -> &str {
        primary_language(&self.code)
    }
}

/// Canonicalize a locale tag: `de_ch` / `DE-ch` → `de-CH`, `zh-hant` → `zh-Hant`.
#[must_use]
pub fn canonicalize(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for (i, subtag) in code.trim().split(['-', '_']).enumerate() {
        if i > 0 {
            out.push('-');
        }
        match (i, subtag.len()) {
            (0, _) => out.push_str(&subtag.to_ascii_lowercase()),
            (_, 2) => out.push_str(&subtag.to_ascii_uppercase()),
            (_, 4) => {
                let mut chars = subtag.chars();
                if let Some(first) = chars.next() {
                    out.push(first.to_ascii_uppercase());
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                }
            }
            _ => out.push_str(&subtag.to_ascii_lowercase()),
        }
    }
    out
}

/// Primary language subtag of a tag.
#[must_use]
pub fn primary_language(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Fixed table of supported locales.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<Locale>,
}

impl LocaleRegistry {
    /// Build a registry from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::InvalidRegistry`] when a code is registered twice
    /// or the default locale is missing.
    pub fn new(locales: Vec<Locale>) -> Result<Self> {
        let mut seen = HashSet::new();
        for locale in &locales {
            if locale.code.is_empty() {
                return Err(I18nError::invalid_registry("empty locale code"));
            }
            if !seen.insert(locale.code.as_str()) {
                return Err(I18nError::invalid_registry(format!(
                    "duplicate locale '{}'",
                    locale.code
                )));
            }
        }
        if !seen.contains(DEFAULT_LOCALE) {
            return Err(I18nError::invalid_registry(format!(
                "default locale '{DEFAULT_LOCALE}' is not registered"
            )));
        }
        Ok(Self { locales })
    }

    /// The locales Vitrine ships with.
    #[must_use]
    pub fn builtin() -> Self {
        use PluralRuleSet as P;
        use TextDirection::Rtl;

        let locales = vec![
            Locale::new("en", "English"),
            Locale::new("en-GB", "English (United Kingdom)"),
            Locale::new("de", "Deutsch").collation("de"),
            Locale::new("de-CH", "Deutsch (Schweiz)").collation("de"),
            Locale::new("fr", "Français"),
            Locale::new("tr", "Türkçe").collation("tr"),
            Locale::new("ar", "العربية").direction(Rtl),
            Locale::new("ja", "日本語")
                .plural_rules(P::NoPlural)
                .collation("ja")
                .segmentation(WordSegmentation::None),
            Locale::new("ru", "Русский"),
            Locale::new("pl", "Polski").collation("pl"),
        ];
        Self { locales }
    }

    /// Look up a locale by code.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnsupportedLocale`] when the code is not registered.
    pub fn get(&self, code: &str) -> Result<&Locale> {
        let canonical = canonicalize(code);
        self.locales
            .iter()
            .find(|l| l.code == canonical)
            .ok_or_else(|| I18nError::unsupported(code))
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_ok()
    }

    /// The default locale entry.
    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        // Presence is checked in `new` and guaranteed by `builtin`.
        self.locales
            .iter()
            .find(|l| l.code == DEFAULT_LOCALE)
            .unwrap_or(&self.locales[0])
    }

    /// Ordered locales to try for `code`: exact, base language, default.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnsupportedLocale`] when `code` is not registered.
    pub fn fallback_chain(&self, code: &str) -> Result<Vec<&str>> {
        let locale = self.get(code)?;
        let mut chain = vec![locale.code()];
        if let Ok(base) = self.get(locale.language())
            && !chain.contains(&base.code())
        {
            chain.push(base.code());
        }
        let default = self.default_locale().code();
        if !chain.contains(&default) {
            chain.push(default);
        }
        Ok(chain)
    }

    /// Registered locales in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#![forbid(unsafe_code)]

//! Internationalization foundation for Vitrine.
//!
//! Provides the locale registry, key-based translation lookup with a
//! fallback chain, `{{name}}` placeholder substitution, and CLDR-style
//! plural selection.
//!
//! # Role in Vitrine
//! Formatters never read an ambient "current locale": every operation takes
//! a locale code, validates it against the [`LocaleRegistry`], and fails with
//! [`I18nError::UnsupportedLocale`] rather than guessing.

pub mod catalog;
pub mod error;
pub mod locale;
pub mod plural;

pub use catalog::{LocaleStrings, Origin, Resolved, TranslationResolver, TranslationTable, interpolate};
pub use error::{I18nError, Result};
pub use locale::{
    DEFAULT_LOCALE, Locale, LocaleRegistry, TextDirection, WordSegmentation, canonicalize,
    primary_language,
};
pub use plural::{PluralCategory, PluralRuleEngine, PluralRuleSet};

#![forbid(unsafe_code)]

//! Translation tables with locale fallback and `{{name}}` interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: a lookup walks the registry's chain for
//!    the requested locale exactly once and ends at the default locale.
//! 2. **Never empty-handed**: when no locale in the chain has the key, the
//!    key itself is returned with [`Origin::MissingKey`].
//! 3. **Single-pass interpolation**: substituted values are never rescanned,
//!    so a value containing `{{x}}` stays literal.
//! 4. **Thread safety**: [`TranslationTable`] is immutable after loading
//!    and `Send + Sync`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unregistered locale | Caller passed an unknown code | `I18nError::UnsupportedLocale` |
//! | Missing key | Key not in any chain locale | Key returned, `Origin::MissingKey` |
//! | Missing param | `{{name}}` but no `name` param | Token left as-is |
//! | Malformed JSON | Bad translation file | `I18nError::Parse` |

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{I18nError, Result};
use crate::locale::{LocaleRegistry, canonicalize};

/// Flat key → template map for one locale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of string values.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Parse`] when `json` is not an object of strings.
    pub fn from_json_str(locale: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| I18nError::Parse {
            locale: canonicalize(locale),
            source,
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleStrings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            strings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Translation templates for every loaded locale.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    locales: HashMap<String, LocaleStrings>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the strings for a locale.
    pub fn add_locale(&mut self, locale: &str, strings: LocaleStrings) {
        self.locales.insert(canonicalize(locale), strings);
    }

    /// Parse and add a locale from a flat JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Parse`] on malformed JSON; the table is unchanged.
    pub fn load_json(&mut self, locale: &str, json: &str) -> Result<()> {
        let strings = LocaleStrings::from_json_str(locale, json)?;
        debug!(locale, keys = strings.len(), "loaded translations");
        self.add_locale(locale, strings);
        Ok(())
    }

    /// Template for `key` in exactly `locale` (any spelling of the code),
    /// without fallback.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locale_strings(locale)?.get(key)
    }

    /// Like [`get`](Self::get) for a code that is already canonical.
    pub(crate) fn get_canonical(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales.get(locale)?.get(key)
    }

    #[must_use]
    pub fn locale_strings(&self, locale: &str) -> Option<&LocaleStrings> {
        self.locales.get(&canonicalize(locale))
    }

    /// Loaded locale codes (unordered).
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

/// Where a resolved string came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Found in the requested locale.
    Requested,
    /// Found further down the fallback chain.
    Fallback { locale: String },
    /// No locale had the key; the text is the key itself.
    MissingKey,
}

/// A resolved, interpolated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub origin: Origin,
}

impl Resolved {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.origin == Origin::MissingKey
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Replace `{{name}}` tokens with matching params in a single pass.
///
/// Names are runs of alphanumerics and `_`. Tokens without a matching param
/// are left verbatim, and substituted values are not rescanned.
///
/// ```
/// use vitrine_i18n::interpolate;
///
/// assert_eq!(interpolate("{{count}} items", &[("count", "3")]), "3 items");
/// assert_eq!(interpolate("Hi {{who}}", &[]), "Hi {{who}}");
/// ```
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let inner = &rest[open + 2..];
        let Some(close) = inner.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &inner[..close];
        if !is_param_name(name) {
            // Not a token; resume scanning one brace later.
            out.push('{');
            rest = &rest[open + 1..];
            continue;
        }
        match params.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &inner[close + 2..];
    }
    out.push_str(rest);
    out
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Resolves keys against a [`TranslationTable`] using a registry's fallback chains.
#[derive(Debug, Clone, Copy)]
pub struct TranslationResolver<'a> {
    registry: &'a LocaleRegistry,
    table: &'a TranslationTable,
}

impl<'a> TranslationResolver<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry, table: &'a TranslationTable) -> Self {
        Self { registry, table }
    }

    #[must_use]
    pub fn registry(&self) -> &'a LocaleRegistry {
        self.registry
    }

    #[must_use]
    pub fn table(&self) -> &'a TranslationTable {
        self.table
    }

    /// Resolve `key` for `locale` and substitute `params`.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnsupportedLocale`] when `locale` is not registered.
    pub fn resolve(&self, key: &str, locale: &str, params: &[(&str, &str)]) -> Result<Resolved> {
        let chain = self.registry.fallback_chain(locale)?;
        let Some((found_in, template)) = self.find_in_chain(&chain, key) else {
            debug!(key, locale, "missing translation; using key");
            return Ok(Resolved {
                text: key.to_string(),
                origin: Origin::MissingKey,
            });
        };

        let origin = if found_in == chain[0] {
            Origin::Requested
        } else {
            debug!(key, requested = chain[0], used = found_in, "translation fell back");
            Origin::Fallback {
                locale: found_in.to_string(),
            }
        };

        Ok(Resolved {
            text: interpolate(template, params),
            origin,
        })
    }

    /// Resolve `key` without params.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnsupportedLocale`] when `locale` is not registered.
    pub fn lookup(&self, key: &str, locale: &str) -> Result<Resolved> {
        self.resolve(key, locale, &[])
    }

    /// First chain locale holding `key`, with its raw template.
    pub(crate) fn find_in_chain<'c>(
        &self,
        chain: &[&'c str],
        key: &str,
    ) -> Option<(&'c str, &'a str)> {
        chain
            .iter()
            .find_map(|code| self.table.get_canonical(code, key).map(|t| (*code, t)))
    }
}

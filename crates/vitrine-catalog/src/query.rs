#![forbid(unsafe_code)]

//! Collation-aware filtering and sorting of catalog items.
//!
//! # Invariants
//!
//! 1. **Stable sort**: items comparing equal under the sort key keep their
//!    input order; sorting an already-sorted list is a no-op.
//! 2. **Commuting stages**: filtering and sorting commute, because the
//!    filter predicate is per-item and the sort is stable.
//! 3. **Primary-strength search**: case and accents are ignored, locale
//!    tailored letters stay distinct (`ı` vs `i` in Turkish), and
//!    compatibility forms are folded (`ﬁ` matches `fi`).
//! 4. **Empty search matches all**: a blank or whitespace-only term keeps
//!    every item.
//! 5. **Shopper-visible categories**: with translations attached, search and
//!    the category sort use the `category_<id>` label shown in the view;
//!    the raw id still matches in search.
//!
//! # Example
//! ```
//! use vitrine_catalog::{Catalog, CatalogItem, CatalogQueryEngine, Price, Query, SortKey};
//! use vitrine_i18n::LocaleRegistry;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogItem::new(1, "Zebra Stapler", Price::new(9.0, "USD"), "office"),
//!     CatalogItem::new(2, "Äpfelschäler", Price::new(4.0, "EUR"), "kitchen"),
//! ])
//! .unwrap();
//! let registry = LocaleRegistry::builtin();
//! let engine = CatalogQueryEngine::new(&registry);
//! let hits = engine.run(&catalog, &Query::new("de").search("apfel")).unwrap();
//! assert_eq!(hits.len(), 1);
//! let sorted = engine.run(&catalog, &Query::new("de").sort(SortKey::Name)).unwrap();
//! assert_eq!(sorted[0].id, 2);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use std::borrow::Cow;

use tracing::trace;
use vitrine_i18n::{Locale, LocaleRegistry, TranslationResolver, TranslationTable};
use vitrine_text::Collator;

use crate::error::{CatalogError, Result};
use crate::item::{Catalog, CatalogItem};

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Item name under the locale's collation.
    #[default]
    Name,
    /// Category label (translated when the engine has translations) under
    /// the locale's collation.
    Category,
    /// Price amount, ascending. Currencies are not converted, so amounts in
    /// different currencies are not comparable; keep one currency per
    /// catalog when price order matters.
    Price,
    /// Recommended items first, otherwise input order.
    RecommendedFirst,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::RecommendedFirst => "recommended",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    /// Accepts `name`, `category`, `price`, `recommended`, and the legacy
    /// alias `liked`, case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "price" => Ok(Self::Price),
            "recommended" | "liked" => Ok(Self::RecommendedFirst),
            _ => Err(CatalogError::UnknownSortKey { key: s.to_string() }),
        }
    }
}

/// A search term, sort key, and display locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub search: String,
    pub sort: SortKey,
    pub locale: String,
}

impl Query {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            search: String::new(),
            sort: SortKey::default(),
            locale: locale.into(),
        }
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Display label of a raw category: the `category_<id>` translation along
/// the fallback chain, else the id itself.
pub(crate) fn category_label(
    resolver: TranslationResolver<'_>,
    category: &str,
    locale: &str,
) -> Result<String> {
    let resolved = resolver.lookup(&format!("category_{category}"), locale)?;
    Ok(if resolved.is_missing() {
        category.to_string()
    } else {
        resolved.into_string()
    })
}

/// Stateless filter/sort engine bound to a locale registry and, optionally,
/// the translations that name categories.
#[derive(Debug, Clone, Copy)]
pub struct CatalogQueryEngine<'a> {
    registry: &'a LocaleRegistry,
    table: Option<&'a TranslationTable>,
}

impl<'a> CatalogQueryEngine<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self {
            registry,
            table: None,
        }
    }

    /// Search and sort categories by their translated labels.
    #[must_use]
    pub fn with_translations(mut self, table: &'a TranslationTable) -> Self {
        self.table = Some(table);
        self
    }

    fn collator(locale: &Locale) -> Collator {
        Collator::for_id(locale.collation_id())
    }

    /// Category label as the shopper sees it, or the raw id without
    /// translations.
    fn category<'c>(&self, item: &'c CatalogItem, locale: &Locale) -> Result<Cow<'c, str>> {
        match self.table {
            Some(table) => Ok(Cow::Owned(category_label(
                TranslationResolver::new(self.registry, table),
                &item.category,
                locale.code(),
            )?)),
            None => Ok(Cow::Borrowed(item.category.as_str())),
        }
    }

    /// Items whose name, category (raw id or translated label), or locale
    /// description contains `search` at primary strength.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Locale`] when `locale` is not registered.
    pub fn filter<'c, I>(&self, items: I, search: &str, locale: &str) -> Result<Vec<&'c CatalogItem>>
    where
        I: IntoIterator<Item = &'c CatalogItem>,
    {
        let locale = self.registry.get(locale)?;
        let search = search.trim();
        if search.is_empty() {
            return Ok(items.into_iter().collect());
        }

        let collator = Self::collator(locale);
        let needle = collator.fold(search);
        let mut kept = Vec::new();
        for item in items {
            let label = self.category(item, locale)?;
            let hit = [
                item.name.as_str(),
                item.category.as_str(),
                label.as_ref(),
                item.description_for(locale),
            ]
            .iter()
            .any(|field| collator.fold(field).contains(&needle));
            if hit {
                kept.push(item);
            }
        }
        Ok(kept)
    }

    /// Stable sort of `items` by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Locale`] when `locale` is not registered.
    pub fn sort<'c>(
        &self,
        mut items: Vec<&'c CatalogItem>,
        key: SortKey,
        locale: &str,
    ) -> Result<Vec<&'c CatalogItem>> {
        let locale = self.registry.get(locale)?;
        match key {
            SortKey::Name => {
                let collator = Self::collator(locale);
                items.sort_by_cached_key(|item| collator.key(&item.name));
            }
            SortKey::Category => {
                let collator = Self::collator(locale);
                let mut keyed = items
                    .into_iter()
                    .map(|item| Ok((collator.key(&self.category(item, locale)?), item)))
                    .collect::<Result<Vec<_>>>()?;
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                items = keyed.into_iter().map(|(_, item)| item).collect();
            }
            SortKey::Price => items.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount)),
            SortKey::RecommendedFirst => items.sort_by_key(|item| !item.recommended),
        }
        Ok(items)
    }

    /// Filter, then sort.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Locale`] when the query locale is not registered.
    pub fn run<'c>(&self, catalog: &'c Catalog, query: &Query) -> Result<Vec<&'c CatalogItem>> {
        let started = Instant::now();
        let filtered = self.filter(catalog, &query.search, &query.locale)?;
        let matched = filtered.len();
        let sorted = self.sort(filtered, query.sort, &query.locale)?;
        trace!(
            locale = %query.locale,
            sort = %query.sort,
            total = catalog.len(),
            matched,
            elapsed_us = started.elapsed().as_micros() as u64,
            "catalog query"
        );
        Ok(sorted)
    }
}

#![forbid(unsafe_code)]

//! Localized view models.
//!
//! [`ViewRenderer`] runs a query and turns each matching item into an
//! [`ItemView`] of display-ready strings. The shell consumes
//! [`CatalogView`] only and never formats values itself.
//!
//! # Field sources
//!
//! | Field | Produced by |
//! |-------|-------------|
//! | `formatted_price` | `CurrencyFormatter` (negative prices rejected) |
//! | `formatted_category` | `category_<id>` translation, then locale capitalization |
//! | `formatted_address` | `AddressFormatter` (country layout) |
//! | `formatted_description` | locale description, then `TextTruncator` |
//! | `recommended_label` | `recommended` / `notRecommended` translations |
//! | `count_text` | `PluralRuleEngine` with the localized count |

use tracing::trace;
use vitrine_format::{
    AddressFormatter, CurrencyFormatter, NegativePolicy, NumberFormatter, TextTruncator,
};
use vitrine_i18n::{
    Locale, LocaleRegistry, PluralRuleEngine, TextDirection, TranslationResolver, TranslationTable,
};
use vitrine_text::{CaseRules, TruncationOutcome};

use crate::cache::QueryCache;
use crate::config::ViewConfig;
use crate::error::Result;
use crate::item::{Catalog, CatalogItem};
use crate::query::{CatalogQueryEngine, Query, category_label};

/// Display-ready values for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: u64,
    pub formatted_name: String,
    pub formatted_price: String,
    pub formatted_category: String,
    pub formatted_address: String,
    /// `false` when the address country had no layout entry.
    pub address_verified: bool,
    pub formatted_description: String,
    pub description_outcome: TruncationOutcome,
    pub recommended: bool,
    pub recommended_label: String,
}

/// A rendered query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    /// Canonical locale code.
    pub locale: String,
    /// Metadata for the shell; no layout is mirrored here.
    pub direction: TextDirection,
    pub result_count: usize,
    /// Pluralized, localized result count ("3 items found").
    pub count_text: String,
    pub items: Vec<ItemView>,
}

/// Formatters resolved once per render.
struct Formatters<'a> {
    resolver: TranslationResolver<'a>,
    currency: CurrencyFormatter<'a>,
    address: AddressFormatter<'a>,
    truncator: TextTruncator<'a>,
    case: CaseRules,
}

/// Builds [`CatalogView`]s from a catalog, query, and translations.
#[derive(Debug, Clone)]
pub struct ViewRenderer<'a> {
    registry: &'a LocaleRegistry,
    table: &'a TranslationTable,
    config: ViewConfig,
}

impl<'a> ViewRenderer<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry, table: &'a TranslationTable, config: ViewConfig) -> Self {
        Self {
            registry,
            table,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Query engine that searches and sorts by the same category labels
    /// this renderer displays.
    #[must_use]
    pub fn query_engine(&self) -> CatalogQueryEngine<'a> {
        CatalogQueryEngine::new(self.registry).with_translations(self.table)
    }

    /// Run `query` and render the result.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Locale` for an unregistered locale and
    /// `CatalogError::Format` when an item's price cannot be formatted.
    pub fn render(&self, catalog: &Catalog, query: &Query) -> Result<CatalogView> {
        let items = self.query_engine().run(catalog, query)?;
        self.assemble(&items, &query.locale)
    }

    /// Like [`render`](Self::render), memoizing the query through `cache`.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_cached(
        &self,
        catalog: &Catalog,
        query: &Query,
        cache: &mut QueryCache,
    ) -> Result<CatalogView> {
        let items = cache.run(&self.query_engine(), catalog, query)?;
        self.assemble(&items, &query.locale)
    }

    /// Render a single item for `locale`.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn item_view(&self, item: &CatalogItem, locale: &str) -> Result<ItemView> {
        let entry = self.registry.get(locale)?;
        self.build_item(item, entry, &self.formatters(entry))
    }

    /// Render an already-ordered list of items.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn assemble(&self, items: &[&CatalogItem], locale: &str) -> Result<CatalogView> {
        let entry = self.registry.get(locale)?;
        let formatters = self.formatters(entry);

        let views = items
            .iter()
            .map(|item| self.build_item(item, entry, &formatters))
            .collect::<Result<Vec<_>>>()?;

        let count = views.len();
        let count_text = self.count_text(count, entry, formatters.resolver)?;
        trace!(locale = entry.code(), count, "assembled catalog view");

        Ok(CatalogView {
            locale: entry.code().to_string(),
            direction: entry.text_direction(),
            result_count: count,
            count_text,
            items: views,
        })
    }

    fn formatters(&self, locale: &Locale) -> Formatters<'a> {
        Formatters {
            resolver: TranslationResolver::new(self.registry, self.table),
            currency: CurrencyFormatter::new(self.registry).negative_policy(NegativePolicy::Reject),
            address: AddressFormatter::new(self.registry),
            truncator: TextTruncator::new(self.registry).with_ellipsis(self.config.ellipsis.clone()),
            case: CaseRules::for_language(locale.language()),
        }
    }

    fn build_item(&self, item: &CatalogItem, locale: &Locale, f: &Formatters<'a>) -> Result<ItemView> {
        let code = locale.code();

        let formatted_price = f.currency.format(item.price.amount, &item.price.currency, code)?;
        let address = f.address.format(&item.address, code)?;
        let description = f.truncator.truncate(
            item.description_for(locale),
            self.config.description_max_len,
            code,
        )?;

        let formatted_category = f
            .case
            .capitalize(&category_label(f.resolver, &item.category, code)?);

        let label_key = if item.recommended {
            "recommended"
        } else {
            "notRecommended"
        };
        let recommended_label = f.resolver.lookup(label_key, code)?.text;

        Ok(ItemView {
            id: item.id,
            formatted_name: item.name.clone(),
            formatted_price,
            formatted_category,
            formatted_address: address.text,
            address_verified: address.verified,
            formatted_description: description.text,
            description_outcome: description.outcome,
            recommended: item.recommended,
            recommended_label,
        })
    }

    fn count_text(
        &self,
        count: usize,
        locale: &Locale,
        resolver: TranslationResolver<'a>,
    ) -> Result<String> {
        let count = count as u64;
        let formatted = NumberFormatter::new(self.registry).format_integer(count, locale.code())?;
        let engine = PluralRuleEngine::new(resolver);
        Ok(engine
            .format_count(count, locale.code(), &self.config.count_key_prefix, &formatted)?
            .text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::item::Price;
    use crate::query::SortKey;
    use vitrine_format::{Address, FormatError};

    fn table() -> TranslationTable {
        let mut table = TranslationTable::new();
        table
            .load_json(
                "en",
                r#"{
                    "recommended": "Recommended",
                    "notRecommended": "Not recommended",
                    "category_electronics": "electronics",
                    "itemFound_one": "{{count}} item found",
                    "itemFound_other": "{{count}} items found"
                }"#,
            )
            .unwrap();
        table
            .load_json(
                "tr",
                r#"{
                    "recommended": "Önerilen",
                    "category_electronics": "elektronik",
                    "category_tools": "iş aletleri",
                    "category_lighting": "ışıklandırma",
                    "itemFound_one": "{{count}} ürün bulundu",
                    "itemFound_other": "{{count}} ürün bulundu"
                }"#,
            )
            .unwrap();
        table
            .load_json(
                "ar",
                r#"{"itemFound_few": "تم العثور على {{count}} منتجات", "itemFound_other": "تم العثور على {{count}} منتج"}"#,
            )
            .unwrap();
        table
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new(1, "Wireless Mouse", Price::new(1234.5, "USD"), "electronics")
                .recommended(true)
                .address(
                    Address::new("US")
                        .street("123 Tech Blvd")
                        .locality("Austin")
                        .region("TX")
                        .postal_code("78701"),
                )
                .description("Ergonomic wireless mouse with long battery life and silent clicks."),
            CatalogItem::new(2, "Desk Lamp", Price::new(4499.0, "JPY"), "office")
                .address(
                    Address::new("JP")
                        .region("東京都")
                        .locality("渋谷区")
                        .street("渋谷1-2-3")
                        .postal_code("150-0002"),
                )
                .description("LED desk lamp."),
            CatalogItem::new(3, "Kettle", Price::new(30.0, "EUR"), "kitchen")
                .address(Address::new("BR").locality("São Paulo")),
        ])
        .unwrap()
    }

    #[test]
    fn renders_english_view() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let view = renderer.render(&catalog(), &Query::new("en").sort(SortKey::Price)).unwrap();

        assert_eq!(view.locale, "en");
        assert_eq!(view.direction, TextDirection::Ltr);
        assert_eq!(view.result_count, 3);
        assert_eq!(view.count_text, "3 items found");

        let ids: Vec<u64> = view.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let mouse = &view.items[1];
        assert_eq!(mouse.formatted_price, "$1,234.50");
        assert_eq!(mouse.formatted_category, "Electronics");
        assert_eq!(mouse.formatted_address, "123 Tech Blvd, Austin, TX 78701");
        assert!(mouse.address_verified);
        assert_eq!(mouse.recommended_label, "Recommended");
        assert_eq!(mouse.description_outcome, TruncationOutcome::WordBoundary);
        assert!(mouse.formatted_description.ends_with('…'));

        let lamp = &view.items[2];
        assert_eq!(lamp.formatted_price, "¥4,499");
        assert_eq!(lamp.formatted_address, "〒150-0002 東京都渋谷区渋谷1-2-3");
        assert_eq!(lamp.formatted_category, "Office");
        assert_eq!(lamp.recommended_label, "Not recommended");
        assert_eq!(lamp.description_outcome, TruncationOutcome::Unchanged);

        let kettle = &view.items[0];
        assert!(!kettle.address_verified);
    }

    #[test]
    fn turkish_view_uses_turkic_capitalization() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let view = renderer.render(&catalog(), &Query::new("tr").search("mouse")).unwrap();
        assert_eq!(view.count_text, "1 ürün bulundu");
        let mouse = &view.items[0];
        assert_eq!(mouse.formatted_category, "Elektronik");
        assert_eq!(mouse.formatted_price, "$1.234,50");
        assert_eq!(mouse.recommended_label, "Önerilen");

        let drill = CatalogItem::new(10, "Matkap", Price::new(60.0, "TRY"), "tools");
        let lamp = CatalogItem::new(11, "Fener", Price::new(12.0, "TRY"), "lighting");
        assert_eq!(renderer.item_view(&drill, "tr").unwrap().formatted_category, "İş aletleri");
        assert_eq!(renderer.item_view(&lamp, "tr").unwrap().formatted_category, "Işıklandırma");
        // Outside Turkic locales the raw id gets the default mapping.
        let raw = CatalogItem::new(12, "Lamp", Price::new(12.0, "USD"), "illumination");
        assert_eq!(renderer.item_view(&raw, "en").unwrap().formatted_category, "Illumination");
        assert_eq!(renderer.item_view(&raw, "tr").unwrap().formatted_category, "İllumination");
    }

    #[test]
    fn category_sort_follows_displayed_labels() {
        let registry = LocaleRegistry::builtin();
        let mut table = table();
        table
            .load_json(
                "de",
                r#"{"category_electronics": "Elektronik", "category_office": "Bürobedarf"}"#,
            )
            .unwrap();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let query = Query::new("de").sort(SortKey::Category);
        let view = renderer.render(&catalog(), &query).unwrap();
        let labels: Vec<&str> = view.items.iter().map(|i| i.formatted_category.as_str()).collect();
        assert_eq!(labels, vec!["Bürobedarf", "Elektronik", "Kitchen"]);

        let view = renderer.render(&catalog(), &Query::new("de").search("büro")).unwrap();
        assert_eq!(view.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn untranslated_category_is_capitalized_raw() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let catalog = catalog();
        let kettle = renderer.item_view(catalog.get(3).unwrap(), "tr").unwrap();
        assert_eq!(kettle.formatted_category, "Kitchen");
        let lamp = renderer.item_view(catalog.get(2).unwrap(), "tr").unwrap();
        assert_eq!(lamp.formatted_category, "Office");
        // "notRecommended" is missing in tr and falls back to en.
        assert_eq!(lamp.recommended_label, "Not recommended");
    }

    #[test]
    fn arabic_view_is_rtl_with_localized_count() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let view = renderer.render(&catalog(), &Query::new("ar")).unwrap();
        assert_eq!(view.direction, TextDirection::Rtl);
        assert_eq!(view.count_text, "تم العثور على ٣ منتجات");
    }

    #[test]
    fn empty_result_uses_zero_count() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let view = renderer.render(&catalog(), &Query::new("en").search("zzz")).unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.count_text, "0 items found");
    }

    #[test]
    fn config_controls_truncation() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let config = ViewConfig {
            description_max_len: 12,
            ellipsis: "...".into(),
            ..ViewConfig::default()
        };
        let renderer = ViewRenderer::new(&registry, &table, config);
        let catalog = catalog();
        let mouse = renderer.item_view(catalog.get(1).unwrap(), "en").unwrap();
        assert_eq!(mouse.formatted_description, "Ergonomic...");
    }

    #[test]
    fn negative_prices_are_rejected() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let item = CatalogItem::new(9, "Refund", Price::new(-5.0, "USD"), "office");
        assert!(matches!(
            renderer.item_view(&item, "en"),
            Err(CatalogError::Format(FormatError::InvalidAmount { .. }))
        ));
    }

    #[test]
    fn cached_render_matches_uncached() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        let catalog = catalog();
        let mut cache = QueryCache::new(renderer.config().cache_capacity);
        let query = Query::new("de").sort(SortKey::Category);
        let plain = renderer.render(&catalog, &query).unwrap();
        let first = renderer.render_cached(&catalog, &query, &mut cache).unwrap();
        let second = renderer.render_cached(&catalog, &query, &mut cache).unwrap();
        assert_eq!(plain, first);
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn unsupported_locale() {
        let registry = LocaleRegistry::builtin();
        let table = table();
        let renderer = ViewRenderer::new(&registry, &table, ViewConfig::default());
        assert!(matches!(
            renderer.render(&catalog(), &Query::new("xx")),
            Err(CatalogError::Locale(_))
        ));
    }
}

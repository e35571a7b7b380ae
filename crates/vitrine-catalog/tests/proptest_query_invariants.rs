//! Property-based invariant tests for catalog queries.
//!
//! 1. Sorting is stable: sorting a sorted list changes nothing
//! 2. Filter and sort commute
//! 3. Filtering returns a subsequence of the input
//! 4. A blank search keeps every item
//! 5. Memoized results equal fresh results
//! 6. Price order is non-decreasing

use proptest::prelude::*;
use vitrine_catalog::{Catalog, CatalogItem, CatalogQueryEngine, Price, Query, QueryCache, SortKey};
use vitrine_i18n::LocaleRegistry;

// ── Strategies ───────────────────────────────────────────────────────

const WORDS: [&str; 12] = [
    "Äpfel", "apple", "Öl", "Zebra", "ılık", "İnce", "Straße", "strasse", "Łódź", "café", "CAFE",
    "東京",
];

fn name() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(WORDS.to_vec()), 1..3)
        .prop_map(|words| words.join(" "))
}

fn item(id: u64) -> impl Strategy<Value = CatalogItem> {
    (
        name(),
        0u32..500,
        proptest::sample::select(vec!["electronics", "office", "Ölfarben", "çay"]),
        any::<bool>(),
    )
        .prop_map(move |(name, cents, category, recommended)| {
            CatalogItem::new(id, name, Price::new(f64::from(cents) / 4.0, "USD"), category)
                .recommended(recommended)
        })
}

fn catalog() -> impl Strategy<Value = Catalog> {
    (0usize..12)
        .prop_flat_map(|n| (0..n as u64).map(item).collect::<Vec<_>>())
        .prop_map(|items| Catalog::new(items).unwrap())
}

fn sort_key() -> impl Strategy<Value = SortKey> {
    proptest::sample::select(vec![
        SortKey::Name,
        SortKey::Category,
        SortKey::Price,
        SortKey::RecommendedFirst,
    ])
}

fn locale() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(vec!["en", "de", "tr", "pl", "ja", "ar"])
}

fn search() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        proptest::sample::select(vec!["apfel", "CAFE", "i", "ı", "ss", "öl", "o", "東"])
            .prop_map(str::to_string),
    ]
}

fn ids(items: &[&CatalogItem]) -> Vec<u64> {
    items.iter().map(|i| i.id).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Sort stability and commutation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sort_is_idempotent(catalog in catalog(), key in sort_key(), locale in locale()) {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let once = engine.sort(catalog.iter().collect(), key, locale).unwrap();
        let twice = engine.sort(once.clone(), key, locale).unwrap();
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn filter_and_sort_commute(
        catalog in catalog(),
        key in sort_key(),
        locale in locale(),
        term in search(),
    ) {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);

        let filtered = engine.filter(&catalog, &term, locale).unwrap();
        let filter_then_sort = engine.sort(filtered, key, locale).unwrap();

        let sorted = engine.sort(catalog.iter().collect(), key, locale).unwrap();
        let sort_then_filter = engine.filter(sorted, &term, locale).unwrap();

        prop_assert_eq!(ids(&filter_then_sort), ids(&sort_then_filter));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Filter shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filter_is_subsequence(catalog in catalog(), locale in locale(), term in search()) {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let kept = ids(&engine.filter(&catalog, &term, locale).unwrap());
        let all: Vec<u64> = catalog.iter().map(|i| i.id).collect();
        let mut cursor = all.iter();
        for id in &kept {
            prop_assert!(cursor.any(|x| x == id), "{:?} is not a subsequence of {:?}", kept, all);
        }
    }

    #[test]
    fn blank_search_keeps_all(catalog in catalog(), locale in locale(), blanks in " {0,4}") {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        prop_assert_eq!(engine.filter(&catalog, &blanks, locale).unwrap().len(), catalog.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Memoization and price order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cached_equals_fresh(
        catalog in catalog(),
        queries in proptest::collection::vec((search(), sort_key(), locale()), 1..8),
    ) {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let mut cache = QueryCache::new(3);
        for (term, key, locale) in queries {
            let query = Query::new(locale).search(term).sort(key);
            let fresh = ids(&engine.run(&catalog, &query).unwrap());
            let cached = ids(&cache.run(&engine, &catalog, &query).unwrap());
            prop_assert_eq!(fresh, cached);
        }
    }

    #[test]
    fn price_order_is_non_decreasing(catalog in catalog()) {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let sorted = engine.sort(catalog.iter().collect(), SortKey::Price, "en").unwrap();
        prop_assert!(sorted.windows(2).all(|w| w[0].price.amount <= w[1].price.amount));
    }
}

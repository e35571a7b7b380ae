#![forbid(unsafe_code)]

//! Memoized query results with revision-based invalidation.
//!
//! Results are stored as ordered item ids keyed by (search, sort key,
//! locale). Each entry is stamped with the [`Catalog::revision`] it was
//! computed against; an entry whose stamp differs from the catalog being
//! queried is a miss and is replaced lazily. This keeps invalidation O(1)
//! and makes it impossible to serve results computed for other contents.
//!
//! The cache is owned by the caller and passed as `&mut`; there is no
//! global instance. Entries do not record which engine produced them, so
//! use one cache per engine configuration (registry and translations).

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;
use vitrine_i18n::canonicalize;

use crate::error::Result;
use crate::item::{Catalog, CatalogItem};
use crate::query::{CatalogQueryEngine, Query, SortKey};

/// Statistics for the query cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries found but computed for another catalog revision.
    pub stale: u64,
    pub size: usize,
    pub capacity: usize,
}

impl QueryCacheStats {
    /// Hit rate as a fraction (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    search: String,
    sort: SortKey,
    locale: String,
}

impl QueryKey {
    fn new(query: &Query) -> Self {
        Self {
            search: query.search.trim().to_string(),
            sort: query.sort,
            locale: canonicalize(&query.locale),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedIds {
    ids: Vec<u64>,
    revision: u64,
}

/// LRU memo of query results.
#[derive(Debug)]
pub struct QueryCache {
    cache: LruCache<QueryKey, CachedIds>,
    stats: QueryCacheStats,
}

impl QueryCache {
    /// Create a cache holding up to `capacity` queries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            stats: QueryCacheStats {
                capacity: capacity.get(),
                ..QueryCacheStats::default()
            },
        }
    }

    /// Run `query` against `catalog`, reusing a memoized result when it was
    /// computed for the same catalog revision.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CatalogQueryEngine::run`]. Failed queries are
    /// not cached.
    pub fn run<'c>(
        &mut self,
        engine: &CatalogQueryEngine<'_>,
        catalog: &'c Catalog,
        query: &Query,
    ) -> Result<Vec<&'c CatalogItem>> {
        let key = QueryKey::new(query);

        if let Some(entry) = self.cache.get(&key) {
            if entry.revision == catalog.revision() {
                self.stats.hits += 1;
                debug!(search = %key.search, sort = %key.sort, locale = %key.locale, "query cache hit");
                return Ok(entry.ids.iter().filter_map(|id| catalog.get(*id)).collect());
            }
            self.stats.stale += 1;
            debug!(
                cached = entry.revision,
                current = catalog.revision(),
                "query cache entry is stale"
            );
        }

        self.stats.misses += 1;
        let items = engine.run(catalog, query)?;
        self.cache.put(
            key,
            CachedIds {
                ids: items.iter().map(|item| item.id).collect(),
                revision: catalog.revision(),
            },
        );
        self.stats.size = self.cache.len();
        Ok(items)
    }

    /// Drop every entry. Statistics other than capacity are reset.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats = QueryCacheStats {
            capacity: self.stats.capacity,
            ..QueryCacheStats::default()
        };
    }

    #[must_use]
    pub fn stats(&self) -> QueryCacheStats {
        QueryCacheStats {
            size: self.cache.len(),
            ..self.stats
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Price;
    use vitrine_i18n::LocaleRegistry;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new(1, "Mouse", Price::new(30.0, "USD"), "electronics"),
            CatalogItem::new(2, "Lamp", Price::new(45.0, "USD"), "office"),
            CatalogItem::new(3, "Hub", Price::new(50.0, "USD"), "electronics"),
        ])
        .unwrap()
    }

    fn ids(items: &[&CatalogItem]) -> Vec<u64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn second_run_hits() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(4);
        let query = Query::new("en").sort(SortKey::Name);

        let first = ids(&cache.run(&engine, &catalog, &query).unwrap());
        let second = ids(&cache.run(&engine, &catalog, &query).unwrap());
        assert_eq!(first, vec![3, 2, 1]);
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn equivalent_queries_share_an_entry() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(4);
        cache.run(&engine, &catalog, &Query::new("de_ch").search(" lamp ")).unwrap();
        cache.run(&engine, &catalog, &Query::new("de-CH").search("lamp")).unwrap();
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn catalog_change_invalidates() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let mut catalog = catalog();
        let mut cache = QueryCache::new(4);
        let query = Query::new("en").search("electronics").sort(SortKey::Price);

        assert_eq!(ids(&cache.run(&engine, &catalog, &query).unwrap()), vec![1, 3]);
        catalog
            .insert(CatalogItem::new(4, "Webcam", Price::new(80.0, "USD"), "electronics"))
            .unwrap();
        assert_eq!(ids(&cache.run(&engine, &catalog, &query).unwrap()), vec![1, 3, 4]);
        assert_eq!(cache.stats().stale, 1);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn errors_are_not_cached() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(4);
        assert!(cache.run(&engine, &catalog, &Query::new("xx")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_is_at_least_one() {
        let cache = QueryCache::new(0);
        assert_eq!(cache.stats().capacity, 1);
    }

    #[test]
    fn lru_evicts_oldest() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(2);
        for term in ["a", "b", "c"] {
            cache.run(&engine, &catalog, &Query::new("en").search(term)).unwrap();
        }
        assert_eq!(cache.len(), 2);
        cache.run(&engine, &catalog, &Query::new("en").search("a")).unwrap();
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn clear_resets_stats() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(3);
        cache.run(&engine, &catalog, &Query::new("en")).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), QueryCacheStats { capacity: 3, ..Default::default() });
    }

    #[test]
    #[tracing_test::traced_test]
    fn hits_are_logged() {
        let registry = LocaleRegistry::builtin();
        let engine = CatalogQueryEngine::new(&registry);
        let catalog = catalog();
        let mut cache = QueryCache::new(2);
        let query = Query::new("en");
        cache.run(&engine, &catalog, &query).unwrap();
        cache.run(&engine, &catalog, &query).unwrap();
        assert!(logs_contain("query cache hit"));
    }
}

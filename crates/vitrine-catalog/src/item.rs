#![forbid(unsafe_code)]

//! Catalog items and the catalog collection.
//!
//! # Invariants
//!
//! 1. **Unique ids**: a [`Catalog`] never holds two items with the same id.
//! 2. **Fresh revisions**: every constructed or modified catalog carries a
//!    revision no other catalog in the process has had, so cached query
//!    results keyed by revision can never be served for different contents.
//! 3. **Canonical override keys**: description override keys are stored as
//!    canonical locale codes (`de_ch` becomes `de-CH`).

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use vitrine_format::Address;
use vitrine_i18n::{Locale, canonicalize};

use crate::error::{CatalogError, Result};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// An amount in an ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    #[must_use]
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// One product in locale-invariant form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub name: String,
    pub price: Price,
    /// Raw category identifier, e.g. `"electronics"`.
    pub category: String,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub address: Address,
    /// Canonical description.
    #[serde(default)]
    pub description: String,
    /// Locale code → localized description.
    #[serde(default)]
    pub description_overrides: BTreeMap<String, String>,
}

impl CatalogItem {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, price: Price, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
            recommended: false,
            address: Address::default(),
            description: String::new(),
            description_overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn recommended(mut self, recommended: bool) -> Self {
        self.recommended = recommended;
        self
    }

    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a localized description for `locale`.
    #[must_use]
    pub fn description_override(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.description_overrides.insert(canonicalize(locale), text.into());
        self
    }

    /// Description for `locale`: exact override, then base-language
    /// override, then the canonical description.
    #[must_use]
    pub fn description_for(&self, locale: &Locale) -> &str {
        self.description_overrides
            .get(locale.code())
            .or_else(|| self.description_overrides.get(locale.language()))
            .map_or(self.description.as_str(), String::as_str)
    }

    fn canonicalize_overrides(&mut self) {
        if self.description_overrides.keys().all(|k| canonicalize(k) == *k) {
            return;
        }
        let overrides = std::mem::take(&mut self.description_overrides);
        self.description_overrides = overrides
            .into_iter()
            .map(|(k, v)| (canonicalize(&k), v))
            .collect();
    }
}

/// Ordered, id-unique collection of items.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<u64, usize>,
    revision: u64,
}

impl Catalog {
    /// Build a catalog, preserving item order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItemId`] for the first repeated id.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self> {
        let mut catalog = Self {
            items: Vec::with_capacity(items.len()),
            index: HashMap::with_capacity(items.len()),
            revision: 0,
        };
        for item in items {
            catalog.push(item)?;
        }
        catalog.revision = next_revision();
        Ok(catalog)
    }

    /// Parse a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] on malformed JSON and
    /// [`CatalogError::DuplicateItemId`] on repeated ids.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let items: Vec<CatalogItem> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                what: "catalog",
                source,
            })?;
        Self::new(items)
    }

    fn push(&mut self, mut item: CatalogItem) -> Result<()> {
        if self.index.contains_key(&item.id) {
            return Err(CatalogError::DuplicateItemId { id: item.id });
        }
        item.canonicalize_overrides();
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Append an item. Bumps the revision.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItemId`] if the id is taken; the
    /// catalog is unchanged.
    pub fn insert(&mut self, item: CatalogItem) -> Result<()> {
        self.push(item)?;
        self.revision = next_revision();
        Ok(())
    }

    /// Remove an item by id. Bumps the revision when something was removed.
    pub fn remove(&mut self, id: u64) -> Option<CatalogItem> {
        let position = self.index.remove(&id)?;
        let item = self.items.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.revision = next_revision();
        Some(item)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&CatalogItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identity of this catalog's contents, for cache invalidation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

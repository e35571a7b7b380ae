#![forbid(unsafe_code)]

//! Catalog querying and localized view models for Vitrine.
//!
//! # Pipeline
//!
//! ```text
//! Catalog + Query ──► CatalogQueryEngine::run ──► ordered &CatalogItem
//!                          (filter, then sort)          │
//!                                                       ▼
//!                            ViewRenderer ──► CatalogView { items: Vec<ItemView>, .. }
//! ```
//!
//! The shell owns the [`Catalog`], the translation table, and optionally a
//! [`QueryCache`]; everything here borrows them immutably except the cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod item;
pub mod query;
pub mod view;

pub use cache::{QueryCache, QueryCacheStats};
pub use config::ViewConfig;
pub use error::{CatalogError, Result};
pub use item::{Catalog, CatalogItem, Price};
pub use query::{CatalogQueryEngine, Query, SortKey};
pub use view::{CatalogView, ItemView, ViewRenderer};

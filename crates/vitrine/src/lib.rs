#![forbid(unsafe_code)]

//! Vitrine public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a prelude
//! for shells that only need to render a localized catalog view.

// --- Locale re-exports -----------------------------------------------------

pub use vitrine_i18n::{
    DEFAULT_LOCALE, I18nError, Locale, LocaleRegistry, LocaleStrings, Origin, PluralCategory,
    PluralRuleEngine, PluralRuleSet, Resolved, TextDirection, TranslationResolver,
    TranslationTable, WordSegmentation,
};

// --- Text re-exports -------------------------------------------------------

pub use vitrine_text::{BreakMode, CaseRules, Collator, TextError, TruncationOutcome};

// --- Format re-exports -----------------------------------------------------

pub use vitrine_format::{
    Address, AddressFormatter, CurrencyFormatter, FormatError, FormattedAddress, NegativePolicy,
    NumberFormatter, TextTruncator,
};

// --- Catalog re-exports ----------------------------------------------------

pub use vitrine_catalog::{
    Catalog, CatalogItem, CatalogQueryEngine, CatalogView, ItemView, Price, Query, QueryCache,
    SortKey, ViewConfig, ViewRenderer,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type; every lower-level error converts into it.
pub use vitrine_catalog::CatalogError as Error;

/// Standard result type for Vitrine APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Address, Catalog, CatalogItem, CatalogView, Error, ItemView, LocaleRegistry, Price, Query,
        QueryCache, Result, SortKey, TranslationTable, ViewConfig, ViewRenderer,
    };

    pub use crate::{catalog, format, i18n, text};
}

pub use vitrine_catalog as catalog;
pub use vitrine_format as format;
pub use vitrine_i18n as i18n;
pub use vitrine_text as text;

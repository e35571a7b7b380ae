#![forbid(unsafe_code)]

//! Bundled storefront fixture and translations.
//!
//! Everything is compiled in with `include_str!` so the demo runs from any
//! working directory.

use vitrine::{Catalog, Result, TranslationTable};

/// Shipped translation files, keyed by locale code.
pub const TRANSLATIONS: [(&str, &str); 8] = [
    ("en", include_str!("../locales/en.json")),
    ("de", include_str!("../locales/de.json")),
    ("tr", include_str!("../locales/tr.json")),
    ("ar", include_str!("../locales/ar.json")),
    ("fr", include_str!("../locales/fr.json")),
    ("ja", include_str!("../locales/ja.json")),
    ("ru", include_str!("../locales/ru.json")),
    ("pl", include_str!("../locales/pl.json")),
];

const CATALOG: &str = include_str!("../data/catalog.json");

/// Load every shipped translation file.
pub fn translations() -> Result<TranslationTable> {
    let mut table = TranslationTable::new();
    for (locale, json) in TRANSLATIONS {
        table.load_json(locale, json)?;
    }
    Ok(table)
}

/// The eight-item storefront catalog.
pub fn catalog() -> Result<Catalog> {
    Catalog::from_json_str(CATALOG)
}

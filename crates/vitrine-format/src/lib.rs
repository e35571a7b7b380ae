#![forbid(unsafe_code)]

//! Locale-aware value formatting for Vitrine.
//!
//! Every formatter borrows a [`LocaleRegistry`](vitrine_i18n::LocaleRegistry)
//! and validates the locale it is given. Country and currency conventions
//! come from data tables with a mandatory default row, so adding a country
//! or currency is a table edit rather than a new branch.
//!
//! | Formatter | Keyed by |
//! |-----------|----------|
//! | [`AddressFormatter`] | the address's country |
//! | [`CurrencyFormatter`] | currency code (symbol) and locale (digits, separators) |
//! | [`NumberFormatter`] | locale |
//! | [`TextTruncator`] | locale word segmentation |

pub mod address;
pub mod currency;
pub mod error;
pub mod number;
pub mod truncate;

pub use address::{
    Address, AddressField, AddressFormatter, FormatOrder, FormattedAddress, PostalPlacement,
};
pub use currency::{CurrencyFormatter, CurrencyInfo, NegativePolicy, SymbolPlacement};
pub use error::{FormatError, Result};
pub use number::{DigitSet, NumberFormatter, NumberSymbols};
pub use truncate::TextTruncator;

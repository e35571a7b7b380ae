#![forbid(unsafe_code)]

//! Country-specific postal address formatting.
//!
//! The layout of an address depends on the country it is located in, never
//! on the viewer's locale: a Tokyo address reads postal-code-first for every
//! viewer.
//!
//! # Invariants
//!
//! 1. **Country decides**: two addresses with the same country always use
//!    the same field order.
//! 2. **Empty fields vanish**: an empty field contributes neither text nor a
//!    separator.
//! 3. **Unknown is visible**: a country missing from the table renders with
//!    the generic order and `verified == false`, never as a silent guess.
//!
//! # Example
//! ```
//! use vitrine_format::address::{Address, AddressField, AddressFormatter};
//! use vitrine_i18n::LocaleRegistry;
//!
//! let registry = LocaleRegistry::builtin();
//! let formatter = AddressFormatter::new(&registry);
//! let tokyo = Address::new("JP")
//!     .region("東京都")
//!     .locality("千代田区")
//!     .street("千代田1-1")
//!     .postal_code("100-0001");
//! let out = formatter.format(&tokyo, "en").unwrap();
//! assert_eq!(out.text, "〒100-0001 東京都千代田区千代田1-1");
//! assert_eq!(out.components[0], AddressField::PostalCode);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_i18n::LocaleRegistry;

use crate::error::Result;

/// One field of a postal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Street,
    Locality,
    Region,
    PostalCode,
}

/// Where the postal code sits relative to the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalPlacement {
    /// First, e.g. Japan.
    Leading,
    /// Last, as its own segment.
    Trailing,
    /// Directly before a field, joined by the postal joiner (`10115 Berlin`).
    Before(AddressField),
    /// Directly after a field, joined by the postal joiner (`IL 62704`).
    After(AddressField),
}

/// Coarse ordering of an address's country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOrder {
    /// Largest to smallest, led by the postal code.
    PostalFirst,
    /// Street first, postal code towards the end.
    PostalLast,
}

/// A postal address in locale-invariant form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub region: String,
    pub locality: String,
    pub street: String,
    pub postal_code: String,
}

impl Address {
    #[must_use]
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    #[must_use]
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    #[must_use]
    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = postal_code.into();
        self
    }

    /// Ordering derived from the country table.
    #[must_use]
    pub fn format_order(&self) -> FormatOrder {
        match country_format(&self.country).postal {
            PostalPlacement::Leading => FormatOrder::PostalFirst,
            _ => FormatOrder::PostalLast,
        }
    }

    fn field(&self, field: AddressField) -> &str {
        match field {
            AddressField::Street => self.street.trim(),
            AddressField::Locality => self.locality.trim(),
            AddressField::Region => self.region.trim(),
            AddressField::PostalCode => self.postal_code.trim(),
        }
    }
}

/// A rendered address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedAddress {
    pub text: String,
    /// `false` when the country had no table entry and the generic layout was used.
    pub verified: bool,
    /// Non-empty fields in rendered order.
    pub components: Vec<AddressField>,
}

#[derive(Debug)]
struct CountryFormat {
    country: &'static str,
    /// Non-postal fields in display order.
    order: &'static [AddressField],
    separator: &'static str,
    postal: PostalPlacement,
    postal_joiner: &'static str,
    postal_prefix: &'static str,
}

use AddressField::{Locality, Region, Street};

const GENERIC: CountryFormat = CountryFormat {
    country: "",
    order: &[Street, Locality, Region],
    separator: ", ",
    postal: PostalPlacement::Trailing,
    postal_joiner: ", ",
    postal_prefix: "",
};

const COUNTRIES: &[CountryFormat] = &[
    CountryFormat {
        country: "US",
        order: &[Street, Locality, Region],
        separator: ", ",
        postal: PostalPlacement::After(Region),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "JP",
        order: &[Region, Locality, Street],
        separator: "",
        postal: PostalPlacement::Leading,
        postal_joiner: " ",
        postal_prefix: "〒",
    },
    CountryFormat {
        country: "DE",
        order: &[Street, Locality],
        separator: ", ",
        postal: PostalPlacement::Before(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "FR",
        order: &[Street, Locality],
        separator: ", ",
        postal: PostalPlacement::Before(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "GB",
        order: &[Street, Locality],
        separator: ", ",
        postal: PostalPlacement::After(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "TR",
        order: &[Street, Locality, Region],
        separator: ", ",
        postal: PostalPlacement::Before(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "CH",
        order: &[Street, Locality],
        separator: ", ",
        postal: PostalPlacement::Before(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
    CountryFormat {
        country: "SA",
        order: &[Street, Locality, Region],
        separator: ", ",
        postal: PostalPlacement::After(Locality),
        postal_joiner: " ",
        postal_prefix: "",
    },
];

fn lookup_country(country: &str) -> Option<&'static CountryFormat> {
    let country = country.trim();
    COUNTRIES
        .iter()
        .find(|f| f.country.eq_ignore_ascii_case(country))
}

fn country_format(country: &str) -> &'static CountryFormat {
    lookup_country(country).unwrap_or(&GENERIC)
}

impl CountryFormat {
    /// Full field order with the postal code placed.
    fn layout(&self) -> Vec<AddressField> {
        let mut fields = self.order.to_vec();
        let at = match self.postal {
            PostalPlacement::Leading => Some(0),
            PostalPlacement::Trailing => None,
            PostalPlacement::Before(anchor) => fields.iter().position(|f| *f == anchor),
            PostalPlacement::After(anchor) => fields.iter().position(|f| *f == anchor).map(|i| i + 1),
        };
        match at {
            Some(i) => fields.insert(i, AddressField::PostalCode),
            None => fields.push(AddressField::PostalCode),
        }
        fields
    }

    /// Whether the postal code binds to `neighbor` with the postal joiner.
    fn binds_postal_to(&self, neighbor: AddressField) -> bool {
        match self.postal {
            PostalPlacement::Leading | PostalPlacement::Trailing => true,
            PostalPlacement::Before(anchor) | PostalPlacement::After(anchor) => anchor == neighbor,
        }
    }

    fn joiner(&self, left: AddressField, right: AddressField) -> &'static str {
        let postal_pair = match (left, right) {
            (AddressField::PostalCode, other) | (other, AddressField::PostalCode) => {
                self.binds_postal_to(other)
            }
            _ => false,
        };
        if postal_pair {
            self.postal_joiner
        } else {
            self.separator
        }
    }
}

/// Renders [`Address`] values using the country table.
#[derive(Debug, Clone, Copy)]
pub struct AddressFormatter<'a> {
    registry: &'a LocaleRegistry,
}

impl<'a> AddressFormatter<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self { registry }
    }

    /// Render `address`. The locale is validated but does not affect layout.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::Locale` when `locale` is not registered.
    pub fn format(&self, address: &Address, locale: &str) -> Result<FormattedAddress> {
        self.registry.get(locale)?;

        let (format, verified) = match lookup_country(&address.country) {
            Some(format) => (format, true),
            None => {
                debug!(country = %address.country, "no address format for country; using generic layout");
                (&GENERIC, false)
            }
        };

        let mut text = String::new();
        let mut components = Vec::with_capacity(4);
        for field in format.layout() {
            let value = address.field(field);
            if value.is_empty() {
                continue;
            }
            if let Some(&prev) = components.last() {
                text.push_str(format.joiner(prev, field));
            }
            if field == AddressField::PostalCode {
                text.push_str(format.postal_prefix);
            }
            text.push_str(value);
            components.push(field);
        }

        Ok(FormattedAddress {
            text,
            verified,
            components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_i18n::I18nError;

    use crate::error::FormatError;

    fn fmt(address: &Address) -> FormattedAddress {
        let registry = LocaleRegistry::builtin();
        AddressFormatter::new(&registry).format(address, "en").unwrap()
    }

    fn springfield() -> Address {
        Address::new("US")
            .street("742 Evergreen Terrace")
            .locality("Springfield")
            .region("IL")
            .postal_code("62704")
    }

    #[test]
    fn us_layout() {
        let out = fmt(&springfield());
        assert_eq!(out.text, "742 Evergreen Terrace, Springfield, IL 62704");
        assert!(out.verified);
        assert_eq!(
            out.components,
            vec![Street, Locality, Region, AddressField::PostalCode]
        );
    }

    #[test]
    fn jp_layout_is_postal_first() {
        let address = Address::new("JP")
            .region("東京都")
            .locality("渋谷区")
            .street("神南1-2-3")
            .postal_code("150-0041");
        let out = fmt(&address);
        assert_eq!(out.text, "〒150-0041 東京都渋谷区神南1-2-3");
        assert_eq!(
            out.components,
            vec![AddressField::PostalCode, Region, Locality, Street]
        );
        assert_eq!(address.format_order(), FormatOrder::PostalFirst);
    }

    #[test]
    fn de_postal_before_locality() {
        let address = Address::new("DE")
            .street("Unter den Linden 5")
            .locality("Berlin")
            .region("Berlin")
            .postal_code("10117");
        let out = fmt(&address);
        assert_eq!(out.text, "Unter den Linden 5, 10117 Berlin");
        assert_eq!(address.format_order(), FormatOrder::PostalLast);
    }

    #[test]
    fn gb_postal_after_locality() {
        let address = Address::new("gb")
            .street("221B Baker Street")
            .locality("London")
            .postal_code("NW1 6XE");
        assert_eq!(fmt(&address).text, "221B Baker Street, London NW1 6XE");
    }

    #[test]
    fn layout_ignores_viewer_locale() {
        let registry = LocaleRegistry::builtin();
        let formatter = AddressFormatter::new(&registry);
        let en = formatter.format(&springfield(), "en").unwrap();
        let ja = formatter.format(&springfield(), "ja").unwrap();
        let ar = formatter.format(&springfield(), "ar").unwrap();
        assert_eq!(en, ja);
        assert_eq!(en, ar);
    }

    #[test]
    fn empty_fields_are_skipped() {
        let address = Address::new("US").street("1 Main St").postal_code("10001");
        let out = fmt(&address);
        // Region anchor is empty, so the postal code stands as its own segment.
        assert_eq!(out.text, "1 Main St, 10001");
        assert_eq!(out.components, vec![Street, AddressField::PostalCode]);
    }

    #[test]
    fn unknown_country_uses_generic_order() {
        let address = Address::new("BR")
            .street("Av. Paulista 1000")
            .locality("São Paulo")
            .region("SP")
            .postal_code("01310-100");
        let out = fmt(&address);
        assert_eq!(out.text, "Av. Paulista 1000, São Paulo, SP, 01310-100");
        assert!(!out.verified);
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_country_is_logged() {
        fmt(&Address::new("ZZ").street("x"));
        assert!(logs_contain("no address format for country"));
    }

    #[test]
    fn unsupported_locale_is_error() {
        let registry = LocaleRegistry::builtin();
        let err = AddressFormatter::new(&registry)
            .format(&springfield(), "xx")
            .unwrap_err();
        assert!(matches!(err, FormatError::Locale(I18nError::UnsupportedLocale { .. })));
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let address: Address =
            serde_json::from_str(r#"{"country": "FR", "locality": "Paris", "postal_code": "75001"}"#)
                .unwrap();
        assert_eq!(fmt(&address).text, "75001 Paris");
    }
}

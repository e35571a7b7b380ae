#![forbid(unsafe_code)]

//! Currency amount formatting.
//!
//! The currency decides the symbol, its placement, and the number of minor
//! digits; the locale decides digits and separators. `1234.56 USD` renders
//! as `$1,234.56` in `en` and `$1.234,56` in `de`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | NaN or infinite amount | Bad upstream data | `FormatError::InvalidAmount` |
//! | Magnitude above 10^15 | Bad upstream data | `FormatError::InvalidAmount` |
//! | Negative amount under `NegativePolicy::Reject` | Catalog prices | `FormatError::InvalidAmount` |
//! | Code outside the currency table | Unknown ISO 4217 code | `FormatError::UnsupportedCurrency` |
//! | Unregistered locale | Caller bug | `FormatError::Locale` |

use vitrine_i18n::LocaleRegistry;

use crate::error::{FormatError, Result};
use crate::number::{NumberFormatter, NumberSymbols};

/// Largest magnitude accepted; beyond this `f64` no longer represents
/// every cent exactly.
pub const MAX_AMOUNT: f64 = 1e15;

const NBSP: &str = "\u{00A0}";

/// Side of the number the currency symbol goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    Prefix,
    Suffix,
}

/// Display conventions of one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub placement: SymbolPlacement,
    /// Separate symbol and number with a no-break space.
    pub spaced: bool,
    pub minor_digits: usize,
}

const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", placement: SymbolPlacement::Prefix, spaced: false, minor_digits: 2 },
    CurrencyInfo { code: "EUR", symbol: "€", placement: SymbolPlacement::Suffix, spaced: true, minor_digits: 2 },
    CurrencyInfo { code: "GBP", symbol: "£", placement: SymbolPlacement::Prefix, spaced: false, minor_digits: 2 },
    CurrencyInfo { code: "JPY", symbol: "¥", placement: SymbolPlacement::Prefix, spaced: false, minor_digits: 0 },
    CurrencyInfo { code: "CHF", symbol: "CHF", placement: SymbolPlacement::Prefix, spaced: true, minor_digits: 2 },
    CurrencyInfo { code: "TRY", symbol: "₺", placement: SymbolPlacement::Prefix, spaced: false, minor_digits: 2 },
    CurrencyInfo { code: "SAR", symbol: "ر.س", placement: SymbolPlacement::Suffix, spaced: true, minor_digits: 2 },
];

impl CurrencyInfo {
    /// Table entry for an ISO 4217 code (case-insensitive).
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
        let code = code.trim();
        CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

/// Whether negative amounts are formatted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativePolicy {
    #[default]
    Allow,
    Reject,
}

/// Formats amounts of money for a locale.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormatter<'a> {
    numbers: NumberFormatter<'a>,
    negative: NegativePolicy,
}

impl<'a> CurrencyFormatter<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self {
            numbers: NumberFormatter::new(registry),
            negative: NegativePolicy::default(),
        }
    }

    #[must_use]
    pub fn negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.negative = policy;
        self
    }

    /// Format `amount` of `currency` for `locale`.
    ///
    /// Rounds half away from zero to the currency's minor digits, using the
    /// shortest decimal representation of `amount` (so `1.005` rounds up).
    ///
    /// # Errors
    ///
    /// See the module-level failure table.
    pub fn format(&self, amount: f64, currency: &str, locale: &str) -> Result<String> {
        let info = CurrencyInfo::lookup(currency).ok_or_else(|| FormatError::UnsupportedCurrency {
            code: currency.to_string(),
        })?;
        let symbols = self.numbers.symbols(locale)?;
        self.check_amount(amount)?;

        let (integer, fraction) = round_half_away(amount.abs(), info.minor_digits);
        let is_zero = integer.bytes().chain(fraction.bytes()).all(|b| b == b'0');
        let negative = amount < 0.0 && !is_zero;

        Ok(render(symbols, info, &integer, &fraction, negative))
    }

    fn check_amount(&self, amount: f64) -> Result<()> {
        let reason = if !amount.is_finite() {
            "not finite"
        } else if amount.abs() > MAX_AMOUNT {
            "magnitude exceeds 10^15"
        } else if amount < 0.0 && self.negative == NegativePolicy::Reject {
            "negative amounts are not allowed"
        } else {
            return Ok(());
        };
        Err(FormatError::InvalidAmount { amount, reason })
    }
}

fn render(
    symbols: &NumberSymbols,
    info: &CurrencyInfo,
    integer: &str,
    fraction: &str,
    negative: bool,
) -> String {
    let number = symbols.format_decimal(integer, fraction);
    let space = if info.spaced { NBSP } else { "" };
    let mut out = String::with_capacity(number.len() + info.symbol.len() + 8);
    if negative {
        out.push_str(symbols.minus);
    }
    match info.placement {
        SymbolPlacement::Prefix => {
            out.push_str(info.symbol);
            out.push_str(space);
            out.push_str(&number);
        }
        SymbolPlacement::Suffix => {
            out.push_str(&number);
            out.push_str(space);
            out.push_str(info.symbol);
        }
    }
    out
}

/// Round a finite, non-negative value to `digits` fraction digits, half away
/// from zero, returning ASCII integer and fraction digit strings.
fn round_half_away(value: f64, digits: usize) -> (String, String) {
    // `Display` for f64 yields the shortest round-trip decimal, never exponent form.
    let repr = value.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut all: Vec<u8> = int_part.bytes().collect();
    let keep = frac_part.len().min(digits);
    all.extend_from_slice(&frac_part.as_bytes()[..keep]);
    all.extend(std::iter::repeat_n(b'0', digits - keep));

    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut i = all.len();
        loop {
            if i == 0 {
                all.insert(0, b'1');
                break;
            }
            i -= 1;
            if all[i] == b'9' {
                all[i] = b'0';
            } else {
                all[i] += 1;
                break;
            }
        }
    }

    let split = all.len() - digits;
    let fraction = String::from_utf8_lossy(&all[split..]).into_owned();
    all.truncate(split);
    (String::from_utf8_lossy(&all).into_owned(), fraction)
}

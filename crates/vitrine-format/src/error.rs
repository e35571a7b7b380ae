use thiserror::Error;
use vitrine_i18n::I18nError;
use vitrine_text::TextError;

pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors from value formatting.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Locale(#[from] I18nError),

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: f64, reason: &'static str },

    #[error("unsupported currency: {code}")]
    UnsupportedCurrency { code: String },

    #[error(transparent)]
    Text(#[from] TextError),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, I18nError>;

/// Errors from locale and translation operations.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("unsupported locale: {code}")]
    UnsupportedLocale { code: String },

    #[error("invalid locale registry: {reason}")]
    InvalidRegistry { reason: String },

    #[error("failed to parse translations for '{locale}': {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

impl I18nError {
    #[must_use]
    pub fn unsupported(code: impl Into<String>) -> Self {
        Self::UnsupportedLocale { code: code.into() }
    }

    #[must_use]
    pub fn invalid_registry(reason: impl Into<String>) -> Self {
        Self::InvalidRegistry {
            reason: reason.into(),
        }
    }
}

use thiserror::Error;
use vitrine_format::FormatError;
use vitrine_i18n::I18nError;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors from catalog construction, querying, and view assembly.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Locale(#[from] I18nError),

    #[error("duplicate catalog item id: {id}")]
    DuplicateItemId { id: u64 },

    #[error("unknown sort key: {key}")]
    UnknownSortKey { key: String },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid view config: {reason}")]
    Config { reason: String },
}

impl CatalogError {
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

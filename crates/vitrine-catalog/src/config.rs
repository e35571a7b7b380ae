#![forbid(unsafe_code)]

//! View configuration.
//!
//! # Sources
//!
//! | Source | Entry point |
//! |--------|-------------|
//! | Defaults | [`ViewConfig::default`] |
//! | Environment | [`ViewConfig::from_env`] / [`ViewConfig::from_env_with`] |
//! | JSON | [`ViewConfig::from_json_str`] (missing fields keep defaults) |
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `VITRINE_DESCRIPTION_MAX_LEN` | `description_max_len` |
//! | `VITRINE_ELLIPSIS` | `ellipsis` |
//! | `VITRINE_COUNT_KEY` | `count_key_prefix` |
//! | `VITRINE_CACHE_CAPACITY` | `cache_capacity` |
//!
//! Unparsable numbers are ignored (logged at `debug`) and the default is kept.

use serde::Deserialize;
use tracing::debug;
use vitrine_text::DEFAULT_ELLIPSIS;

use crate::error::{CatalogError, Result};

pub const ENV_DESCRIPTION_MAX_LEN: &str = "VITRINE_DESCRIPTION_MAX_LEN";
pub const ENV_ELLIPSIS: &str = "VITRINE_ELLIPSIS";
pub const ENV_COUNT_KEY: &str = "VITRINE_COUNT_KEY";
pub const ENV_CACHE_CAPACITY: &str = "VITRINE_CACHE_CAPACITY";

/// Knobs for view-model assembly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Maximum description length in grapheme clusters, ellipsis included.
    pub description_max_len: usize,
    pub ellipsis: String,
    /// Translation key prefix for the plural result count.
    pub count_key_prefix: String,
    /// Capacity of a [`QueryCache`](crate::QueryCache) built from this config.
    pub cache_capacity: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            description_max_len: 55,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            count_key_prefix: "itemFound".to_string(),
            cache_capacity: 32,
        }
    }
}

impl ViewConfig {
    /// Defaults overridden by `VITRINE_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ViewConfig::validated`].
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable lookup.
    ///
    /// # Errors
    ///
    /// See [`ViewConfig::validated`].
    pub fn from_env_with<F>(get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_usize(&get_env, ENV_DESCRIPTION_MAX_LEN) {
            config.description_max_len = value;
        }
        if let Some(value) = get_env(ENV_ELLIPSIS) {
            config.ellipsis = value;
        }
        if let Some(value) = get_env(ENV_COUNT_KEY)
            && !value.trim().is_empty()
        {
            config.count_key_prefix = value.trim().to_string();
        }
        if let Some(value) = parse_usize(&get_env, ENV_CACHE_CAPACITY) {
            config.cache_capacity = value;
        }

        config.validated()
    }

    /// Parse a JSON object; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] on malformed JSON, then see
    /// [`ViewConfig::validated`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            what: "view config",
            source,
        })?;
        config.validated()
    }

    /// Reject unusable values and clamp the cache capacity to at least one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] when `description_max_len` is zero
    /// or `count_key_prefix` is empty.
    pub fn validated(mut self) -> Result<Self> {
        if self.description_max_len == 0 {
            return Err(CatalogError::config("description_max_len must be at least 1"));
        }
        if self.count_key_prefix.is_empty() {
            return Err(CatalogError::config("count_key_prefix must not be empty"));
        }
        self.cache_capacity = self.cache_capacity.max(1);
        Ok(self)
    }
}

fn parse_usize<F>(get_env: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get_env(key)?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(key, value = %raw, "ignoring unparsable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.description_max_len, 55);
        assert_eq!(config.ellipsis, "…");
        assert_eq!(config.count_key_prefix, "itemFound");
        assert_eq!(config.cache_capacity, 32);
    }

    #[test]
    fn empty_env_gives_defaults() {
        assert_eq!(ViewConfig::from_env_with(env(&[])).unwrap(), ViewConfig::default());
    }

    #[test]
    fn env_overrides() {
        let config = ViewConfig::from_env_with(env(&[
            (ENV_DESCRIPTION_MAX_LEN, "40"),
            (ENV_ELLIPSIS, "..."),
            (ENV_COUNT_KEY, " resultCount "),
            (ENV_CACHE_CAPACITY, "0"),
        ]))
        .unwrap();
        assert_eq!(config.description_max_len, 40);
        assert_eq!(config.ellipsis, "...");
        assert_eq!(config.count_key_prefix, "resultCount");
        assert_eq!(config.cache_capacity, 1);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let config = ViewConfig::from_env_with(env(&[(ENV_DESCRIPTION_MAX_LEN, "long")])).unwrap();
        assert_eq!(config.description_max_len, 55);
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = ViewConfig::from_env_with(env(&[(ENV_DESCRIPTION_MAX_LEN, "0")])).unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn json_keeps_defaults_for_missing_fields() {
        let config = ViewConfig::from_json_str(r#"{"description_max_len": 80}"#).unwrap();
        assert_eq!(config.description_max_len, 80);
        assert_eq!(config.count_key_prefix, "itemFound");
    }

    #[test]
    fn json_errors() {
        assert!(matches!(
            ViewConfig::from_json_str("{"),
            Err(CatalogError::Parse { what: "view config", .. })
        ));
        assert!(matches!(
            ViewConfig::from_json_str(r#"{"count_key_prefix": ""}"#),
            Err(CatalogError::Config { .. })
        ));
    }
}

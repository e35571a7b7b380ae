#![forbid(unsafe_code)]

//! Locale-aware truncation.
//!
//! Chooses the break mode from the locale's word segmentation and delegates
//! to [`vitrine_text::truncate`]. Whitespace-segmented locales back off to
//! whole words; Japanese and other unsegmented scripts cut at grapheme
//! boundaries.

use vitrine_i18n::{LocaleRegistry, WordSegmentation};
use vitrine_text::{BreakMode, DEFAULT_ELLIPSIS, Truncated};

use crate::error::Result;

/// Truncates text for a locale with a configurable ellipsis.
#[derive(Debug, Clone)]
pub struct TextTruncator<'a> {
    registry: &'a LocaleRegistry,
    ellipsis: String,
}

impl<'a> TextTruncator<'a> {
    #[must_use]
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self {
            registry,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }

    #[must_use]
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    #[must_use]
    pub fn ellipsis(&self) -> &str {
        &self.ellipsis
    }

    /// Break mode for a registered locale.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::Locale` when `locale` is not registered.
    pub fn break_mode(&self, locale: &str) -> Result<BreakMode> {
        Ok(match self.registry.get(locale)?.word_segmentation() {
            WordSegmentation::Whitespace => BreakMode::Word,
            WordSegmentation::None => BreakMode::Grapheme,
        })
    }

    /// Shorten `text` to at most `max_length` grapheme clusters, ellipsis included.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::Locale` for an unregistered locale and
    /// `FormatError::Text` when `max_length` is zero.
    pub fn truncate(&self, text: &str, max_length: usize, locale: &str) -> Result<Truncated> {
        let mode = self.break_mode(locale)?;
        Ok(vitrine_text::truncate(text, max_length, mode, &self.ellipsis)?)
    }
}

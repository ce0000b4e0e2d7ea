//! Processor configuration.

use chrono::format::{Item, StrftimeItems};
use tabula_proto::DISPLAY_DATE_FORMAT;

use crate::error::Error;

/// Default date format for search coercion.
pub const DEFAULT_DATE_FORMAT: &str = DISPLAY_DATE_FORMAT;

/// Default compiled size limit for regex search terms (1 MiB).
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Configuration for a [`Processor`](crate::Processor).
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// strftime pattern used to render timestamps before they are searched.
    pub date_format: String,

    /// Upper bound on the compiled size of a regex search term.
    /// Terms exceeding it fail like malformed patterns.
    pub regex_size_limit: usize,

    /// Whether a negative page length returns every row from `start`.
    pub allow_unbounded_length: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            allow_unbounded_length: true,
        }
    }
}

impl ProcessorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date format.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the regex size limit.
    pub fn regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Set whether negative page lengths mean "all rows".
    pub fn allow_unbounded_length(mut self, allow: bool) -> Self {
        self.allow_unbounded_length = allow;
        self
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> Result<(), Error> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }
}

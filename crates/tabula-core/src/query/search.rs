//! Global and column-specific search.
//!
//! Search terms are compiled once per request into [`TermMatcher`]s and then
//! evaluated against each record's display strings. A record survives when it
//! matches the global term on any searchable column and every column that
//! carries its own term.

use regex::{Regex, RegexBuilder};
use tabula_proto::{Request, Search};

use crate::config::ProcessorConfig;
use crate::error::Error;
use crate::model::{FieldAccessor, Record};

/// A compiled search term.
#[derive(Debug, Clone)]
pub enum TermMatcher {
    /// Case-insensitive regex search anywhere in the value.
    Regex(Regex),
    /// Case-insensitive substring; holds the lowercased needle.
    Substring(String),
}

impl TermMatcher {
    /// Compile a search term.
    pub fn compile(search: &Search, config: &ProcessorConfig) -> Result<Self, Error> {
        if !search.regex {
            return Ok(TermMatcher::Substring(search.value.to_lowercase()));
        }

        RegexBuilder::new(&search.value)
            .case_insensitive(true)
            .size_limit(config.regex_size_limit)
            .build()
            .map(TermMatcher::Regex)
            .map_err(|source| Error::InvalidPattern {
                pattern: search.value.clone(),
                source,
            })
    }

    /// Test a display string against the term.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            TermMatcher::Regex(re) => re.is_match(value),
            TermMatcher::Substring(needle) => value.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Search terms of one request, compiled and resolved to field names.
#[derive(Debug)]
pub struct SearchFilter<'r> {
    global: Option<(TermMatcher, Vec<&'r str>)>,
    columns: Vec<(&'r str, TermMatcher)>,
    date_format: &'r str,
}

impl<'r> SearchFilter<'r> {
    /// Compile the global and per-column terms of `request`.
    ///
    /// Only searchable columns take part. Empty terms are ignored, and a
    /// global term with no searchable column to test is ignored too.
    pub fn compile<P>(request: &'r Request<P>, config: &'r ProcessorConfig) -> Result<Self, Error> {
        let searchable: Vec<_> = request.columns.iter().filter(|c| c.searchable).collect();

        let global = match request.global_search() {
            Some(search) if !searchable.is_empty() => Some((
                TermMatcher::compile(search, config)?,
                searchable.iter().map(|c| c.name.as_str()).collect(),
            )),
            _ => None,
        };

        let columns = searchable
            .iter()
            .filter_map(|c| c.search_term().map(|term| (c.name.as_str(), term)))
            .map(|(name, term)| TermMatcher::compile(term, config).map(|m| (name, m)))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            global,
            columns,
            date_format: &config.date_format,
        })
    }

    /// Whether the global filter does anything.
    pub fn has_global(&self) -> bool {
        self.global.is_some()
    }

    /// Whether the column filter does anything.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Global filter: the term matches at least one searchable column.
    pub fn matches_global<T: Record>(&self, record: &T, accessor: &FieldAccessor<T>) -> bool {
        match &self.global {
            Some((matcher, fields)) => fields
                .iter()
                .any(|field| self.field_matches(record, accessor, field, matcher)),
            None => true,
        }
    }

    /// Column filter: every column carrying a term matches it.
    pub fn matches_columns<T: Record>(&self, record: &T, accessor: &FieldAccessor<T>) -> bool {
        self.columns
            .iter()
            .all(|(field, matcher)| self.field_matches(record, accessor, field, matcher))
    }

    fn field_matches<T: Record>(
        &self,
        record: &T,
        accessor: &FieldAccessor<T>,
        field: &str,
        matcher: &TermMatcher,
    ) -> bool {
        let display = accessor.get(record, field).to_display_string(self.date_format);
        matcher.is_match(&display)
    }
}

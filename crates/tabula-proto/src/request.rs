//! Grid request types.
//!
//! A [`Request`] describes one draw of the grid: which window of rows to
//! return, how to order them and which search terms to apply. Field names
//! follow the grid's wire format so requests deserialize directly from the
//! JSON the client posts.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A search term, either global or attached to a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    /// Text to look for.
    #[serde(default)]
    pub value: String,
    /// Treat `value` as a case-insensitive regular expression.
    #[serde(default)]
    pub regex: bool,
}

impl Search {
    /// Create a plain, case-insensitive substring search.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            regex: false,
        }
    }

    /// Create a case-insensitive regular expression search.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            value: pattern.into(),
            regex: true,
        }
    }

    /// Check whether this term filters anything at all.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// One addressable column of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Key the column's values are published under in the client.
    #[serde(default)]
    pub data: String,
    /// Record field the column reads from.
    #[serde(default)]
    pub name: String,
    /// Whether search terms apply to this column.
    #[serde(default = "default_true")]
    pub searchable: bool,
    /// Whether the column may be used as a sort key.
    #[serde(default = "default_true")]
    pub orderable: bool,
    /// Column-specific search term.
    #[serde(default)]
    pub search: Option<Search>,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Create a searchable, orderable column reading field `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data: name.clone(),
            name,
            searchable: true,
            orderable: true,
            search: None,
        }
    }

    /// Set the output key.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set whether the column is searchable.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Set whether the column is orderable.
    pub fn orderable(mut self, orderable: bool) -> Self {
        self.orderable = orderable;
        self
    }

    /// Attach a column-specific search term.
    pub fn with_search(mut self, search: Search) -> Self {
        self.search = Some(search);
        self
    }

    /// The column's own search term, if it has a non-empty one.
    pub fn search_term(&self) -> Option<&Search> {
        self.search.as_ref().filter(|s| !s.is_empty())
    }
}

/// A sort directive referencing a column by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Index into the request's column list.
    pub column: usize,
    /// Direction token. Only `desc` (any case) sorts descending.
    #[serde(default)]
    pub dir: String,
}

impl Order {
    /// Create a directive with an arbitrary direction token.
    pub fn new(column: usize, dir: impl Into<String>) -> Self {
        Self {
            column,
            dir: dir.into(),
        }
    }

    /// Create an ascending directive.
    pub fn asc(column: usize) -> Self {
        Self::new(column, "asc")
    }

    /// Create a descending directive.
    pub fn desc(column: usize) -> Self {
        Self::new(column, "desc")
    }

    /// Whether this directive sorts descending.
    ///
    /// Any token other than `desc` is treated as ascending.
    pub fn is_descending(&self) -> bool {
        self.dir.eq_ignore_ascii_case("desc")
    }
}

/// A grid draw request.
///
/// `P` carries caller-defined parameters posted alongside the standard grid
/// fields (filters from the surrounding page, tenant ids and so on). It
/// defaults to `()` when the caller has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request<P = ()> {
    /// Draw counter echoed back in the response.
    #[serde(default)]
    pub draw: u64,
    /// Zero-based offset of the first row to return.
    #[serde(default)]
    pub start: i64,
    /// Number of rows to return. Negative means "all rows".
    #[serde(default)]
    pub length: i64,
    /// Sort directives, primary key first.
    #[serde(default)]
    pub order: Vec<Order>,
    /// Columns in client order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Global search term.
    #[serde(default)]
    pub search: Option<Search>,
    /// Caller-defined parameters.
    #[serde(default)]
    pub parameters: P,
}

impl Request {
    /// Create an empty request for the given draw.
    pub fn new(draw: u64) -> Self {
        Self {
            draw,
            start: 0,
            length: 0,
            order: vec![],
            columns: vec![],
            search: None,
            parameters: (),
        }
    }
}

impl<P> Request<P> {
    /// Set the pagination window.
    pub fn with_window(mut self, start: i64, length: i64) -> Self {
        self.start = start;
        self.length = length;
        self
    }

    /// Append a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append a sort directive.
    pub fn with_order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    /// Set the global search term.
    pub fn with_search(mut self, search: Search) -> Self {
        self.search = Some(search);
        self
    }

    /// Replace the caller-defined parameters.
    pub fn with_parameters<Q>(self, parameters: Q) -> Request<Q> {
        Request {
            draw: self.draw,
            start: self.start,
            length: self.length,
            order: self.order,
            columns: self.columns,
            search: self.search,
            parameters,
        }
    }

    /// The global search term, if it has a non-empty one.
    pub fn global_search(&self) -> Option<&Search> {
        self.search.as_ref().filter(|s| !s.is_empty())
    }
}

impl<P> Request<P>
where
    P: for<'de> Deserialize<'de> + Default,
{
    /// Parse a request from the grid's JSON wire format.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

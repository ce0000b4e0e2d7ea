//! Core error types.

use thiserror::Error;

/// Errors that abort processing of a grid request.
#[derive(Debug, Error)]
pub enum Error {
    /// A regex search term failed to compile.
    #[error("invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compilation failure.
        #[source]
        source: regex::Error,
    },

    /// An order directive references a column the request does not have.
    #[error("order references column {index}, but the request has {columns} columns")]
    ColumnOutOfRange {
        /// Referenced column index.
        index: usize,
        /// Number of columns in the request.
        columns: usize,
    },

    /// Two values of a sort column have no common ordering.
    #[error("cannot order column '{column}': {left} and {right} values are not comparable")]
    Incomparable {
        /// Column being sorted.
        column: String,
        /// Kind of the left-hand value.
        left: &'static str,
        /// Kind of the right-hand value.
        right: &'static str,
    },

    /// The page start lies beyond the filtered records.
    #[error("start offset {start} is out of range for {len} filtered records")]
    StartOutOfRange {
        /// Requested start.
        start: usize,
        /// Number of filtered records.
        len: usize,
    },

    /// The page start is negative.
    #[error("start offset {0} is negative")]
    NegativeStart(i64),

    /// A negative page length was requested while unbounded pages are disabled.
    #[error("page length {0} is negative and unbounded pages are disabled")]
    UnboundedLength(i64),

    /// The configured date format cannot be rendered.
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] tabula_proto::Error),
}

//! Query stages for grid requests.
//!
//! This module implements the row-processing pipeline: search, sort,
//! pagination and serialization, and the [`Processor`] that runs them in
//! order and assembles the response.

mod page;
mod processor;
mod search;
mod serialize;
mod sort;

pub use page::page;
pub use processor::{process, Processor};
pub use search::{SearchFilter, TermMatcher};
pub use serialize::{serialize_row, serialize_rows, RowHooks};
pub use sort::{compare_values, resolve_sort_keys, sort_records, SortKey};

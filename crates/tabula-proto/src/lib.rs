//! Tabula protocol types.
//!
//! This crate defines the values, requests and responses exchanged with a
//! server-side processed data grid.
//!
//! # Modules
//!
//! - [`value`] - Runtime value types for record fields
//! - [`request`] - Draw request: window, ordering, columns and search terms
//! - [`response`] - Draw response and the ordered row mapping
//! - [`error`] - Protocol error types
//!
//! # Serialization
//!
//! Requests derive `serde::Deserialize` using the grid's field names, and
//! responses serialize to the shape the grid expects:
//!
//! ```
//! use tabula_proto::{Request, Response};
//!
//! let request: Request = Request::from_json(r#"{"draw": 2, "start": 0, "length": 10}"#).unwrap();
//! let response = Response::ok(request.draw, vec![], 0, 0);
//! assert_eq!(
//!     response.to_json().unwrap(),
//!     r#"{"draw":2,"recordsTotal":0,"recordsFiltered":0,"data":[]}"#
//! );
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use request::{Column, Order, Request, Search};
pub use response::{Response, Row};
pub use value::{ToValue, Value, DISPLAY_DATE_FORMAT};

/// Key of the optional per-row id.
pub const ROW_ID_KEY: &str = "DT_RowId";

/// Key of the optional per-row CSS class.
pub const ROW_CLASS_KEY: &str = "DT_RowClass";

/// Key of the optional per-row data payload.
pub const ROW_DATA_KEY: &str = "DT_RowData";

/// Key of the optional per-row attribute payload.
pub const ROW_ATTR_KEY: &str = "DT_RowAttr";

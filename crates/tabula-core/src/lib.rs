//! Tabula Core - server-side processing for data grids.
//!
//! Given an in-memory slice of records and a grid [`Request`], the
//! [`Processor`] searches, orders, pages and serializes the records into a
//! [`Response`] with total and filtered counts.
//!
//! Records expose their fields through the [`Record`] trait, usually derived:
//!
//! ```
//! use tabula_core::{process, Record};
//! use tabula_core::proto::{Column, Order, Request};
//!
//! #[derive(Record)]
//! struct Invoice {
//!     pub number: i32,
//!     pub customer: String,
//! }
//!
//! let invoices = vec![
//!     Invoice { number: 2, customer: "Globex".into() },
//!     Invoice { number: 1, customer: "Initech".into() },
//! ];
//! let request = Request::new(1)
//!     .with_column(Column::new("number"))
//!     .with_column(Column::new("customer"))
//!     .with_order(Order::asc(0))
//!     .with_window(0, 10);
//!
//! let response = process(&invoices, &request);
//! assert_eq!(response.records_total, 2);
//! assert_eq!(response.data[0].get("customer").and_then(|v| v.as_str()), Some("Initech"));
//! ```

extern crate self as tabula_core;

pub mod config;
pub mod error;
pub mod model;
pub mod query;

pub use config::{ProcessorConfig, DEFAULT_DATE_FORMAT, DEFAULT_REGEX_SIZE_LIMIT};
pub use error::Error;
pub use model::{
    fields_of, get_value, FieldAccessor, FieldDescriptor, Getter, Mappable, ModelRegistry, Record,
    RecordModel,
};
pub use query::{process, serialize_rows, Processor, RowHooks};

#[cfg(feature = "derive")]
pub use tabula_derive::Record;

/// Re-export protocol types.
pub use tabula_proto as proto;
pub use tabula_proto::{Request, Response, Row, ToValue, Value};

//! Record models and field access.
//!
//! Records describe their readable fields through the [`Record`] trait. The
//! [`ModelRegistry`] caches each type's field table and a [`FieldAccessor`]
//! that maps field names to getters, so the query stages can read any field
//! by the name a grid column carries.

mod accessor;
mod descriptor;
mod registry;

pub use accessor::{get_value, FieldAccessor};
pub use descriptor::{FieldDescriptor, Getter, Mappable, Record, RecordModel};
pub use registry::{fields_of, ModelRegistry};

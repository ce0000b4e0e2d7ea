//! Record model descriptors.
//!
//! A record type describes its readable fields once, as an ordered table of
//! names and getter functions. The table is usually generated with
//! `#[derive(Record)]` and is cached per type by the
//! [`ModelRegistry`](super::ModelRegistry).

use std::fmt;

use tabula_proto::Value;

/// Getter reading one field from a record.
pub type Getter<T> = fn(&T) -> Value;

/// A named, readable field of a record type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    getter: Getter<T>,
}

impl<T> FieldDescriptor<T> {
    /// Create a descriptor for field `name` read by `getter`.
    pub const fn new(name: &'static str, getter: Getter<T>) -> Self {
        Self { name, getter }
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's getter.
    pub fn getter(&self) -> Getter<T> {
        self.getter
    }

    /// Read this field from `record`.
    pub fn get(&self, record: &T) -> Value {
        (self.getter)(record)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Custom name-to-value mapping for a record.
///
/// Records exposing this capability through [`Record::as_mappable`] answer
/// every field lookup themselves; the field table is then only used to
/// enumerate keys during serialization.
pub trait Mappable {
    /// Map a field name to its value. Unknown names should yield `Value::Null`.
    fn map_value(&self, name: &str) -> Value;
}

/// A type whose values can be processed as grid rows.
pub trait Record: Sized + 'static {
    /// Readable fields in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>>;

    /// Custom mapping capability, if this record provides one.
    fn as_mappable(&self) -> Option<&dyn Mappable> {
        None
    }
}

/// The cached field table of one record type.
pub struct RecordModel<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Record> RecordModel<T> {
    /// Build the model by enumerating `T`'s fields.
    pub fn describe() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            fields: T::fields(),
        }
    }
}

impl<T> RecordModel<T> {
    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the type has no readable fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for RecordModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordModel")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

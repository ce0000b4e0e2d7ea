//! Field access by name.
//!
//! A [`FieldAccessor`] resolves field names to getters against a record
//! model and caches the result, including misses, so repeated lookups of the
//! same name cost one map probe.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tabula_proto::Value;

use super::descriptor::{Getter, Record, RecordModel};
use super::registry::ModelRegistry;

/// Cached name-to-getter resolution for one record type.
pub struct FieldAccessor<T> {
    model: Arc<RecordModel<T>>,
    getters: DashMap<String, Option<Getter<T>>>,
}

impl<T: Record> FieldAccessor<T> {
    /// Create an accessor resolving names against `model`.
    pub fn new(model: Arc<RecordModel<T>>) -> Self {
        Self {
            model,
            getters: DashMap::new(),
        }
    }

    /// Resolve `name` to a getter.
    ///
    /// The first lookup of a name consults the model; the outcome is cached
    /// permanently, so an unknown name stays unknown without being retried.
    pub fn resolve(&self, name: &str) -> Option<Getter<T>> {
        if let Some(cached) = self.getters.get(name) {
            return *cached;
        }

        let resolved = self.model.field(name).map(|f| f.getter());
        *self
            .getters
            .entry(name.to_owned())
            .or_insert(resolved)
            .value()
    }

    /// Read field `name` from `record`.
    ///
    /// Records with a custom mapping answer directly. Otherwise the cached
    /// getter is used, and unknown fields read as `Value::Null`.
    pub fn get(&self, record: &T, name: &str) -> Value {
        if let Some(mapper) = record.as_mappable() {
            return mapper.map_value(name);
        }
        match self.resolve(name) {
            Some(getter) => getter(record),
            None => Value::Null,
        }
    }

    /// The model this accessor resolves against.
    pub fn model(&self) -> &Arc<RecordModel<T>> {
        &self.model
    }

    /// Number of names resolved so far, hits and misses alike.
    pub fn cached_len(&self) -> usize {
        self.getters.len()
    }
}

impl<T> fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("type_name", &self.model.type_name())
            .field("cached", &self.getters.len())
            .finish()
    }
}

/// Read field `name` from `record` through the process-wide accessor cache.
pub fn get_value<T: Record>(record: &T, name: &str) -> Value {
    ModelRegistry::global().accessor::<T>().get(record, name)
}

//! Process-wide cache of record models and field accessors.
//!
//! Models and accessors are created lazily the first time a record type is
//! processed and are never invalidated: record shapes are fixed at compile
//! time, so a cached entry stays valid for the life of the process.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use super::accessor::FieldAccessor;
use super::descriptor::{Record, RecordModel};

type Erased = Arc<dyn Any + Send + Sync>;

static GLOBAL: Lazy<ModelRegistry> = Lazy::new(ModelRegistry::new);

/// Registry of per-type record models and field accessors.
#[derive(Default)]
pub struct ModelRegistry {
    models: DashMap<TypeId, Erased>,
    accessors: DashMap<TypeId, Erased>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static ModelRegistry {
        &GLOBAL
    }

    /// Get the model for `T`, describing the type on first use.
    pub fn model<T: Record>(&self) -> Arc<RecordModel<T>> {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.models.get(&key) {
            if let Ok(model) = Arc::clone(existing.value()).downcast::<RecordModel<T>>() {
                return model;
            }
        }

        let described: Erased = Arc::new(RecordModel::<T>::describe());
        let entry = Arc::clone(self.models.entry(key).or_insert(described).value());
        entry
            .downcast::<RecordModel<T>>()
            .unwrap_or_else(|_| Arc::new(RecordModel::describe()))
    }

    /// Get the field accessor for `T`, creating it on first use.
    pub fn accessor<T: Record>(&self) -> Arc<FieldAccessor<T>> {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.accessors.get(&key) {
            if let Ok(accessor) = Arc::clone(existing.value()).downcast::<FieldAccessor<T>>() {
                return accessor;
            }
        }

        let created: Erased = Arc::new(FieldAccessor::new(self.model::<T>()));
        let entry = Arc::clone(self.accessors.entry(key).or_insert(created).value());
        entry
            .downcast::<FieldAccessor<T>>()
            .unwrap_or_else(|_| Arc::new(FieldAccessor::new(self.model::<T>())))
    }

    /// Number of record types described so far.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if no record type has been described yet.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models.len())
            .field("accessors", &self.accessors.len())
            .finish()
    }
}

/// Fields of `T`, from the process-wide registry.
pub fn fields_of<T: Record>() -> Arc<RecordModel<T>> {
    ModelRegistry::global().model::<T>()
}

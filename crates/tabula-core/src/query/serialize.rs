//! Row serialization.
//!
//! Each record becomes a [`Row`]: the optional `DT_Row*` keys produced by
//! caller hooks come first, followed by every field of the record model.

use std::fmt;

use tabula_proto::{Row, Value, ROW_ATTR_KEY, ROW_CLASS_KEY, ROW_DATA_KEY, ROW_ID_KEY};

use crate::model::{FieldAccessor, ModelRegistry, Record};

type TextHook<'h, T> = Box<dyn Fn(&T) -> String + 'h>;
type ValueHook<'h, T> = Box<dyn Fn(&T) -> Value + 'h>;

/// Optional per-row derivations added to every serialized row.
pub struct RowHooks<'h, T> {
    row_id: Option<TextHook<'h, T>>,
    row_class: Option<TextHook<'h, T>>,
    row_data: Option<ValueHook<'h, T>>,
    row_attr: Option<ValueHook<'h, T>>,
}

impl<'h, T> RowHooks<'h, T> {
    /// Create hooks that add nothing.
    pub fn new() -> Self {
        Self {
            row_id: None,
            row_class: None,
            row_data: None,
            row_attr: None,
        }
    }

    /// Derive `DT_RowId` for each row.
    pub fn row_id(mut self, hook: impl Fn(&T) -> String + 'h) -> Self {
        self.row_id = Some(Box::new(hook));
        self
    }

    /// Derive `DT_RowClass` for each row.
    pub fn row_class(mut self, hook: impl Fn(&T) -> String + 'h) -> Self {
        self.row_class = Some(Box::new(hook));
        self
    }

    /// Derive `DT_RowData` for each row.
    pub fn row_data(mut self, hook: impl Fn(&T) -> Value + 'h) -> Self {
        self.row_data = Some(Box::new(hook));
        self
    }

    /// Derive `DT_RowAttr` for each row.
    pub fn row_attr(mut self, hook: impl Fn(&T) -> Value + 'h) -> Self {
        self.row_attr = Some(Box::new(hook));
        self
    }

    /// Number of well-known keys these hooks add to each row.
    pub fn len(&self) -> usize {
        [
            self.row_id.is_some(),
            self.row_class.is_some(),
            self.row_data.is_some(),
            self.row_attr.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Check if no hook is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for RowHooks<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RowHooks<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHooks")
            .field("row_id", &self.row_id.is_some())
            .field("row_class", &self.row_class.is_some())
            .field("row_data", &self.row_data.is_some())
            .field("row_attr", &self.row_attr.is_some())
            .finish()
    }
}

/// Serialize one record.
pub fn serialize_row<T: Record>(
    record: &T,
    hooks: &RowHooks<'_, T>,
    accessor: &FieldAccessor<T>,
) -> Row {
    let model = accessor.model();
    let mut row = Row::with_capacity(hooks.len() + model.len());

    if let Some(hook) = &hooks.row_id {
        row.insert_if_absent(ROW_ID_KEY, Value::String(hook(record)));
    }
    if let Some(hook) = &hooks.row_class {
        row.insert_if_absent(ROW_CLASS_KEY, Value::String(hook(record)));
    }
    if let Some(hook) = &hooks.row_data {
        row.insert_if_absent(ROW_DATA_KEY, hook(record));
    }
    if let Some(hook) = &hooks.row_attr {
        row.insert_if_absent(ROW_ATTR_KEY, hook(record));
    }

    for name in model.names() {
        if !row.contains_key(name) {
            row.insert_if_absent(name, accessor.get(record, name));
        }
    }
    row
}

/// Serialize records in order, using the process-wide accessor for `T`.
pub fn serialize_rows<'a, T, I>(records: I, hooks: &RowHooks<'_, T>) -> Vec<Row>
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    let accessor = ModelRegistry::global().accessor::<T>();
    records
        .into_iter()
        .map(|record| serialize_row(record, hooks, &accessor))
        .collect()
}

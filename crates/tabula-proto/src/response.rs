//! Grid response types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::value::Value;

/// One serialized grid row.
///
/// Entries keep insertion order, so keys written first (the well-known
/// `DT_Row*` keys) come first in the serialized object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert `value` under `key` unless the key is already present.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the row has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the row, returning its entries.
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Response to a grid draw request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Draw counter copied from the request.
    pub draw: u64,
    /// Number of records before any filtering.
    pub records_total: usize,
    /// Number of records after searching, before paging.
    pub records_filtered: usize,
    /// The requested page of rows.
    pub data: Vec<Row>,
    /// Error description when processing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Create a successful response.
    pub fn ok(draw: u64, data: Vec<Row>, records_total: usize, records_filtered: usize) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            data,
            error: None,
        }
    }

    /// Create a failed response with empty data and zero counts.
    pub fn error(draw: u64, message: impl Into<String>) -> Self {
        Self {
            draw,
            records_total: 0,
            records_filtered: 0,
            data: vec![],
            error: Some(message.into()),
        }
    }

    /// Check if this response carries rows rather than an error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Serialize to the grid's JSON wire format.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

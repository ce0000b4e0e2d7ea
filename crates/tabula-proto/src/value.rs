//! Runtime value types for record fields and serialized rows.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Date format used when a timestamp is rendered for searching.
///
/// Matches the grid's display convention: `yyyy/MM/dd HH:mm:ss:fff`.
pub const DISPLAY_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S:%3f";

/// A runtime value read from a record field.
///
/// Every field a record exposes is converted into one of these variants. The
/// variant keeps the field's natural ordering (numbers, timestamps, strings)
/// so sorting can compare raw values rather than their display strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value, also used for fields that do not exist.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Timestamp without a time zone.
    DateTime(NaiveDateTime),
    /// UUID.
    Uuid(Uuid),
    /// Opaque caller payload, passed through to the serialized row untouched.
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Int32(i) => Some(*i as i64),
            Value::UInt64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            Value::Float32(f) => Some(*f as f64),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as timestamp.
    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Try to get as UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Value::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
        }
    }

    /// Render the value as the string a user sees in the grid.
    ///
    /// Null renders as the empty string and timestamps use `date_format`
    /// (a chrono strftime pattern). If the pattern cannot be rendered the
    /// timestamp falls back to its default form.
    pub fn to_display_string(&self, date_format: &str) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int32(i) => i.to_string(),
            Value::Int64(i) => i.to_string(),
            Value::UInt64(u) => u.to_string(),
            Value::Float32(f) => f.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => {
                let mut out = String::new();
                if write!(out, "{}", dt.format(date_format)).is_err() {
                    out = dt.to_string();
                }
                out
            }
            Value::Uuid(u) => u.hyphenated().to_string(),
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(j) => j.to_string(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::UInt64(u) => serializer.serialize_u64(*u),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => dt.serialize(serializer),
            Value::Uuid(u) => u.serialize(serializer),
            Value::Json(j) => j.serialize(serializer),
        }
    }
}

/// Conversion from a borrowed field into a [`Value`].
///
/// Generated record getters call this on each field, so any `Clone` type
/// that converts into a `Value` can be exposed as a column.
pub trait ToValue {
    /// Produce the runtime value for this field.
    fn to_value(&self) -> Value;
}

impl<T> ToValue for T
where
    T: Clone + Into<Value>,
{
    fn to_value(&self) -> Value {
        self.clone().into()
    }
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int32(v as i32)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int32(v as i32)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int32(v as i32)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int32(v as i32)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int64(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt64(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::DateTime(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

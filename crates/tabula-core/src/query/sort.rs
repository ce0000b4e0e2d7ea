//! Multi-key ordering of records.
//!
//! Order directives reference request columns by position. Directives on
//! columns that are not orderable are dropped, and the remaining ones are
//! applied as a stable multi-key sort over raw field values.

use std::cmp::Ordering;

use tabula_proto::{Request, Value};

use crate::error::Error;
use crate::model::{FieldAccessor, Record};

/// One resolved sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<'r> {
    /// Field the key reads.
    pub field: &'r str,
    /// Sort descending instead of ascending.
    pub descending: bool,
}

/// Resolve the request's order directives to sort keys, primary key first.
///
/// A directive pointing past the column list is an error.
pub fn resolve_sort_keys<P>(request: &Request<P>) -> Result<Vec<SortKey<'_>>, Error> {
    let mut keys = Vec::with_capacity(request.order.len());
    for order in &request.order {
        let column = request
            .columns
            .get(order.column)
            .ok_or(Error::ColumnOutOfRange {
                index: order.column,
                columns: request.columns.len(),
            })?;
        if column.orderable {
            keys.push(SortKey {
                field: column.name.as_str(),
                descending: order.is_descending(),
            });
        }
    }
    Ok(keys)
}

/// Sort `records` by `keys`.
///
/// The sort is stable, so records equal on every key keep their input order.
/// With no keys the input is returned unchanged.
pub fn sort_records<'a, T: Record>(
    records: Vec<&'a T>,
    keys: &[SortKey<'_>],
    accessor: &FieldAccessor<T>,
) -> Result<Vec<&'a T>, Error> {
    if keys.is_empty() {
        return Ok(records);
    }

    let mut decorated: Vec<(Vec<Value>, &'a T)> = records
        .into_iter()
        .map(|record| {
            let values = keys.iter().map(|k| accessor.get(record, k.field)).collect();
            (values, record)
        })
        .collect();

    for (i, key) in keys.iter().enumerate() {
        check_comparable(decorated.iter().map(|(values, _)| &values[i]), key.field)?;
    }

    decorated.sort_by(|(a, _), (b, _)| {
        for (i, key) in keys.iter().enumerate() {
            let cmp = compare_values(&a[i], &b[i]).unwrap_or(Ordering::Equal);
            let cmp = if key.descending { cmp.reverse() } else { cmp };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });

    Ok(decorated.into_iter().map(|(_, record)| record).collect())
}

/// Fail unless every non-null value of a key compares with every other.
///
/// Comparability is an equivalence over non-null kinds, so testing each value
/// against the first one is enough. Afterwards the comparator is total.
fn check_comparable<'v>(
    values: impl Iterator<Item = &'v Value>,
    column: &str,
) -> Result<(), Error> {
    let mut values = values.filter(|v| !v.is_null()).peekable();
    let Some(first) = values.peek().copied() else {
        return Ok(());
    };
    for value in values {
        if compare_values(first, value).is_none() {
            return Err(Error::Incomparable {
                column: column.to_string(),
                left: first.kind(),
                right: value.kind(),
            });
        }
    }
    Ok(())
}

/// Compare two raw values by their natural ordering.
///
/// Null sorts before everything else. Integers and floats compare exactly by
/// magnitude across widths, with NaN after every number. Returns `None` for kinds with no common ordering.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        _ => compare_numbers(a, b),
    }
}

enum Number {
    Int(i128),
    Float(f64),
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Int32(i) => Some(Number::Int(*i as i128)),
        Value::Int64(i) => Some(Number::Int(*i as i128)),
        Value::UInt64(u) => Some(Number::Int(*u as i128)),
        Value::Float32(f) => Some(Number::Float(*f as f64)),
        Value::Float64(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    let ord = match (as_number(a)?, as_number(b)?) {
        (Number::Int(a), Number::Int(b)) => a.cmp(&b),
        (Number::Float(a), Number::Float(b)) => compare_floats(a, b),
        (Number::Int(a), Number::Float(b)) => compare_int_float(a, b),
        (Number::Float(a), Number::Int(b)) => compare_int_float(b, a).reverse(),
    };
    Some(ord)
}

// NaN sorts after every number and equals itself; -0.0 equals 0.0.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn compare_int_float(i: i128, f: f64) -> Ordering {
    // 2^127, the first float outside the i128 range.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i128)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

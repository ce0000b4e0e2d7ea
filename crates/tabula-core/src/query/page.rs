//! Windowed pagination.

use crate::error::Error;

/// Extract the window `[start, start + length)` from `rows`, clamped to the end.
///
/// `start` must address an existing row; the only exception is `start == 0`
/// on an empty slice, which yields an empty page. A negative `length` returns
/// every row from `start` when `allow_unbounded` is set.
pub fn page<T>(rows: &[T], start: i64, length: i64, allow_unbounded: bool) -> Result<&[T], Error> {
    let start = usize::try_from(start).map_err(|_| Error::NegativeStart(start))?;
    let len = rows.len();
    if start > len || (start == len && len > 0) {
        return Err(Error::StartOutOfRange { start, len });
    }

    let end = match usize::try_from(length) {
        Ok(length) => start.saturating_add(length).min(len),
        Err(_) if allow_unbounded => len,
        Err(_) => return Err(Error::UnboundedLength(length)),
    };

    Ok(&rows[start..end])
}

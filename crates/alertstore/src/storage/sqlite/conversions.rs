//! SQLite row conversion functions.
//!
//! Maps SQLite rows to [`AlertRow`] values; turning those into alerts is the
//! job of the codec in `alertstore_core`.

use alertstore_core::storage::{AlertRow, CodecError};
use rusqlite::types::{FromSql, Type};
use rusqlite::Row;

/// Column names in the order every alert SELECT returns them.
pub const ALERT_COLUMNS: [&str; 12] = [
    "id",
    "kind",
    "original_time",
    "label",
    "recurrence",
    "assets",
    "play_order",
    "background_asset",
    "loop_count",
    "loop_pause_ms",
    "scheduled_time",
    "state",
];

/// Convert a SQLite row to an AlertRow.
///
/// Expected columns: see [`ALERT_COLUMNS`]. A NULL in a required column is
/// reported as [`CodecError::MissingColumn`], wrapped in a conversion failure.
pub fn row_to_alert_row(row: &Row) -> rusqlite::Result<AlertRow> {
    Ok(AlertRow {
        id: required(row, 0)?,
        kind: required(row, 1)?,
        original_time: required(row, 2)?,
        label: row.get(3)?,
        recurrence: row.get(4)?,
        assets: required(row, 5)?,
        play_order: required(row, 6)?,
        background_asset: row.get(7)?,
        loop_count: required(row, 8)?,
        loop_pause_ms: required(row, 9)?,
        scheduled_time: required(row, 10)?,
        state: required(row, 11)?,
    })
}

/// Extracts the CodecError carried by a failed row conversion, if any.
pub fn codec_error(err: &rusqlite::Error) -> Option<CodecError> {
    match err {
        rusqlite::Error::FromSqlConversionFailure(_, _, inner) => {
            inner.downcast_ref::<CodecError>().cloned()
        }
        _ => None,
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn required<T: FromSql>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    match row.get::<_, Option<T>>(idx)? {
        Some(value) => Ok(value),
        None => Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Null,
            Box::new(CodecError::MissingColumn(ALERT_COLUMNS[idx])),
        )),
    }
}

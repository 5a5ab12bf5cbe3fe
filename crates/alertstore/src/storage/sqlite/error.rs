//! SQLite error mapping.
//!
//! Maps `rusqlite::Error` to `StorageError` from `alertstore_core::storage`.
//! Specific errors are mapped to semantic variants (e.g., PRIMARY KEY constraint to DuplicateId).

use alertstore_core::storage::{CodecError, StorageError};

use super::conversions::codec_error;

/// Maps a rusqlite error to a StorageError.
///
/// # Error Mapping
///
/// - Conversion failures carrying a `CodecError` → `StorageError::Codec`
/// - NULL read from a non-nullable column → `StorageError::Codec`
/// - All other errors → `StorageError::Io`
pub fn map_rusqlite_error(err: rusqlite::Error) -> StorageError {
    if let Some(codec) = codec_error(&err) {
        return StorageError::Codec(codec);
    }

    match err {
        rusqlite::Error::InvalidColumnType(_, name, rusqlite::types::Type::Null) => {
            StorageError::Codec(CodecError::MissingColumn(static_column_name(&name)))
        }
        rusqlite::Error::InvalidColumnType(_, name, found) => {
            StorageError::Codec(CodecError::InvalidValue {
                column: static_column_name(&name),
                value: format!("unexpected {found} value"),
            })
        }
        _ => StorageError::Io(err.to_string()),
    }
}

/// Maps a rusqlite error with a known alert ID to a StorageError.
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `StorageError::DuplicateId`
/// - Everything else as [`map_rusqlite_error`]
pub fn map_rusqlite_error_with_id(err: rusqlite::Error, id: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(sqlite_err, _) = &err {
        if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return StorageError::DuplicateId { id: id.to_string() };
        }
    }
    map_rusqlite_error(err)
}

/// Codec errors carry static column names; anything unexpected becomes "unknown".
fn static_column_name(name: &str) -> &'static str {
    super::conversions::ALERT_COLUMNS
        .iter()
        .find(|column| **column == name)
        .copied()
        .unwrap_or("unknown")
}

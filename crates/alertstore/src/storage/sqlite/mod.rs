//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the storage trait
//! using `rusqlite`. Calls block the caller until the write is committed.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteAlertStorage;
pub use schema::CURRENT_SCHEMA_VERSION;

//! Storage backend implementations.
//!
//! This module provides concrete implementations of the [`AlertStorage`]
//! trait defined in `alertstore_core::storage`. The implementations are
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite`
//! - `inmemory` (default): in-memory backend for tests
//!
//! [`AlertStorage`]: alertstore_core::storage::AlertStorage

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p alertstore --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub mod inmemory;

//! In-memory storage backend for testing.
//!
//! Stores encoded alert rows in a `BTreeMap`. Nothing survives dropping the
//! engine, but the lifecycle rules match the SQLite backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use alertstore::storage::inmemory::InMemoryAlertStorage;
//!
//! let mut storage = InMemoryAlertStorage::new();
//! storage.create_database()?;
//! ```

mod repository;

pub use repository::InMemoryAlertStorage;

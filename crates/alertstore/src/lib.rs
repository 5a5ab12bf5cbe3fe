//! Durable storage engine for alarms, timers and reminders.
//!
//! Backends implement [`AlertStorage`] from `alertstore_core` and are
//! selected via feature flags:
//!
//! - `sqlite` (default): file-backed SQLite storage using `rusqlite`
//! - `inmemory` (default): non-persistent storage for tests
//!
//! ```rust,ignore
//! use alertstore::{AlertStorage, NoSettings, SqliteAlertStorage, StorageConfig};
//!
//! let mut storage = SqliteAlertStorage::from_config(&StorageConfig::from_env());
//! storage.open_or_create()?;
//! let alerts = storage.load(&NoSettings)?;
//! ```

pub mod config;
pub mod storage;

pub use alertstore_core::alert;
pub use alertstore_core::storage::{
    AlertSettingsProvider, AlertStorage, DeviceVolumeRamp, Lifecycle, LoadedAlert, NoSettings,
    PlaybackSettings, Result, StorageError, StorageStats, VolumeRamp,
};
pub use config::StorageConfig;

#[cfg(feature = "inmemory")]
pub use storage::inmemory::InMemoryAlertStorage;
#[cfg(feature = "sqlite")]
pub use storage::sqlite::SqliteAlertStorage;

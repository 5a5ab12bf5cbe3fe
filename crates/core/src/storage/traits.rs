use crate::alert::{Alert, AlertId};

use super::{
    AlertSettingsProvider, Lifecycle, LoadedAlert, NoSettings, Result, StorageError, StorageStats,
};

/// Durable storage for alerts.
///
/// An engine is driven from a single serialized access path: mutating
/// operations take `&mut self` and block until the write is durable. Every data
/// operation fails with [`StorageError::NotOpen`] unless the engine is open.
pub trait AlertStorage: Send {
    /// Creates a new database at the configured location and opens it.
    ///
    /// Fails if this engine is already open or the location already holds a
    /// database.
    fn create_database(&mut self) -> Result<()>;

    /// Opens an existing database.
    ///
    /// Fails if this engine is already open, no database exists, or the stored
    /// schema version is not supported.
    fn open(&mut self) -> Result<()>;

    /// Releases the database handle. Safe to call at any time.
    fn close(&mut self);

    /// Returns the current lifecycle state.
    fn lifecycle(&self) -> Lifecycle;

    fn is_open(&self) -> bool {
        self.lifecycle() == Lifecycle::Open
    }

    /// Persists a new alert. Fails if an alert with the same id exists.
    fn store(&mut self, alert: &Alert) -> Result<()>;

    /// Loads every stored alert, attaching whatever `settings` supplies.
    ///
    /// If any row cannot be decoded the whole load fails; a partially valid
    /// set is never returned.
    fn load(&self, settings: &dyn AlertSettingsProvider) -> Result<Vec<LoadedAlert>>;

    /// Updates the scheduled time and state of a stored alert.
    ///
    /// Static fields are write-once: if `alert` carries static fields that
    /// differ from the stored ones the call fails with
    /// [`StorageError::StaticFieldsChanged`] and nothing is written.
    fn modify(&mut self, alert: &Alert) -> Result<()>;

    /// Removes an alert. Removing an alert that is not stored succeeds.
    fn erase(&mut self, alert: &Alert) -> Result<()>;

    /// Removes every listed alert in one transaction.
    ///
    /// Ids that are not stored are skipped. On failure nothing is removed.
    fn bulk_erase_ids(&mut self, ids: &[AlertId]) -> Result<()>;

    /// Removes every listed alert in one transaction. See [`bulk_erase_ids`](Self::bulk_erase_ids).
    fn bulk_erase(&mut self, alerts: &[Alert]) -> Result<()> {
        let ids: Vec<AlertId> = alerts.iter().map(|alert| alert.id.clone()).collect();
        self.bulk_erase_ids(&ids)
    }

    /// Removes every stored alert, keeping the tables.
    fn clear_database(&mut self) -> Result<()>;

    /// Returns true if an alert with this id is stored.
    fn contains(&self, id: &AlertId) -> Result<bool>;

    /// Returns the number of stored alerts.
    fn count(&self) -> Result<usize>;

    /// Opens the database, creating it first if none exists yet.
    fn open_or_create(&mut self) -> Result<()> {
        match self.open() {
            Err(StorageError::DatabaseMissing { location }) => {
                tracing::info!(%location, "no alert database found, creating one");
                self.create_database()
            }
            other => other,
        }
    }

    /// Counts stored alerts per kind and per state.
    fn stats(&self) -> Result<StorageStats> {
        let loaded = self.load(&NoSettings)?;
        let stats = StorageStats::from_alerts(loaded.iter().map(|l| &l.alert));
        tracing::info!(
            total = stats.total,
            by_kind = ?stats.by_kind,
            by_state = ?stats.by_state,
            "alert storage stats"
        );
        Ok(stats)
    }
}

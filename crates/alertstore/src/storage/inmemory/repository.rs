//! In-memory storage implementation.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use alertstore_core::alert::{Alert, AlertId};
use alertstore_core::storage::{
    attach_settings, decode, encode, AlertRow, AlertSettingsProvider, AlertStorage, Lifecycle,
    LoadedAlert, Result, StorageError,
};

const LOCATION: &str = ":memory:";

/// In-memory storage backend for testing.
///
/// Keeps encoded rows in a `BTreeMap`, so records go through the same codec
/// as the SQLite backend. The "database" outlives `close`, which makes
/// `create_database → close → open` behave like a file would; it is lost
/// when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryAlertStorage {
    database: Option<BTreeMap<String, AlertRow>>,
    lifecycle: Lifecycle,
    fail_on_erase: Option<AlertId>,
}

impl InMemoryAlertStorage {
    /// Creates an engine with no database yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes any erase of `id` fail with an I/O error (for failure testing).
    pub fn fail_on_erase(mut self, id: impl Into<AlertId>) -> Self {
        self.fail_on_erase = Some(id.into());
        self
    }

    fn rows(&self) -> Result<&BTreeMap<String, AlertRow>> {
        match (&self.database, self.lifecycle) {
            (Some(rows), Lifecycle::Open) => Ok(rows),
            _ => Err(StorageError::NotOpen),
        }
    }

    fn rows_mut(&mut self) -> Result<&mut BTreeMap<String, AlertRow>> {
        match (&mut self.database, self.lifecycle) {
            (Some(rows), Lifecycle::Open) => Ok(rows),
            _ => Err(StorageError::NotOpen),
        }
    }

    fn check_injected_failure(&self, id: &AlertId) -> Result<()> {
        if self.fail_on_erase.as_ref() == Some(id) {
            return Err(StorageError::Io(format!("injected failure erasing {id}")));
        }
        Ok(())
    }
}

impl AlertStorage for InMemoryAlertStorage {
    fn create_database(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Open {
            return Err(StorageError::AlreadyOpen);
        }
        if self.database.is_some() {
            return Err(StorageError::DatabaseExists {
                location: LOCATION.to_string(),
            });
        }

        self.database = Some(BTreeMap::new());
        self.lifecycle = Lifecycle::Open;
        info!("created in-memory alert database");
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Open {
            return Err(StorageError::AlreadyOpen);
        }
        if self.database.is_none() {
            return Err(StorageError::DatabaseMissing {
                location: LOCATION.to_string(),
            });
        }

        self.lifecycle = Lifecycle::Open;
        info!("opened in-memory alert database");
        Ok(())
    }

    fn close(&mut self) {
        if self.lifecycle == Lifecycle::Open {
            self.lifecycle = Lifecycle::Closed;
            info!("closed in-memory alert database");
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn store(&mut self, alert: &Alert) -> Result<()> {
        self.rows()?;
        let row = encode(alert)?;

        let rows = self.rows_mut()?;
        if rows.contains_key(&row.id) {
            return Err(StorageError::DuplicateId { id: row.id });
        }
        rows.insert(row.id.clone(), row);

        debug!(id = %alert.id, kind = ?alert.kind(), "stored alert");
        Ok(())
    }

    fn load(&self, settings: &dyn AlertSettingsProvider) -> Result<Vec<LoadedAlert>> {
        let rows = self.rows()?;

        let mut alerts = Vec::with_capacity(rows.len());
        for row in rows.values() {
            match decode(row.clone()) {
                Ok(alert) => alerts.push(alert),
                Err(err) => {
                    warn!(id = %row.id, error = %err, "stored alert cannot be decoded, aborting load");
                    return Err(err.into());
                }
            }
        }

        debug!(count = alerts.len(), "loaded alerts");
        Ok(attach_settings(alerts, settings))
    }

    fn modify(&mut self, alert: &Alert) -> Result<()> {
        self.rows()?;
        let row = encode(alert)?;

        let rows = self.rows_mut()?;
        let Some(stored) = rows.get_mut(&row.id) else {
            return Err(StorageError::NotFound { id: row.id });
        };
        if !stored.same_static_fields(&row) {
            warn!(id = %row.id, "rejected change to write-once alert fields");
            return Err(StorageError::StaticFieldsChanged { id: row.id });
        }
        stored.scheduled_time = row.scheduled_time;
        stored.state = row.state;

        debug!(id = %alert.id, state = ?alert.state(), "modified alert");
        Ok(())
    }

    fn erase(&mut self, alert: &Alert) -> Result<()> {
        self.rows()?;
        self.check_injected_failure(&alert.id)?;

        let removed = self.rows_mut()?.remove(alert.id.as_str()).is_some();
        debug!(id = %alert.id, removed, "erased alert");
        Ok(())
    }

    fn bulk_erase_ids(&mut self, ids: &[AlertId]) -> Result<()> {
        // Work on a copy and swap it in only once every delete went through
        let mut staged = self.rows()?.clone();
        let mut removed = 0;
        for id in ids {
            self.check_injected_failure(id)?;
            if staged.remove(id.as_str()).is_some() {
                removed += 1;
            }
        }
        *self.rows_mut()? = staged;

        debug!(requested = ids.len(), removed, "bulk erased alerts");
        Ok(())
    }

    fn clear_database(&mut self) -> Result<()> {
        let rows = self.rows_mut()?;
        let removed = rows.len();
        rows.clear();

        info!(removed, "cleared alert database");
        Ok(())
    }

    fn contains(&self, id: &AlertId) -> Result<bool> {
        Ok(self.rows()?.contains_key(id.as_str()))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.rows()?.len())
    }
}

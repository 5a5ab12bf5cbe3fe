//! SQLite storage engine.
//!
//! Implements [`AlertStorage`] from `alertstore_core::storage` on top of a
//! single exclusively owned `rusqlite` connection.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction};
use tracing::{debug, info, warn};

use alertstore_core::alert::{Alert, AlertId};
use alertstore_core::storage::{
    attach_settings, decode, encode, AlertRow, AlertSettingsProvider, AlertStorage, Lifecycle,
    LoadedAlert, Result, StorageError,
};

use super::conversions::row_to_alert_row;
use super::error::{map_rusqlite_error, map_rusqlite_error_with_id};
use super::schema;
use crate::config::StorageConfig;

/// State of the database handle.
enum Handle {
    Uninitialized,
    Open(Connection),
    Closed,
}

/// SQLite-based alert storage.
///
/// The database lives in a single file. The connection is acquired by
/// [`create_database`](AlertStorage::create_database) or
/// [`open`](AlertStorage::open) and released by
/// [`close`](AlertStorage::close) or on drop.
pub struct SqliteAlertStorage {
    path: PathBuf,
    busy_timeout: Duration,
    handle: Handle,
}

impl SqliteAlertStorage {
    /// Creates an engine for the database file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_config(&StorageConfig::at(path))
    }

    /// Creates an engine from a storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            path: config.database_path.clone(),
            busy_timeout: config.busy_timeout(),
            handle: Handle::Uninitialized,
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// A database exists if the file is there and not empty.
    fn has_existing_database(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false)
    }

    fn ensure_not_open(&self) -> Result<()> {
        match self.handle {
            Handle::Open(_) => Err(StorageError::AlreadyOpen),
            _ => Ok(()),
        }
    }

    fn conn(&self) -> Result<&Connection> {
        match &self.handle {
            Handle::Open(conn) => Ok(conn),
            _ => Err(StorageError::NotOpen),
        }
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        match &mut self.handle {
            Handle::Open(conn) => Ok(conn),
            _ => Err(StorageError::NotOpen),
        }
    }

    /// Runs `f` inside a transaction, committing only if it succeeds.
    ///
    /// A dropped `Transaction` rolls back, so an early return leaves the
    /// database as it was.
    fn with_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let conn = self.conn_mut()?;
        let tx = conn.transaction().map_err(map_rusqlite_error)?;
        let value = f(&tx)?;
        tx.commit().map_err(map_rusqlite_error)?;
        Ok(value)
    }

    fn configure(&self, conn: &Connection) -> Result<()> {
        conn.busy_timeout(self.busy_timeout)
            .map_err(map_rusqlite_error)
    }

    /// Creates the tables and writes the version marker in one transaction.
    fn init_schema(conn: &mut Connection) -> Result<()> {
        let tx = conn.transaction().map_err(map_rusqlite_error)?;
        tx.execute_batch(schema::CREATE_TABLES)
            .map_err(map_rusqlite_error)?;
        tx.execute(
            schema::INSERT_SCHEMA_VERSION,
            [schema::CURRENT_SCHEMA_VERSION],
        )
        .map_err(map_rusqlite_error)?;
        tx.commit().map_err(map_rusqlite_error)
    }

    /// Checks that the database carries the schema version this engine writes.
    fn check_schema_version(conn: &Connection) -> Result<()> {
        let has_table = conn
            .query_row(schema::SELECT_SCHEMA_VERSION_TABLE, [], |_| Ok(()))
            .optional()
            .map_err(map_rusqlite_error)?
            .is_some();

        let found: Option<i64> = if has_table {
            conn.query_row(schema::SELECT_SCHEMA_VERSION, [], |row| row.get(0))
                .map_err(map_rusqlite_error)?
        } else {
            None
        };

        match found {
            Some(schema::CURRENT_SCHEMA_VERSION) => Ok(()),
            found => Err(StorageError::SchemaVersion {
                found,
                expected: schema::CURRENT_SCHEMA_VERSION,
            }),
        }
    }

    fn read_rows(conn: &Connection) -> Result<Vec<AlertRow>> {
        let mut stmt = conn
            .prepare(schema::SELECT_ALL_ALERTS)
            .map_err(map_rusqlite_error)?;
        let rows = stmt
            .query_map([], row_to_alert_row)
            .map_err(map_rusqlite_error)?;

        let mut result = Vec::new();
        for row_result in rows {
            result.push(row_result.map_err(map_rusqlite_error)?);
        }
        Ok(result)
    }

    fn remove_half_created_file(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "failed to remove partially created alert database");
        }
    }
}

impl AlertStorage for SqliteAlertStorage {
    fn create_database(&mut self) -> Result<()> {
        self.ensure_not_open()?;
        if self.has_existing_database() {
            return Err(StorageError::DatabaseExists {
                location: self.location(),
            });
        }

        let mut conn = Connection::open(&self.path).map_err(map_rusqlite_error)?;
        let initialized = self
            .configure(&conn)
            .and_then(|()| Self::init_schema(&mut conn));
        if let Err(err) = initialized {
            drop(conn);
            self.remove_half_created_file();
            return Err(err);
        }

        info!(
            path = %self.path.display(),
            version = schema::CURRENT_SCHEMA_VERSION,
            "created alert database"
        );
        self.handle = Handle::Open(conn);
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        self.ensure_not_open()?;
        if !self.has_existing_database() {
            return Err(StorageError::DatabaseMissing {
                location: self.location(),
            });
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(map_rusqlite_error)?;
        self.configure(&conn)?;
        Self::check_schema_version(&conn)?;

        info!(path = %self.path.display(), "opened alert database");
        self.handle = Handle::Open(conn);
        Ok(())
    }

    fn close(&mut self) {
        let handle = std::mem::replace(&mut self.handle, Handle::Closed);
        match handle {
            Handle::Open(conn) => match conn.close() {
                Ok(()) => info!(path = %self.path.display(), "closed alert database"),
                Err((_, err)) => {
                    warn!(path = %self.path.display(), error = %err, "error while closing alert database")
                }
            },
            Handle::Uninitialized => self.handle = Handle::Uninitialized,
            Handle::Closed => {}
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.handle {
            Handle::Uninitialized => Lifecycle::Uninitialized,
            Handle::Open(_) => Lifecycle::Open,
            Handle::Closed => Lifecycle::Closed,
        }
    }

    fn store(&mut self, alert: &Alert) -> Result<()> {
        self.conn()?;
        let row = encode(alert)?;

        self.with_transaction(|tx| {
            tx.execute(
                schema::INSERT_ALERT,
                rusqlite::params![
                    row.id,
                    row.kind,
                    row.original_time,
                    row.label,
                    row.recurrence,
                    row.assets,
                    row.play_order,
                    row.background_asset,
                    row.loop_count,
                    row.loop_pause_ms,
                    row.scheduled_time,
                    row.state
                ],
            )
            .map_err(|e| map_rusqlite_error_with_id(e, &row.id))?;
            Ok(())
        })?;

        debug!(id = %alert.id, kind = ?alert.kind(), "stored alert");
        Ok(())
    }

    fn load(&self, settings: &dyn AlertSettingsProvider) -> Result<Vec<LoadedAlert>> {
        let rows = Self::read_rows(self.conn()?)?;

        let mut alerts = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match decode(row) {
                Ok(alert) => alerts.push(alert),
                Err(err) => {
                    warn!(%id, error = %err, "stored alert cannot be decoded, aborting load");
                    return Err(err.into());
                }
            }
        }

        debug!(count = alerts.len(), "loaded alerts");
        Ok(attach_settings(alerts, settings))
    }

    fn modify(&mut self, alert: &Alert) -> Result<()> {
        self.conn()?;
        let row = encode(alert)?;

        self.with_transaction(|tx| {
            let stored = tx
                .query_row(schema::SELECT_ALERT_BY_ID, [&row.id], row_to_alert_row)
                .optional()
                .map_err(map_rusqlite_error)?;
            let Some(stored) = stored else {
                return Err(StorageError::NotFound { id: row.id.clone() });
            };
            if !stored.same_static_fields(&row) {
                warn!(id = %row.id, "rejected change to write-once alert fields");
                return Err(StorageError::StaticFieldsChanged { id: row.id.clone() });
            }

            tx.execute(
                schema::UPDATE_ALERT_SCHEDULE,
                rusqlite::params![row.id, row.scheduled_time, row.state],
            )
            .map_err(map_rusqlite_error)?;
            Ok(())
        })?;

        debug!(id = %alert.id, state = ?alert.state(), "modified alert");
        Ok(())
    }

    fn erase(&mut self, alert: &Alert) -> Result<()> {
        let removed = self.with_transaction(|tx| {
            tx.execute(schema::DELETE_ALERT, [alert.id.as_str()])
                .map_err(map_rusqlite_error)
        })?;

        debug!(id = %alert.id, removed, "erased alert");
        Ok(())
    }

    fn bulk_erase_ids(&mut self, ids: &[AlertId]) -> Result<()> {
        let removed = self.with_transaction(|tx| {
            let mut stmt = tx
                .prepare(schema::DELETE_ALERT)
                .map_err(map_rusqlite_error)?;
            let mut removed = 0;
            for id in ids {
                removed += stmt
                    .execute([id.as_str()])
                    .map_err(map_rusqlite_error)?;
            }
            Ok(removed)
        })?;

        debug!(requested = ids.len(), removed, "bulk erased alerts");
        Ok(())
    }

    fn clear_database(&mut self) -> Result<()> {
        let removed = self.with_transaction(|tx| {
            tx.execute(schema::DELETE_ALL_ALERTS, [])
                .map_err(map_rusqlite_error)
        })?;

        info!(removed, "cleared alert database");
        Ok(())
    }

    fn contains(&self, id: &AlertId) -> Result<bool> {
        let found = self
            .conn()?
            .query_row(schema::SELECT_ALERT_EXISTS, [id.as_str()], |_| Ok(()))
            .optional()
            .map_err(map_rusqlite_error)?;
        Ok(found.is_some())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row(schema::COUNT_ALERTS, [], |row| row.get(0))
            .map_err(map_rusqlite_error)?;
        usize::try_from(count).map_err(|_| StorageError::Io(format!("invalid row count {count}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertstore_core::alert::{AlertKind, AlertState, Asset, AssetConfiguration};
    use alertstore_core::storage::{
        CodecError, DeviceVolumeRamp, NoSettings, PlaybackSettings, VolumeRamp,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, minute, 0).unwrap()
    }

    fn storage_in(dir: &TempDir) -> SqliteAlertStorage {
        SqliteAlertStorage::new(dir.path().join("alerts.db"))
    }

    fn created() -> (TempDir, SqliteAlertStorage) {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.create_database().unwrap();
        (dir, storage)
    }

    fn alarm(id: &str) -> Alert {
        Alert::alarm(at(7, 0)).with_id(id)
    }

    fn loaded(storage: &SqliteAlertStorage) -> Vec<Alert> {
        storage
            .load(&NoSettings)
            .unwrap()
            .into_iter()
            .map(|l| l.alert)
            .collect()
    }

    fn ids(storage: &SqliteAlertStorage) -> Vec<String> {
        loaded(storage)
            .into_iter()
            .map(|a| a.id.to_string())
            .collect()
    }

    // ==================== Lifecycle Tests ====================

    #[test]
    fn test_create_database_opens_engine() {
        let (_dir, storage) = created();
        assert_eq!(storage.lifecycle(), Lifecycle::Open);
        assert!(storage.is_open());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_create_database_twice_fails_already_open() {
        let (_dir, mut storage) = created();
        assert_eq!(storage.create_database(), Err(StorageError::AlreadyOpen));
    }

    #[test]
    fn test_open_while_open_fails() {
        let (_dir, mut storage) = created();
        assert_eq!(storage.open(), Err(StorageError::AlreadyOpen));
    }

    #[test]
    fn test_open_without_database_fails() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);

        let result = storage.open();

        assert!(matches!(result, Err(StorageError::DatabaseMissing { .. })));
        assert_eq!(storage.lifecycle(), Lifecycle::Uninitialized);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_create_close_open_preserves_records() {
        let (_dir, mut storage) = created();
        let alert = alarm("a").with_label("Wake up");
        storage.store(&alert).unwrap();

        storage.close();
        assert_eq!(storage.lifecycle(), Lifecycle::Closed);
        storage.open().unwrap();

        assert_eq!(loaded(&storage), vec![alert]);
    }

    #[test]
    fn test_records_survive_a_new_engine_instance() {
        let (dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();
        drop(storage);

        let mut reopened = storage_in(&dir);
        reopened.open().unwrap();

        assert_eq!(ids(&reopened), vec!["a"]);
    }

    #[test]
    fn test_create_database_over_existing_fails() {
        let (dir, mut storage) = created();
        storage.close();

        let mut other = storage_in(&dir);
        let result = other.create_database();

        assert!(matches!(result, Err(StorageError::DatabaseExists { .. })));
        assert_eq!(other.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_dir, mut storage) = created();
        storage.close();
        storage.close();
        assert_eq!(storage.lifecycle(), Lifecycle::Closed);
    }

    #[test]
    fn test_close_before_open_keeps_uninitialized() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.close();
        assert_eq!(storage.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_operations_fail_when_not_open() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        let alert = alarm("a");

        assert_eq!(storage.store(&alert), Err(StorageError::NotOpen));
        assert_eq!(storage.load(&NoSettings), Err(StorageError::NotOpen));
        assert_eq!(storage.modify(&alert), Err(StorageError::NotOpen));
        assert_eq!(storage.erase(&alert), Err(StorageError::NotOpen));
        assert_eq!(
            storage.bulk_erase(std::slice::from_ref(&alert)),
            Err(StorageError::NotOpen)
        );
        assert_eq!(storage.clear_database(), Err(StorageError::NotOpen));
        assert_eq!(storage.contains(&alert.id), Err(StorageError::NotOpen));
        assert_eq!(storage.count(), Err(StorageError::NotOpen));
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_operations_fail_after_close() {
        let (_dir, mut storage) = created();
        storage.close();

        assert_eq!(storage.store(&alarm("a")), Err(StorageError::NotOpen));
        assert_eq!(storage.load(&NoSettings), Err(StorageError::NotOpen));
    }

    #[test]
    fn test_open_or_create_creates_then_opens() {
        let dir = TempDir::new().unwrap();
        let mut first = storage_in(&dir);
        first.open_or_create().unwrap();
        first.store(&alarm("a")).unwrap();
        first.close();

        let mut second = storage_in(&dir);
        second.open_or_create().unwrap();

        assert_eq!(ids(&second), vec!["a"]);
    }

    #[test]
    fn test_from_config_uses_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.db");
        let mut storage = SqliteAlertStorage::from_config(&StorageConfig::at(&path));

        storage.create_database().unwrap();

        assert_eq!(storage.path(), path.as_path());
        assert!(path.exists());
    }

    // ==================== Schema Tests ====================

    #[test]
    fn test_open_rejects_unsupported_schema_version() {
        let (_dir, mut storage) = created();
        storage
            .conn()
            .unwrap()
            .execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
        storage.close();

        let result = storage.open();

        assert_eq!(
            result,
            Err(StorageError::SchemaVersion {
                found: Some(99),
                expected: schema::CURRENT_SCHEMA_VERSION
            })
        );
        assert!(!storage.is_open());
    }

    #[test]
    fn test_open_rejects_database_without_version_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER);")
            .unwrap();

        let mut storage = SqliteAlertStorage::new(&path);

        assert_eq!(
            storage.open(),
            Err(StorageError::SchemaVersion {
                found: None,
                expected: schema::CURRENT_SCHEMA_VERSION
            })
        );
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.db");
        fs::write(&path, b"definitely not a sqlite file, just some bytes").unwrap();

        let mut storage = SqliteAlertStorage::new(&path);

        assert!(matches!(storage.open(), Err(StorageError::Io(_))));
        assert!(!storage.is_open());
    }

    // ==================== Store / Load Tests ====================

    #[test]
    fn test_store_and_load() {
        let (_dir, mut storage) = created();
        let alert = Alert::reminder(at(9, 30), "Call mom")
            .with_id("r1")
            .with_recurrence("FREQ=WEEKLY;BYDAY=SU")
            .with_assets(AssetConfiguration {
                assets: vec![Asset::new("chime", "https://example.com/chime.mp3")],
                play_order: vec!["chime".into()],
                background_asset: None,
                loop_count: 2,
                loop_pause: Duration::from_millis(750),
            });

        storage.store(&alert).unwrap();

        assert_eq!(loaded(&storage), vec![alert.clone()]);
        assert!(storage.contains(&alert.id).unwrap());
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_store_duplicate_id_fails_and_keeps_original() {
        let (_dir, mut storage) = created();
        let original = alarm("a").with_label("Original");
        storage.store(&original).unwrap();

        let duplicate = Alert::timer(at(8, 0)).with_id("a");
        let result = storage.store(&duplicate);

        assert_eq!(
            result,
            Err(StorageError::DuplicateId {
                id: "a".to_string()
            })
        );
        assert_eq!(loaded(&storage), vec![original]);
    }

    #[test]
    fn test_store_rejects_unencodable_alert() {
        let (_dir, mut storage) = created();
        let mut alert = alarm("a");
        alert.static_fields.assets.play_order = vec!["ghost".into()];

        assert_eq!(
            storage.store(&alert),
            Err(StorageError::Codec(CodecError::UnknownAsset(
                "ghost".to_string()
            )))
        );
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_store_rejects_empty_id_and_keeps_database_loadable() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();

        let result = storage.store(&alarm(""));

        assert_eq!(
            result,
            Err(StorageError::Codec(CodecError::MissingColumn("id")))
        );
        assert_eq!(ids(&storage), vec!["a"]);
    }

    #[test]
    fn test_load_fails_on_corrupted_row() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();
        storage.store(&alarm("b")).unwrap();
        storage
            .conn()
            .unwrap()
            .execute("UPDATE alerts SET state = 'EXPLODED' WHERE id = 'b'", [])
            .unwrap();

        let result = storage.load(&NoSettings);

        assert_eq!(
            result,
            Err(StorageError::Codec(CodecError::InvalidValue {
                column: "state",
                value: "EXPLODED".to_string()
            }))
        );
    }

    #[test]
    fn test_load_attaches_settings_without_persisting_them() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();

        let with_ramp = storage
            .load(&DeviceVolumeRamp(VolumeRamp::Ascending))
            .unwrap();
        assert_eq!(
            with_ramp[0].settings,
            Some(PlaybackSettings {
                volume_ramp: VolumeRamp::Ascending
            })
        );

        let without = storage.load(&NoSettings).unwrap();
        assert_eq!(without[0].settings, None);
        assert_eq!(without[0].alert, with_ramp[0].alert);
    }

    // ==================== Modify Tests ====================

    #[test]
    fn test_modify_updates_dynamic_fields() {
        let (_dir, mut storage) = created();
        let mut alert = alarm("a");
        storage.store(&alert).unwrap();

        alert.reschedule(at(7, 9), AlertState::Snoozed);
        storage.modify(&alert).unwrap();

        let stored = loaded(&storage).remove(0);
        assert_eq!(stored.dynamic.scheduled_time, at(7, 9));
        assert_eq!(stored.state(), AlertState::Snoozed);
        assert_eq!(stored, alert);
    }

    #[test]
    fn test_modify_rejects_static_field_changes() {
        let (_dir, mut storage) = created();
        let original = alarm("a").with_label("Original");
        storage.store(&original).unwrap();

        let mut changed = original.clone().with_label("Changed");
        changed.reschedule(at(7, 9), AlertState::Snoozed);
        let result = storage.modify(&changed);

        assert_eq!(
            result,
            Err(StorageError::StaticFieldsChanged {
                id: "a".to_string()
            })
        );
        assert_eq!(loaded(&storage), vec![original]);
    }

    #[test]
    fn test_modify_missing_alert_fails_not_found() {
        let (_dir, mut storage) = created();
        assert_eq!(
            storage.modify(&alarm("ghost")),
            Err(StorageError::NotFound {
                id: "ghost".to_string()
            })
        );
    }

    // ==================== Erase Tests ====================

    #[test]
    fn test_erase_removes_alert() {
        let (_dir, mut storage) = created();
        let alert = alarm("a");
        storage.store(&alert).unwrap();

        storage.erase(&alert).unwrap();

        assert!(!storage.contains(&alert.id).unwrap());
    }

    #[test]
    fn test_erase_missing_alert_succeeds() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();

        storage.erase(&alarm("ghost")).unwrap();

        assert_eq!(ids(&storage), vec!["a"]);
    }

    #[test]
    fn test_bulk_erase_tolerates_missing_alerts() {
        let (_dir, mut storage) = created();
        let (a, b, c, d) = (alarm("a"), alarm("b"), alarm("c"), alarm("d"));
        storage.store(&a).unwrap();
        storage.store(&c).unwrap();
        storage.store(&d).unwrap();

        storage.bulk_erase(&[a, b, c]).unwrap();

        assert_eq!(ids(&storage), vec!["d"]);
    }

    #[test]
    fn test_bulk_erase_is_atomic() {
        let (_dir, mut storage) = created();
        for id in ["a", "b", "c"] {
            storage.store(&alarm(id)).unwrap();
        }
        // Fail the delete of "b" after "a" has already been deleted
        storage
            .conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER fail_on_b BEFORE DELETE ON alerts WHEN OLD.id = 'b'
                 BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
            )
            .unwrap();

        let result = storage.bulk_erase(&[alarm("a"), alarm("b"), alarm("c")]);

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(ids(&storage), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bulk_erase_ids_with_empty_list() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();

        storage.bulk_erase_ids(&[]).unwrap();

        assert_eq!(storage.count().unwrap(), 1);
    }

    // ==================== Clear / Stats Tests ====================

    #[test]
    fn test_clear_database_keeps_tables() {
        let (_dir, mut storage) = created();
        storage.store(&alarm("a")).unwrap();
        storage.store(&alarm("b")).unwrap();

        storage.clear_database().unwrap();

        assert!(storage.load(&NoSettings).unwrap().is_empty());
        storage.store(&alarm("c")).unwrap();
        assert_eq!(ids(&storage), vec!["c"]);

        // Version marker survives, so the database can be reopened
        storage.close();
        storage.open().unwrap();
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_stats_counts_kinds_and_states() {
        let (_dir, mut storage) = created();
        let mut snoozed = alarm("a");
        snoozed.reschedule(at(7, 9), AlertState::Snoozed);
        storage.store(&snoozed).unwrap();
        storage.store(&Alert::timer(at(8, 0)).with_id("t")).unwrap();

        let stats = storage.stats().unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.count_kind(AlertKind::Timer), 1);
        assert_eq!(stats.count_state(AlertState::Snoozed), 1);
    }
}

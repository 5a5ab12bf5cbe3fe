//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite storage,
//! following the Functional Core pattern - pure data, no I/O.

/// Layout version written by `create_database` and required by `open`.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Alerts table: write-once columns first, then scheduling state
CREATE TABLE IF NOT EXISTS alerts (
    id TEXT PRIMARY KEY NOT NULL,
    kind TEXT NOT NULL,
    original_time TEXT NOT NULL,
    label TEXT,
    recurrence TEXT,
    assets TEXT NOT NULL,
    play_order TEXT NOT NULL,
    background_asset TEXT,
    loop_count INTEGER NOT NULL,
    loop_pause_ms INTEGER NOT NULL,
    scheduled_time TEXT NOT NULL,
    state TEXT NOT NULL
);

-- Schema version marker (single row)
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_alerts_scheduled_time ON alerts(scheduled_time);
"#;

// Schema version queries
pub const INSERT_SCHEMA_VERSION: &str = r#"
INSERT INTO schema_version (version)
VALUES (?1)
"#;

pub const SELECT_SCHEMA_VERSION_TABLE: &str = r#"
SELECT 1
FROM sqlite_master
WHERE type = 'table' AND name = 'schema_version'
"#;

pub const SELECT_SCHEMA_VERSION: &str = r#"
SELECT MAX(version)
FROM schema_version
"#;

// Alert queries
pub const INSERT_ALERT: &str = r#"
INSERT INTO alerts (id, kind, original_time, label, recurrence, assets, play_order, background_asset, loop_count, loop_pause_ms, scheduled_time, state)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const SELECT_ALL_ALERTS: &str = r#"
SELECT id, kind, original_time, label, recurrence, assets, play_order, background_asset, loop_count, loop_pause_ms, scheduled_time, state
FROM alerts
ORDER BY id ASC
"#;

pub const SELECT_ALERT_BY_ID: &str = r#"
SELECT id, kind, original_time, label, recurrence, assets, play_order, background_asset, loop_count, loop_pause_ms, scheduled_time, state
FROM alerts
WHERE id = ?1
"#;

pub const SELECT_ALERT_EXISTS: &str = r#"
SELECT 1
FROM alerts
WHERE id = ?1
"#;

pub const COUNT_ALERTS: &str = r#"
SELECT COUNT(*)
FROM alerts
"#;

pub const UPDATE_ALERT_SCHEDULE: &str = r#"
UPDATE alerts
SET scheduled_time = ?2, state = ?3
WHERE id = ?1
"#;

pub const DELETE_ALERT: &str = r#"
DELETE FROM alerts
WHERE id = ?1
"#;

pub const DELETE_ALL_ALERTS: &str = r#"
DELETE FROM alerts
"#;

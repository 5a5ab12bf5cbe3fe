//! Record codec: conversion between [`Alert`] and its persisted row.
//!
//! Pure functions, no I/O. Backends read and write [`AlertRow`] values and
//! never look inside the domain types themselves.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::alert::{
    Alert, AlertDynamic, AlertId, AlertKind, AlertState, AlertStatic, Asset, AssetConfiguration,
};

use super::CodecError;

/// An alert as stored: one column per field, enums as upper-case names,
/// timestamps as RFC 3339 strings and asset lists as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRow {
    pub id: String,
    pub kind: String,
    pub original_time: String,
    pub label: Option<String>,
    pub recurrence: Option<String>,
    pub assets: String,
    pub play_order: String,
    pub background_asset: Option<String>,
    pub loop_count: i64,
    pub loop_pause_ms: i64,
    pub scheduled_time: String,
    pub state: String,
}

impl AlertRow {
    /// Returns true if both rows carry the same write-once columns.
    pub fn same_static_fields(&self, other: &AlertRow) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.original_time == other.original_time
            && self.label == other.label
            && self.recurrence == other.recurrence
            && self.assets == other.assets
            && self.play_order == other.play_order
            && self.background_asset == other.background_asset
            && self.loop_count == other.loop_count
            && self.loop_pause_ms == other.loop_pause_ms
    }
}

/// Converts an alert into its persisted row.
///
/// Fails if the alert could not be decoded again: an empty id, an asset
/// reference that names no asset, or a loop pause finer than a millisecond.
pub fn encode(alert: &Alert) -> Result<AlertRow, CodecError> {
    if alert.id.as_str().is_empty() {
        return Err(CodecError::MissingColumn("id"));
    }

    let statics = &alert.static_fields;
    validate_assets(&statics.assets)?;

    let loop_pause = &statics.assets.loop_pause;
    if loop_pause.subsec_nanos() % 1_000_000 != 0 {
        return Err(CodecError::InvalidValue {
            column: "loop_pause_ms",
            value: format!("{loop_pause:?}"),
        });
    }
    let loop_pause_ms =
        i64::try_from(loop_pause.as_millis()).map_err(|_| CodecError::InvalidValue {
            column: "loop_pause_ms",
            value: format!("{loop_pause:?}"),
        })?;

    Ok(AlertRow {
        id: alert.id.as_str().to_string(),
        kind: kind_to_str(statics.kind).to_string(),
        original_time: format_datetime(&statics.original_time),
        label: statics.label.clone(),
        recurrence: statics.recurrence.clone(),
        assets: to_json("assets", &statics.assets.assets)?,
        play_order: to_json("play_order", &statics.assets.play_order)?,
        background_asset: statics.assets.background_asset.clone(),
        loop_count: i64::from(statics.assets.loop_count),
        loop_pause_ms,
        scheduled_time: format_datetime(&alert.dynamic.scheduled_time),
        state: state_to_str(alert.dynamic.state).to_string(),
    })
}

/// Converts a persisted row back into an alert.
///
/// Either every column is valid and a complete alert is returned, or the
/// first problem found is reported.
pub fn decode(row: AlertRow) -> Result<Alert, CodecError> {
    if row.id.is_empty() {
        return Err(CodecError::MissingColumn("id"));
    }

    let loop_count = u32::try_from(row.loop_count).map_err(|_| CodecError::InvalidValue {
        column: "loop_count",
        value: row.loop_count.to_string(),
    })?;
    let loop_pause_ms = u64::try_from(row.loop_pause_ms).map_err(|_| CodecError::InvalidValue {
        column: "loop_pause_ms",
        value: row.loop_pause_ms.to_string(),
    })?;

    let assets = AssetConfiguration {
        assets: from_json::<Vec<Asset>>("assets", &row.assets)?,
        play_order: from_json::<Vec<String>>("play_order", &row.play_order)?,
        background_asset: row.background_asset,
        loop_count,
        loop_pause: Duration::from_millis(loop_pause_ms),
    };
    validate_assets(&assets)?;

    Ok(Alert {
        id: AlertId::new(row.id),
        static_fields: AlertStatic {
            kind: parse_kind(&row.kind)?,
            original_time: parse_datetime("original_time", &row.original_time)?,
            label: row.label,
            recurrence: row.recurrence,
            assets,
        },
        dynamic: AlertDynamic {
            scheduled_time: parse_datetime("scheduled_time", &row.scheduled_time)?,
            state: parse_state(&row.state)?,
        },
    })
}

/// Serialize AlertKind to its column value.
pub fn kind_to_str(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Alarm => "ALARM",
        AlertKind::Timer => "TIMER",
        AlertKind::Reminder => "REMINDER",
    }
}

/// Serialize AlertState to its column value.
pub fn state_to_str(state: AlertState) -> &'static str {
    match state {
        AlertState::Unset => "UNSET",
        AlertState::Set => "SET",
        AlertState::Ready => "READY",
        AlertState::Activating => "ACTIVATING",
        AlertState::Active => "ACTIVE",
        AlertState::Snoozing => "SNOOZING",
        AlertState::Snoozed => "SNOOZED",
        AlertState::Stopping => "STOPPING",
        AlertState::Stopped => "STOPPED",
        AlertState::Completed => "COMPLETED",
    }
}

/// Format a DateTime<Utc> for storage (RFC 3339, full precision).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// ============================================================================
// Helper functions
// ============================================================================

fn parse_kind(s: &str) -> Result<AlertKind, CodecError> {
    AlertKind::ALL
        .into_iter()
        .find(|kind| kind_to_str(*kind) == s)
        .ok_or_else(|| CodecError::InvalidValue {
            column: "kind",
            value: s.to_string(),
        })
}

fn parse_state(s: &str) -> Result<AlertState, CodecError> {
    AlertState::ALL
        .into_iter()
        .find(|state| state_to_str(*state) == s)
        .ok_or_else(|| CodecError::InvalidValue {
            column: "state",
            value: s.to_string(),
        })
}

fn parse_datetime(column: &'static str, s: &str) -> Result<DateTime<Utc>, CodecError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CodecError::InvalidTimestamp {
            column,
            value: s.to_string(),
        })
}

fn to_json<T: serde::Serialize>(column: &'static str, value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|e| CodecError::Json {
        column,
        message: e.to_string(),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    column: &'static str,
    json: &str,
) -> Result<T, CodecError> {
    serde_json::from_str(json).map_err(|e| CodecError::Json {
        column,
        message: e.to_string(),
    })
}

/// Every asset reference must name a known asset.
fn validate_assets(config: &AssetConfiguration) -> Result<(), CodecError> {
    let known = |id: &str| config.assets.iter().any(|asset| asset.id == id);

    if let Some(unknown) = config.play_order.iter().find(|id| !known(id)) {
        return Err(CodecError::UnknownAsset(unknown.clone()));
    }
    match &config.background_asset {
        Some(background) if !known(background) => {
            Err(CodecError::UnknownAsset(background.clone()))
        }
        _ => Ok(()),
    }
}

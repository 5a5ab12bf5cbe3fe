use std::collections::BTreeMap;

use crate::alert::{Alert, AlertKind, AlertState};

use super::PlaybackSettings;

/// Lifecycle of a storage engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Neither created nor opened yet.
    #[default]
    Uninitialized,
    /// Holding an open database.
    Open,
    /// Previously open, handle released.
    Closed,
}

/// An alert returned by `load`, with the settings attached to it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAlert {
    pub alert: Alert,
    pub settings: Option<PlaybackSettings>,
}

/// Counts of stored alerts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageStats {
    pub total: usize,
    pub by_kind: BTreeMap<AlertKind, usize>,
    pub by_state: BTreeMap<AlertState, usize>,
}

impl StorageStats {
    /// Tallies a set of alerts.
    pub fn from_alerts<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Self {
        let mut stats = Self::default();
        for alert in alerts {
            stats.total += 1;
            *stats.by_kind.entry(alert.kind()).or_default() += 1;
            *stats.by_state.entry(alert.state()).or_default() += 1;
        }
        stats
    }

    pub fn count_kind(&self, kind: AlertKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn count_state(&self, state: AlertState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}

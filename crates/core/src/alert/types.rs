use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an alert.
///
/// Alerts created by the cloud carry an opaque token; locally created alerts
/// get a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertId(String);

impl AlertId {
    /// Wraps an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for AlertId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// The kind of alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertKind {
    Alarm,
    Timer,
    Reminder,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [AlertKind::Alarm, AlertKind::Timer, AlertKind::Reminder];
}

/// Lifecycle state of an alert as tracked by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertState {
    /// Not yet scheduled.
    Unset,
    /// Scheduled and waiting for its time.
    Set,
    /// Due, waiting for the audio focus.
    Ready,
    /// Starting to render.
    Activating,
    /// Rendering.
    Active,
    /// Snooze requested, rendering is stopping.
    Snoozing,
    /// Snoozed until the next scheduled time.
    Snoozed,
    /// Stop requested, rendering is stopping.
    Stopping,
    /// Stopped by the user or the cloud.
    Stopped,
    /// Rendered to completion.
    Completed,
}

impl AlertState {
    pub const ALL: [AlertState; 10] = [
        AlertState::Unset,
        AlertState::Set,
        AlertState::Ready,
        AlertState::Activating,
        AlertState::Active,
        AlertState::Snoozing,
        AlertState::Snoozed,
        AlertState::Stopping,
        AlertState::Stopped,
        AlertState::Completed,
    ];

    /// Returns true if the alert will never render again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertState::Stopped | AlertState::Completed)
    }
}

/// A custom sound asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub url: String,
}

impl Asset {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Custom sound configuration of an alert.
///
/// `play_order` lists asset ids; every entry must name one of `assets`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetConfiguration {
    pub assets: Vec<Asset>,
    pub play_order: Vec<String>,
    pub background_asset: Option<String>,
    pub loop_count: u32,
    /// Pause between loops, stored with millisecond precision.
    pub loop_pause: Duration,
}

/// Write-once descriptive data of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStatic {
    pub kind: AlertKind,
    /// The time the alert was originally scheduled for.
    pub original_time: DateTime<Utc>,
    pub label: Option<String>,
    /// Recurrence rule, opaque to the store.
    pub recurrence: Option<String>,
    pub assets: AssetConfiguration,
}

/// Mutable scheduling state of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDynamic {
    pub scheduled_time: DateTime<Utc>,
    pub state: AlertState,
}

/// A scheduled alarm, timer or reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub static_fields: AlertStatic,
    pub dynamic: AlertDynamic,
}

impl Alert {
    /// Creates a new alert of the given kind, scheduled at `time` in the `Set` state.
    pub fn new(kind: AlertKind, time: DateTime<Utc>) -> Self {
        Self {
            id: AlertId::generate(),
            static_fields: AlertStatic {
                kind,
                original_time: time,
                label: None,
                recurrence: None,
                assets: AssetConfiguration::default(),
            },
            dynamic: AlertDynamic {
                scheduled_time: time,
                state: AlertState::Set,
            },
        }
    }

    pub fn alarm(time: DateTime<Utc>) -> Self {
        Self::new(AlertKind::Alarm, time)
    }

    pub fn timer(time: DateTime<Utc>) -> Self {
        Self::new(AlertKind::Timer, time)
    }

    pub fn reminder(time: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self::new(AlertKind::Reminder, time).with_label(label)
    }

    /// Sets a specific ID for this alert (useful for testing).
    pub fn with_id(mut self, id: impl Into<AlertId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.static_fields.label = Some(label.into());
        self
    }

    pub fn with_recurrence(mut self, rule: impl Into<String>) -> Self {
        self.static_fields.recurrence = Some(rule.into());
        self
    }

    pub fn with_assets(mut self, assets: AssetConfiguration) -> Self {
        self.static_fields.assets = assets;
        self
    }

    pub fn kind(&self) -> AlertKind {
        self.static_fields.kind
    }

    pub fn state(&self) -> AlertState {
        self.dynamic.state
    }

    /// Moves the alert to a new state and scheduled time.
    pub fn reschedule(&mut self, scheduled_time: DateTime<Utc>, state: AlertState) {
        self.dynamic.scheduled_time = scheduled_time;
        self.dynamic.state = state;
    }
}

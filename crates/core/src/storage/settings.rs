//! Bridge to the device settings that shape how a loaded alert is played.
//!
//! The settings manager owns these values; the store only asks for them while
//! loading and hands them back next to each alert. Nothing here is persisted.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertId};

use super::LoadedAlert;

/// How the volume of an alert evolves while it is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeRamp {
    /// Play at the configured volume from the start.
    #[default]
    None,
    /// Start quiet and ramp up.
    Ascending,
}

/// Playback configuration attached to an alert at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub volume_ramp: VolumeRamp,
}

/// Supplies playback settings for alerts being loaded.
///
/// Lookups must not have side effects; a missing configuration is not an error.
pub trait AlertSettingsProvider {
    fn lookup_config(&self, id: &AlertId) -> Option<PlaybackSettings>;
}

/// Provider that never supplies settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl AlertSettingsProvider for NoSettings {
    fn lookup_config(&self, _id: &AlertId) -> Option<PlaybackSettings> {
        None
    }
}

/// A single device-wide volume ramp setting applied to every alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceVolumeRamp(pub VolumeRamp);

impl AlertSettingsProvider for DeviceVolumeRamp {
    fn lookup_config(&self, _id: &AlertId) -> Option<PlaybackSettings> {
        Some(PlaybackSettings {
            volume_ramp: self.0,
        })
    }
}

impl<S: BuildHasher> AlertSettingsProvider for HashMap<AlertId, PlaybackSettings, S> {
    fn lookup_config(&self, id: &AlertId) -> Option<PlaybackSettings> {
        self.get(id).copied()
    }
}

impl<F> AlertSettingsProvider for F
where
    F: Fn(&AlertId) -> Option<PlaybackSettings>,
{
    fn lookup_config(&self, id: &AlertId) -> Option<PlaybackSettings> {
        self(id)
    }
}

/// Pairs every alert with whatever the provider has for it.
pub fn attach_settings(
    alerts: Vec<Alert>,
    provider: &dyn AlertSettingsProvider,
) -> Vec<LoadedAlert> {
    alerts
        .into_iter()
        .map(|alert| {
            let settings = provider.lookup_config(&alert.id);
            LoadedAlert { alert, settings }
        })
        .collect()
}

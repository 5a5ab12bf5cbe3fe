pub mod codec;
mod error;
mod settings;
mod traits;
mod types;

pub use codec::{decode, encode, AlertRow};
pub use error::{CodecError, Result, StorageError};
pub use settings::{
    attach_settings, AlertSettingsProvider, DeviceVolumeRamp, NoSettings, PlaybackSettings,
    VolumeRamp,
};
pub use traits::AlertStorage;
pub use types::{Lifecycle, LoadedAlert, StorageStats};

mod types;

pub use types::{
    Alert, AlertDynamic, AlertId, AlertKind, AlertState, AlertStatic, Asset, AssetConfiguration,
};

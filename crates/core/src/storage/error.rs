use thiserror::Error;

/// Errors that can occur when converting between an alert and its persisted row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Invalid value for {column}: {value}")]
    InvalidValue { column: &'static str, value: String },
    #[error("Invalid timestamp for {column}: {value}")]
    InvalidTimestamp { column: &'static str, value: String },
    #[error("Invalid JSON in {column}: {message}")]
    Json {
        column: &'static str,
        message: String,
    },
    #[error("Play order references unknown asset: {0}")]
    UnknownAsset(String),
}

/// Errors that can occur during alert storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Database is already open")]
    AlreadyOpen,
    #[error("Database is not open")]
    NotOpen,
    #[error("Database already exists: {location}")]
    DatabaseExists { location: String },
    #[error("Database not found: {location}")]
    DatabaseMissing { location: String },
    #[error("Alert already exists: {id}")]
    DuplicateId { id: String },
    #[error("Alert not found: {id}")]
    NotFound { id: String },
    #[error("Static fields of alert {id} cannot be modified")]
    StaticFieldsChanged { id: String },
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Unsupported schema version {} (expected {expected})", schema_version_label(.found))]
    SchemaVersion { found: Option<i64>, expected: i64 },
}

fn schema_version_label(found: &Option<i64>) -> String {
    match found {
        Some(version) => version.to_string(),
        None => "missing".to_string(),
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

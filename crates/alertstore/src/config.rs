use std::{env, path::PathBuf, time::Duration};

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite database file (default: "alerts.db")
    pub database_path: PathBuf,
    /// How long SQLite waits on a locked database, in milliseconds (default: 5,000)
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ALERTS_DB_PATH` - SQLite database path (default: "alerts.db")
    /// - `ALERTS_DB_BUSY_TIMEOUT_MS` - SQLite busy timeout (default: 5,000)
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("ALERTS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("alerts.db")),
            busy_timeout_ms: env::var("ALERTS_DB_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
        }
    }

    /// Configuration for a database at `path` with default settings otherwise.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            busy_timeout_ms: 5_000,
        }
    }

    /// Get the busy timeout as a Duration.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

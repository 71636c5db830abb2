use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default database file name, placed in `data_dir` (or the working directory).
pub const DEFAULT_DB_FILE: &str = "inventory.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where the inventory lives on disk.
///
/// Loaded from an optional TOML file, then overridden by command-line flags.
/// The opened store is passed down explicitly; nothing below the binary
/// reads this on its own.
///
/// ```toml
/// data_dir = "/var/lib/inventory"
/// sqlite_path = "/var/lib/inventory/stock.db"   # optional
/// busy_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/inventory.db` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// How long a call waits on a locked database file before failing.
    pub busy_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sqlite_path: None,
            busy_timeout_ms: 5000,
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command-line overrides on top of whatever was loaded.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, sqlite_path: Option<PathBuf>) -> Self {
        if data_dir.is_some() {
            self.data_dir = data_dir;
        }
        if sqlite_path.is_some() {
            self.sqlite_path = sqlite_path;
        }
        self
    }

    /// Resolve the SQLite database path, falling back to `{data_dir}/inventory.db`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join(DEFAULT_DB_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
        })
    }

    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.busy_timeout_ms)
    }
}

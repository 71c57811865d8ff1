//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/linkgrid/config.json`).  Every section is optional and
//! falls back to compiled-in defaults, so the file can grow new sections
//! without breaking older ones.
//!
//! # Example
//!
//! ```json
//! {
//!   "storage": {
//!     "path": "/home/me/.local/share/linkgrid/storage.json",
//!     "fallback_to_memory": true
//!   },
//!   "persistence": { "reorder_debounce_ms": 300 },
//!   "export": { "directory": "/home/me/Downloads" },
//!   "socket_path": "/run/user/1000/linkgrid.sock"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the host store lives and what to do when it is unusable.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Write scheduling.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Export destination.
    #[serde(default)]
    pub export: ExportConfig,

    /// Command socket path.  `None` uses `$XDG_RUNTIME_DIR/linkgrid.sock`.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

/// Host store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the persisted keys.
    pub path: PathBuf,
    /// Use the in-memory store when `path` cannot be opened.
    pub fallback_to_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: data_dir().join("storage.json"),
            fallback_to_memory: true,
        }
    }
}

/// Write scheduling settings.  Durations are in **milliseconds**.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Quiet period after the last reorder before the order is written.
    pub reorder_debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            reorder_debounce_ms: 300,
        }
    }
}

impl PersistenceConfig {
    pub fn reorder_debounce(&self) -> Duration {
        Duration::from_millis(self.reorder_debounce_ms)
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to when a command names none.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// The command socket path, resolving the default when unset.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| {
            let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(runtime).join("linkgrid.sock")
        })
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/linkgrid`).
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("linkgrid")
}

/// Resolve the data directory (`$XDG_DATA_HOME/linkgrid`).
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share").join("linkgrid")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(home_fallback)
    })
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

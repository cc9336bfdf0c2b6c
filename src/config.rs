//! Startup configuration.
//!
//! Resolved exactly once in `main` and handed to the tool registry by
//! value; nothing reads ambient state after startup. Precedence for the
//! default database: explicit CLI argument (applied by the binary), then
//! the `SQLENS_DB` environment variable, then the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Environment variable holding the default database path.
pub const DB_ENV_VAR: &str = "SQLENS_DB";

/// Environment variable pointing at an alternate config file.
pub const CONFIG_ENV_VAR: &str = "SQLENS_CONFIG";

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = ".sqlens.toml";

const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings for both binaries.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default database used when a call carries no `database_path`.
    pub database: Option<PathBuf>,
    /// Per-call statement deadline in seconds; 0 disables it.
    pub query_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when the file is
    /// missing or unreadable. A malformed file logs a warning rather than
    /// aborting startup.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Full startup resolution: config file (from `SQLENS_CONFIG` or the
    /// default location), then the `SQLENS_DB` override.
    pub fn from_startup_env() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load(&path);
        if let Ok(database) = std::env::var(DB_ENV_VAR) {
            if !database.is_empty() {
                config.database = Some(PathBuf::from(database));
            }
        }
        config
    }

    /// The statement deadline, or None when disabled.
    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout_secs > 0).then(|| Duration::from_secs(self.query_timeout_secs))
    }
}

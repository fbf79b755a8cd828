//! Server configuration
//!
//! Settings are read from a TOML file named by `GARDENBOOK_SETTINGS`:
//!
//! ```toml
//! database_url = "sqlite:///var/lib/gardenbook/gardens.db"
//! bind_addr = "0.0.0.0:8080"
//! ```
//!
//! Individual values can then be overridden with `GARDENBOOK_DATABASE_URL`
//! and `GARDENBOOK_ADDR`. Without a settings file the defaults apply.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "GARDENBOOK_SETTINGS";
/// Environment override for the database connection string
pub const DATABASE_URL_ENV: &str = "GARDENBOOK_DATABASE_URL";
/// Environment override for the listen address
pub const ADDR_ENV: &str = "GARDENBOOK_ADDR";

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DB_FILE: &str = "gardenbook.db";

/// Process-wide server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Connection string: a path, `sqlite://<path>` or `:memory:`
    pub database_url: String,
    /// Address the HTTP listener binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_path().display().to_string(),
            bind_addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load settings from the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a settings file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!("Loaded settings from {:?}", path);
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.database_url = url;
        }
        if let Some(addr) = lookup(ADDR_ENV).filter(|v| !v.is_empty()) {
            self.bind_addr = addr;
        }
    }
}

/// `gardenbook.db` in the platform data directory, or the working directory
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("gardenbook").join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

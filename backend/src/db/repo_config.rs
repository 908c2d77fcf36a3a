//! Browser configuration file support.
//!
//! Configuration is read from a TOML file (`browser.toml`) and then
//! overridden by environment variables. Every section is optional.
//!
//! ```toml
//! [database]
//! path = "data/DSO.db"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [filters]
//! empty_selection = "none"   # or "all"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::RepositoryError;
use crate::services::filter::{EmptySelection, FilterOptions};

/// Explicit config file path.
pub const CONFIG_PATH_ENV: &str = "DSO_CONFIG";
/// Overrides `database.path`.
pub const DB_PATH_ENV: &str = "DSO_DB_PATH";
/// Overrides `server.host`.
pub const HOST_ENV: &str = "HOST";
/// Overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Browser configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub filters: FilterSettings,
}

/// Location of the SQLite store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// HTTP bind settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Filter engine behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub empty_selection: EmptySelection,
}

fn default_db_path() -> PathBuf {
    Path::new("data").join("DSO.db")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl BrowserConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(BrowserConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find `browser.toml` in the standard locations.
    ///
    /// Searches:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("browser.toml"),
            PathBuf::from("backend/browser.toml"),
            PathBuf::from("../browser.toml"),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Load configuration for the server process.
    ///
    /// Uses `DSO_CONFIG` when set, otherwise the first `browser.toml` found,
    /// otherwise defaults. Environment overrides are applied last.
    pub fn load() -> Result<Self, RepositoryError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => match Self::default_location() {
                Some(path) => {
                    log::info!("Loading configuration from {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), RepositoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                RepositoryError::configuration(format!("Invalid {} value: {}", PORT_ENV, port))
            })?;
        }
        Ok(())
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            empty_selection: self.filters.empty_selection,
        }
    }
}

//! Configuration loading and resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing config file never prevents startup; an unreadable or malformed
//! one does.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "product-catalog";

pub const ENV_CONFIG: &str = "CATALOG_CONFIG";
pub const ENV_DATABASE: &str = "CATALOG_DATABASE";
pub const ENV_HOST: &str = "CATALOG_HOST";
pub const ENV_PORT: &str = "CATALOG_PORT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Config file that was actually loaded, if any
    pub config_file: Option<PathBuf>,
}

impl CatalogConfig {
    /// Resolve configuration from overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let (toml_config, config_file) = Self::load_file_layer(overrides)?;

        let database_path = overrides
            .database
            .clone()
            .or_else(|| env_var(ENV_DATABASE).map(PathBuf::from))
            .or(toml_config.database)
            .unwrap_or_else(default_database_path);

        let host = overrides
            .host
            .clone()
            .or_else(|| env_var(ENV_HOST))
            .or(toml_config.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match overrides.port {
            Some(port) => port,
            None => match env_var(ENV_PORT) {
                Some(raw) => raw.parse::<u16>().map_err(|_| {
                    Error::Config(format!("{} is not a valid port: {:?}", ENV_PORT, raw))
                })?,
                None => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let log_level = overrides
            .log_level
            .clone()
            .or(toml_config.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            database_path,
            host,
            port,
            log_level,
            config_file,
        })
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn load_file_layer(overrides: &ConfigOverrides) -> Result<(TomlConfig, Option<PathBuf>)> {
        let explicit = overrides
            .config_file
            .clone()
            .or_else(|| env_var(ENV_CONFIG).map(PathBuf::from));

        match explicit {
            Some(path) if path.exists() => Ok((load_toml_config(&path)?, Some(path))),
            Some(path) => {
                warn!(
                    "Config file {} not found, continuing with defaults",
                    path.display()
                );
                Ok((TomlConfig::default(), None))
            }
            None => match default_config_file() {
                Some(path) if path.exists() => Ok((load_toml_config(&path)?, Some(path))),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok((TomlConfig::default(), None))
                }
            },
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location (`~/.config/product-catalog/config.toml` on Linux)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./catalog_data"))
        .join("catalog.db")
}

/// Environment variable lookup that treats empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config_all_keys() {
        let config: TomlConfig = toml::from_str(
            r#"
            database = "/srv/catalog/catalog.db"
            host = "0.0.0.0"
            port = 8080
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.database, Some(PathBuf::from("/srv/catalog/catalog.db")));
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_toml_config_empty_file() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_toml_config_rejects_unknown_keys() {
        let result: std::result::Result<TomlConfig, _> = toml::from_str("root_folder = \"/tmp\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert_eq!(path.file_name().unwrap(), "catalog.db");
    }
}

//! Tests for configuration resolution
//!
//! - Priority order: CLI > environment > TOML > compiled default
//! - Missing config file does not prevent startup
//! - Malformed config file is reported
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate CATALOG_* variables are marked with #[serial].

use catalog_common::config::{
    CatalogConfig, ConfigOverrides, DEFAULT_HOST, DEFAULT_PORT, ENV_CONFIG, ENV_DATABASE,
    ENV_HOST, ENV_PORT,
};
use catalog_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;

fn clear_env() {
    env::remove_var(ENV_CONFIG);
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_HOST);
    env::remove_var(ENV_PORT);
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_missing_explicit_config_uses_defaults() {
    clear_env();

    let overrides = ConfigOverrides {
        config_file: Some(PathBuf::from("/nonexistent/catalog/config.toml")),
        ..Default::default()
    };
    let config = CatalogConfig::resolve(&overrides).unwrap();

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.log_level, "info");
    assert!(config.config_file.is_none());
}

#[test]
#[serial]
fn test_toml_values_applied() {
    clear_env();
    let file = write_config(
        r#"
        database = "/srv/catalog.db"
        host = "0.0.0.0"
        port = 9000
        log_level = "debug"
        "#,
    );

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = CatalogConfig::resolve(&overrides).unwrap();

    assert_eq!(config.database_path, PathBuf::from("/srv/catalog.db"));
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9000);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.config_file.as_deref(), Some(file.path()));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let file = write_config("port = 9000\nhost = \"0.0.0.0\"\n");
    env::set_var(ENV_PORT, "9100");
    env::set_var(ENV_CONFIG, file.path());

    let config = CatalogConfig::resolve(&ConfigOverrides::default()).unwrap();

    assert_eq!(config.port, 9100);
    assert_eq!(config.host, "0.0.0.0");

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_PORT, "9100");
    env::set_var(ENV_DATABASE, "/tmp/from-env.db");

    let overrides = ConfigOverrides {
        config_file: Some(PathBuf::from("/nonexistent/config.toml")),
        port: Some(9200),
        database: Some(PathBuf::from("/tmp/from-cli.db")),
        ..Default::default()
    };
    let config = CatalogConfig::resolve(&overrides).unwrap();

    assert_eq!(config.port, 9200);
    assert_eq!(config.database_path, PathBuf::from("/tmp/from-cli.db"));
    assert_eq!(config.bind_addr(), format!("{}:9200", DEFAULT_HOST));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_port_rejected() {
    clear_env();
    env::set_var(ENV_PORT, "not-a-port");

    let overrides = ConfigOverrides {
        config_file: Some(PathBuf::from("/nonexistent/config.toml")),
        ..Default::default()
    };
    let result = CatalogConfig::resolve(&overrides);

    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_malformed_config_rejected() {
    clear_env();
    let file = write_config("port = \"eighty\"\n");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let result = CatalogConfig::resolve(&overrides);

    assert!(matches!(result, Err(Error::Config(_))));
}

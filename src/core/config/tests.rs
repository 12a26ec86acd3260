use super::data::{Config, ConfigKey};
use super::{BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_REVEAL_INTERVAL_MS};
use crate::utils::test_utils::{env_lock, TestEnvVarGuard};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set(ConfigKey::BaseUrl, "https://rex.example.com").unwrap();
    config.set(ConfigKey::RevealMs, "0").unwrap();
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.base_url.as_deref(), Some("https://rex.example.com"));
    assert_eq!(loaded.reveal_interval_ms(), 0);

    let mut loaded = loaded;
    loaded.unset(ConfigKey::BaseUrl);
    loaded.save_to_path(&config_path).expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.base_url, None);
    assert_eq!(reloaded.reveal_interval_ms, Some(0));
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "base_url = [unterminated").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_reveal_ms_must_be_numeric() {
    let mut config = Config::default();
    assert!(config.set(ConfigKey::RevealMs, "fast").is_err());
    assert_eq!(config.reveal_interval_ms(), DEFAULT_REVEAL_INTERVAL_MS);
}

#[test]
fn test_config_keys_parse_case_insensitively() {
    assert_eq!(ConfigKey::parse("BASE-URL"), Some(ConfigKey::BaseUrl));
    assert_eq!(ConfigKey::parse(" admin-email "), Some(ConfigKey::AdminEmail));
    assert_eq!(ConfigKey::parse("theme"), None);
}

#[test]
fn test_base_url_resolution_order() {
    let _lock = env_lock();
    let mut env = TestEnvVarGuard::new();
    env.remove_var(BASE_URL_ENV);

    let mut config = Config::default();
    assert_eq!(config.resolve_base_url(None), DEFAULT_BASE_URL);

    config.base_url = Some("http://from-file:5000".to_string());
    assert_eq!(config.resolve_base_url(None), "http://from-file:5000");

    env.set_var(BASE_URL_ENV, "http://from-env:5000");
    assert_eq!(config.resolve_base_url(None), "http://from-env:5000");

    assert_eq!(
        config.resolve_base_url(Some("http://from-flag:5000")),
        "http://from-flag:5000"
    );
}

//! `rex set` and `rex unset`.

use std::fmt;

use crate::core::config::{Config, ConfigKey};

#[derive(Debug)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue { key: ConfigKey, message: String },
    MissingArgs {
        hint: String,
        example: &'static str,
    },
    ConfigError(String),
}

impl SettingError {
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Valid keys: {}", valid_keys());
            }
            SettingError::InvalidValue { key, message } => {
                eprintln!("❌ Invalid value for {}: {message}", key.as_str());
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to save configuration: {msg}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {}: {message}", key.as_str())
            }
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}

fn valid_keys() -> String {
    ConfigKey::ALL
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_key(key: &str) -> Result<ConfigKey, SettingError> {
    ConfigKey::parse(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

/// Apply `rex set <key> <value...>` to `config`, returning the confirmation.
pub fn apply_set(config: &mut Config, key: &str, value: &[String]) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    let value = value.join(" ");
    if value.trim().is_empty() {
        return Err(SettingError::MissingArgs {
            hint: format!("Provide a value for {}.", key.as_str()),
            example: "rex set base-url https://rex.example.com",
        });
    }
    config
        .set(key, &value)
        .map_err(|message| SettingError::InvalidValue { key, message })?;
    Ok(format!("✅ Set {} to: {}", key.as_str(), value.trim()))
}

pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    config.unset(key);
    Ok(format!("✅ Unset {}", key.as_str()))
}

fn save(config: &Config) -> Result<(), SettingError> {
    config
        .save()
        .map_err(|err| SettingError::ConfigError(err.to_string()))
}

fn load() -> Result<Config, SettingError> {
    Config::load().map_err(|err| SettingError::ConfigError(err.to_string()))
}

/// `rex set` with no key prints the current configuration.
pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), SettingError> {
    let mut config = load()?;
    let Some(key) = key else {
        config.print_all();
        return Ok(());
    };
    let message = apply_set(&mut config, &key, &value)?;
    save(&config)?;
    println!("{message}");
    Ok(())
}

pub fn run_unset(key: &str) -> Result<(), SettingError> {
    let mut config = load()?;
    let message = apply_unset(&mut config, key)?;
    save(&config)?;
    println!("{message}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(value: &str) -> Vec<String> {
        value.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn set_joins_multi_word_values() {
        let mut config = Config::default();
        let message = apply_set(&mut config, "username", &words("Mohsin Raja")).unwrap();
        assert_eq!(config.username.as_deref(), Some("Mohsin Raja"));
        assert_eq!(message, "✅ Set username to: Mohsin Raja");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "theme", &words("dark")).unwrap_err();
        assert!(matches!(err, SettingError::UnknownKey(ref key) if key == "theme"));
        assert!(apply_unset(&mut config, "theme").is_err());
    }

    #[test]
    fn reveal_ms_must_parse() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "reveal-ms", &words("slow")).unwrap_err();
        assert!(matches!(
            err,
            SettingError::InvalidValue {
                key: ConfigKey::RevealMs,
                ..
            }
        ));
        assert_eq!(config.reveal_interval_ms, None);
    }

    #[test]
    fn missing_value_asks_for_one() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "base-url", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Provide a value for base-url.");
    }

    #[test]
    fn unset_clears_the_value() {
        let mut config = Config {
            admin_email: Some("admin@rex.test".to_string()),
            ..Config::default()
        };
        apply_unset(&mut config, "admin-email").unwrap();
        assert_eq!(config.admin_email, None);
    }
}

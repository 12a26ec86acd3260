use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Root URL of the Rex backend (e.g., "https://rex.example.com")
    pub base_url: Option<String>,
    /// Username sent before one is inferred from the conversation
    pub username: Option<String>,
    /// Milliseconds between revealed characters; 0 shows replies at once
    pub reveal_interval_ms: Option<u64>,
    /// Prefill for the admin login form
    pub admin_email: Option<String>,
}

/// Keys accepted by `rex set` / `rex unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    Username,
    RevealMs,
    AdminEmail,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::BaseUrl,
        ConfigKey::Username,
        ConfigKey::RevealMs,
        ConfigKey::AdminEmail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Username => "username",
            ConfigKey::RevealMs => "reveal-ms",
            ConfigKey::AdminEmail => "admin-email",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(input.trim()))
    }
}

impl Config {
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::BaseUrl => self.base_url.clone(),
            ConfigKey::Username => self.username.clone(),
            ConfigKey::RevealMs => self.reveal_interval_ms.map(|ms| ms.to_string()),
            ConfigKey::AdminEmail => self.admin_email.clone(),
        }
    }

    /// Store `value` under `key`. Only `reveal-ms` can fail to parse.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            ConfigKey::BaseUrl => self.base_url = Some(value.to_string()),
            ConfigKey::Username => self.username = Some(value.to_string()),
            ConfigKey::RevealMs => {
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("'{value}' is not a whole number of milliseconds"))?;
                self.reveal_interval_ms = Some(ms);
            }
            ConfigKey::AdminEmail => self.admin_email = Some(value.to_string()),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Username => self.username = None,
            ConfigKey::RevealMs => self.reveal_interval_ms = None,
            ConfigKey::AdminEmail => self.admin_email = None,
        }
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in ConfigKey::ALL {
            match self.get(key) {
                Some(value) => println!("  {}: {}", key.as_str(), value),
                None => println!("  {}: (unset)", key.as_str()),
            }
        }
        println!("  config file: {}", path_display(Self::get_config_path()));
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths under the home directory to `~` notation on Unix.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

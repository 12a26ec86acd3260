//! Persistent client configuration.
//!
//! The TOML file lives in the platform config directory. Values resolve in
//! this order: CLI flag, environment variable, config file, built-in default.

pub mod data;
pub mod io;

#[cfg(test)]
mod tests;

pub use data::{path_display, Config, ConfigKey};
pub use io::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 30;
pub const BASE_URL_ENV: &str = "REX_BASE_URL";

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::get_config_path())
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to_path(&Self::get_config_path())
    }

    /// Backend URL after applying the CLI override and `REX_BASE_URL`.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(BASE_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn reveal_interval_ms(&self) -> u64 {
        self.reveal_interval_ms
            .unwrap_or(DEFAULT_REVEAL_INTERVAL_MS)
    }
}

//! Configuration file support

use concierge_api::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default whole-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for concierge
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// API root of the assistant backend
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("concierge")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CONCIERGE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        Config {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
        .save()
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    /// Client settings, filling in defaults
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# concierge configuration file
# Place at ~/.config/concierge/config.toml (Linux/Mac) or %APPDATA%\concierge\config.toml (Windows)

# API root of the assistant backend
base_url = "http://localhost:8001/api"

# Give up on a request after this many seconds
timeout_secs = 60
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config = Config::parse(example_config());
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8001/api"));
        assert_eq!(config.timeout_secs, Some(60));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse("timeout_secs = 5\n");
        let client = config.client_config();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_config_falls_back() {
        assert_eq!(Config::parse("base_url = ["), Config::default());
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::parse(example_config())
            .with_overrides(Some("https://assist.example.com/api".into()), None);
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://assist.example.com/api")
        );
        assert_eq!(config.timeout_secs, Some(60));
    }
}

use crate::error::Result;
use serde::Deserialize;
use std::fs;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the public UPC API.
    pub base_url: String,
    /// Page size for the paginated cases endpoint.
    pub page_size: u32,
    /// Width of the receipt-date query window, in days before today.
    pub window_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-prod.unified-patent-court.org/upc/public/api/v4".to_string(),
            page_size: 100,
            window_days: 21,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to the
    /// built-in defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(content) => {
                let config: Config = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_api() {
        let config = Config::default();
        assert!(config.api.base_url.ends_with("/api/v4"));
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.api.window_days, 21);
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[retry]\nmax_attempts = 3\n").unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert_eq!(config.api.page_size, 100);
    }
}

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_SESSION_FILE: &str = ".vaultpay/session.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("VAULTPAY_POLL_INTERVAL_MS must be a positive number of milliseconds, got {0:?}")]
    InvalidPollInterval(String),
    #[error("VAULTPAY_API_URL must not be empty")]
    EmptyApiUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Always ends with `/` so endpoint paths can be appended directly
    pub api_url: String,
    pub poll_interval: Duration,
    pub session_file: PathBuf,
}

impl Config {
    /// Reads `VAULTPAY_*` variables, falling back to local defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("VAULTPAY_API_URL") {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::EmptyApiUrl),
            Some(url) => url.trim().to_string(),
            None => DEFAULT_API_URL.to_string(),
        };
        let api_url = if api_url.ends_with('/') {
            api_url
        } else {
            format!("{}/", api_url)
        };

        let poll_interval = match lookup("VAULTPAY_POLL_INTERVAL_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidPollInterval(raw)),
            },
            None => Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        };

        let session_file = lookup("VAULTPAY_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        Ok(Config {
            api_url,
            poll_interval,
            session_file,
        })
    }
}

//! Application configuration management.
//!
//! `Config` is the persisted user configuration (API endpoint override,
//! request timeout, last used email), stored at
//! `~/.config/talentai/config.json`. `ClientConfig` is the resolved
//! runtime configuration handed to `ApiClient`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "talentai";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Route the host should show when a session ends.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Environment variable overriding the API base URL
pub const ENV_API_BASE_URL: &str = "TALENTAI_API_BASE_URL";

/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "TALENTAI_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint; request paths are appended to it.
    pub base_url: String,
    pub timeout: Duration,
    pub login_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Join the base URL and a request path without doubling slashes.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve the client configuration from process environment,
    /// then this file, then defaults.
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_from(|key| std::env::var(key).ok())
    }

    fn client_config_from(&self, env: impl Fn(&str) -> Option<String>) -> ClientConfig {
        let mut resolved = ClientConfig::default();

        if let Some(url) = env(ENV_API_BASE_URL)
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
        {
            resolved.base_url = url;
        }

        let timeout = env(ENV_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .or(self.request_timeout_secs.filter(|secs| *secs > 0));
        if let Some(secs) = timeout {
            resolved.timeout = Duration::from_secs(secs);
        }

        resolved
    }
}

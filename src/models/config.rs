//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Polling behavior settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay settings from environment variables.
    ///
    /// Recognized: `ADWATCH_BASE_URL`, `ADWATCH_POLL_INTERVAL_MINUTES`,
    /// `ADWATCH_TIMEOUT_SECS`.
    pub fn apply_env(&mut self) {
        if let Ok(value) = env::var("ADWATCH_BASE_URL") {
            self.site.base_url = value;
        }
        if let Some(minutes) = parse_env_var("ADWATCH_POLL_INTERVAL_MINUTES") {
            self.watch.poll_interval_minutes = minutes;
        }
        if let Some(secs) = parse_env_var("ADWATCH_TIMEOUT_SECS") {
            self.http.timeout_secs = secs;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url is invalid: {e}")))?;
        if self.watch.poll_interval_minutes == 0 {
            return Err(AppError::validation(
                "watch.poll_interval_minutes must be > 0",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        Ok(())
    }
}

fn parse_env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring unparseable {name}={value}");
            None
        }
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin prefix used to build absolute listing URLs
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
        }
    }
}

/// Polling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Minutes between poll cycles for each subscriber
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_minutes: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: defaults::poll_interval(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests.
    ///
    /// The target host rejects default/automated-looking clients, so this
    /// must look like a desktop browser.
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.ebay-kleinanzeigen.de".into()
    }
    pub fn poll_interval() -> u64 {
        2
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
}

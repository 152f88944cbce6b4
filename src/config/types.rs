use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Browser identification sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

/// Main configuration structure for Disclosure-Tracker
///
/// Every section is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Parses the configured site origin
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.source.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", self.source.base_url, e))
        })
    }

    /// URL of the first listing page
    pub fn start_url(&self) -> Result<Url, ConfigError> {
        self.base_url()?.join(&self.source.start_path).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid start-path '{}': {}",
                self.source.start_path, e
            ))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.traversal.page_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.poll_interval_secs)
    }
}

/// Where the listing lives and how to request it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site origin, e.g. "https://www.capitoltrades.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the first listing page, joined onto `base_url`
    #[serde(rename = "start-path")]
    pub start_path: String,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.capitoltrades.com".to_string(),
            start_path: "/trades?page=1".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Page walking behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Politeness delay between page fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Maximum pages visited by one incremental traversal
    #[serde(rename = "incremental-page-cap")]
    pub incremental_page_cap: u32,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 1000,
            incremental_page_cap: 3,
        }
    }
}

/// Poll loop cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Wait between two incremental cycles (seconds)
    #[serde(rename = "poll-interval-secs")]
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3600,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV record store
    #[serde(rename = "store-path")]
    pub store_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            store_path: "capitol_trades.csv".to_string(),
        }
    }
}

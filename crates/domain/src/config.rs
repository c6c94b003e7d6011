//! Configuration structures
//!
//! Every section has serde defaults so a config file only needs to name what
//! it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS,
    DEFAULT_DATE_RANGE_DAYS, SYNC_JOBS_POLL_INTERVAL_MS,
};
use crate::errors::{AdSyncError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values that would make the client unusable.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AdSyncError::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(AdSyncError::Config("api.timeout_secs must be positive".into()));
        }
        if self.polling.interval_ms == 0 {
            return Err(AdSyncError::Config("polling.interval_ms must be positive".into()));
        }
        if self.selection.default_range_days == 0 {
            return Err(AdSyncError::Config(
                "selection.default_range_days must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Upstream API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Absolute http(s) URL the resource paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Transport attempts for connection failures. HTTP statuses are never
    /// re-sent.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl ApiConfig {
    /// Per-request deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            max_attempts: DEFAULT_API_MAX_ATTEMPTS,
        }
    }
}

/// Sync job polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

impl PollingConfig {
    /// Delay between sync-jobs fetches while a job is active.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: SYNC_JOBS_POLL_INTERVAL_MS }
    }
}

/// Selection defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { default_range_days: DEFAULT_DATE_RANGE_DAYS }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

const fn default_max_attempts() -> usize {
    DEFAULT_API_MAX_ATTEMPTS
}

const fn default_poll_interval_ms() -> u64 {
    SYNC_JOBS_POLL_INTERVAL_MS
}

const fn default_range_days() -> u32 {
    DEFAULT_DATE_RANGE_DAYS
}

fn default_log_filter() -> String {
    "info".to_string()
}

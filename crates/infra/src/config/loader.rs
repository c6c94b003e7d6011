//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `ADSYNC_API_URL` is set, everything comes from the environment
//!    (unset optional variables keep their defaults, invalid ones fail)
//! 2. Otherwise the first config file found by [`probe_config_paths`] is used
//! 3. JSON and TOML are supported, chosen by file extension
//!
//! ## Environment Variables
//! - `ADSYNC_API_URL`: Upstream API base URL (required for the env path)
//! - `ADSYNC_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ADSYNC_API_MAX_ATTEMPTS`: Transport attempts for connection failures
//! - `ADSYNC_POLL_INTERVAL_MS`: Sync job polling interval in milliseconds
//! - `ADSYNC_DEFAULT_RANGE_DAYS`: Length of the default date range
//! - `ADSYNC_LOG_FILTER`: Default tracing filter directive
//! - `ADSYNC_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` then `./adsync.{json,toml}` (working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use adsync_domain::{
    AdSyncError, ApiConfig, Config, LoggingConfig, PollingConfig, Result, SelectionConfig,
};

use crate::errors::InfraError;

const API_URL_VAR: &str = "ADSYNC_API_URL";

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "adsync.json", "adsync.toml"];

/// Load configuration with automatic fallback strategy
///
/// Environment first, then a config file. The result is validated.
///
/// # Errors
/// Returns `AdSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value is out of range
pub fn load() -> Result<Config> {
    let config = if std::env::var_os(API_URL_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else {
        tracing::debug!("{API_URL_VAR} not set, trying file");
        load_from_file(None)?
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `ADSYNC_API_URL` must be present; every other variable is optional.
///
/// # Errors
/// Returns `AdSyncError::Config` if `ADSYNC_API_URL` is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var(API_URL_VAR)?;
    let api_defaults = ApiConfig::default();

    Ok(Config {
        api: ApiConfig {
            base_url,
            timeout_secs: env_parse("ADSYNC_API_TIMEOUT_SECS", api_defaults.timeout_secs)?,
            max_attempts: env_parse("ADSYNC_API_MAX_ATTEMPTS", api_defaults.max_attempts)?,
        },
        polling: PollingConfig {
            interval_ms: env_parse(
                "ADSYNC_POLL_INTERVAL_MS",
                PollingConfig::default().interval_ms,
            )?,
        },
        selection: SelectionConfig {
            default_range_days: env_parse(
                "ADSYNC_DEFAULT_RANGE_DAYS",
                SelectionConfig::default().default_range_days,
            )?,
        },
        logging: LoggingConfig {
            filter: std::env::var("ADSYNC_LOG_FILTER")
                .unwrap_or_else(|_| LoggingConfig::default().filter),
            json: env_bool("ADSYNC_LOG_JSON", false)?,
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AdSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AdSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AdSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AdSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AdSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parent and grandparent, then the
/// executable's directory and its ancestors the same way.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| root.ancestors().take(3))
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
///
/// # Errors
/// Returns `AdSyncError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            AdSyncError::Config(format!("Missing required environment variable: {key}"))
        })
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AdSyncError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Anything else is a `Config` error rather than `false`.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AdSyncError::Config(format!(
            "Invalid value for {key}: {raw:?} is not a boolean"
        ))),
    }
}

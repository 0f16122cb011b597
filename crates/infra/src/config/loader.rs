//! Configuration loader
//!
//! Loads the scheduler configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! Required:
//! - `SLOTWISE_TIMEZONE`: IANA timezone of the working hours
//! - `SLOTWISE_WORK_START_HOUR`: first working hour (0-23)
//! - `SLOTWISE_WORK_END_HOUR`: end of the working day (1-24)
//!
//! Optional (defaults otherwise):
//! - `SLOTWISE_BUFFER_MINUTES`
//! - `SLOTWISE_SLOT_GRANULARITY_MINUTES`
//! - `SLOTWISE_MAX_RESULTS`
//! - `SLOTWISE_RETRY_MAX_ATTEMPTS`
//! - `SLOTWISE_RETRY_JITTER` (true/false)
//! - `SLOTWISE_REQUEST_TIMEOUT_MS`
//!
//! ## File Locations
//! The loader probes `slotwise.{json,toml}` and `config.{json,toml}` in:
//! 1. The current working directory
//! 2. Its parent and grandparent directories
//! 3. The executable's directory and its parents

use std::path::{Path, PathBuf};
use std::str::FromStr;

use slotwise_domain::{Result, SchedulerConfig, SchedulingError};

const ENV_TIMEZONE: &str = "SLOTWISE_TIMEZONE";
const ENV_WORK_START_HOUR: &str = "SLOTWISE_WORK_START_HOUR";
const ENV_WORK_END_HOUR: &str = "SLOTWISE_WORK_END_HOUR";
const ENV_BUFFER_MINUTES: &str = "SLOTWISE_BUFFER_MINUTES";
const ENV_SLOT_GRANULARITY_MINUTES: &str = "SLOTWISE_SLOT_GRANULARITY_MINUTES";
const ENV_MAX_RESULTS: &str = "SLOTWISE_MAX_RESULTS";
const ENV_RETRY_MAX_ATTEMPTS: &str = "SLOTWISE_RETRY_MAX_ATTEMPTS";
const ENV_RETRY_JITTER: &str = "SLOTWISE_RETRY_JITTER";
const ENV_REQUEST_TIMEOUT_MS: &str = "SLOTWISE_REQUEST_TIMEOUT_MS";

const CONFIG_FILE_NAMES: [&str; 4] = ["slotwise.json", "slotwise.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SchedulingError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<SchedulerConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SchedulingError::Config` if a required variable is missing, a
/// value does not parse, or the result fails validation.
pub fn load_from_env() -> Result<SchedulerConfig> {
    let mut config = SchedulerConfig::default();

    config.working_hours.timezone = env_var(ENV_TIMEZONE)?;
    config.working_hours.start_hour = parse_value(ENV_WORK_START_HOUR, &env_var(ENV_WORK_START_HOUR)?)?;
    config.working_hours.end_hour = parse_value(ENV_WORK_END_HOUR, &env_var(ENV_WORK_END_HOUR)?)?;

    if let Some(buffer) = env_parse(ENV_BUFFER_MINUTES)? {
        config.buffer_minutes = buffer;
    }
    if let Some(granularity) = env_parse(ENV_SLOT_GRANULARITY_MINUTES)? {
        config.slot_granularity_minutes = granularity;
    }
    if let Some(max_results) = env_parse(ENV_MAX_RESULTS)? {
        config.max_results = max_results;
    }
    if let Some(attempts) = env_parse(ENV_RETRY_MAX_ATTEMPTS)? {
        config.retry.max_attempts = attempts;
    }
    if let Some(timeout) = env_parse(ENV_REQUEST_TIMEOUT_MS)? {
        config.request_timeout_ms = timeout;
    }
    config.retry.jitter = env_bool(ENV_RETRY_JITTER, config.retry.jitter);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations for config files.
/// Format is detected by file extension.
///
/// # Errors
/// Returns `SchedulingError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<SchedulerConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SchedulingError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SchedulingError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SchedulingError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content, by extension (`.json`/`.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<SchedulerConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SchedulingError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SchedulingError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SchedulingError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SchedulingError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable. Unset is `Ok(None)`; a value
/// that does not parse is an error.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| SchedulingError::Config(format!("Invalid value for {key} ('{raw}'): {e}")))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

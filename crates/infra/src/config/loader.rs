//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `PETNCO_DB_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file anywhere, runs on built-in defaults
//!
//! ## Environment Variables
//! - `PETNCO_DB_PATH`: Database file path (selects environment mode)
//! - `PETNCO_DB_POOL_SIZE`: Connection pool size
//! - `PETNCO_DB_BUSY_TIMEOUT_MS`: SQLite busy timeout in milliseconds
//! - `PETNCO_GRACE_MINUTES`: Same-day creation and expiry grace
//! - `PETNCO_TIMEZONE`: IANA zone slot times are expressed in
//! - `PETNCO_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `PETNCO_LOG_JSON`: Emit JSON logs (true/false)
//! - `PETNCO_BIND`: HTTP listen address
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./petnco.json` or `./petnco.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use petnco_domain::constants::MAX_GRACE_MINUTES;
use petnco_domain::{Config, PetncoError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables, then from a probed
/// config file, then built-in defaults.
///
/// # Errors
/// Returns `PetncoError::Config` if an environment value or a config file
/// that does exist is invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if std::env::var_os("PETNCO_DB_PATH").is_some() => Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "Environment configuration absent, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No configuration file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `PETNCO_DB_PATH` is required; every other variable falls back to its
/// default.
///
/// # Errors
/// Returns `PetncoError::Config` if `PETNCO_DB_PATH` is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("PETNCO_DB_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("PETNCO_DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }
    if let Some(busy_timeout) = env_parse::<u64>("PETNCO_DB_BUSY_TIMEOUT_MS")? {
        config.database.busy_timeout_ms = busy_timeout;
    }

    if let Some(grace) = env_parse::<i64>("PETNCO_GRACE_MINUTES")? {
        config.scheduling.grace_minutes = grace;
    }
    if let Ok(zone) = std::env::var("PETNCO_TIMEZONE") {
        config.scheduling.timezone = Tz::from_str(&zone)
            .map_err(|e| PetncoError::Config(format!("Invalid time zone {zone}: {e}")))?;
    }

    if let Ok(level) = std::env::var("PETNCO_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("PETNCO_LOG_JSON", config.logging.json);

    if let Ok(bind) = std::env::var("PETNCO_BIND") {
        config.server.bind = bind;
    }

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PetncoError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PetncoError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PetncoError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PetncoError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PetncoError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PetncoError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PetncoError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.database.pool_size == 0 {
        return Err(PetncoError::Config("database.pool_size must be at least 1".into()));
    }
    if config.scheduling.grace_minutes < 0 {
        return Err(PetncoError::Config("scheduling.grace_minutes must not be negative".into()));
    }
    if config.scheduling.grace_minutes > MAX_GRACE_MINUTES {
        return Err(PetncoError::Config(format!(
            "scheduling.grace_minutes must be at most {MAX_GRACE_MINUTES}"
        )));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parent, and the executable's
/// directory. Returns the first config file found.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "petnco.json", "petnco.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PetncoError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PetncoError::Config(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(None),
    }
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

//! Configuration structures
//!
//! Loaded by the infrastructure layer from the environment or a config file.
//! Every section has serde defaults so partial files are accepted.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRACE_MINUTES, MAX_GRACE_MINUTES};

/// Configuration for the application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
    /// SQLite busy timeout in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "petnco.db".to_string(), pool_size: 8, busy_timeout_ms: 5000 }
    }
}

/// Scheduling rules that vary per deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Minutes a same-day slot must lie ahead of "now" to be created, and
    /// minutes a started slot stays bookable before it expires.
    pub grace_minutes: i64,
    /// IANA zone that slot dates and times are expressed in
    pub timezone: Tz,
}

impl SchedulingConfig {
    /// Grace as a duration, clamped to `0..=MAX_GRACE_MINUTES`
    pub fn grace(&self) -> Duration {
        Duration::minutes(self.grace_minutes.clamp(0, MAX_GRACE_MINUTES))
    }

    /// Wall-clock time in the clinic's zone
    pub fn local_now(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.timezone).naive_local()
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self { grace_minutes: DEFAULT_GRACE_MINUTES, timezone: Tz::UTC }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:8080".to_string() }
    }
}

//! Tracing setup and command outcome logging

use std::time::Duration;

use petnco_domain::{LoggingConfig, PetncoError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over `config.level`. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = if config.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init()
    };

    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"slots::create"`; callers must
/// not put request data in it.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    error: Option<&PetncoError>,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert a `PetncoError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &PetncoError) -> &'static str {
    match error {
        PetncoError::Validation { .. } => "validation",
        PetncoError::Conflict(_) => "conflict",
        PetncoError::NotFound(_) => "not_found",
        PetncoError::Forbidden(_) => "forbidden",
        PetncoError::InvalidState(_) => "invalid_state",
        PetncoError::Database(_) => "database",
        PetncoError::Config(_) => "config",
        PetncoError::Internal(_) => "internal",
    }
}

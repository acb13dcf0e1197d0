//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Petnco
///
/// The first five variants are the business outcomes callers branch on. The
/// remaining ones wrap failures of the surrounding infrastructure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PetncoError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Petnco operations
pub type Result<T> = std::result::Result<T, PetncoError>;

/// Programmatic classification of [`PetncoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Forbidden,
    InvalidState,
    Database,
    Config,
    Internal,
}

crate::impl_domain_status_conversions!(ErrorKind {
    Validation => "validation",
    Conflict => "conflict",
    NotFound => "not_found",
    Forbidden => "forbidden",
    InvalidState => "invalid_state",
    Database => "database",
    Config => "config",
    Internal => "internal",
});

impl PetncoError {
    /// Field-level validation failure
    pub fn validation(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Validation { field: field.into(), message: message.to_string() }
    }

    /// Missing entity, e.g. `not_found("slot", id)`
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Database(_) => ErrorKind::Database,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The offending field for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Error text without the kind prefix, suitable for rendering next to a
    /// form field.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message,
            Self::Conflict(m)
            | Self::NotFound(m)
            | Self::Forbidden(m)
            | Self::InvalidState(m)
            | Self::Database(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }
}

//! Conversions from external infrastructure errors into domain errors.

use petnco_common::error::{ErrorClassification, ErrorSeverity};
use petnco_common::storage::StorageError;
use petnco_domain::PetncoError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;
use thiserror::Error;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub PetncoError);

impl From<InfraError> for PetncoError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PetncoError> for InfraError {
    fn from(value: PetncoError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPetncoError {
    fn into_petnco(self) -> PetncoError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PetncoError */
/* -------------------------------------------------------------------------- */

const SQLITE_CONSTRAINT_CHECK: i32 = 275;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

impl IntoPetncoError for SqlError {
    fn into_petnco(self) -> PetncoError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => PetncoError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        PetncoError::Database("database is locked".into())
                    }
                    (
                        ErrorCode::ConstraintViolation,
                        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY,
                    ) => PetncoError::Conflict(format!("unique constraint violation: {message}")),
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        PetncoError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_CHECK) => {
                        PetncoError::Database(format!("check constraint violation: {message}"))
                    }
                    _ => PetncoError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PetncoError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(column, _, cause) => {
                PetncoError::Database(format!("failed to convert column {column}: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                PetncoError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::Utf8Error(..) => PetncoError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                PetncoError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => PetncoError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => PetncoError::Database("invalid SQL query".into()),
            other => PetncoError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_petnco())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PetncoError */
/* -------------------------------------------------------------------------- */

impl IntoPetncoError for PoolError {
    fn into_petnco(self) -> PetncoError {
        PetncoError::Database(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_petnco())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → PetncoError */
/* -------------------------------------------------------------------------- */

impl IntoPetncoError for StorageError {
    fn into_petnco(self) -> PetncoError {
        match self {
            StorageError::Rusqlite(err) => err.into_petnco(),
            StorageError::R2d2(err) => err.into_petnco(),
            StorageError::Timeout(seconds) => {
                PetncoError::Database(format!("database timeout after {seconds}s"))
            }
            StorageError::PoolExhausted => PetncoError::Database("connection pool exhausted".into()),
            StorageError::InvalidConfig(message) => PetncoError::Config(message),
            StorageError::SchemaVersionMismatch { expected, found } => PetncoError::Database(
                format!("schema version mismatch: expected {expected}, found {found}"),
            ),
            StorageError::Connection(message)
            | StorageError::Query(message)
            | StorageError::Migration(message) => PetncoError::Database(message),
            StorageError::Io(err) => PetncoError::Database(format!("database io error: {err}")),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        match value.severity() {
            ErrorSeverity::Critical => {
                tracing::error!(error = %value, "critical storage error");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %value, retryable = value.is_retryable(), "storage contention");
            }
            _ => {}
        }
        InfraError(value.into_petnco())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → PetncoError */
/* -------------------------------------------------------------------------- */

impl IntoPetncoError for JoinError {
    fn into_petnco(self) -> PetncoError {
        if self.is_cancelled() {
            PetncoError::Internal("blocking database task cancelled".into())
        } else {
            PetncoError::Internal(format!("blocking database task failed: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_petnco())
    }
}

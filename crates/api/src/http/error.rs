//! HTTP error mapping
//!
//! Every failure leaves the API as `{kind, field, message}` JSON with a
//! status code chosen from the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use petnco_domain::{ErrorKind, PetncoError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Structured error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// API-level errors with HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] PetncoError),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),
}

/// Status code for a domain error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Conflict | ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Database | ErrorKind::Config | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthenticated(detail) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    kind: "unauthenticated".to_string(),
                    field: None,
                    message: detail.clone(),
                },
            ),
            ApiError::Domain(err) => {
                let kind = err.kind();
                let status = status_for(kind);
                let message = if status.is_server_error() {
                    error!(error = %err, "request failed");
                    "An internal error occurred".to_string()
                } else {
                    err.detail().to_string()
                };
                (
                    status,
                    ErrorBody {
                        kind: kind.to_string(),
                        field: err.field().map(str::to_owned),
                        message,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

//! Health and maintenance endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use petnco_domain::PetncoError;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::identity::Caller;
use crate::commands::maintenance;
use crate::context::AppContext;
use crate::utils::health::HealthStatus;

#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    pub expired: u64,
}

/// `GET /health` - 200 when healthy, 503 otherwise
pub async fn health(
    State(ctx): State<Arc<AppContext>>,
) -> Result<(StatusCode, Json<HealthStatus>), ApiError> {
    let status = tokio::task::spawn_blocking(move || ctx.health_check())
        .await
        .map_err(|err| PetncoError::Internal(format!("health check task failed: {err}")))?;

    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    Ok((code, Json(status)))
}

/// `POST /maintenance/sweep`
pub async fn sweep(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
) -> Result<Json<SweepResponse>, ApiError> {
    let expired = maintenance::sweep_expired(&ctx, &actor).await?;
    Ok(Json(SweepResponse { expired }))
}

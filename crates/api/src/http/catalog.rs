//! Vet directory and catalog endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use petnco_domain::{
    BookableService, PersonalizedService, Service, ServiceId, VetId, VeterinarianProfile,
};
use serde::Deserialize;

use super::error::ApiError;
use super::identity::Caller;
use crate::commands::catalog as commands;
use crate::context::AppContext;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct OptInRequest {
    pub display_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub category: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct OfferingRequest {
    pub price_cents: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// `POST /vets` - the caller becomes (or stays) a vet
pub async fn opt_in(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Json(request): Json<OptInRequest>,
) -> Result<(StatusCode, Json<VeterinarianProfile>), ApiError> {
    let profile =
        commands::opt_in(&ctx, &actor, &request.display_name, request.specialty).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `POST /vets/{vet}/revoke`
pub async fn revoke(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(vet_id): Path<VetId>,
) -> Result<Json<VeterinarianProfile>, ApiError> {
    Ok(Json(commands::revoke_vet(&ctx, &actor, vet_id).await?))
}

/// `GET /vets/{vet}/services`
pub async fn vet_services(
    State(ctx): State<Arc<AppContext>>,
    Path(vet_id): Path<VetId>,
) -> Result<Json<Vec<BookableService>>, ApiError> {
    Ok(Json(commands::vet_services(&ctx, vet_id).await?))
}

/// `PUT /vets/{vet}/services/{service}`
pub async fn set_offering(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path((vet_id, service_id)): Path<(VetId, ServiceId)>,
    Json(request): Json<OfferingRequest>,
) -> Result<Json<PersonalizedService>, ApiError> {
    let entry = commands::set_personalized_service(
        &ctx,
        &actor,
        vet_id,
        service_id,
        request.price_cents,
        request.active,
    )
    .await?;
    Ok(Json(entry))
}

/// `PUT /services/{service}` - staff catalog maintenance
pub async fn upsert_service(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(service_id): Path<ServiceId>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    let service = Service {
        id: service_id,
        name: request.name,
        category: request.category,
        active: request.active,
    };
    Ok(Json(commands::upsert_service(&ctx, &actor, service).await?))
}

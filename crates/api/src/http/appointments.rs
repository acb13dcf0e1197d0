//! Appointment endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use petnco_domain::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, Page, PageRequest,
    ServiceId, SlotId, SortOrder, UserId, VetId,
};
use serde::Deserialize;

use super::error::ApiError;
use super::identity::Caller;
use crate::commands::appointments as commands;
use crate::context::AppContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReserveRequest {
    pub service_ids: Vec<ServiceId>,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CancelQuery {
    /// Take the slot off sale instead of reopening it
    pub withdraw_slot: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub user_id: Option<UserId>,
    pub vet_id: Option<VetId>,
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order: SortOrder,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    fn into_parts(self) -> Result<(AppointmentFilter, PageRequest), ApiError> {
        let page = PageRequest::new(self.page.unwrap_or(1), self.per_page)?;
        let filter = AppointmentFilter {
            user_id: self.user_id,
            vet_id: self.vet_id,
            status: self.status,
            date_from: self.date_from,
            date_to: self.date_to,
            order: self.order,
        };
        Ok((filter, page))
    }
}

/// `POST /slots/{id}/reserve`
pub async fn reserve(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(slot_id): Path<SlotId>,
    Json(request): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment =
        commands::reserve_slot(&ctx, &actor, slot_id, &request.service_ids, &request.notes)
            .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `GET /appointments`
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Appointment>>, ApiError> {
    let (filter, page) = query.into_parts()?;
    Ok(Json(commands::list_appointments(&ctx, &actor, filter, page).await?))
}

/// `GET /appointments/{id}`
pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(commands::get_appointment(&ctx, &actor, appointment_id).await?))
}

/// `POST /appointments/{id}/cancel[?withdraw_slot=true]`
pub async fn cancel(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(appointment_id): Path<AppointmentId>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(
        commands::cancel_appointment(&ctx, &actor, appointment_id, query.withdraw_slot).await?,
    ))
}

/// `POST /appointments/{id}/confirm`
pub async fn confirm(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(commands::confirm_appointment(&ctx, &actor, appointment_id).await?))
}

/// `POST /appointments/{id}/complete`
pub async fn complete(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(commands::complete_appointment(&ctx, &actor, appointment_id).await?))
}

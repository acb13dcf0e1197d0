//! Slot endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use petnco_domain::{
    CloneMode, CloneOutcome, DeleteOutcome, ItemFailure, SlotChanges, SlotId, TimeSlot, VetId,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::identity::Caller;
use crate::commands::slots as commands;
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Inclusive date window
#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CloneRequest {
    pub mode: CloneMode,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

/// One row of a per-item batch report
#[derive(Debug, Serialize, Deserialize)]
pub struct CloneItem {
    pub date: NaiveDate,
    pub slot_id: Option<SlotId>,
    pub error: Option<ItemFailure>,
}

impl From<CloneOutcome> for CloneItem {
    fn from(outcome: CloneOutcome) -> Self {
        match outcome.result {
            Ok(slot_id) => Self { date: outcome.date, slot_id: Some(slot_id), error: None },
            Err(failure) => Self { date: outcome.date, slot_id: None, error: Some(failure) },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteItem {
    pub slot_id: SlotId,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub deleted: bool,
    pub error: Option<ItemFailure>,
}

impl From<DeleteOutcome> for DeleteItem {
    fn from(outcome: DeleteOutcome) -> Self {
        let error = outcome.result.err();
        Self {
            slot_id: outcome.slot_id,
            start: outcome.start,
            end: outcome.end,
            deleted: error.is_none(),
            error,
        }
    }
}

/// `POST /vets/{vet}/slots`
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(vet_id): Path<VetId>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlot>), ApiError> {
    let slot =
        commands::create_slot(&ctx, &actor, vet_id, request.date, request.start, request.end)
            .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// `GET /vets/{vet}/slots/available?from=&to=`
pub async fn list_available(
    State(ctx): State<Arc<AppContext>>,
    Path(vet_id): Path<VetId>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<TimeSlot>>, ApiError> {
    Ok(Json(commands::list_available_slots(&ctx, vet_id, range.from, range.to).await?))
}

/// `GET /vets/{vet}/schedule?from=&to=`
pub async fn schedule(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(vet_id): Path<VetId>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<TimeSlot>>, ApiError> {
    Ok(Json(commands::vet_schedule(&ctx, &actor, vet_id, range.from, range.to).await?))
}

/// `DELETE /vets/{vet}/days/{date}`
pub async fn delete_day(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path((vet_id, date)): Path<(VetId, NaiveDate)>,
) -> Result<Json<Vec<DeleteItem>>, ApiError> {
    let outcomes = commands::delete_day(&ctx, &actor, vet_id, date).await?;
    Ok(Json(outcomes.into_iter().map(DeleteItem::from).collect()))
}

/// `PATCH /slots/{id}`
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(slot_id): Path<SlotId>,
    Json(changes): Json<SlotChanges>,
) -> Result<Json<TimeSlot>, ApiError> {
    Ok(Json(commands::update_slot(&ctx, &actor, slot_id, changes).await?))
}

/// `DELETE /slots/{id}`
pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(slot_id): Path<SlotId>,
) -> Result<StatusCode, ApiError> {
    commands::delete_slot(&ctx, &actor, slot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /slots/{id}/clone`
pub async fn clone(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(slot_id): Path<SlotId>,
    Json(request): Json<CloneRequest>,
) -> Result<Json<Vec<CloneItem>>, ApiError> {
    let outcomes =
        commands::clone_slot(&ctx, &actor, slot_id, request.mode, request.target_date).await?;
    Ok(Json(outcomes.into_iter().map(CloneItem::from).collect()))
}

/// `POST /slots/{id}/withdraw`
pub async fn withdraw(
    State(ctx): State<Arc<AppContext>>,
    Caller(actor): Caller,
    Path(slot_id): Path<SlotId>,
) -> Result<Json<TimeSlot>, ApiError> {
    Ok(Json(commands::withdraw_slot(&ctx, &actor, slot_id).await?))
}

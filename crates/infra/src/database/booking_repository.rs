//! SQLite-backed implementation of the `BookingStore` and
//! `AppointmentRepository` ports.
//!
//! Every status change is a conditional UPDATE inside an IMMEDIATE
//! transaction; the row count decides who won.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use petnco_core::booking::ports::{AppointmentRepository, BookingStore};
use petnco_domain::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, Page, PageRequest,
    PetncoError, Result as DomainResult, ServiceId, SlotStatus, SortOrder,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::columns::{
    date_to_sql, opt_date_to_sql, parse_date, parse_opt_text, parse_text, parse_time,
    parse_timestamp, time_to_sql,
};
use super::manager::DbManager;
use super::slot_repository::current_status;
use crate::errors::InfraError;

const APPOINTMENT_COLUMNS: &str = "id, user_id, vet_id, slot_id, appointment_date, start_time, \
     end_time, notes, status, created_at, updated_at";

const INSERT_APPOINTMENT_SQL: &str = "INSERT INTO appointments (
        id, user_id, vet_id, slot_id, appointment_date, start_time, end_time,
        notes, status, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

const FILTER_CLAUSE: &str = "WHERE (?1 IS NULL OR user_id = ?1)
      AND (?2 IS NULL OR vet_id = ?2)
      AND (?3 IS NULL OR status = ?3)
      AND (?4 IS NULL OR appointment_date >= ?4)
      AND (?5 IS NULL OR appointment_date <= ?5)";

/// SQLite-backed appointment store.
pub struct SqliteBookingRepository {
    db: Arc<DbManager>,
}

impl SqliteBookingRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingRepository {
    async fn reserve(&self, appointment: &Appointment) -> DomainResult<()> {
        let appointment = appointment.clone();
        self.db
            .blocking(move |conn| {
                let slot_id = appointment
                    .slot_id
                    .ok_or_else(|| PetncoError::Internal("appointment without slot".into()))?;

                let tx = conn.immediate_transaction()?;
                let claimed = tx.execute(
                    "UPDATE time_slots SET status = 'reserved', updated_at = ?2
                     WHERE id = ?1 AND status = 'available'",
                    params![slot_id.to_string(), appointment.created_at.timestamp()],
                )?;
                if claimed == 0 {
                    return Err(match current_status(&tx, slot_id)? {
                        None => PetncoError::not_found("slot", slot_id),
                        Some(status) => {
                            PetncoError::Conflict(format!("slot {slot_id} is {status}"))
                        }
                    }
                    .into());
                }

                insert_appointment(&tx, &appointment)?;
                tx.commit()?;
                debug!(appointment_id = %appointment.id, slot_id = %slot_id, "reservation committed");
                Ok(())
            })
            .await
    }

    async fn cancel(
        &self,
        id: AppointmentId,
        release_to: SlotStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        self.db
            .blocking(move |conn| {
                let tx = conn.immediate_transaction()?;
                let changed = tx.execute(
                    "UPDATE appointments SET status = 'cancelled', updated_at = ?2
                     WHERE id = ?1 AND status IN ('pending', 'confirmed')",
                    params![id.to_string(), now.timestamp()],
                )?;
                if changed == 0 {
                    return Err(missing_or_invalid(&tx, id, "is not open")?.into());
                }

                tx.execute(
                    "UPDATE time_slots SET status = ?2, updated_at = ?3
                     WHERE status = 'reserved'
                       AND id = (SELECT slot_id FROM appointments WHERE id = ?1)",
                    params![id.to_string(), release_to.as_str(), now.timestamp()],
                )?;

                let cancelled = require_appointment(&tx, id)?;
                tx.commit()?;
                Ok(cancelled)
            })
            .await
    }

    async fn transition(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        self.db
            .blocking(move |conn| {
                let tx = conn.immediate_transaction()?;
                let changed = tx.execute(
                    "UPDATE appointments SET status = ?3, updated_at = ?4
                     WHERE id = ?1 AND status = ?2",
                    params![id.to_string(), from.as_str(), to.as_str(), now.timestamp()],
                )?;
                if changed == 0 {
                    let reason = format!("is not {from}");
                    return Err(missing_or_invalid(&tx, id, &reason)?.into());
                }

                let updated = require_appointment(&tx, id)?;
                tx.commit()?;
                Ok(updated)
            })
            .await
    }
}

#[async_trait]
impl AppointmentRepository for SqliteBookingRepository {
    async fn get_appointment(&self, id: AppointmentId) -> DomainResult<Option<Appointment>> {
        self.db.blocking(move |conn| find_appointment(conn, id)).await
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Appointment>> {
        let filter = *filter;
        self.db
            .blocking(move |conn| {
                let user_id = filter.user_id.map(|id| id.to_string());
                let vet_id = filter.vet_id.map(|id| id.to_string());
                let status = filter.status.map(|s| s.as_str());
                let date_from = opt_date_to_sql(filter.date_from);
                let date_to = opt_date_to_sql(filter.date_to);

                let total: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM appointments {FILTER_CLAUSE}"),
                    params![user_id, vet_id, status, date_from, date_to],
                    |row| row.get(0),
                )?;

                let direction = match filter.order {
                    SortOrder::NewestFirst => "DESC",
                    SortOrder::OldestFirst => "ASC",
                };
                let sql = format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments {FILTER_CLAUSE}
                     ORDER BY appointment_date {direction}, start_time {direction}, created_at {direction}
                     LIMIT ?6 OFFSET ?7"
                );
                let mut stmt = conn.prepare(&sql)?;
                let mut items = stmt
                    .query_map(
                        params![
                            user_id,
                            vet_id,
                            status,
                            date_from,
                            date_to,
                            page.limit() as i64,
                            page.offset() as i64,
                        ],
                        map_appointment_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                for appointment in &mut items {
                    appointment.service_ids = load_service_ids(conn, appointment.id)?;
                }

                Ok(Page::new(items, page, u64::try_from(total).unwrap_or_default()))
            })
            .await
    }
}

fn insert_appointment(conn: &Connection, appointment: &Appointment) -> Result<(), InfraError> {
    conn.execute(
        INSERT_APPOINTMENT_SQL,
        params![
            appointment.id.to_string(),
            appointment.user_id.to_string(),
            appointment.vet_id.to_string(),
            appointment.slot_id.map(|id| id.to_string()),
            date_to_sql(appointment.date),
            time_to_sql(appointment.start),
            time_to_sql(appointment.end),
            appointment.notes,
            appointment.status.as_str(),
            appointment.created_at.timestamp(),
            appointment.updated_at.timestamp(),
        ],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO appointment_services (appointment_id, service_id, position) VALUES (?1, ?2, ?3)",
    )?;
    for (position, service_id) in appointment.service_ids.iter().enumerate() {
        stmt.execute(params![appointment.id.to_string(), service_id.to_string(), position as i64])?;
    }
    Ok(())
}

fn find_appointment(
    conn: &Connection,
    id: AppointmentId,
) -> Result<Option<Appointment>, InfraError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    let Some(mut appointment) =
        conn.query_row(&sql, params![id.to_string()], map_appointment_row).optional()?
    else {
        return Ok(None);
    };
    appointment.service_ids = load_service_ids(conn, id)?;
    Ok(Some(appointment))
}

fn require_appointment(conn: &Connection, id: AppointmentId) -> Result<Appointment, InfraError> {
    find_appointment(conn, id)?.ok_or_else(|| PetncoError::not_found("appointment", id).into())
}

/// Explain why a conditional appointment update matched no row
fn missing_or_invalid(
    conn: &Connection,
    id: AppointmentId,
    reason: &str,
) -> Result<PetncoError, InfraError> {
    let status: Option<AppointmentStatus> = conn
        .query_row("SELECT status FROM appointments WHERE id = ?1", params![id.to_string()], |row| {
            parse_text(row, 0)
        })
        .optional()?;
    Ok(match status {
        None => PetncoError::not_found("appointment", id),
        Some(status) => PetncoError::InvalidState(format!("appointment {id} {reason} ({status})")),
    })
}

fn load_service_ids(conn: &Connection, id: AppointmentId) -> Result<Vec<ServiceId>, InfraError> {
    let mut stmt = conn.prepare_cached(
        "SELECT service_id FROM appointment_services WHERE appointment_id = ?1 ORDER BY position",
    )?;
    let ids = stmt
        .query_map(params![id.to_string()], |row| parse_text::<ServiceId>(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

fn map_appointment_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: parse_text(row, 0)?,
        user_id: parse_text(row, 1)?,
        vet_id: parse_text(row, 2)?,
        slot_id: parse_opt_text(row, 3)?,
        date: parse_date(row, 4)?,
        start: parse_time(row, 5)?,
        end: parse_time(row, 6)?,
        service_ids: Vec::new(),
        notes: row.get(7)?,
        status: parse_text(row, 8)?,
        created_at: parse_timestamp(row, 9)?,
        updated_at: parse_timestamp(row, 10)?,
    })
}

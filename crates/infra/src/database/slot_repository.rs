//! SQLite-backed implementation of the `SlotRepository` port.
//!
//! Writes that depend on a slot's current state run inside an IMMEDIATE
//! transaction, so the overlap check and the write cannot interleave with
//! another writer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use petnco_core::scheduling::ports::SlotRepository;
use petnco_domain::scheduling::ExpiryCutoff;
use petnco_domain::{
    PetncoError, Result as DomainResult, SlotId, SlotStatus, SweepScope, TimeSlot, VetId,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::columns::{
    date_to_sql, opt_date_to_sql, parse_date, parse_text, parse_time, parse_timestamp,
    precise_time_to_sql, time_to_sql,
};
use super::manager::DbManager;
use crate::errors::InfraError;

const SLOT_COLUMNS: &str =
    "id, vet_id, slot_date, start_time, end_time, status, created_at, updated_at";

const INSERT_SLOT_SQL: &str = "INSERT INTO time_slots (
        id, vet_id, slot_date, start_time, end_time, status, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const OVERLAP_SQL: &str = "SELECT id FROM time_slots
    WHERE vet_id = ?1
      AND slot_date = ?2
      AND status IN ('available', 'reserved')
      AND start_time < ?4
      AND ?3 < end_time
      AND id <> ?5
    ORDER BY start_time
    LIMIT 1";

const EXPIRE_SQL: &str = "UPDATE time_slots
    SET status = 'expired', updated_at = ?1
    WHERE status = 'available'
      AND (?2 IS NULL OR vet_id = ?2)
      AND (?3 IS NULL OR slot_date >= ?3)
      AND (?4 IS NULL OR slot_date <= ?4)
      AND (slot_date < ?5 OR (slot_date = ?5 AND ?6 IS NOT NULL AND start_time < ?6))";

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository {
    db: Arc<DbManager>,
}

impl SqliteSlotRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepository {
    async fn insert_slot(&self, slot: &TimeSlot) -> DomainResult<()> {
        let slot = slot.clone();
        self.db
            .blocking(move |conn| {
                let tx = conn.immediate_transaction()?;
                ensure_no_overlap(&tx, &slot)?;
                tx.execute(
                    INSERT_SLOT_SQL,
                    params![
                        slot.id.to_string(),
                        slot.vet_id.to_string(),
                        date_to_sql(slot.date),
                        time_to_sql(slot.start),
                        time_to_sql(slot.end),
                        slot.status.as_str(),
                        slot.created_at.timestamp(),
                        slot.updated_at.timestamp(),
                    ],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
    }

    async fn get_slot(&self, id: SlotId) -> DomainResult<Option<TimeSlot>> {
        self.db.blocking(move |conn| find_slot(conn, id)).await
    }

    async fn update_slot_times(&self, slot: &TimeSlot) -> DomainResult<()> {
        let slot = slot.clone();
        self.db
            .blocking(move |conn| {
                let tx = conn.immediate_transaction()?;
                match current_status(&tx, slot.id)? {
                    None => return Err(PetncoError::not_found("slot", slot.id).into()),
                    Some(SlotStatus::Available) => {}
                    Some(status) => {
                        return Err(PetncoError::InvalidState(format!(
                            "slot {} is {status}",
                            slot.id
                        ))
                        .into())
                    }
                }
                ensure_no_overlap(&tx, &slot)?;
                tx.execute(
                    "UPDATE time_slots
                     SET slot_date = ?2, start_time = ?3, end_time = ?4, updated_at = ?5
                     WHERE id = ?1 AND status = 'available'",
                    params![
                        slot.id.to_string(),
                        date_to_sql(slot.date),
                        time_to_sql(slot.start),
                        time_to_sql(slot.end),
                        slot.updated_at.timestamp(),
                    ],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
    }

    async fn delete_slot(&self, id: SlotId) -> DomainResult<()> {
        self.db
            .blocking(move |conn| {
                let tx = conn.immediate_transaction()?;
                match current_status(&tx, id)? {
                    None => return Err(PetncoError::not_found("slot", id).into()),
                    Some(SlotStatus::Reserved) => {
                        return Err(PetncoError::InvalidState(format!("slot {id} is reserved")).into())
                    }
                    Some(_) => {}
                }
                tx.execute("DELETE FROM time_slots WHERE id = ?1", params![id.to_string()])?;
                tx.commit()?;
                Ok(())
            })
            .await
    }

    async fn active_slots_on(&self, vet_id: VetId, date: NaiveDate) -> DomainResult<Vec<TimeSlot>> {
        self.db
            .blocking(move |conn| {
                let sql = format!(
                    "SELECT {SLOT_COLUMNS} FROM time_slots
                     WHERE vet_id = ?1 AND slot_date = ?2 AND status IN ('available', 'reserved')
                     ORDER BY start_time"
                );
                let mut stmt = conn.prepare(&sql)?;
                let slots = stmt
                    .query_map(params![vet_id.to_string(), date_to_sql(date)], map_slot_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(slots)
            })
            .await
    }

    async fn slots_in_range(
        &self,
        vet_id: VetId,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<TimeSlot>> {
        self.db
            .blocking(move |conn| {
                let sql = format!(
                    "SELECT {SLOT_COLUMNS} FROM time_slots
                     WHERE vet_id = ?1 AND slot_date BETWEEN ?2 AND ?3
                       AND (?4 IS NULL OR status = ?4)
                     ORDER BY slot_date, start_time"
                );
                let mut stmt = conn.prepare(&sql)?;
                let slots = stmt
                    .query_map(
                        params![
                            vet_id.to_string(),
                            date_to_sql(from),
                            date_to_sql(to),
                            status.map(|s| s.as_str()),
                        ],
                        map_slot_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(slots)
            })
            .await
    }

    async fn expire_available(
        &self,
        scope: SweepScope,
        cutoff: ExpiryCutoff,
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        self.db
            .blocking(move |conn| {
                let changed = conn.execute(
                    EXPIRE_SQL,
                    params![
                        now.timestamp(),
                        scope.vet_id.map(|id| id.to_string()),
                        opt_date_to_sql(scope.from),
                        opt_date_to_sql(scope.to),
                        date_to_sql(cutoff.today),
                        cutoff.cutoff_time.map(precise_time_to_sql),
                    ],
                )?;
                if changed > 0 {
                    debug!(changed, today = %cutoff.today, "expired slots in sqlite");
                }
                Ok(changed as u64)
            })
            .await
    }

    async fn withdraw_slot(&self, id: SlotId, now: DateTime<Utc>) -> DomainResult<bool> {
        self.db
            .blocking(move |conn| {
                let changed = conn.execute(
                    "UPDATE time_slots SET status = 'cancelled', updated_at = ?2
                     WHERE id = ?1 AND status = 'available'",
                    params![id.to_string(), now.timestamp()],
                )?;
                Ok(changed == 1)
            })
            .await
    }
}

pub(crate) fn find_slot(conn: &Connection, id: SlotId) -> Result<Option<TimeSlot>, InfraError> {
    let sql = format!("SELECT {SLOT_COLUMNS} FROM time_slots WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id.to_string()], map_slot_row).optional()?)
}

pub(crate) fn current_status(
    conn: &Connection,
    id: SlotId,
) -> Result<Option<SlotStatus>, InfraError> {
    let status = conn
        .query_row("SELECT status FROM time_slots WHERE id = ?1", params![id.to_string()], |row| {
            parse_text::<SlotStatus>(row, 0)
        })
        .optional()?;
    Ok(status)
}

fn ensure_no_overlap(conn: &Connection, slot: &TimeSlot) -> Result<(), InfraError> {
    let existing: Option<String> = conn
        .query_row(
            OVERLAP_SQL,
            params![
                slot.vet_id.to_string(),
                date_to_sql(slot.date),
                time_to_sql(slot.start),
                time_to_sql(slot.end),
                slot.id.to_string(),
            ],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(existing) => Err(PetncoError::Conflict(format!(
            "{} {}-{} overlaps slot {existing}",
            slot.date,
            slot.start.format("%H:%M"),
            slot.end.format("%H:%M")
        ))
        .into()),
        None => Ok(()),
    }
}

fn map_slot_row(row: &Row<'_>) -> rusqlite::Result<TimeSlot> {
    Ok(TimeSlot {
        id: parse_text(row, 0)?,
        vet_id: parse_text(row, 1)?,
        date: parse_date(row, 2)?,
        start: parse_time(row, 3)?,
        end: parse_time(row, 4)?,
        status: parse_text(row, 5)?,
        created_at: parse_timestamp(row, 6)?,
        updated_at: parse_timestamp(row, 7)?,
    })
}

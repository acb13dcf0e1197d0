//! Slot lifecycle: create, update, delete, clone, withdraw and listing

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use petnco_common::Clock;
use petnco_domain::scheduling::{clone_targets, validate_new_slot};
use petnco_domain::{
    Actor, CloneMode, CloneOutcome, DeleteOutcome, ItemFailure, PetncoError, Result,
    SchedulingConfig, SlotChanges, SlotId, SlotStatus, SweepScope, TimeSlot, VetId,
};
use tracing::{debug, info, warn};

use super::conflict::ConflictDetector;
use super::ports::SlotRepository;
use super::sweeper::ExpirationSweeper;
use crate::catalog::ports::VetDirectory;

/// Owns every change to a slot's date, times and existence
pub struct SlotStore {
    slots: Arc<dyn SlotRepository>,
    vets: Arc<dyn VetDirectory>,
    detector: ConflictDetector,
    sweeper: Arc<ExpirationSweeper>,
    clock: Arc<dyn Clock>,
    config: SchedulingConfig,
}

impl SlotStore {
    pub fn new(
        slots: Arc<dyn SlotRepository>,
        vets: Arc<dyn VetDirectory>,
        sweeper: Arc<ExpirationSweeper>,
        clock: Arc<dyn Clock>,
        config: SchedulingConfig,
    ) -> Self {
        let detector = ConflictDetector::new(Arc::clone(&slots));
        Self { slots, vets, detector, sweeper, clock, config }
    }

    /// Publish a new available slot for `vet_id`
    pub async fn create(
        &self,
        actor: &Actor,
        vet_id: VetId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<TimeSlot> {
        ensure_manages(actor, vet_id)?;

        let vet =
            self.vets.get_vet(vet_id).await?.ok_or_else(|| PetncoError::not_found("vet", vet_id))?;
        if !vet.active {
            return Err(PetncoError::InvalidState(format!("vet {vet_id} is not active")));
        }

        let now = self.clock.now();
        let interval = validate_new_slot(
            date,
            start,
            end,
            self.config.local_now(now),
            self.config.grace(),
        )?;

        self.sweeper.sweep_scope(SweepScope::vet_day(vet_id, date), now).await?;
        self.detector.ensure_free(vet_id, date, &interval, None).await?;

        let slot = TimeSlot {
            id: SlotId::new(),
            vet_id,
            date,
            start,
            end,
            status: SlotStatus::Available,
            created_at: now,
            updated_at: now,
        };
        self.slots.insert_slot(&slot).await?;

        info!(slot_id = %slot.id, vet_id = %vet_id, date = %date, interval = %interval, "slot created");
        Ok(slot)
    }

    /// Move or resize an available slot
    pub async fn update(
        &self,
        slot_id: SlotId,
        actor: &Actor,
        changes: SlotChanges,
    ) -> Result<TimeSlot> {
        let slot = self.load(slot_id).await?;
        ensure_manages(actor, slot.vet_id)?;

        let now = self.clock.now();
        self.sweeper.sweep_scope(SweepScope::vet_day(slot.vet_id, slot.date), now).await?;
        let slot = self.load(slot_id).await?;
        ensure_editable(&slot)?;

        let (date, start, end) = changes.applied_to(&slot);
        if (date, start, end) == (slot.date, slot.start, slot.end) {
            return Ok(slot);
        }

        let interval = validate_new_slot(
            date,
            start,
            end,
            self.config.local_now(now),
            self.config.grace(),
        )?;
        if date != slot.date {
            self.sweeper.sweep_scope(SweepScope::vet_day(slot.vet_id, date), now).await?;
        }
        self.detector.ensure_free(slot.vet_id, date, &interval, Some(slot.id)).await?;

        let updated = TimeSlot { date, start, end, updated_at: now, ..slot };
        self.slots.update_slot_times(&updated).await?;

        info!(slot_id = %slot_id, date = %date, interval = %interval, "slot updated");
        Ok(updated)
    }

    /// Remove a slot that is not reserved
    pub async fn delete(&self, slot_id: SlotId, actor: &Actor) -> Result<()> {
        let slot = self.load(slot_id).await?;
        ensure_manages(actor, slot.vet_id)?;
        if slot.status == SlotStatus::Reserved {
            return Err(PetncoError::InvalidState(format!(
                "slot {slot_id} is reserved; cancel its appointment first"
            )));
        }

        self.slots.delete_slot(slot_id).await?;
        info!(slot_id = %slot_id, vet_id = %slot.vet_id, "slot deleted");
        Ok(())
    }

    /// Copy a slot's time of day onto other dates
    ///
    /// Each target date is created independently; a failure on one date is
    /// reported and the rest still run.
    pub async fn clone_slot(
        &self,
        source_id: SlotId,
        actor: &Actor,
        mode: CloneMode,
        target_date: Option<NaiveDate>,
    ) -> Result<Vec<CloneOutcome>> {
        let source = self.load(source_id).await?;
        ensure_manages(actor, source.vet_id)?;
        let targets = clone_targets(source.date, mode, target_date)?;

        let mut outcomes = Vec::with_capacity(targets.len());
        for date in targets {
            let result = match self.create(actor, source.vet_id, date, source.start, source.end).await
            {
                Ok(slot) => Ok(slot.id),
                Err(err) => {
                    debug!(source_id = %source_id, date = %date, error = %err, "clone target skipped");
                    Err(ItemFailure::from(err))
                }
            };
            outcomes.push(CloneOutcome { date, result });
        }

        let created = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            source_id = %source_id,
            mode = %mode,
            created,
            failed = outcomes.len() - created,
            "slot cloned"
        );
        Ok(outcomes)
    }

    /// Administrative removal that keeps the row: available -> cancelled
    pub async fn withdraw(&self, slot_id: SlotId, actor: &Actor) -> Result<TimeSlot> {
        let slot = self.load(slot_id).await?;
        ensure_manages(actor, slot.vet_id)?;
        if slot.status != SlotStatus::Available {
            return Err(PetncoError::InvalidState(format!(
                "slot {slot_id} is {}; only available slots can be withdrawn",
                slot.status
            )));
        }

        let now = self.clock.now();
        if !self.slots.withdraw_slot(slot_id, now).await? {
            warn!(slot_id = %slot_id, "slot changed state before it could be withdrawn");
            return Err(PetncoError::InvalidState(format!("slot {slot_id} is no longer available")));
        }

        info!(slot_id = %slot_id, "slot withdrawn");
        Ok(TimeSlot { status: SlotStatus::Cancelled, updated_at: now, ..slot })
    }

    /// Bookable slots of a vet, ordered by date then start
    pub async fn list_available(
        &self,
        vet_id: VetId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeSlot>> {
        ensure_range(from, to)?;
        let vet =
            self.vets.get_vet(vet_id).await?.ok_or_else(|| PetncoError::not_found("vet", vet_id))?;
        if !vet.active {
            return Ok(Vec::new());
        }

        self.sweeper.sweep_scope_now(SweepScope::vet_window(vet_id, from, to)).await?;
        self.slots.slots_in_range(vet_id, from, to, Some(SlotStatus::Available)).await
    }

    /// Every slot of a vet in range regardless of status (calendar feed)
    pub async fn vet_schedule(
        &self,
        actor: &Actor,
        vet_id: VetId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeSlot>> {
        ensure_manages(actor, vet_id)?;
        ensure_range(from, to)?;

        self.sweeper.sweep_scope_now(SweepScope::vet_window(vet_id, from, to)).await?;
        self.slots.slots_in_range(vet_id, from, to, None).await
    }

    /// Delete every non-reserved slot of one day, reporting per slot
    pub async fn delete_day(
        &self,
        actor: &Actor,
        vet_id: VetId,
        date: NaiveDate,
    ) -> Result<Vec<DeleteOutcome>> {
        ensure_manages(actor, vet_id)?;

        let day = self.slots.slots_in_range(vet_id, date, date, None).await?;
        let mut outcomes = Vec::with_capacity(day.len());
        for slot in day {
            let result = if slot.status == SlotStatus::Reserved {
                Err(ItemFailure::from(PetncoError::InvalidState(format!(
                    "slot {} is reserved",
                    slot.id
                ))))
            } else {
                self.slots.delete_slot(slot.id).await.map_err(ItemFailure::from)
            };
            outcomes.push(DeleteOutcome { slot_id: slot.id, start: slot.start, end: slot.end, result });
        }

        info!(vet_id = %vet_id, date = %date, slots = outcomes.len(), "day cleared");
        Ok(outcomes)
    }

    async fn load(&self, slot_id: SlotId) -> Result<TimeSlot> {
        self.slots.get_slot(slot_id).await?.ok_or_else(|| PetncoError::not_found("slot", slot_id))
    }
}

fn ensure_manages(actor: &Actor, vet_id: VetId) -> Result<()> {
    if actor.manages(vet_id) {
        Ok(())
    } else {
        Err(PetncoError::Forbidden(format!("user {} cannot manage vet {vet_id}", actor.user_id)))
    }
}

fn ensure_editable(slot: &TimeSlot) -> Result<()> {
    match slot.status {
        SlotStatus::Available => Ok(()),
        SlotStatus::Reserved => Err(PetncoError::InvalidState(format!(
            "slot {} is reserved; cancel its appointment first",
            slot.id
        ))),
        status => Err(PetncoError::InvalidState(format!("slot {} is {status}", slot.id))),
    }
}

fn ensure_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(PetncoError::validation("from", "must not be after to"));
    }
    Ok(())
}

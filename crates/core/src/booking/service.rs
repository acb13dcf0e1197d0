//! Booking service - reservation, cancellation and status progression

use std::collections::HashSet;
use std::sync::Arc;

use petnco_common::Clock;
use petnco_domain::scheduling::validate_notes;
use petnco_domain::{
    Actor, Appointment, AppointmentId, AppointmentStatus, PetncoError, Result, ServiceId, SlotId,
    SlotStatus, SweepScope, TimeSlot, VetId,
};
use tracing::{info, warn};

use super::ports::{AppointmentRepository, BookingStore};
use crate::catalog::ports::{ServiceCatalog, VetDirectory};
use crate::scheduling::ports::SlotRepository;
use crate::scheduling::ExpirationSweeper;

/// Single writer of slot <-> appointment transitions
pub struct BookingService {
    slots: Arc<dyn SlotRepository>,
    store: Arc<dyn BookingStore>,
    appointments: Arc<dyn AppointmentRepository>,
    vets: Arc<dyn VetDirectory>,
    catalog: Arc<dyn ServiceCatalog>,
    sweeper: Arc<ExpirationSweeper>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slots: Arc<dyn SlotRepository>,
        store: Arc<dyn BookingStore>,
        appointments: Arc<dyn AppointmentRepository>,
        vets: Arc<dyn VetDirectory>,
        catalog: Arc<dyn ServiceCatalog>,
        sweeper: Arc<ExpirationSweeper>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { slots, store, appointments, vets, catalog, sweeper, clock }
    }

    /// Book an available slot for the actor
    ///
    /// Duplicate service ids are collapsed; order of first appearance is kept.
    pub async fn reserve(
        &self,
        actor: &Actor,
        slot_id: SlotId,
        service_ids: &[ServiceId],
        notes: &str,
    ) -> Result<Appointment> {
        let slot = self.load_slot(slot_id).await?;

        let now = self.clock.now();
        self.sweeper.sweep_scope(SweepScope::vet_day(slot.vet_id, slot.date), now).await?;
        let slot = self.load_slot(slot_id).await?;

        if slot.status != SlotStatus::Available {
            return Err(PetncoError::Conflict(format!("slot {slot_id} is {}", slot.status)));
        }

        let vet_active = self.vets.get_vet(slot.vet_id).await?.is_some_and(|vet| vet.active);
        if !vet_active {
            return Err(PetncoError::validation("slot_id", "vet is not accepting appointments"));
        }

        let notes = notes.trim();
        validate_notes(notes)?;
        let service_ids = self.bookable_service_ids(slot.vet_id, service_ids).await?;

        let appointment = Appointment {
            id: AppointmentId::new(),
            user_id: actor.user_id,
            vet_id: slot.vet_id,
            slot_id: Some(slot.id),
            date: slot.date,
            start: slot.start,
            end: slot.end,
            service_ids,
            notes: notes.to_owned(),
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.store.reserve(&appointment).await.inspect_err(|err| {
            if matches!(err, PetncoError::Conflict(_)) {
                warn!(slot_id = %slot_id, user_id = %actor.user_id, "lost reservation race");
            }
        })?;

        info!(
            appointment_id = %appointment.id,
            slot_id = %slot_id,
            user_id = %actor.user_id,
            "slot reserved"
        );
        Ok(appointment)
    }

    /// Cancel an appointment and make its slot bookable again
    pub async fn cancel(&self, appointment_id: AppointmentId, actor: &Actor) -> Result<Appointment> {
        let appointment = self.load_appointment(appointment_id).await?;
        if appointment.user_id != actor.user_id && !actor.manages(appointment.vet_id) {
            return Err(PetncoError::Forbidden(format!(
                "user {} cannot cancel appointment {appointment_id}",
                actor.user_id
            )));
        }
        self.cancel_releasing(appointment, SlotStatus::Available).await
    }

    /// Cancel an appointment and withdraw its slot from sale
    pub async fn cancel_and_withdraw(
        &self,
        appointment_id: AppointmentId,
        actor: &Actor,
    ) -> Result<Appointment> {
        let appointment = self.load_appointment(appointment_id).await?;
        ensure_manages(actor, &appointment)?;
        self.cancel_releasing(appointment, SlotStatus::Cancelled).await
    }

    /// pending -> confirmed
    pub async fn confirm(&self, appointment_id: AppointmentId, actor: &Actor) -> Result<Appointment> {
        self.advance(appointment_id, actor, AppointmentStatus::Pending, AppointmentStatus::Confirmed)
            .await
    }

    /// confirmed -> completed
    pub async fn complete(&self, appointment_id: AppointmentId, actor: &Actor) -> Result<Appointment> {
        self.advance(appointment_id, actor, AppointmentStatus::Confirmed, AppointmentStatus::Completed)
            .await
    }

    async fn cancel_releasing(
        &self,
        appointment: Appointment,
        release_to: SlotStatus,
    ) -> Result<Appointment> {
        if !appointment.status.is_open() {
            return Err(PetncoError::InvalidState(format!(
                "appointment {} is {}",
                appointment.id, appointment.status
            )));
        }

        let cancelled = self.store.cancel(appointment.id, release_to, self.clock.now()).await?;
        info!(
            appointment_id = %cancelled.id,
            slot_id = ?cancelled.slot_id,
            slot_status = %release_to,
            "appointment cancelled"
        );
        Ok(cancelled)
    }

    async fn advance(
        &self,
        appointment_id: AppointmentId,
        actor: &Actor,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Appointment> {
        let appointment = self.load_appointment(appointment_id).await?;
        ensure_manages(actor, &appointment)?;
        if appointment.status != from {
            return Err(PetncoError::InvalidState(format!(
                "appointment {appointment_id} is {}, expected {from}",
                appointment.status
            )));
        }

        let updated = self.store.transition(appointment_id, from, to, self.clock.now()).await?;
        info!(appointment_id = %appointment_id, from = %from, to = %to, "appointment status changed");
        Ok(updated)
    }

    async fn bookable_service_ids(
        &self,
        vet_id: VetId,
        requested: &[ServiceId],
    ) -> Result<Vec<ServiceId>> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let offered: HashSet<ServiceId> = self
            .catalog
            .bookable_services(vet_id)
            .await?
            .into_iter()
            .map(|bookable| bookable.service.id)
            .collect();

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(requested.len());
        for id in requested {
            if !offered.contains(id) {
                return Err(PetncoError::validation(
                    "service_ids",
                    format!("service {id} is not offered by this vet"),
                ));
            }
            if seen.insert(*id) {
                unique.push(*id);
            }
        }
        Ok(unique)
    }

    async fn load_slot(&self, slot_id: SlotId) -> Result<TimeSlot> {
        self.slots.get_slot(slot_id).await?.ok_or_else(|| PetncoError::not_found("slot", slot_id))
    }

    async fn load_appointment(&self, appointment_id: AppointmentId) -> Result<Appointment> {
        self.appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| PetncoError::not_found("appointment", appointment_id))
    }
}

fn ensure_manages(actor: &Actor, appointment: &Appointment) -> Result<()> {
    if actor.manages(appointment.vet_id) {
        Ok(())
    } else {
        Err(PetncoError::Forbidden(format!(
            "user {} cannot manage appointment {}",
            actor.user_id, appointment.id
        )))
    }
}

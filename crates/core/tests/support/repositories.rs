//! In-memory port implementations
//!
//! One shared state behind a mutex backs every port, so each call is
//! atomic the same way a store transaction would be.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use petnco_core::booking::ports::{AppointmentRepository, BookingStore};
use petnco_core::catalog::ports::{ServiceCatalog, VetDirectory};
use petnco_core::scheduling::find_conflict;
use petnco_core::scheduling::ports::SlotRepository;
use petnco_domain::scheduling::ExpiryCutoff;
use petnco_domain::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, BookableService,
    Page, PageRequest, PersonalizedService, PetncoError, Result as DomainResult,
    Service, ServiceId, SlotId, SlotStatus, SortOrder, SweepScope, TimeSlot, UserId, VetId,
    VeterinarianProfile,
};

#[derive(Default)]
struct State {
    slots: HashMap<SlotId, TimeSlot>,
    appointments: HashMap<AppointmentId, Appointment>,
    vets: HashMap<VetId, VeterinarianProfile>,
    services: HashMap<ServiceId, Service>,
    offerings: HashMap<(VetId, ServiceId), PersonalizedService>,
}

impl State {
    fn overlap_in(&self, slot: &TimeSlot) -> Option<SlotId> {
        let day: Vec<TimeSlot> = self
            .slots
            .values()
            .filter(|s| s.vet_id == slot.vet_id && s.date == slot.date)
            .cloned()
            .collect();
        find_conflict(&day, slot.vet_id, slot.date, &slot.interval(), Some(slot.id)).map(|s| s.id)
    }
}

/// In-memory store implementing every core port.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a slot in place without any validation (for seeding odd states).
    pub fn seed_slot(&self, slot: TimeSlot) {
        self.state.lock().unwrap().slots.insert(slot.id, slot);
    }

    pub fn slot(&self, id: SlotId) -> TimeSlot {
        self.state.lock().unwrap().slots.get(&id).cloned().unwrap()
    }

    pub fn appointment(&self, id: AppointmentId) -> Appointment {
        self.state.lock().unwrap().appointments.get(&id).cloned().unwrap()
    }

    pub fn all_slots(&self) -> Vec<TimeSlot> {
        self.state.lock().unwrap().slots.values().cloned().collect()
    }

    /// Open appointments pointing at `slot_id`.
    pub fn open_appointments_for(&self, slot_id: SlotId) -> usize {
        self.state
            .lock()
            .unwrap()
            .appointments
            .values()
            .filter(|a| a.slot_id == Some(slot_id) && a.status.is_open())
            .count()
    }
}

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn insert_slot(&self, slot: &TimeSlot) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.overlap_in(slot) {
            return Err(PetncoError::Conflict(format!("overlaps slot {existing}")));
        }
        state.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn get_slot(&self, id: SlotId) -> DomainResult<Option<TimeSlot>> {
        Ok(self.state.lock().unwrap().slots.get(&id).cloned())
    }

    async fn update_slot_times(&self, slot: &TimeSlot) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        match state.slots.get(&slot.id) {
            Some(current) if current.status == SlotStatus::Available => {}
            Some(_) => return Err(PetncoError::InvalidState("slot is not available".into())),
            None => return Err(PetncoError::not_found("slot", slot.id)),
        }
        if let Some(existing) = state.overlap_in(slot) {
            return Err(PetncoError::Conflict(format!("overlaps slot {existing}")));
        }
        state.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn delete_slot(&self, id: SlotId) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        match state.slots.get(&id).map(|s| s.status) {
            None => return Err(PetncoError::not_found("slot", id)),
            Some(SlotStatus::Reserved) => {
                return Err(PetncoError::InvalidState("slot is reserved".into()))
            }
            Some(_) => {}
        }
        state.slots.remove(&id);
        for appointment in state.appointments.values_mut() {
            if appointment.slot_id == Some(id) {
                appointment.slot_id = None;
            }
        }
        Ok(())
    }

    async fn active_slots_on(&self, vet_id: VetId, date: NaiveDate) -> DomainResult<Vec<TimeSlot>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .slots
            .values()
            .filter(|s| s.vet_id == vet_id && s.date == date && s.is_active())
            .cloned()
            .collect())
    }

    async fn slots_in_range(
        &self,
        vet_id: VetId,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = self
            .state
            .lock()
            .unwrap()
            .slots
            .values()
            .filter(|s| s.vet_id == vet_id && s.date >= from && s.date <= to)
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.date, s.start));
        Ok(slots)
    }

    async fn expire_available(
        &self,
        scope: SweepScope,
        cutoff: ExpiryCutoff,
        now: DateTime<Utc>,
    ) -> DomainResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut expired = 0;
        for slot in state.slots.values_mut() {
            if slot.status == SlotStatus::Available
                && scope.contains(slot.vet_id, slot.date)
                && cutoff.is_expired(slot.date, slot.start)
            {
                slot.status = SlotStatus::Expired;
                slot.updated_at = now;
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn withdraw_slot(&self, id: SlotId, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.slots.get_mut(&id) {
            Some(slot) if slot.status == SlotStatus::Available => {
                slot.status = SlotStatus::Cancelled;
                slot.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn reserve(&self, appointment: &Appointment) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let slot_id = appointment
            .slot_id
            .ok_or_else(|| PetncoError::Internal("appointment without slot".into()))?;
        match state.slots.get_mut(&slot_id) {
            Some(slot) if slot.status == SlotStatus::Available => {
                slot.status = SlotStatus::Reserved;
                slot.updated_at = appointment.created_at;
            }
            Some(_) => return Err(PetncoError::Conflict(format!("slot {slot_id} is taken"))),
            None => return Err(PetncoError::not_found("slot", slot_id)),
        }
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn cancel(
        &self,
        id: AppointmentId,
        release_to: SlotStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        let mut state = self.state.lock().unwrap();
        let appointment =
            state.appointments.get_mut(&id).ok_or_else(|| PetncoError::not_found("appointment", id))?;
        if !appointment.status.is_open() {
            return Err(PetncoError::InvalidState(format!("appointment {id} is not open")));
        }
        appointment.status = AppointmentStatus::Cancelled;
        appointment.updated_at = now;
        let cancelled = appointment.clone();

        if let Some(slot) = cancelled.slot_id.and_then(|sid| state.slots.get_mut(&sid)) {
            if slot.status == SlotStatus::Reserved {
                slot.status = release_to;
                slot.updated_at = now;
            }
        }
        Ok(cancelled)
    }

    async fn transition(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        let mut state = self.state.lock().unwrap();
        let appointment =
            state.appointments.get_mut(&id).ok_or_else(|| PetncoError::not_found("appointment", id))?;
        if appointment.status != from {
            return Err(PetncoError::InvalidState(format!("appointment {id} is not {from}")));
        }
        appointment.status = to;
        appointment.updated_at = now;
        Ok(appointment.clone())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn get_appointment(&self, id: AppointmentId) -> DomainResult<Option<Appointment>> {
        Ok(self.state.lock().unwrap().appointments.get(&id).cloned())
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Appointment>> {
        let mut items: Vec<Appointment> = self
            .state
            .lock()
            .unwrap()
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        items.sort_by_key(|a| (a.date, a.start, a.created_at));
        if filter.order == SortOrder::NewestFirst {
            items.reverse();
        }
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl VetDirectory for InMemoryStore {
    async fn get_vet(&self, id: VetId) -> DomainResult<Option<VeterinarianProfile>> {
        Ok(self.state.lock().unwrap().vets.get(&id).cloned())
    }

    async fn find_vet_by_user(&self, user_id: UserId) -> DomainResult<Option<VeterinarianProfile>> {
        Ok(self.state.lock().unwrap().vets.values().find(|v| v.user_id == user_id).cloned())
    }

    async fn save_vet(&self, profile: &VeterinarianProfile) -> DomainResult<()> {
        self.state.lock().unwrap().vets.insert(profile.id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryStore {
    async fn upsert_service(&self, service: &Service) -> DomainResult<()> {
        self.state.lock().unwrap().services.insert(service.id, service.clone());
        Ok(())
    }

    async fn get_service(&self, id: ServiceId) -> DomainResult<Option<Service>> {
        Ok(self.state.lock().unwrap().services.get(&id).cloned())
    }

    async fn set_personalized(&self, entry: &PersonalizedService) -> DomainResult<()> {
        self.state.lock().unwrap().offerings.insert((entry.vet_id, entry.service_id), entry.clone());
        Ok(())
    }

    async fn bookable_services(&self, vet_id: VetId) -> DomainResult<Vec<BookableService>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .offerings
            .values()
            .filter(|o| o.vet_id == vet_id && o.active)
            .filter_map(|o| {
                state
                    .services
                    .get(&o.service_id)
                    .filter(|s| s.active)
                    .map(|s| BookableService { service: s.clone(), price_cents: o.price_cents })
            })
            .collect())
    }
}

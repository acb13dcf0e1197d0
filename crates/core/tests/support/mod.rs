//! Shared test helpers for `petnco-core` integration tests.
//!
//! An in-memory store backs every port, and [`Harness`] wires the services
//! over it with a frozen clock so tests can focus on behaviour.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use petnco_common::MockClock;
use petnco_core::{
    AppointmentQueries, BookingService, CatalogService, ExpirationSweeper, SlotStore,
};
use petnco_domain::{
    Actor, Appointment, SchedulingConfig, Service, ServiceId, TimeSlot, UserId, VetId,
};

pub use repositories::InMemoryStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// Services wired over one [`InMemoryStore`] and one [`MockClock`]
pub struct Harness {
    pub store: InMemoryStore,
    pub clock: MockClock,
    pub config: SchedulingConfig,
    pub slots: SlotStore,
    pub booking: BookingService,
    pub queries: AppointmentQueries,
    pub catalog: CatalogService,
    pub sweeper: Arc<ExpirationSweeper>,
}

impl Harness {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::with_config(now, SchedulingConfig::default())
    }

    pub fn with_config(now: DateTime<Utc>, config: SchedulingConfig) -> Self {
        let store = InMemoryStore::new();
        let clock = MockClock::at(now);
        let shared = Arc::new(store.clone());
        let clock_dyn: Arc<dyn petnco_common::Clock> = Arc::new(clock.clone());

        let sweeper =
            Arc::new(ExpirationSweeper::new(shared.clone(), clock_dyn.clone(), config.clone()));
        let slots = SlotStore::new(
            shared.clone(),
            shared.clone(),
            sweeper.clone(),
            clock_dyn.clone(),
            config.clone(),
        );
        let booking = BookingService::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared.clone(),
            sweeper.clone(),
            clock_dyn.clone(),
        );
        let queries = AppointmentQueries::new(shared.clone());
        let catalog = CatalogService::new(shared.clone(), shared, clock_dyn);

        Self { store, clock, config, slots, booking, queries, catalog, sweeper }
    }

    /// Opt a fresh user in as a vet; returns the vet's actor and id
    pub async fn vet(&self, name: &str) -> (Actor, VetId) {
        let user_id = UserId::new();
        let profile = self.catalog.opt_in(user_id, name, None).await.unwrap();
        (Actor::vet(user_id, profile.id), profile.id)
    }

    pub async fn slot(
        &self,
        actor: &Actor,
        vet_id: VetId,
        day: NaiveDate,
        from: NaiveTime,
        to: NaiveTime,
    ) -> TimeSlot {
        self.slots.create(actor, vet_id, day, from, to).await.unwrap()
    }

    pub async fn book(&self, client: &Actor, slot: &TimeSlot) -> Appointment {
        self.booking.reserve(client, slot.id, &[], "").await.unwrap()
    }

    /// Base service offered by `vet_id` at `price_cents`
    pub async fn offer(
        &self,
        vet: &Actor,
        vet_id: VetId,
        name: &str,
        price_cents: i64,
    ) -> ServiceId {
        let service = Service {
            id: ServiceId::new(),
            name: name.to_string(),
            category: "general".to_string(),
            active: true,
        };
        let service = self.catalog.upsert_service(&Actor::staff(UserId::new()), service).await.unwrap();
        self.catalog
            .set_personalized_service(vet, vet_id, service.id, price_cents, true)
            .await
            .unwrap();
        service.id
    }
}

pub fn client() -> Actor {
    Actor::client(UserId::new())
}

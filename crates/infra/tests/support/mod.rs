//! Shared fixtures for infra integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use petnco_common::{Clock, MockClock};
use petnco_core::{AppointmentQueries, BookingService, CatalogService, ExpirationSweeper, SlotStore};
use petnco_domain::{Actor, SchedulingConfig, UserId, VetId};
use petnco_infra::database::{
    DbManager, SqliteBookingRepository, SqliteCatalogRepository, SqliteSlotRepository,
};
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// Temporary migrated database that lives as long as the value
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let manager =
            DbManager::new(dir.path().join("petnco.db"), 8, 5000).expect("db manager created");
        manager.run_migrations().expect("migrations run");
        Self { manager: Arc::new(manager), dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Core services wired over SQLite adapters
pub struct SqliteHarness {
    pub db: TestDatabase,
    pub clock: MockClock,
    pub slot_repo: Arc<SqliteSlotRepository>,
    pub booking_repo: Arc<SqliteBookingRepository>,
    pub catalog_repo: Arc<SqliteCatalogRepository>,
    pub slots: SlotStore,
    pub booking: BookingService,
    pub queries: AppointmentQueries,
    pub catalog: CatalogService,
    pub sweeper: Arc<ExpirationSweeper>,
}

impl SqliteHarness {
    pub fn at(now: DateTime<Utc>) -> Self {
        let db = TestDatabase::new();
        let clock = MockClock::at(now);
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let config = SchedulingConfig::default();

        let slot_repo = Arc::new(SqliteSlotRepository::new(Arc::clone(&db.manager)));
        let booking_repo = Arc::new(SqliteBookingRepository::new(Arc::clone(&db.manager)));
        let catalog_repo = Arc::new(SqliteCatalogRepository::new(Arc::clone(&db.manager)));

        let sweeper = Arc::new(ExpirationSweeper::new(
            slot_repo.clone(),
            shared_clock.clone(),
            config.clone(),
        ));
        let slots = SlotStore::new(
            slot_repo.clone(),
            catalog_repo.clone(),
            sweeper.clone(),
            shared_clock.clone(),
            config,
        );
        let booking = BookingService::new(
            slot_repo.clone(),
            booking_repo.clone(),
            booking_repo.clone(),
            catalog_repo.clone(),
            catalog_repo.clone(),
            sweeper.clone(),
            shared_clock.clone(),
        );
        let queries = AppointmentQueries::new(booking_repo.clone());
        let catalog = CatalogService::new(catalog_repo.clone(), catalog_repo.clone(), shared_clock);

        Self { db, clock, slot_repo, booking_repo, catalog_repo, slots, booking, queries, catalog, sweeper }
    }

    pub async fn vet(&self, name: &str) -> (Actor, VetId) {
        let user_id = UserId::new();
        let profile = self.catalog.opt_in(user_id, name, None).await.unwrap();
        (Actor::vet(user_id, profile.id), profile.id)
    }
}

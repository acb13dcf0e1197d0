//! Application context - dependency injection container

use std::sync::Arc;

use petnco_common::{Clock, SystemClock};
use petnco_core::{
    AppointmentQueries, BookingNotifier, BookingService, CatalogService, ExpirationSweeper,
    SlotStore,
};
use petnco_domain::{Config, Result};
use petnco_infra::{
    DbManager, LogNotifier, SqliteBookingRepository, SqliteCatalogRepository,
    SqliteSlotRepository,
};
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Type alias for booking notifier port trait object
type DynBookingNotifier = dyn BookingNotifier + Send + Sync + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub clock: Arc<dyn Clock>,

    // Core services
    pub slots: SlotStore,
    pub booking: BookingService,
    pub queries: AppointmentQueries,
    pub catalog: CatalogService,
    pub sweeper: Arc<ExpirationSweeper>,

    pub notifier: Arc<DynBookingNotifier>,
}

impl AppContext {
    /// Open the configured database, migrate it and wire production services
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;
        info!(db_path = %db.path().display(), "database ready");

        Ok(Self::with_parts(config, db, Arc::new(SystemClock), Arc::new(LogNotifier::new())))
    }

    /// Wire services over an already migrated database
    pub fn with_parts(
        config: Config,
        db: Arc<DbManager>,
        clock: Arc<dyn Clock>,
        notifier: Arc<DynBookingNotifier>,
    ) -> Self {
        let slot_repo = Arc::new(SqliteSlotRepository::new(Arc::clone(&db)));
        let booking_repo = Arc::new(SqliteBookingRepository::new(Arc::clone(&db)));
        let catalog_repo = Arc::new(SqliteCatalogRepository::new(Arc::clone(&db)));
        let scheduling = config.scheduling.clone();

        let sweeper =
            Arc::new(ExpirationSweeper::new(slot_repo.clone(), clock.clone(), scheduling.clone()));
        let slots = SlotStore::new(
            slot_repo.clone(),
            catalog_repo.clone(),
            sweeper.clone(),
            clock.clone(),
            scheduling,
        );
        let booking = BookingService::new(
            slot_repo,
            booking_repo.clone(),
            booking_repo.clone(),
            catalog_repo.clone(),
            catalog_repo.clone(),
            sweeper.clone(),
            clock.clone(),
        );
        let queries = AppointmentQueries::new(booking_repo);
        let catalog = CatalogService::new(catalog_repo.clone(), catalog_repo, clock.clone());

        Self { config, db, clock, slots, booking, queries, catalog, sweeper, notifier }
    }

    /// Check the database and the connection pool
    pub fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new(self.clock.now());

        match self.db.health_check() {
            Ok(pool) => {
                status = status.add_component(ComponentHealth::healthy("database"));
                status = if pool.healthy {
                    status.add_component(ComponentHealth::healthy("connection_pool"))
                } else {
                    status.add_component(ComponentHealth::unhealthy(
                        "connection_pool",
                        pool.message.unwrap_or_else(|| "pool unhealthy".to_string()),
                    ))
                };
            }
            Err(err) => {
                status = status
                    .add_component(ComponentHealth::unhealthy("database", err.to_string()))
                    .add_component(ComponentHealth::unhealthy(
                        "connection_pool",
                        "database unavailable",
                    ));
            }
        }

        status = status.with_pool_usage(&self.db.pool().metrics());
        status.calculate_score();
        status
    }
}

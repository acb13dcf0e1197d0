//! SQLite-backed implementation of the `VetDirectory` and `ServiceCatalog`
//! ports.

use std::sync::Arc;

use async_trait::async_trait;
use petnco_core::catalog::ports::{ServiceCatalog, VetDirectory};
use petnco_domain::{
    BookableService, PersonalizedService, Result as DomainResult, Service, ServiceId, UserId,
    VetId, VeterinarianProfile,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::columns::{parse_text, parse_timestamp};
use super::manager::DbManager;
use crate::errors::InfraError;

const VET_SELECT: &str =
    "SELECT id, user_id, display_name, specialty, active, created_at FROM veterinarians";

const UPSERT_VET_SQL: &str = "INSERT INTO veterinarians (
        id, user_id, display_name, specialty, active, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        display_name = excluded.display_name,
        specialty = excluded.specialty,
        active = excluded.active";

const UPSERT_SERVICE_SQL: &str = "INSERT INTO services (id, name, category, active)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        category = excluded.category,
        active = excluded.active";

const UPSERT_OFFERING_SQL: &str = "INSERT INTO vet_services (vet_id, service_id, price_cents, active)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(vet_id, service_id) DO UPDATE SET
        price_cents = excluded.price_cents,
        active = excluded.active";

const BOOKABLE_SQL: &str = "SELECT s.id, s.name, s.category, s.active, vs.price_cents
    FROM vet_services vs
    JOIN services s ON s.id = vs.service_id
    WHERE vs.vet_id = ?1 AND vs.active = 1 AND s.active = 1
    ORDER BY s.name";

/// SQLite-backed vet directory and service catalog.
pub struct SqliteCatalogRepository {
    db: Arc<DbManager>,
}

impl SqliteCatalogRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VetDirectory for SqliteCatalogRepository {
    async fn get_vet(&self, id: VetId) -> DomainResult<Option<VeterinarianProfile>> {
        self.db.blocking(move |conn| find_vet(conn, "id", &id.to_string())).await
    }

    async fn find_vet_by_user(&self, user_id: UserId) -> DomainResult<Option<VeterinarianProfile>> {
        self.db.blocking(move |conn| find_vet(conn, "user_id", &user_id.to_string())).await
    }

    async fn save_vet(&self, profile: &VeterinarianProfile) -> DomainResult<()> {
        let profile = profile.clone();
        self.db
            .blocking(move |conn| {
                conn.execute(
                    UPSERT_VET_SQL,
                    params![
                        profile.id.to_string(),
                        profile.user_id.to_string(),
                        profile.display_name,
                        profile.specialty,
                        profile.active,
                        profile.created_at.timestamp(),
                    ],
                )?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl ServiceCatalog for SqliteCatalogRepository {
    async fn upsert_service(&self, service: &Service) -> DomainResult<()> {
        let service = service.clone();
        self.db
            .blocking(move |conn| {
                conn.execute(
                    UPSERT_SERVICE_SQL,
                    params![service.id.to_string(), service.name, service.category, service.active],
                )?;
                Ok(())
            })
            .await
    }

    async fn get_service(&self, id: ServiceId) -> DomainResult<Option<Service>> {
        self.db.blocking(move |conn| find_service(conn, id)).await
    }

    async fn set_personalized(&self, entry: &PersonalizedService) -> DomainResult<()> {
        let entry = entry.clone();
        self.db
            .blocking(move |conn| {
                conn.execute(
                    UPSERT_OFFERING_SQL,
                    params![
                        entry.vet_id.to_string(),
                        entry.service_id.to_string(),
                        entry.price_cents,
                        entry.active,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn bookable_services(&self, vet_id: VetId) -> DomainResult<Vec<BookableService>> {
        self.db
            .blocking(move |conn| {
                let mut stmt = conn.prepare(BOOKABLE_SQL)?;
                let services = stmt
                    .query_map(params![vet_id.to_string()], |row| {
                        Ok(BookableService { service: map_service_row(row)?, price_cents: row.get(4)? })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(services)
            })
            .await
    }
}

/// `column` is one of the fixed lookup columns, never caller input
fn find_vet(
    conn: &Connection,
    column: &str,
    value: &str,
) -> Result<Option<VeterinarianProfile>, InfraError> {
    let sql = format!("{VET_SELECT} WHERE {column} = ?1");
    Ok(conn.query_row(&sql, params![value], map_vet_row).optional()?)
}

fn find_service(conn: &Connection, id: ServiceId) -> Result<Option<Service>, InfraError> {
    Ok(conn
        .query_row(
            "SELECT id, name, category, active FROM services WHERE id = ?1",
            params![id.to_string()],
            map_service_row,
        )
        .optional()?)
}

fn map_vet_row(row: &Row<'_>) -> rusqlite::Result<VeterinarianProfile> {
    Ok(VeterinarianProfile {
        id: parse_text(row, 0)?,
        user_id: parse_text(row, 1)?,
        display_name: row.get(2)?,
        specialty: row.get(3)?,
        active: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
    })
}

fn map_service_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        id: parse_text(row, 0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        active: row.get(3)?,
    })
}

//! Catalog service - vet opt-in and service offerings

use std::sync::Arc;

use petnco_common::Clock;
use petnco_domain::constants::DISPLAY_NAME_MAX_CHARS;
use petnco_domain::{
    Actor, BookableService, PersonalizedService, PetncoError, Result, Service, ServiceId, UserId,
    VetId, VeterinarianProfile,
};
use tracing::info;

use super::ports::{ServiceCatalog, VetDirectory};

/// Vet directory and catalog management
pub struct CatalogService {
    vets: Arc<dyn VetDirectory>,
    catalog: Arc<dyn ServiceCatalog>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(
        vets: Arc<dyn VetDirectory>,
        catalog: Arc<dyn ServiceCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { vets, catalog, clock }
    }

    /// Create the user's vet profile, or reactivate and rename an existing one
    pub async fn opt_in(
        &self,
        user_id: UserId,
        display_name: &str,
        specialty: Option<String>,
    ) -> Result<VeterinarianProfile> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(PetncoError::validation("display_name", "must not be empty"));
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX_CHARS {
            return Err(PetncoError::validation(
                "display_name",
                format!("must be at most {DISPLAY_NAME_MAX_CHARS} characters"),
            ));
        }
        let specialty = specialty.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());

        let profile = match self.vets.find_vet_by_user(user_id).await? {
            Some(existing) => VeterinarianProfile {
                display_name: display_name.to_owned(),
                specialty,
                active: true,
                ..existing
            },
            None => VeterinarianProfile {
                id: VetId::new(),
                user_id,
                display_name: display_name.to_owned(),
                specialty,
                active: true,
                created_at: self.clock.now(),
            },
        };

        self.vets.save_vet(&profile).await?;
        info!(vet_id = %profile.id, user_id = %user_id, "vet profile opted in");
        Ok(profile)
    }

    /// Deactivate a profile; its slots and history stay in place
    pub async fn revoke(&self, actor: &Actor, vet_id: VetId) -> Result<VeterinarianProfile> {
        if !actor.manages(vet_id) {
            return Err(PetncoError::Forbidden(format!("cannot revoke vet {vet_id}")));
        }
        let mut profile = self.profile(vet_id).await?;
        if profile.active {
            profile.active = false;
            self.vets.save_vet(&profile).await?;
            info!(vet_id = %vet_id, "vet profile revoked");
        }
        Ok(profile)
    }

    pub async fn profile(&self, vet_id: VetId) -> Result<VeterinarianProfile> {
        self.vets.get_vet(vet_id).await?.ok_or_else(|| PetncoError::not_found("vet", vet_id))
    }

    /// Staff-only maintenance of the base catalog
    pub async fn upsert_service(&self, actor: &Actor, service: Service) -> Result<Service> {
        if !actor.is_staff {
            return Err(PetncoError::Forbidden("only staff can edit the catalog".to_string()));
        }
        if service.name.trim().is_empty() {
            return Err(PetncoError::validation("name", "must not be empty"));
        }
        self.catalog.upsert_service(&service).await?;
        Ok(service)
    }

    /// Set a vet's price and activation for one base service
    pub async fn set_personalized_service(
        &self,
        actor: &Actor,
        vet_id: VetId,
        service_id: ServiceId,
        price_cents: i64,
        active: bool,
    ) -> Result<PersonalizedService> {
        if !actor.manages(vet_id) {
            return Err(PetncoError::Forbidden(format!("cannot edit services of vet {vet_id}")));
        }
        if price_cents < 0 {
            return Err(PetncoError::validation("price_cents", "must not be negative"));
        }
        self.profile(vet_id).await?;
        self.catalog
            .get_service(service_id)
            .await?
            .ok_or_else(|| PetncoError::not_found("service", service_id))?;

        let entry = PersonalizedService { vet_id, service_id, price_cents, active };
        self.catalog.set_personalized(&entry).await?;
        Ok(entry)
    }

    pub async fn vet_services(&self, vet_id: VetId) -> Result<Vec<BookableService>> {
        self.profile(vet_id).await?;
        self.catalog.bookable_services(vet_id).await
    }
}

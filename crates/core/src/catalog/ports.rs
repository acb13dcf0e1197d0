//! Port interfaces for the vet directory and service catalog

use async_trait::async_trait;
use petnco_domain::{
    BookableService, PersonalizedService, Result, Service, ServiceId, UserId, VetId,
    VeterinarianProfile,
};

/// Veterinarian profile persistence
#[async_trait]
pub trait VetDirectory: Send + Sync {
    /// Get a profile by id
    async fn get_vet(&self, id: VetId) -> Result<Option<VeterinarianProfile>>;

    /// Get the profile owned by a user, active or not
    async fn find_vet_by_user(&self, user_id: UserId) -> Result<Option<VeterinarianProfile>>;

    /// Insert or replace a profile
    async fn save_vet(&self, profile: &VeterinarianProfile) -> Result<()>;
}

/// Base services and per-vet offerings
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Insert or replace a base service
    async fn upsert_service(&self, service: &Service) -> Result<()>;

    async fn get_service(&self, id: ServiceId) -> Result<Option<Service>>;

    /// Insert or replace a vet's offering of a base service
    async fn set_personalized(&self, entry: &PersonalizedService) -> Result<()>;

    /// Services whose base entry and the vet's offering are both active
    async fn bookable_services(&self, vet_id: VetId) -> Result<Vec<BookableService>>;
}

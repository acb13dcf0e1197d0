//! Vet directory and service catalog commands

use petnco_domain::{
    Actor, BookableService, PersonalizedService, Result, Service, ServiceId, VetId,
    VeterinarianProfile,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Make the caller a vet, or refresh their existing profile
pub async fn opt_in(
    ctx: &AppContext,
    actor: &Actor,
    display_name: &str,
    specialty: Option<String>,
) -> Result<VeterinarianProfile> {
    execute_command("catalog::opt_in", || ctx.catalog.opt_in(actor.user_id, display_name, specialty))
        .await
}

pub async fn revoke_vet(
    ctx: &AppContext,
    actor: &Actor,
    vet_id: VetId,
) -> Result<VeterinarianProfile> {
    execute_command("catalog::revoke", || ctx.catalog.revoke(actor, vet_id)).await
}

pub async fn upsert_service(ctx: &AppContext, actor: &Actor, service: Service) -> Result<Service> {
    execute_command("catalog::upsert_service", || ctx.catalog.upsert_service(actor, service)).await
}

pub async fn set_personalized_service(
    ctx: &AppContext,
    actor: &Actor,
    vet_id: VetId,
    service_id: ServiceId,
    price_cents: i64,
    active: bool,
) -> Result<PersonalizedService> {
    execute_command("catalog::set_personalized_service", || {
        ctx.catalog.set_personalized_service(actor, vet_id, service_id, price_cents, active)
    })
    .await
}

pub async fn vet_services(ctx: &AppContext, vet_id: VetId) -> Result<Vec<BookableService>> {
    execute_command("catalog::vet_services", || ctx.catalog.vet_services(vet_id)).await
}

//! HTTP surface
//!
//! Builds the axum [`Router`] over a shared [`AppContext`]. Handlers only
//! translate between HTTP and the command layer.

pub mod appointments;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod slots;
pub mod system;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tracing::debug;

pub use error::{ApiError, ErrorBody};
pub use identity::Caller;

use crate::context::AppContext;

/// Build the API router
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/maintenance/sweep", post(system::sweep))
        // Vets and catalog
        .route("/vets", post(catalog::opt_in))
        .route("/vets/{vet}/revoke", post(catalog::revoke))
        .route("/vets/{vet}/services", get(catalog::vet_services))
        .route("/vets/{vet}/services/{service}", put(catalog::set_offering))
        .route("/services/{service}", put(catalog::upsert_service))
        // Slots
        .route("/vets/{vet}/slots", post(slots::create))
        .route("/vets/{vet}/slots/available", get(slots::list_available))
        .route("/vets/{vet}/schedule", get(slots::schedule))
        .route("/vets/{vet}/days/{date}", axum::routing::delete(slots::delete_day))
        .route("/slots/{id}", patch(slots::update).delete(slots::delete))
        .route("/slots/{id}/clone", post(slots::clone))
        .route("/slots/{id}/withdraw", post(slots::withdraw))
        .route("/slots/{id}/reserve", post(appointments::reserve))
        // Appointments
        .route("/appointments", get(appointments::list))
        .route("/appointments/{id}", get(appointments::get))
        .route("/appointments/{id}/cancel", post(appointments::cancel))
        .route("/appointments/{id}/confirm", post(appointments::confirm))
        .route("/appointments/{id}/complete", post(appointments::complete))
        .layer(middleware::from_fn(log_request))
        .with_state(ctx)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    debug!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "http request"
    );
    response
}

//! Veterinarian directory and service catalog
//!
//! Read-only from the booking side; this module owns opt-in, revocation and
//! per-vet service offerings.

pub mod ports;
pub mod service;

pub use ports::{ServiceCatalog, VetDirectory};
pub use service::CatalogService;

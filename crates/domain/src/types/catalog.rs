//! Service catalog types

use serde::{Deserialize, Serialize};

use super::ids::{ServiceId, VetId};

/// Base catalog entry (consultation, vaccination, grooming...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub category: String,
    pub active: bool,
}

/// A vet's own offering of a base service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedService {
    pub vet_id: VetId,
    pub service_id: ServiceId,
    pub price_cents: i64,
    pub active: bool,
}

/// Service that can currently be booked with a vet, with the vet's price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookableService {
    pub service: Service,
    pub price_cents: i64,
}

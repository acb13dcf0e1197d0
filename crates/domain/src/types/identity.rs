//! Caller identity as supplied by the identity provider

use serde::{Deserialize, Serialize};

use super::ids::{UserId, VetId};

/// Who is performing an operation
///
/// The core trusts this value; authentication happens before it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    /// Clinic staff may act on any vet's slots and appointments
    pub is_staff: bool,
    /// Set when the user acts as a veterinarian
    pub vet_id: Option<VetId>,
}

impl Actor {
    /// Plain client
    pub fn client(user_id: UserId) -> Self {
        Self { user_id, is_staff: false, vet_id: None }
    }

    pub fn vet(user_id: UserId, vet_id: VetId) -> Self {
        Self { user_id, is_staff: false, vet_id: Some(vet_id) }
    }

    pub fn staff(user_id: UserId) -> Self {
        Self { user_id, is_staff: true, vet_id: None }
    }

    /// Whether the actor may manage `vet_id`'s schedule and services
    pub fn manages(&self, vet_id: VetId) -> bool {
        self.is_staff || self.vet_id == Some(vet_id)
    }
}

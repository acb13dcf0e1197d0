//! Veterinarian profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{UserId, VetId};

/// A user who opted in to offer appointments
///
/// Profiles are deactivated, never deleted, when the role is revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeterinarianProfile {
    pub id: VetId,
    pub user_id: UserId,
    pub display_name: String,
    pub specialty: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

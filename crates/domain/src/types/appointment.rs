//! Appointment types, listing filters and pagination

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AppointmentId, ServiceId, SlotId, UserId, VetId};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{PetncoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

crate::impl_domain_status_conversions!(AppointmentStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
    Completed => "completed",
});

impl AppointmentStatus {
    /// Pending and confirmed appointments hold their slot
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// A client's booking of one slot
///
/// Date and times are a snapshot taken at reservation, so the record stays
/// meaningful after its slot is deleted (`slot_id` becomes `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub vet_id: VetId,
    pub slot_id: Option<SlotId>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub service_ids: Vec<ServiceId>,
    pub notes: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Latest date and start time first
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentFilter {
    pub user_id: Option<UserId>,
    pub vet_id: Option<VetId>,
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order: SortOrder,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.user_id.map_or(true, |u| appointment.user_id == u)
            && self.vet_id.map_or(true, |v| appointment.vet_id == v)
            && self.status.map_or(true, |s| appointment.status == s)
            && self.date_from.map_or(true, |from| appointment.date >= from)
            && self.date_to.map_or(true, |to| appointment.date <= to)
    }

    pub fn validate(&self) -> Result<()> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) if from > to => {
                Err(PetncoError::validation("date_from", "must not be after date_to"))
            }
            _ => Ok(()),
        }
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Rejects page 0 and clamps `per_page` into `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, per_page: Option<u32>) -> Result<Self> {
        if page == 0 {
            return Err(PetncoError::validation("page", "pages start at 1"));
        }
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self { items, page: request.page, per_page: request.per_page, total }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page.max(1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Reserved,
    Cancelled,
}

/// Plain summary handed to the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingNotice {
    pub kind: NoticeKind,
    pub appointment_id: AppointmentId,
    pub user_id: UserId,
    pub vet_id: VetId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BookingNotice {
    pub fn for_appointment(kind: NoticeKind, appointment: &Appointment) -> Self {
        Self {
            kind,
            appointment_id: appointment.id,
            user_id: appointment.user_id,
            vet_id: appointment.vet_id,
            date: appointment.date,
            start: appointment.start,
            end: appointment.end,
        }
    }
}
